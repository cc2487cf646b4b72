use clap::Args;
use eyre::Result;

use crate::{
    ops, plugins,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct ListCommand {}

impl ListCommand {
    pub fn run(&self) -> Result<()> {
        ops::list(&plugins::registry()).render(&mut TerminalOutput::new());
        Ok(())
    }
}
