use clap::Args;
use eyre::Result;

use super::{Logging, ProjectArgs};
use crate::{
    ops::{self, project::Switches},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CleanCommand {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Preview what would be deleted without actually deleting
    #[arg(long)]
    pub dry_run: bool,
}

impl CleanCommand {
    pub fn run(&self, logging: Logging) -> Result<()> {
        let project = self.project.project(Switches {
            dry_run: self.dry_run,
            verbose: logging.verbose,
            debug: logging.debug,
            ..Switches::default()
        });

        let report = ops::clean(&project)?;
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
