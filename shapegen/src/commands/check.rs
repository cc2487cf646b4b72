use clap::Args;
use eyre::Result;

use super::ProjectArgs;
use crate::{
    ops::{self, project::Switches},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub project: ProjectArgs,
}

impl CheckCommand {
    /// Run the check command, exiting with status 1 if any error is found.
    pub fn run(&self) -> Result<()> {
        let project = self.project.project(Switches {
            dry_run: true,
            ..Switches::default()
        });

        let report = ops::check(&self.project.manifest, &project)?;
        report.render(&mut TerminalOutput::new());

        if !report.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}
