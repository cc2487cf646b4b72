use clap::Args;
use eyre::Result;
use shapegen_core::GenerationLogger;

use super::{Logging, ProjectArgs};
use crate::{
    ops::{self, project::Switches},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Preview what would be written without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Keep existing directories under each destination root
    #[arg(long)]
    pub skip_clean: bool,

    /// Do not write the do-not-edit warning file into destination roots
    #[arg(long)]
    pub skip_warnings: bool,
}

impl GenerateCommand {
    pub fn run(&self, logging: Logging) -> Result<()> {
        let project = self.project.project(Switches {
            dry_run: self.dry_run,
            skip_clean: self.skip_clean,
            skip_warnings: self.skip_warnings,
            verbose: logging.verbose,
            debug: logging.debug,
        });
        let logger = GenerationLogger::tracing(logging.verbose || logging.debug);

        let report = ops::generate(&project, &logger)?;
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
