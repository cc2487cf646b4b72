//! Generate operation - run a session and commit its results.

use eyre::Result;
use shapegen_core::GenerationLogger;

use super::project::Project;
use crate::reports::GenerateReport;

/// Execute the generate operation.
pub fn generate(project: &Project, logger: &GenerationLogger) -> Result<GenerateReport> {
    let session = project.session()?;
    let results = session.generate(&project.model, |id| project.includes(id), logger)?;
    let written = results.commit()?;

    Ok(GenerateReport {
        dry_run: project.settings.dry_run(),
        output_dir: project.output_dir.clone(),
        summary: results.to_string(),
        written: written.into_iter().collect(),
        roots: results.roots().iter().cloned().collect(),
    })
}
