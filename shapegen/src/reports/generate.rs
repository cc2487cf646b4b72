//! Generate command report data structures.

use std::path::PathBuf;

use shapegen_core::paths;

use super::output::{Output, Report};

/// Report data from a committed generation run.
#[derive(Debug)]
pub struct GenerateReport {
    pub dry_run: bool,
    /// Directory that paths are shown relative to.
    pub output_dir: PathBuf,
    /// The results' own summary, e.g. `4 source files.`
    pub summary: String,
    /// Files written (or that would be written in a dry run).
    pub written: Vec<PathBuf>,
    /// Destination roots touched by the run.
    pub roots: Vec<PathBuf>,
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        if self.written.is_empty() {
            out.preformatted("Nothing to generate.");
            return;
        }

        if self.dry_run {
            out.section("Would write");
        } else {
            out.section("Wrote");
        }
        for path in &self.written {
            out.added_item(&paths::relative_to(&self.output_dir, path).display().to_string());
        }
        out.newline();
        out.key_value("Generated", &self.summary);
        for root in &self.roots {
            out.key_value("Root", &paths::relative_to(&self.output_dir, root).display().to_string());
        }
    }
}
