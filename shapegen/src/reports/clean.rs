//! Clean command report data structures.

use std::path::PathBuf;

use shapegen_core::paths;

use super::output::{Output, Report};

/// Report data from cleaning destination roots.
#[derive(Debug)]
pub struct CleanReport {
    pub dry_run: bool,
    /// Directory that paths are shown relative to.
    pub output_dir: PathBuf,
    /// Every destination root the session resolved.
    pub roots: Vec<PathBuf>,
    /// Directories removed (or that would be removed in a dry run).
    pub deleted: Vec<PathBuf>,
}

impl Report for CleanReport {
    fn render(&self, out: &mut dyn Output) {
        if self.deleted.is_empty() {
            out.preformatted("Nothing to clean.");
        } else {
            if self.dry_run {
                out.section("Would delete");
            } else {
                out.section("Deleted");
            }
            for dir in &self.deleted {
                let shown = paths::relative_to(&self.output_dir, dir);
                out.removed_item(&format!("{}/", shown.display()));
            }
        }
        for root in &self.roots {
            let shown = paths::relative_to(&self.output_dir, root);
            out.key_value("Root", &shown.display().to_string());
        }
    }
}
