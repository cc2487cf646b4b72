//! Clean operation - delete generated code from every destination root.

use std::path::PathBuf;

use eyre::{Context, Result};
use shapegen_codegen::clean_roots;

use super::project::Project;
use crate::reports::CleanReport;

/// Execute the clean operation.
///
/// Only the clean phase of a commit runs: every directory directly under a
/// resolved destination root is deleted. Files sitting in a root are kept.
pub fn clean(project: &Project) -> Result<CleanReport> {
    let session = project.session()?;
    let roots = session.resolve_roots(&project.model, |id| project.includes(id));

    let mut deleted: Vec<PathBuf> = Vec::new();
    for root in roots.iter().filter(|r| r.is_dir()) {
        let entries =
            std::fs::read_dir(root).wrap_err_with(|| format!("failed to list {}", root.display()))?;
        let mut dirs: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
            .map(|e| e.path())
            .collect();
        dirs.sort();
        tracing::debug!(root = %root.display(), dirs = dirs.len(), "found generated directories");
        deleted.extend(dirs);
    }

    let dry_run = project.settings.dry_run();
    if !dry_run {
        clean_roots(roots.iter().map(PathBuf::as_path))?;
    }

    Ok(CleanReport {
        dry_run,
        output_dir: project.output_dir.clone(),
        roots: roots.into_iter().collect(),
        deleted,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::ops::{
        fixtures::project_files,
        project::{Overrides, Switches},
    };

    const MANIFEST: &str = r#"
        [project]
        models = ["model"]
        languages = ["typescript"]
        targets = ["model"]

        [destinations]
        "typescript.model" = "gen/ts"
    "#;

    fn seed(dir: &TempDir) {
        fs::create_dir_all(dir.path().join("gen/ts/com.example")).unwrap();
        fs::write(dir.path().join("gen/ts/com.example/stale.ts"), "").unwrap();
        fs::write(dir.path().join("gen/ts/README.md"), "keep").unwrap();
    }

    #[test]
    fn test_clean_deletes_root_children() {
        let dir = TempDir::new().unwrap();
        let (toml, model) = project_files(dir.path(), MANIFEST);
        seed(&dir);
        let project = Project::new(&toml, model, Overrides::default(), Switches::default());

        let report = clean(&project).unwrap();

        assert_eq!(report.deleted, vec![dir.path().join("gen/ts/com.example")]);
        assert_eq!(report.roots, vec![dir.path().join("gen/ts")]);
        assert!(!dir.path().join("gen/ts/com.example").exists());
        assert!(dir.path().join("gen/ts/README.md").exists());
    }

    #[test]
    fn test_dry_run_keeps_everything() {
        let dir = TempDir::new().unwrap();
        let (toml, model) = project_files(dir.path(), MANIFEST);
        seed(&dir);
        let switches = Switches {
            dry_run: true,
            ..Switches::default()
        };
        let project = Project::new(&toml, model, Overrides::default(), switches);

        let report = clean(&project).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.deleted.len(), 1);
        assert!(dir.path().join("gen/ts/com.example/stale.ts").exists());
    }
}
