//! Check operation - validate a project without writing anything.

use std::path::Path;

use eyre::Result;
use indexmap::IndexSet;
use shapegen_codegen::GenerationError;
use shapegen_core::GenerationLogger;

use super::project::Project;
use crate::{plugins, reports::CheckReport};

/// Execute the check operation.
///
/// Runs every generation phase in dry-run mode, so prepare-time problems
/// such as name collisions or impossible constraints are reported too.
pub fn check(config_path: &Path, project: &Project) -> Result<CheckReport> {
    let mut report = CheckReport {
        config_path: config_path.to_path_buf(),
        errors: Vec::new(),
        warnings: Vec::new(),
        infos: Vec::new(),
    };
    let model = &project.model;

    for (referrer, missing) in model.dangling_references() {
        report
            .errors
            .push(format!("{} refers to missing shape {}", referrer, missing));
    }

    let shapes: Vec<_> = model
        .shapes()
        .filter(|s| !s.id().is_prelude() && !s.is_member())
        .collect();
    let namespaces: IndexSet<&str> = shapes.iter().map(|s| s.id().namespace()).collect();
    for namespace in &project.namespaces {
        if !namespaces.contains(namespace.as_str()) {
            report
                .warnings
                .push(format!("namespace '{}' has no shapes", namespace));
        }
    }
    report.infos.push(format!(
        "{} shape(s) in {} namespace(s)",
        shapes.len(),
        namespaces.len()
    ));

    let registry = plugins::registry();
    for language in &project.languages {
        if !registry
            .discover()
            .iter()
            .any(|g| g.supports_language(language))
        {
            report
                .warnings
                .push(format!("no generator supports language {}", language));
        }
    }
    for target in &project.targets {
        if !registry.discover().iter().any(|g| g.supports_target(target)) {
            report
                .warnings
                .push(format!("no generator supports target {}", target));
        }
    }

    if project.languages.is_empty() {
        report.errors.push("no languages configured".to_string());
    }
    if project.targets.is_empty() {
        report.errors.push("no targets configured".to_string());
    }
    if !report.is_valid() {
        return Ok(report);
    }

    let session = project.session()?;
    let logger = GenerationLogger::tracing(false);
    match session.generate(model, |id| project.includes(id), &logger) {
        Ok(results) => report
            .infos
            .push(format!("would generate {}", results)),
        Err(err) => match err.downcast_ref::<GenerationError>() {
            Some(GenerationError::FatalProblems { problems }) => {
                report.errors.extend(problems.iter().map(|p| p.to_string()));
            }
            _ => return Err(err),
        },
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::ops::{
        fixtures::project_files,
        project::{Overrides, Switches},
    };

    fn dry_run() -> Switches {
        Switches {
            dry_run: true,
            ..Switches::default()
        }
    }

    #[test]
    fn test_valid_project() {
        let dir = TempDir::new().unwrap();
        let (toml, model) = project_files(
            dir.path(),
            r#"
            [project]
            models = ["model"]
            languages = ["java", "typescript"]
            targets = ["model"]
            "#,
        );
        let project = Project::new(&toml, model, Overrides::default(), dry_run());

        let report = check(toml.path(), &project).unwrap();

        assert!(report.is_valid(), "{:?}", report.errors);
        assert!(report.warnings.is_empty());
        assert_eq!(
            report.infos,
            vec![
                "2 shape(s) in 1 namespace(s)".to_string(),
                "would generate 4 source files.".to_string()
            ]
        );
    }

    #[test]
    fn test_unsupported_language_and_missing_namespace() {
        let dir = TempDir::new().unwrap();
        let (toml, model) = project_files(
            dir.path(),
            r#"
            [project]
            models = ["model"]
            languages = ["cobol"]
            targets = ["model"]
            namespaces = ["com.missing"]
            "#,
        );
        let project = Project::new(&toml, model, Overrides::default(), dry_run());

        let report = check(toml.path(), &project).unwrap();

        assert!(report.is_valid());
        assert_eq!(
            report.warnings,
            vec![
                "namespace 'com.missing' has no shapes".to_string(),
                "no generator supports language cobol-0.0".to_string()
            ]
        );
    }

    #[test]
    fn test_missing_targets_is_an_error() {
        let dir = TempDir::new().unwrap();
        let (toml, model) = project_files(
            dir.path(),
            r#"
            [project]
            models = ["model"]
            languages = ["java"]
            "#,
        );
        let project = Project::new(&toml, model, Overrides::default(), dry_run());

        let report = check(toml.path(), &project).unwrap();
        assert_eq!(report.errors, vec!["no targets configured".to_string()]);
    }
}
