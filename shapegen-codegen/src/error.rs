use std::path::PathBuf;

use thiserror::Error;

use crate::Problems;

/// Failures raised by the generation engine.
///
/// These travel inside an [`eyre::Report`]; callers that need to branch on
/// the kind use `report.downcast_ref::<GenerationError>()`.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no languages requested")]
    NoLanguages,

    #[error("no generation targets requested")]
    NoTargets,

    #[error("generation aborted due to fatal problems:\n{problems}")]
    FatalProblems { problems: Problems },

    #[error(
        "{} generated file(s) would be written outside the source roots:\n{}\nsource roots:\n{}",
        .paths.len(),
        join_paths(.paths),
        join_paths(.roots)
    )]
    OutsideSourceRoots {
        paths: Vec<PathBuf>,
        roots: Vec<PathBuf>,
    },

    #[error("subsort from '{generator}' is not a permutation of its generators")]
    InvalidSubsort { generator: String },
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("  {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}
