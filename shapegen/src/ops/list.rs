//! List operation - describe the built-in generators.

use shapegen_codegen::GeneratorRegistry;
use shapegen_core::LanguageWithVersion;

use crate::reports::{GeneratorInfo, ListReport};

fn language_label(language: &LanguageWithVersion) -> String {
    if language.version().is_wildcard() {
        language.language().name().to_string()
    } else {
        language.to_string()
    }
}

/// Execute the list operation.
pub fn list(registry: &GeneratorRegistry) -> ListReport {
    let generators = registry
        .discover()
        .iter()
        .map(|g| GeneratorInfo {
            name: g.name().to_string(),
            targets: g.supported_targets().iter().map(|t| t.to_string()).collect(),
            languages: g.supported_languages().iter().map(language_label).collect(),
        })
        .collect();
    ListReport { generators }
}
