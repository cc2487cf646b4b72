//! Generator discovery and capability matching.

use std::sync::Arc;

use shapegen_core::{GenerationTarget, LanguageWithVersion};

use crate::ShapeGenerator;

/// A static registration table of generator plugins.
///
/// Registration order is the order plugins are consulted for every shape.
#[derive(Default, Clone)]
pub struct GeneratorRegistry {
    generators: Vec<Arc<dyn ShapeGenerator>>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, generator: impl ShapeGenerator + 'static) -> &mut Self {
        self.generators.push(Arc::new(generator));
        self
    }

    pub fn with(mut self, generator: impl ShapeGenerator + 'static) -> Self {
        self.register(generator);
        self
    }

    pub fn register_arc(&mut self, generator: Arc<dyn ShapeGenerator>) -> &mut Self {
        self.generators.push(generator);
        self
    }

    /// Every registered plugin.
    pub fn discover(&self) -> &[Arc<dyn ShapeGenerator>] {
        &self.generators
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Plugins sharing at least one target and one language with the request,
    /// together with the targets and languages they will be asked about.
    pub fn matching(
        &self,
        targets: &[GenerationTarget],
        languages: &[LanguageWithVersion],
    ) -> Vec<MatchedGenerator> {
        self.generators
            .iter()
            .filter_map(|generator| {
                let targets = targets_for(generator.as_ref(), targets);
                let languages = languages_for(generator.as_ref(), languages);
                if targets.is_empty() || languages.is_empty() {
                    tracing::debug!("generator '{}' does not match", generator.name());
                    return None;
                }
                Some(MatchedGenerator {
                    generator: Arc::clone(generator),
                    targets,
                    languages,
                })
            })
            .collect()
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.generators.iter().map(|g| g.name().to_string()))
            .finish()
    }
}

/// A plugin that takes part in a session.
#[derive(Clone)]
pub struct MatchedGenerator {
    pub generator: Arc<dyn ShapeGenerator>,
    /// Requested targets the plugin supports.
    pub targets: Vec<GenerationTarget>,
    /// Requested languages the plugin supports.
    pub languages: Vec<LanguageWithVersion>,
}

/// `{t ∈ requested | generator supports t}`, in request order.
pub fn targets_for(
    generator: &dyn ShapeGenerator,
    requested: &[GenerationTarget],
) -> Vec<GenerationTarget> {
    requested
        .iter()
        .filter(|t| generator.supports_target(t))
        .cloned()
        .collect()
}

/// `{l ∈ requested | generator supports l}`, in request order.
pub fn languages_for(
    generator: &dyn ShapeGenerator,
    requested: &[LanguageWithVersion],
) -> Vec<LanguageWithVersion> {
    requested
        .iter()
        .filter(|l| generator.supports_language(l))
        .cloned()
        .collect()
}
