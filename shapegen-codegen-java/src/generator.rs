//! The Java generator plugin.

use std::sync::Arc;

use eyre::Result;
use shapegen_codegen::{
    GenerationContext, ModelElementGenerator, Problems, ShapeGenerator, ShapeRequest,
};
use shapegen_core::{GenerationTarget, LanguageWithVersion};
use shapegen_model::{Model, Shape};

use crate::{
    JavaFeatures, TYPE_NAMES, TypeNames,
    element::{JavaElement, Output},
    type_names::has_class,
};

/// Emits one class per structure, enum, int enum, string and number shape
/// (target `model`) and JUnit 5 test skeletons for them (target
/// `modeltest`). Other shape kinds are used as member types only.
#[derive(Debug, Clone)]
pub struct JavaGenerators {
    languages: Vec<LanguageWithVersion>,
}

impl Default for JavaGenerators {
    fn default() -> Self {
        Self {
            languages: vec![LanguageWithVersion::parse("java")],
        }
    }
}

impl JavaGenerators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only serve requests for `language` or older.
    pub fn up_to(language: LanguageWithVersion) -> Self {
        Self {
            languages: vec![language],
        }
    }
}

fn check_constraints(shape: &Shape, problems: &mut Problems) {
    let traits = shape.traits();
    if let Some(range) = traits.range
        && let (Some(min), Some(max)) = (range.min, range.max)
        && min > max
    {
        problems.fatal(
            Some(shape.id()),
            format!("range minimum {} exceeds maximum {}", min, max),
        );
    }
    if let Some(length) = traits.length
        && let (Some(min), Some(max)) = (length.min, length.max)
        && min > max
    {
        problems.fatal(
            Some(shape.id()),
            format!("length minimum {} exceeds maximum {}", min, max),
        );
    }
    if traits.range.is_some() && !shape.kind().is_number() {
        problems.warn(
            Some(shape.id()),
            format!("range ignored on {} shape", shape.kind()),
        );
    }
}

impl ShapeGenerator for JavaGenerators {
    fn name(&self) -> &str {
        "java"
    }

    fn supported_targets(&self) -> Vec<GenerationTarget> {
        vec![GenerationTarget::MODEL, GenerationTarget::MODEL_TEST]
    }

    fn supported_languages(&self) -> Vec<LanguageWithVersion> {
        self.languages.clone()
    }

    fn prepare(&self, model: &Model, ctx: &GenerationContext, problems: &mut Problems) -> Result<()> {
        // rebuilt every run; a session may be reused with a different model
        let names = Arc::new(TypeNames::build(model));
        ctx.put(&TYPE_NAMES, Arc::clone(&names));
        tracing::debug!("{} Java class name(s)", names.len());
        for (first, second) in names.collisions() {
            problems.fatal(
                Some(second),
                format!("Java class name collides with {}", first),
            );
        }
        for shape in model.shapes() {
            if !shape.id().is_prelude() && has_class(shape.kind()) {
                check_constraints(shape, problems);
            }
        }
        Ok(())
    }

    fn generators_for(
        &self,
        request: &ShapeRequest<'_>,
    ) -> Result<Vec<Box<dyn ModelElementGenerator>>> {
        let Some(output) = Output::for_target(request.target) else {
            return Ok(Vec::new());
        };
        if !has_class(request.shape.kind()) {
            request
                .logger
                .debug(format!("no Java class for {} shapes", request.shape.kind()));
            return Ok(Vec::new());
        }
        Ok(vec![Box::new(JavaElement::new(
            request.shape.clone(),
            output,
            request.destination.to_path_buf(),
            JavaFeatures::of(request.language),
        ))])
    }
}

#[cfg(test)]
mod tests {
    use shapegen_codegen::testing::sample_model;
    use shapegen_model::{ShapeId, ShapeKind, Traits};

    use super::*;

    #[test]
    fn test_supports_any_java_by_default() {
        let plugin = JavaGenerators::new();
        assert!(plugin.supports_language(&LanguageWithVersion::parse("java-8")));
        assert!(plugin.supports_language(&LanguageWithVersion::parse("java-21")));
        assert!(!plugin.supports_language(&LanguageWithVersion::parse("typescript")));
        assert!(plugin.supports_target(&GenerationTarget::MODEL_TEST));
        assert!(!plugin.supports_target(&GenerationTarget::SERVER));
    }

    #[test]
    fn test_up_to_limits_versions() {
        let plugin = JavaGenerators::up_to(LanguageWithVersion::parse("java-11"));
        assert!(plugin.supports_language(&LanguageWithVersion::parse("java-8")));
        assert!(!plugin.supports_language(&LanguageWithVersion::parse("java-17")));
    }

    #[test]
    fn test_prepare_rejects_inverted_range() {
        let mut model = sample_model();
        model.insert(
            Shape::new(ShapeId::new("com.example", "Broken"), ShapeKind::Integer)
                .with_traits(Traits::default().with_range(Some(10.0), Some(1.0))),
        );
        let ctx = GenerationContext::new(
            Arc::default(),
            shapegen_codegen::testing::fake_resolver("/tmp/unused"),
        );
        let mut problems = Problems::new();
        JavaGenerators::new()
            .prepare(&model, &ctx, &mut problems)
            .unwrap();

        assert!(problems.has_fatal());
        let problem = problems.iter().next().unwrap();
        assert_eq!(problem.shape(), Some(&ShapeId::new("com.example", "Broken")));
        assert_eq!(problem.message(), "range minimum 10 exceeds maximum 1");
        assert!(ctx.contains(&TYPE_NAMES));
    }

    #[test]
    fn test_prepare_warns_on_misplaced_range() {
        let mut model = Model::new();
        model.insert(
            Shape::new(ShapeId::new("com.example", "Label"), ShapeKind::String)
                .with_traits(Traits::default().with_range(Some(0.0), None)),
        );
        let ctx = GenerationContext::new(
            Arc::default(),
            shapegen_codegen::testing::fake_resolver("/tmp/unused"),
        );
        let mut problems = Problems::new();
        JavaGenerators::new()
            .prepare(&model, &ctx, &mut problems)
            .unwrap();
        assert!(!problems.has_fatal());
        assert_eq!(problems.len(), 1);
    }
}
