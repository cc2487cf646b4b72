use eyre::Result;
use shapegen_codegen::{
    GenerationContext, ModelElementGenerator, Problems, ShapeGenerator, ShapeRequest,
};
use shapegen_core::{GenerationTarget, LanguageWithVersion};
use shapegen_model::{Model, ShapeId};

use crate::{
    INDEX_TASK, IndexTask, element::TsElement, order::dependency_order, type_mapper::has_module,
};

/// Emits one module per data shape, ordered so that each module is
/// generated after the modules it imports, plus an `index.ts` per
/// namespace directory.
#[derive(Debug, Clone, Default)]
pub struct TypeScriptGenerators;

impl TypeScriptGenerators {
    pub fn new() -> Self {
        Self
    }
}

impl ShapeGenerator for TypeScriptGenerators {
    fn name(&self) -> &str {
        "typescript"
    }

    fn supported_targets(&self) -> Vec<GenerationTarget> {
        vec![GenerationTarget::MODEL]
    }

    fn supported_languages(&self) -> Vec<LanguageWithVersion> {
        vec![LanguageWithVersion::parse("typescript")]
    }

    fn prepare(&self, _: &Model, ctx: &GenerationContext, _: &mut Problems) -> Result<()> {
        ctx.post_tasks().register(INDEX_TASK, || IndexTask);
        Ok(())
    }

    fn generators_for(
        &self,
        request: &ShapeRequest<'_>,
    ) -> Result<Vec<Box<dyn ModelElementGenerator>>> {
        if *request.target != GenerationTarget::MODEL || !has_module(request.shape) {
            return Ok(Vec::new());
        }
        Ok(vec![Box::new(TsElement::new(
            request.shape.clone(),
            request.destination.to_path_buf(),
        ))])
    }

    fn subsort(
        &self,
        model: &Model,
        generators: &[&dyn ModelElementGenerator],
    ) -> Option<Vec<usize>> {
        let shapes: Vec<&ShapeId> = generators.iter().map(|g| g.shape()).collect();
        let order = dependency_order(model, &shapes);
        if order.iter().enumerate().all(|(i, &o)| i == o) {
            return None;
        }
        tracing::debug!("reordered {} TypeScript module(s) by dependency", order.len());
        Some(order)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shapegen_codegen::testing::fake_resolver;

    use super::*;

    #[test]
    fn test_supports_typescript_model_only() {
        let plugin = TypeScriptGenerators::new();
        assert!(plugin.supports_language(&LanguageWithVersion::parse("typescript")));
        assert!(plugin.supports_language(&LanguageWithVersion::parse("typescript-5")));
        assert!(!plugin.supports_language(&LanguageWithVersion::parse("java")));
        assert!(plugin.supports_target(&GenerationTarget::MODEL));
        assert!(!plugin.supports_target(&GenerationTarget::MODEL_TEST));
    }

    #[test]
    fn test_prepare_queues_index_once() {
        let ctx = GenerationContext::new(Arc::default(), fake_resolver("/tmp/unused"));
        let plugin = TypeScriptGenerators::new();
        let mut problems = Problems::new();
        plugin.prepare(&Model::new(), &ctx, &mut problems).unwrap();
        plugin.prepare(&Model::new(), &ctx, &mut problems).unwrap();
        assert_eq!(ctx.post_tasks().len(), 1);
        assert!(problems.is_empty());
    }
}
