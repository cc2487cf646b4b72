//! The element generator the plugin hands back for each shape.

use std::{path::PathBuf, sync::Arc};

use eyre::Result;
use shapegen_codegen::{GeneratedCode, GenerationContext, ModelElementGenerator, Problems};
use shapegen_core::{GenerationLogger, GenerationTarget};
use shapegen_model::{Model, Shape, ShapeId, ShapeKind};

use crate::{
    ClassName, JavaFeatures, JavaFile, TYPE_NAMES, TypeNames,
    emit::{self, Field, NumberKind},
};

/// Model classes or their test skeletons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Output {
    Class,
    Test,
}

impl Output {
    pub(crate) fn for_target(target: &GenerationTarget) -> Option<Self> {
        if *target == GenerationTarget::MODEL {
            Some(Self::Class)
        } else if *target == GenerationTarget::MODEL_TEST {
            Some(Self::Test)
        } else {
            None
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Class => "",
            Self::Test => "Test",
        }
    }
}

/// State filled in by `prepare`.
struct Resolved {
    class: ClassName,
    fields: Vec<Field>,
}

pub(crate) struct JavaElement {
    shape: Shape,
    output: Output,
    root: PathBuf,
    features: JavaFeatures,
    resolved: Option<Resolved>,
}

impl JavaElement {
    pub(crate) fn new(shape: Shape, output: Output, root: PathBuf, features: JavaFeatures) -> Self {
        Self {
            shape,
            output,
            root,
            features,
            resolved: None,
        }
    }

    fn resolve_fields(
        &self,
        model: &Model,
        names: &TypeNames,
        problems: &mut Problems,
    ) -> Vec<Field> {
        let id = self.shape.id();
        let mut fields = Vec::new();
        for member in model.members(id) {
            let (Some(member_name), Some(target)) = (member.id().member(), member.member_target())
            else {
                continue;
            };
            let required = member.traits().required;
            match names.java_type(model, target, required) {
                Ok(ty) => fields.push(Field {
                    name: crate::naming::field_name(member_name),
                    ty,
                    required,
                }),
                Err(reason) => {
                    problems.fatal(
                        Some(id),
                        format!("member '{}' has no Java type: {}", member_name, reason),
                    );
                }
            }
        }
        fields
    }

    fn render(&self, resolved: &Resolved) -> Option<JavaFile> {
        let class = &resolved.class;
        let features = self.features;
        let shape = &self.shape;
        match (self.output, shape.kind()) {
            (Output::Class, ShapeKind::Structure { .. }) => Some(emit::structure_class(
                shape,
                &resolved.fields,
                class,
                features,
            )),
            (Output::Test, ShapeKind::Structure { .. }) => {
                emit::structure_test(&resolved.fields, class)
            }
            (Output::Class, ShapeKind::Enum { values }) => {
                Some(emit::enum_class(shape, values, class))
            }
            (Output::Test, ShapeKind::Enum { values }) => emit::enum_test(values, class),
            (Output::Class, ShapeKind::IntEnum { values }) => {
                Some(emit::int_enum_class(shape, values, class))
            }
            (Output::Test, ShapeKind::IntEnum { values }) => emit::int_enum_test(values, class),
            (Output::Class, ShapeKind::String) => {
                Some(emit::string_class(shape, class, features))
            }
            (Output::Test, ShapeKind::String) => Some(emit::string_test(shape, class, features)),
            (output, kind) => {
                let number = NumberKind::of(kind)?;
                match output {
                    Output::Class => Some(emit::number_class(shape, number, class, features)),
                    Output::Test => emit::number_test(shape, number, class),
                }
            }
        }
    }
}

impl ModelElementGenerator for JavaElement {
    fn shape(&self) -> &ShapeId {
        self.shape.id()
    }

    fn prepare(
        &mut self,
        _target: &GenerationTarget,
        model: &Model,
        ctx: &GenerationContext,
        problems: &mut Problems,
    ) -> Result<()> {
        let names = ctx.compute_if_absent(&TYPE_NAMES, || Arc::new(TypeNames::build(model)));
        let Some(class) = names.class_of(self.shape.id()).cloned() else {
            problems.fatal(Some(self.shape.id()), "no Java class name for shape");
            return Ok(());
        };
        let fields = if matches!(self.shape.kind(), ShapeKind::Structure { .. }) {
            self.resolve_fields(model, &names, problems)
        } else {
            Vec::new()
        };
        self.resolved = Some(Resolved { class, fields });
        Ok(())
    }

    fn generate(
        &self,
        _ctx: &GenerationContext,
        logger: &GenerationLogger,
    ) -> Result<Vec<Box<dyn GeneratedCode>>> {
        let Some(resolved) = &self.resolved else {
            eyre::bail!("{} was not prepared", self.shape.id());
        };
        let Some(file) = self.render(resolved) else {
            logger.debug("nothing to generate");
            return Ok(Vec::new());
        };
        let destination = resolved
            .class
            .source_path(&self.root, self.output.suffix());
        logger.info(format!("generating {}", destination.display()));
        Ok(vec![Box::new(file.into_source(destination))])
    }
}
