//! One module per shape.

use std::path::PathBuf;

use eyre::Result;
use indexmap::IndexSet;
use shapegen_codegen::{GeneratedCode, GenerationContext, ModelElementGenerator, Problems};
use shapegen_core::{GenerationLogger, GenerationTarget, SourceFile};
use shapegen_model::{Model, Shape, ShapeId, ShapeKind};

use crate::{
    CATEGORY,
    ast::Import,
    module_file::ModuleFile,
    modules::{self, MemberType},
    naming,
    type_mapper::{import_path, module_path, type_ref},
};

pub(crate) struct TsElement {
    shape: Shape,
    root: PathBuf,
    members: Option<Vec<MemberType>>,
}

impl TsElement {
    pub(crate) fn new(shape: Shape, root: PathBuf) -> Self {
        Self {
            shape,
            root,
            members: None,
        }
    }

    /// `(name, target, required)` for everything this shape refers to.
    fn references(&self, model: &Model) -> Vec<(String, ShapeId, bool)> {
        match self.shape.kind() {
            ShapeKind::Structure { .. } | ShapeKind::Union { .. } => model
                .members(self.shape.id())
                .into_iter()
                .filter_map(|member| {
                    let name = member.id().member()?;
                    let target = member.member_target()?;
                    Some((name.to_string(), target.clone(), member.traits().required))
                })
                .collect(),
            ShapeKind::List { member } => vec![("member".to_string(), member.clone(), true)],
            ShapeKind::Map { key, value } => vec![
                ("key".to_string(), key.clone(), true),
                ("value".to_string(), value.clone(), true),
            ],
            _ => Vec::new(),
        }
    }

    fn imports(&self, members: &[MemberType]) -> Vec<Import> {
        let id = self.shape.id();
        let referenced: IndexSet<&ShapeId> = members
            .iter()
            .flat_map(|m| &m.ty.references)
            .filter(|r| *r != id)
            .collect();
        referenced
            .into_iter()
            .map(|r| {
                Import::new(import_path(id, r))
                    .named(naming::type_name(r.name()))
                    .type_only()
            })
            .collect()
    }
}

impl ModelElementGenerator for TsElement {
    fn shape(&self) -> &ShapeId {
        self.shape.id()
    }

    fn prepare(
        &mut self,
        _target: &GenerationTarget,
        model: &Model,
        _ctx: &GenerationContext,
        problems: &mut Problems,
    ) -> Result<()> {
        let mut members = Vec::new();
        for (name, target, required) in self.references(model) {
            match type_ref(model, &target) {
                Ok(ty) => members.push(MemberType { name, ty, required }),
                Err(reason) => {
                    problems.fatal(
                        Some(self.shape.id()),
                        format!("member '{}' has no TypeScript type: {}", name, reason),
                    );
                }
            }
        }
        self.members = Some(members);
        Ok(())
    }

    fn generate(
        &self,
        ctx: &GenerationContext,
        logger: &GenerationLogger,
    ) -> Result<Vec<Box<dyn GeneratedCode>>> {
        let Some(members) = &self.members else {
            eyre::bail!("{} was not prepared", self.shape.id());
        };
        let module = modules::sections(&self.shape, members)
            .into_iter()
            .fold(
                ModuleFile::new().imports(self.imports(members)),
                |module, section| module.section(section),
            );
        let destination = module_path(&self.root, self.shape.id());
        logger.info(format!("generating {}", destination.display()));
        ctx.register_path(CATEGORY, destination.clone());
        Ok(vec![Box::new(SourceFile::new(destination, module.render()))])
    }
}
