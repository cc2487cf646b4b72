//! Shape references to TypeScript type expressions.
//!
//! Every non-prelude data shape gets its own module at
//! `<root>/<namespace>/<kebab-name>.ts`. Prelude shapes map onto built-in
//! types and never get a module.

use std::path::{Path, PathBuf};

use shapegen_model::{Model, Shape, ShapeId, ShapeKind};

use crate::naming;

/// A type expression and the shapes whose modules it needs imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsType {
    pub text: String,
    pub references: Vec<ShapeId>,
}

impl TsType {
    fn builtin(text: &str) -> Self {
        Self {
            text: text.to_string(),
            references: Vec::new(),
        }
    }

    fn named(id: &ShapeId) -> Self {
        Self {
            text: naming::type_name(id.name()),
            references: vec![id.clone()],
        }
    }
}

/// True if `shape` is emitted as a module of its own.
pub fn has_module(shape: &Shape) -> bool {
    !shape.id().is_prelude() && !shape.is_member() && !shape.kind().is_service_like()
}

/// Where the module for `id` lives.
pub fn module_path(root: &Path, id: &ShapeId) -> PathBuf {
    root.join(id.namespace())
        .join(format!("{}.ts", naming::module_name(id.name())))
}

/// Module specifier for importing `to` from the module of `from`.
pub fn import_path(from: &ShapeId, to: &ShapeId) -> String {
    let module = naming::module_name(to.name());
    if from.namespace() == to.namespace() {
        format!("./{}", module)
    } else {
        format!("../{}/{}", to.namespace(), module)
    }
}

fn builtin(kind: &ShapeKind) -> Option<&'static str> {
    Some(match kind {
        ShapeKind::String | ShapeKind::BigDecimal => "string",
        ShapeKind::Integer
        | ShapeKind::Long
        | ShapeKind::Short
        | ShapeKind::Byte
        | ShapeKind::Float
        | ShapeKind::Double => "number",
        ShapeKind::BigInteger => "bigint",
        ShapeKind::Boolean => "boolean",
        ShapeKind::Blob => "Uint8Array",
        ShapeKind::Timestamp => "Date",
        ShapeKind::Document => "unknown",
        _ => return None,
    })
}

/// The type used where `target` is referenced. Member shapes are followed
/// to their targets.
pub fn type_ref(model: &Model, target: &ShapeId) -> Result<TsType, String> {
    let Some(shape) = model.get(target) else {
        return Err(format!("unknown shape {}", target));
    };
    if let Some(inner) = shape.member_target() {
        return type_ref(model, inner);
    }
    if has_module(shape) {
        return Ok(TsType::named(shape.id()));
    }
    if shape.id().is_prelude()
        && let Some(text) = builtin(shape.kind())
    {
        return Ok(TsType::builtin(text));
    }
    Err(format!("no TypeScript type for {} shape {}", shape.kind(), target))
}

/// The built-in type a shape of this kind refines, e.g. `number` for a
/// bounded integer.
pub fn base_type(kind: &ShapeKind) -> Option<&'static str> {
    builtin(kind)
}
