//! Java class names and type references for model shapes.
//!
//! [`TypeNames`] is built by the plugin's prepare hook at the start of each
//! run and shared through the generation context under [`TYPE_NAMES`].

use std::{path::PathBuf, sync::Arc};

use indexmap::IndexMap;
use shapegen_core::SettingsKey;
use shapegen_model::{Model, Shape, ShapeId, ShapeKind};

use crate::naming;

/// Context key under which the session's [`TypeNames`] are stored.
pub const TYPE_NAMES: SettingsKey<Arc<TypeNames>> = SettingsKey::new("java.type-names");

/// Package suffix appended to a shape's namespace.
pub const MODEL_PACKAGE_SUFFIX: &str = "model";

/// A generated top-level class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassName {
    pub package: String,
    pub simple: String,
}

impl ClassName {
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.package, self.simple)
    }

    /// `<root>/<package dirs>/<simple><suffix>.java`
    pub fn source_path(&self, root: &std::path::Path, suffix: &str) -> PathBuf {
        let mut path = root.to_path_buf();
        path.extend(self.package.split('.'));
        path.push(format!("{}{}.java", self.simple, suffix));
        path
    }
}

/// A type as it appears in Java source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaType {
    /// Source text, including type arguments.
    pub name: String,
    /// Qualified names the source text needs imported.
    pub imports: Vec<String>,
    pub primitive: bool,
}

impl JavaType {
    fn object(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            imports: Vec::new(),
            primitive: false,
        }
    }

    fn imported(qualified: &str) -> Self {
        let simple = qualified.rsplit('.').next().unwrap_or(qualified);
        Self {
            name: simple.to_string(),
            imports: vec![qualified.to_string()],
            primitive: false,
        }
    }

    fn primitive_or_boxed(primitive: &str, boxed: &str, required: bool) -> Self {
        Self {
            name: if required { primitive } else { boxed }.to_string(),
            imports: Vec::new(),
            primitive: required,
        }
    }

    /// A literal of this type usable as a throwaway constructor argument.
    pub fn placeholder(&self) -> &'static str {
        match self.name.as_str() {
            "boolean" => "false",
            "long" => "0L",
            "float" => "0F",
            "double" => "0.0",
            "short" => "(short) 0",
            "byte" => "(byte) 0",
            "int" => "0",
            _ => "null",
        }
    }
}

/// Whether the plugin emits a class for shapes of this kind.
pub fn has_class(kind: &ShapeKind) -> bool {
    matches!(
        kind,
        ShapeKind::Structure { .. }
            | ShapeKind::Enum { .. }
            | ShapeKind::IntEnum { .. }
            | ShapeKind::String
            | ShapeKind::Integer
            | ShapeKind::Long
            | ShapeKind::Short
            | ShapeKind::Byte
            | ShapeKind::Float
            | ShapeKind::Double
    )
}

/// Class names for every model shape that gets one.
#[derive(Debug, Default)]
pub struct TypeNames {
    classes: IndexMap<ShapeId, ClassName>,
}

impl TypeNames {
    pub fn build(model: &Model) -> Self {
        let classes = model
            .shapes()
            .filter(|shape| !shape.id().is_prelude() && !shape.is_member())
            .filter(|shape| has_class(shape.kind()))
            .map(|shape| (shape.id().clone(), Self::class_name_for(shape.id())))
            .collect();
        Self { classes }
    }

    fn class_name_for(id: &ShapeId) -> ClassName {
        ClassName {
            package: format!("{}.{}", id.namespace(), MODEL_PACKAGE_SUFFIX),
            simple: naming::escape(id.name()),
        }
    }

    pub fn class_of(&self, id: &ShapeId) -> Option<&ClassName> {
        self.classes.get(id)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Pairs of shapes whose classes would land in the same file on a
    /// case-insensitive file system. The later shape comes second.
    pub fn collisions(&self) -> Vec<(&ShapeId, &ShapeId)> {
        let mut seen: IndexMap<String, &ShapeId> = IndexMap::new();
        let mut collisions = Vec::new();
        for (id, class) in &self.classes {
            let key = class.qualified().to_lowercase();
            match seen.get(&key) {
                Some(first) => collisions.push((*first, id)),
                None => {
                    seen.insert(key, id);
                }
            }
        }
        collisions
    }

    /// The Java type used to refer to `target`. `required` selects the
    /// primitive form of numbers and booleans.
    pub fn java_type(
        &self,
        model: &Model,
        target: &ShapeId,
        required: bool,
    ) -> Result<JavaType, String> {
        if let Some(class) = self.class_of(target) {
            return Ok(JavaType {
                name: class.simple.clone(),
                imports: vec![class.qualified()],
                primitive: false,
            });
        }
        if target.is_prelude() {
            return prelude_type(target.name(), required)
                .ok_or_else(|| format!("no Java type for prelude shape {}", target));
        }
        let shape = model
            .get(target)
            .ok_or_else(|| format!("{} is not in the model", target))?;
        self.kind_type(model, shape, required)
    }

    fn kind_type(&self, model: &Model, shape: &Shape, required: bool) -> Result<JavaType, String> {
        let ty = match shape.kind() {
            ShapeKind::List { member } => {
                let inner = self.element_type(model, member)?;
                let mut ty = JavaType::imported("java.util.List");
                ty.name = format!("List<{}>", inner.name);
                ty.imports.extend(inner.imports);
                ty
            }
            ShapeKind::Map { key, value } => {
                let key = self.element_type(model, key)?;
                let value = self.element_type(model, value)?;
                let mut ty = JavaType::imported("java.util.Map");
                ty.name = format!("Map<{}, {}>", key.name, value.name);
                ty.imports.extend(key.imports);
                ty.imports.extend(value.imports);
                ty
            }
            ShapeKind::Boolean => JavaType::primitive_or_boxed("boolean", "Boolean", required),
            ShapeKind::Blob => JavaType::object("byte[]"),
            ShapeKind::Timestamp => JavaType::imported("java.time.Instant"),
            ShapeKind::BigInteger => JavaType::imported("java.math.BigInteger"),
            ShapeKind::BigDecimal => JavaType::imported("java.math.BigDecimal"),
            ShapeKind::Document => JavaType::object("Object"),
            other => return Err(format!("no Java type for {} shape {}", other, shape.id())),
        };
        Ok(ty)
    }

    /// Collection elements are always boxed.
    fn element_type(&self, model: &Model, id: &ShapeId) -> Result<JavaType, String> {
        let resolved = match model.get(id) {
            Some(member) if member.is_member() => member.member_target().unwrap_or(id),
            _ => id,
        };
        self.java_type(model, resolved, false)
    }
}

fn prelude_type(name: &str, required: bool) -> Option<JavaType> {
    let ty = match name {
        "String" => JavaType::object("String"),
        "Integer" => JavaType::primitive_or_boxed("int", "Integer", required),
        "Long" => JavaType::primitive_or_boxed("long", "Long", required),
        "Short" => JavaType::primitive_or_boxed("short", "Short", required),
        "Byte" => JavaType::primitive_or_boxed("byte", "Byte", required),
        "Float" => JavaType::primitive_or_boxed("float", "Float", required),
        "Double" => JavaType::primitive_or_boxed("double", "Double", required),
        "Boolean" => JavaType::primitive_or_boxed("boolean", "Boolean", required),
        "BigInteger" => JavaType::imported("java.math.BigInteger"),
        "BigDecimal" => JavaType::imported("java.math.BigDecimal"),
        "Timestamp" => JavaType::imported("java.time.Instant"),
        "Blob" => JavaType::object("byte[]"),
        "Document" => JavaType::object("Object"),
        _ => return None,
    };
    Some(ty)
}
