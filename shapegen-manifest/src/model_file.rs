//! `*.shapes.toml` model files.
//!
//! ```toml
//! namespace = "com.example"
//!
//! [shapes.Percent]
//! type = "integer"
//! range = { min = 0, max = 100 }
//!
//! [shapes.User]
//! type = "structure"
//! members.name = { target = "String", required = true }
//! members.score = { target = "Percent" }
//! ```
//!
//! Targets are either absolute ids (`com.example#Name`), names declared in
//! the same namespace, or prelude names (`String`, `Integer`, ...).

use std::{collections::HashSet, path::Path};

use indexmap::IndexMap;
use serde::Deserialize;
use shapegen_model::{
    EnumValue, IntEnumValue, Model, PRELUDE_NAMESPACE, Shape, ShapeId, ShapeKind, Traits,
};

use crate::{Error, Result, error::SourceContext};

/// File suffix recognised when scanning directories for model files.
pub const MODEL_FILE_SUFFIX: &str = ".shapes.toml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelFile {
    namespace: String,
    #[serde(default)]
    shapes: IndexMap<String, ShapeDef>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
struct RangeDef {
    min: Option<f64>,
    max: Option<f64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
struct LengthDef {
    min: Option<u64>,
    max: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShapeDef {
    #[serde(rename = "type")]
    ty: String,
    documentation: Option<String>,
    range: Option<RangeDef>,
    length: Option<LengthDef>,
    pattern: Option<String>,
    #[serde(default)]
    members: IndexMap<String, MemberDef>,
    member: Option<String>,
    key: Option<String>,
    value: Option<String>,
    values: Option<EnumValues>,
    version: Option<String>,
    #[serde(default)]
    operations: Vec<String>,
    #[serde(default)]
    resources: Vec<String>,
    input: Option<String>,
    output: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MemberDef {
    target: String,
    #[serde(default)]
    required: bool,
    documentation: Option<String>,
    range: Option<RangeDef>,
    length: Option<LengthDef>,
    pattern: Option<String>,
}

/// `values = ["A", "B"]`, `values = { A = "a" }` or `values = { LOW = 1 }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EnumValues {
    Names(Vec<String>),
    Strings(IndexMap<String, String>),
    Ints(IndexMap<String, i32>),
}

fn traits_of(
    documentation: Option<&String>,
    range: Option<RangeDef>,
    length: Option<LengthDef>,
    pattern: Option<&String>,
) -> Traits {
    Traits {
        range: range.map(|r| shapegen_model::Range::new(r.min, r.max)),
        length: length.map(|l| shapegen_model::Length::new(l.min, l.max)),
        pattern: pattern.cloned(),
        documentation: documentation.cloned(),
        required: false,
    }
}

struct ParsedFile {
    ctx: SourceContext,
    file: ModelFile,
}

/// Collects model files and lowers them into one [`Model`].
///
/// Files are parsed eagerly; name resolution happens in [`ModelLoader::finish`]
/// so files may refer to shapes declared in each other.
#[derive(Default)]
pub struct ModelLoader {
    files: Vec<ParsedFile>,
}

impl ModelLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a model file from a string.
    pub fn add_str(&mut self, content: &str, filename: &str) -> Result<&mut Self> {
        let ctx = SourceContext::new(content, filename);
        let file: ModelFile = toml::from_str(content).map_err(|e| ctx.parse_error(e))?;
        if ShapeId::new(file.namespace.clone(), "X")
            .to_string()
            .parse::<ShapeId>()
            .is_err()
        {
            return Err(ctx.validation_error(
                format!("invalid namespace '{}'", file.namespace),
                Some(&file.namespace),
            ));
        }
        if file.namespace == PRELUDE_NAMESPACE {
            return Err(ctx.validation_error(
                format!("namespace '{}' is reserved", PRELUDE_NAMESPACE),
                Some(PRELUDE_NAMESPACE),
            ));
        }
        self.files.push(ParsedFile { ctx, file });
        Ok(self)
    }

    /// Read and parse a model file.
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        self.add_str(&content, &path.display().to_string())
    }

    /// Resolve references and build the model.
    pub fn finish(&self) -> Result<Model> {
        let mut declared: HashSet<ShapeId> = HashSet::new();
        for parsed in &self.files {
            for name in parsed.file.shapes.keys() {
                let id = ShapeId::new(parsed.file.namespace.clone(), name.clone());
                if id.to_string().parse::<ShapeId>().is_err() {
                    return Err(parsed
                        .ctx
                        .validation_error(format!("invalid shape name '{}'", name), Some(name)));
                }
                if !declared.insert(id.clone()) {
                    return Err(parsed.ctx.duplicate_shape(&id.to_string(), name));
                }
            }
        }

        let prelude = Model::new();
        let mut model = Model::new();
        for parsed in &self.files {
            Lowering {
                ctx: &parsed.ctx,
                namespace: &parsed.file.namespace,
                declared: &declared,
                prelude: &prelude,
            }
            .lower_into(&parsed.file, &mut model)?;
        }
        Ok(model)
    }
}

struct Lowering<'a> {
    ctx: &'a SourceContext,
    namespace: &'a str,
    declared: &'a HashSet<ShapeId>,
    prelude: &'a Model,
}

impl Lowering<'_> {
    fn resolve(&self, shape: &str, target: &str) -> Result<ShapeId> {
        if target.contains('#') {
            let id: ShapeId = target
                .parse()
                .map_err(|e: String| self.ctx.validation_error(e, Some(target)))?;
            if self.declared.contains(&id) || self.prelude.contains(&id) {
                return Ok(id);
            }
            return Err(self.ctx.unresolved_target(shape, target));
        }
        let local = ShapeId::new(self.namespace, target);
        if self.declared.contains(&local) {
            return Ok(local);
        }
        let prelude = ShapeId::prelude(target);
        if self.prelude.contains(&prelude) {
            return Ok(prelude);
        }
        Err(self.ctx.unresolved_target(shape, target))
    }

    fn resolve_all(&self, shape: &str, targets: &[String]) -> Result<Vec<ShapeId>> {
        targets.iter().map(|t| self.resolve(shape, t)).collect()
    }

    fn require<'d>(&self, shape: &str, field: &str, value: Option<&'d String>) -> Result<&'d String> {
        value.ok_or_else(|| {
            self.ctx.validation_error(
                format!("'{}' requires a '{}' field", shape, field),
                Some(shape),
            )
        })
    }

    fn kind_of(&self, name: &str, def: &ShapeDef) -> Result<ShapeKind> {
        let kind = match def.ty.as_str() {
            "structure" => ShapeKind::Structure { members: vec![] },
            "union" => ShapeKind::Union { members: vec![] },
            "enum" => ShapeKind::Enum {
                values: match &def.values {
                    Some(EnumValues::Names(names)) => names
                        .iter()
                        .map(|n| EnumValue {
                            name: n.clone(),
                            value: n.clone(),
                        })
                        .collect(),
                    Some(EnumValues::Strings(map)) => map
                        .iter()
                        .map(|(n, v)| EnumValue {
                            name: n.clone(),
                            value: v.clone(),
                        })
                        .collect(),
                    _ => {
                        return Err(self.ctx.validation_error(
                            format!("enum '{}' requires string 'values'", name),
                            Some(name),
                        ));
                    }
                },
            },
            "intEnum" => ShapeKind::IntEnum {
                values: match &def.values {
                    Some(EnumValues::Ints(map)) => map
                        .iter()
                        .map(|(n, v)| IntEnumValue {
                            name: n.clone(),
                            value: *v,
                        })
                        .collect(),
                    _ => {
                        return Err(self.ctx.validation_error(
                            format!("intEnum '{}' requires integer 'values'", name),
                            Some(name),
                        ));
                    }
                },
            },
            "list" => ShapeKind::List {
                member: self.resolve(name, self.require(name, "member", def.member.as_ref())?)?,
            },
            "map" => ShapeKind::Map {
                key: self.resolve(name, self.require(name, "key", def.key.as_ref())?)?,
                value: self.resolve(name, self.require(name, "value", def.value.as_ref())?)?,
            },
            "string" => ShapeKind::String,
            "integer" => ShapeKind::Integer,
            "long" => ShapeKind::Long,
            "short" => ShapeKind::Short,
            "byte" => ShapeKind::Byte,
            "float" => ShapeKind::Float,
            "double" => ShapeKind::Double,
            "bigInteger" => ShapeKind::BigInteger,
            "bigDecimal" => ShapeKind::BigDecimal,
            "boolean" => ShapeKind::Boolean,
            "blob" => ShapeKind::Blob,
            "timestamp" => ShapeKind::Timestamp,
            "document" => ShapeKind::Document,
            "service" => ShapeKind::Service {
                version: def.version.clone().unwrap_or_default(),
                operations: self.resolve_all(name, &def.operations)?,
                resources: self.resolve_all(name, &def.resources)?,
            },
            "operation" => ShapeKind::Operation {
                input: def
                    .input
                    .as_deref()
                    .map(|t| self.resolve(name, t))
                    .transpose()?,
                output: def
                    .output
                    .as_deref()
                    .map(|t| self.resolve(name, t))
                    .transpose()?,
                errors: self.resolve_all(name, &def.errors)?,
            },
            "resource" => ShapeKind::Resource {
                operations: self.resolve_all(name, &def.operations)?,
                resources: self.resolve_all(name, &def.resources)?,
            },
            other => return Err(self.ctx.unknown_shape_type(name, other)),
        };

        if def.range.is_some() && !kind.is_number() {
            return Err(self.ctx.validation_error(
                format!("'range' is only valid on number shapes, '{}' is a {}", name, kind),
                Some(name),
            ));
        }
        if !def.members.is_empty()
            && !matches!(kind, ShapeKind::Structure { .. } | ShapeKind::Union { .. })
        {
            return Err(self.ctx.validation_error(
                format!("'{}' is a {} and cannot have members", name, kind),
                Some(name),
            ));
        }
        Ok(kind)
    }

    fn lower_into(&self, file: &ModelFile, model: &mut Model) -> Result<()> {
        for (name, def) in &file.shapes {
            let id = ShapeId::new(self.namespace, name.clone());
            let kind = self.kind_of(name, def)?;
            let traits = traits_of(
                def.documentation.as_ref(),
                def.range,
                def.length,
                def.pattern.as_ref(),
            );
            model.insert(Shape::new(id.clone(), kind).with_traits(traits));

            for (member_name, member) in &def.members {
                let target = self.resolve(name, &member.target)?;
                let mut traits = traits_of(
                    member.documentation.as_ref(),
                    member.range,
                    member.length,
                    member.pattern.as_ref(),
                );
                traits.required = member.required;
                model
                    .add_member(&id, member_name, target, traits)
                    .map_err(|e| self.ctx.validation_error(e, Some(member_name)))?;
            }
        }
        Ok(())
    }
}

/// Parse a single model file from a string.
pub fn parse_model_str(content: &str, filename: &str) -> Result<Model> {
    ModelLoader::new().add_str(content, filename)?.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> ShapeId {
        ShapeId::new("com.example", name)
    }

    #[test]
    fn test_parse_bounded_integer() {
        let model = parse_model_str(
            r#"
            namespace = "com.example"

            [shapes.Percent]
            type = "integer"
            range = { min = 0, max = 100 }
            documentation = "A percentage"
            "#,
            "percent.shapes.toml",
        )
        .unwrap();

        let shape = model.get(&id("Percent")).unwrap();
        assert_eq!(shape.kind(), &ShapeKind::Integer);
        let range = shape.traits().range.unwrap();
        assert_eq!(range.min, Some(0.0));
        assert_eq!(range.max, Some(100.0));
        assert_eq!(shape.traits().documentation.as_deref(), Some("A percentage"));
    }

    #[test]
    fn test_parse_structure_members_in_order() {
        let model = parse_model_str(
            r#"
            namespace = "com.example"

            [shapes.User]
            type = "structure"

            [shapes.User.members.zeta]
            target = "String"
            required = true

            [shapes.User.members.alpha]
            target = "Age"

            [shapes.Age]
            type = "integer"
            "#,
            "user.shapes.toml",
        )
        .unwrap();

        let members = model.members(&id("User"));
        let names: Vec<_> = members.iter().filter_map(|m| m.id().member()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert!(members[0].traits().required);
        assert_eq!(members[0].member_target(), Some(&ShapeId::prelude("String")));
        assert_eq!(members[1].member_target(), Some(&id("Age")));
    }

    #[test]
    fn test_parse_enums() {
        let model = parse_model_str(
            r#"
            namespace = "com.example"

            [shapes.Status]
            type = "enum"
            values = ["ACTIVE", "INACTIVE"]

            [shapes.Priority]
            type = "intEnum"
            values = { LOW = 1, HIGH = 10 }
            "#,
            "enums.shapes.toml",
        )
        .unwrap();

        let ShapeKind::Enum { values } = model.get(&id("Status")).unwrap().kind() else {
            panic!("expected enum");
        };
        assert_eq!(values.len(), 2);
        assert_eq!(values[1].value, "INACTIVE");

        let ShapeKind::IntEnum { values } = model.get(&id("Priority")).unwrap().kind() else {
            panic!("expected intEnum");
        };
        assert_eq!(values[1].name, "HIGH");
        assert_eq!(values[1].value, 10);
    }

    #[test]
    fn test_cross_file_references() {
        let mut loader = ModelLoader::new();
        loader
            .add_str(
                r#"
                namespace = "com.example"
                [shapes.Users]
                type = "list"
                member = "com.other#User"
                "#,
                "a.shapes.toml",
            )
            .unwrap()
            .add_str(
                r#"
                namespace = "com.other"
                [shapes.User]
                type = "structure"
                "#,
                "b.shapes.toml",
            )
            .unwrap();

        let model = loader.finish().unwrap();
        assert_eq!(
            model.dependencies(&id("Users")),
            vec![&ShapeId::new("com.other", "User")]
        );
    }

    #[test]
    fn test_unknown_type() {
        let err = parse_model_str(
            r#"
            namespace = "com.example"
            [shapes.X]
            type = "integr"
            "#,
            "x.shapes.toml",
        )
        .unwrap_err();
        assert!(matches!(*err, Error::UnknownShapeType { .. }));
    }

    #[test]
    fn test_unresolved_target() {
        let err = parse_model_str(
            r#"
            namespace = "com.example"
            [shapes.Users]
            type = "list"
            member = "User"
            "#,
            "x.shapes.toml",
        )
        .unwrap_err();
        assert!(matches!(*err, Error::UnresolvedTarget { ref target, .. } if target == "User"));
    }

    #[test]
    fn test_list_requires_member() {
        let err = parse_model_str(
            r#"
            namespace = "com.example"
            [shapes.Users]
            type = "list"
            "#,
            "x.shapes.toml",
        )
        .unwrap_err();
        assert!(err.to_string().contains("requires a 'member' field"));
    }

    #[test]
    fn test_range_on_string_rejected() {
        let err = parse_model_str(
            r#"
            namespace = "com.example"
            [shapes.Name]
            type = "string"
            range = { min = 1 }
            "#,
            "x.shapes.toml",
        )
        .unwrap_err();
        assert!(matches!(*err, Error::Validation { .. }));
    }

    #[test]
    fn test_duplicate_shape_across_files() {
        let mut loader = ModelLoader::new();
        let content = r#"
            namespace = "com.example"
            [shapes.A]
            type = "string"
            "#;
        loader
            .add_str(content, "a.shapes.toml")
            .unwrap()
            .add_str(content, "b.shapes.toml")
            .unwrap();
        let err = loader.finish().unwrap_err();
        assert!(matches!(*err, Error::DuplicateShape { .. }));
    }

    #[test]
    fn test_reserved_namespace() {
        let err = parse_model_str(
            r#"
            namespace = "shapegen.api"
            "#,
            "x.shapes.toml",
        )
        .unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }
}
