//! Per-kind renderers producing the body sections of a shape's module.

use shapegen_codegen::builder::CodeBuilder;
use shapegen_model::{EnumValue, IntEnumValue, Shape, ShapeKind, Traits};

use crate::{
    ast::{Interface, InterfaceField, TypeAlias},
    naming::{constructor_name, property_name, string_literal, type_name},
    type_mapper::{TsType, base_type},
};

/// A resolved member: a structure or union member, a list element
/// (`member`) or a map key and value (`key`, `value`).
#[derive(Debug, Clone)]
pub(crate) struct MemberType {
    pub name: String,
    pub ty: TsType,
    pub required: bool,
}

fn with_doc(builder: CodeBuilder, doc: Option<&str>) -> CodeBuilder {
    match doc {
        Some(doc) => builder.doc_comment(doc),
        None => builder,
    }
}

/// Body sections for `shape`, in output order.
pub(crate) fn sections(shape: &Shape, members: &[MemberType]) -> Vec<String> {
    let name = type_name(shape.id().name());
    let traits = shape.traits();
    let doc = traits.documentation.as_deref();
    match shape.kind() {
        ShapeKind::Structure { .. } => vec![structure(&name, doc, members)],
        ShapeKind::Union { .. } => vec![union(&name, doc, members)],
        ShapeKind::Enum { values } => vec![string_enum(&name, doc, values)],
        ShapeKind::IntEnum { values } => vec![int_enum(&name, doc, values)],
        ShapeKind::List { .. } => {
            let element = element_type(members, "member");
            vec![alias(&name, doc, &format!("ReadonlyArray<{}>", element))]
        }
        ShapeKind::Map { .. } => {
            let key = element_type(members, "key");
            let value = element_type(members, "value");
            vec![alias(
                &name,
                doc,
                &format!("Readonly<Record<{}, {}>>", key, value),
            )]
        }
        ShapeKind::String if traits.length.is_some() || traits.pattern.is_some() => {
            branded_string(&name, doc, traits)
        }
        kind if traits.range.is_some() && base_type(kind) == Some("number") => {
            branded_number(&name, doc, kind, traits)
        }
        kind => vec![alias(&name, doc, base_type(kind).unwrap_or("unknown"))],
    }
}

fn element_type<'a>(members: &'a [MemberType], name: &str) -> &'a str {
    members
        .iter()
        .find(|m| m.name == name)
        .map_or("unknown", |m| m.ty.text.as_str())
}

fn alias(name: &str, doc: Option<&str>, ty: &str) -> String {
    TypeAlias::new(name, ty).doc(doc).build()
}

fn structure(name: &str, doc: Option<&str>, members: &[MemberType]) -> String {
    members
        .iter()
        .fold(Interface::new(name).doc(doc), |interface, member| {
            let field = InterfaceField::new(property_name(&member.name), &member.ty.text).readonly();
            interface.field_with(if member.required {
                field
            } else {
                field.optional()
            })
        })
        .build()
}

fn union(name: &str, doc: Option<&str>, members: &[MemberType]) -> String {
    if members.is_empty() {
        return alias(name, doc, "never");
    }
    let variants: Vec<String> = members
        .iter()
        .map(|m| format!("{{ readonly {}: {} }}", property_name(&m.name), m.ty.text))
        .collect();
    alias(name, doc, &variants.join(" | "))
}

fn const_object<T>(
    name: &str,
    doc: Option<&str>,
    entries: &[T],
    entry: impl Fn(&T) -> String,
) -> String {
    with_doc(CodeBuilder::typescript(), doc)
        .block_with_close(
            &format!("export const {} = {{", name),
            "} as const;",
            |b| b.each(entries, |b, e| b.line(&entry(e))),
        )
        .blank()
        .line(&format!(
            "export type {0} = (typeof {0})[keyof typeof {0}];",
            name
        ))
        .build()
}

fn string_enum(name: &str, doc: Option<&str>, values: &[EnumValue]) -> String {
    const_object(name, doc, values, |v| {
        format!("{}: {},", property_name(&v.name), string_literal(&v.value))
    })
}

fn int_enum(name: &str, doc: Option<&str>, values: &[IntEnumValue]) -> String {
    const_object(name, doc, values, |v| {
        format!("{}: {},", property_name(&v.name), v.value)
    })
}

fn brand(name: &str, doc: Option<&str>, base: &str) -> String {
    alias(
        name,
        doc,
        &format!("{} & {{ readonly __brand: {} }}", base, string_literal(name)),
    )
}

/// `if (condition) { throw new RangeError(`message`); }`
fn check(builder: CodeBuilder, condition: &str, message: &str) -> CodeBuilder {
    builder.block_with_close(&format!("if ({}) {{", condition), "}", |b| {
        b.line(&format!("throw new RangeError(`{}`);", message))
    })
}

fn validator(
    name: &str,
    base: &str,
    body: impl FnOnce(CodeBuilder) -> CodeBuilder,
) -> String {
    CodeBuilder::typescript()
        .block_with_close(
            &format!(
                "export function {}(value: {}): {} {{",
                constructor_name(name),
                base,
                name
            ),
            "}",
            |b| body(b).line(&format!("return value as {};", name)),
        )
        .build()
}

fn branded_string(name: &str, doc: Option<&str>, traits: &Traits) -> Vec<String> {
    let mut sections = vec![brand(name, doc, "string")];
    if let Some(pattern) = &traits.pattern {
        sections.push(format!(
            "const PATTERN = new RegExp({});\n",
            string_literal(pattern)
        ));
    }
    let length = traits.length.unwrap_or_default();
    sections.push(validator(name, "string", |mut b| {
        if let Some(min) = length.min.filter(|min| *min > 0) {
            b = check(
                b,
                &format!("value.length < {}", min),
                &format!("{} must be at least {} characters, got ${{value.length}}", name, min),
            );
        }
        if let Some(max) = length.max {
            b = check(
                b,
                &format!("value.length > {}", max),
                &format!("{} must be at most {} characters, got ${{value.length}}", name, max),
            );
        }
        if traits.pattern.is_some() {
            b = check(
                b,
                "!PATTERN.test(value)",
                &format!("{} must match ${{PATTERN.source}}", name),
            );
        }
        b
    }));
    sections
}

fn is_integral(kind: &ShapeKind) -> bool {
    matches!(
        kind,
        ShapeKind::Integer | ShapeKind::Long | ShapeKind::Short | ShapeKind::Byte
    )
}

fn branded_number(name: &str, doc: Option<&str>, kind: &ShapeKind, traits: &Traits) -> Vec<String> {
    let range = traits.range.unwrap_or_default();
    vec![
        brand(name, doc, "number"),
        validator(name, "number", |mut b| {
            b = if is_integral(kind) {
                check(
                    b,
                    "!Number.isInteger(value)",
                    &format!("{} must be an integer, got ${{value}}", name),
                )
            } else {
                check(
                    b,
                    "Number.isNaN(value)",
                    &format!("{} must be a number, got NaN", name),
                )
            };
            if let Some(min) = range.min {
                b = check(
                    b,
                    &format!("value < {}", min),
                    &format!("{} must be at least {}, got ${{value}}", name, min),
                );
            }
            if let Some(max) = range.max {
                b = check(
                    b,
                    &format!("value > {}", max),
                    &format!("{} must be at most {}, got ${{value}}", name, max),
                );
            }
            b
        }),
    ]
}
