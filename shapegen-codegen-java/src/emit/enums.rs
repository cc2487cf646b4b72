use shapegen_codegen::builder::CodeBuilder;
use shapegen_model::{EnumValue, IntEnumValue, Shape};

use super::{TestClass, push_docs, push_method, throws};
use crate::{ClassName, JavaFile, naming};

/// Shared layout of string and int enums; they differ in the value type,
/// the literal form and how values are compared.
struct EnumShape<'a> {
    name: &'a str,
    value_type: &'static str,
    constants: Vec<(String, String)>,
    matches: &'static str,
    to_string: &'static str,
}

fn render_enum(shape: &Shape, class: &ClassName, e: EnumShape<'_>) -> JavaFile {
    let name = e.name;
    let mut b = CodeBuilder::java();
    push_docs(&mut b, shape.traits().documentation.as_deref(), &[]);
    b.push_line(&format!("public enum {} {{", name));
    b.push_indent();
    if e.constants.is_empty() {
        b.push_line(";");
    }
    let last = e.constants.len().saturating_sub(1);
    for (i, (constant, literal)) in e.constants.iter().enumerate() {
        let end = if i == last { ";" } else { "," };
        b.push_line(&format!("{}({}){}", constant, literal, end));
    }
    b.push_blank();
    b.push_line(&format!("private final {} value;", e.value_type));
    b.push_blank();
    push_method(
        &mut b,
        None,
        &format!("{}({} value)", name, e.value_type),
        &["this.value = value;".to_string()],
    );
    b.push_blank();
    push_method(
        &mut b,
        None,
        &format!("public {} value()", e.value_type),
        &["return value;".to_string()],
    );
    b.push_blank();

    b.push_line(&format!(
        "public static {} fromValue({} value) {{",
        name, e.value_type
    ));
    b.push_indent();
    b.push_line(&format!("for ({} candidate : values()) {{", name));
    b.push_indent();
    b.push_line(&format!("if ({}) {{", e.matches));
    b.push_indent();
    b.push_line("return candidate;");
    b.push_dedent();
    b.push_line("}");
    b.push_dedent();
    b.push_line("}");
    b.push_line(&format!(
        "throw new IllegalArgumentException(\"Unknown {}: \" + value);",
        name
    ));
    b.push_dedent();
    b.push_line("}");
    b.push_blank();

    push_method(
        &mut b,
        Some("@Override"),
        "public String toString()",
        &[e.to_string.to_string()],
    );
    b.push_dedent();
    b.push_line("}");

    JavaFile::new(&class.package).body(b.build())
}

pub(crate) fn enum_class(shape: &Shape, values: &[EnumValue], class: &ClassName) -> JavaFile {
    let constants = values
        .iter()
        .map(|v| (naming::enum_constant(&v.name), naming::string_literal(&v.value)))
        .collect();
    render_enum(
        shape,
        class,
        EnumShape {
            name: &class.simple,
            value_type: "String",
            constants,
            matches: "candidate.value.equals(value)",
            to_string: "return value;",
        },
    )
}

pub(crate) fn int_enum_class(shape: &Shape, values: &[IntEnumValue], class: &ClassName) -> JavaFile {
    let constants = values
        .iter()
        .map(|v| (naming::enum_constant(&v.name), v.value.to_string()))
        .collect();
    render_enum(
        shape,
        class,
        EnumShape {
            name: &class.simple,
            value_type: "int",
            constants,
            matches: "candidate.value == value",
            to_string: "return Integer.toString(value);",
        },
    )
}

fn round_trip(name: &str) -> Vec<String> {
    vec![
        format!("for ({} value : {}.values()) {{", name, name),
        format!("    assertEquals(value, {}.fromValue(value.value()));", name),
        "}".to_string(),
    ]
}

pub(crate) fn enum_test(values: &[EnumValue], class: &ClassName) -> Option<JavaFile> {
    let name = class.simple.as_str();
    let mut test = TestClass::default();
    if !values.is_empty() {
        test.method("fromValueRoundTrips", round_trip(name));
    }
    let mut unknown = String::from("unknown");
    while values.iter().any(|v| v.value == unknown) {
        unknown.push('_');
    }
    test.method(
        "rejectsUnknownValue",
        vec![throws(
            "IllegalArgumentException",
            &format!("{}.fromValue({})", name, naming::string_literal(&unknown)),
        )],
    );
    test.render(&class.package, name)
}

pub(crate) fn int_enum_test(values: &[IntEnumValue], class: &ClassName) -> Option<JavaFile> {
    let name = class.simple.as_str();
    let mut test = TestClass::default();
    if !values.is_empty() {
        test.method("fromValueRoundTrips", round_trip(name));
    }
    let highest = values.iter().map(|v| v.value).max().unwrap_or(-1);
    if let Some(unknown) = highest.checked_add(1) {
        test.method(
            "rejectsUnknownValue",
            vec![throws(
                "IllegalArgumentException",
                &format!("{}.fromValue({})", name, unknown),
            )],
        );
    }
    test.render(&class.package, name)
}

#[cfg(test)]
mod tests {
    use shapegen_model::{ShapeId, ShapeKind};

    use super::*;

    fn class(name: &str) -> ClassName {
        ClassName {
            package: "com.example.model".into(),
            simple: name.into(),
        }
    }

    #[test]
    fn test_int_enum() {
        let values = vec![
            IntEnumValue {
                name: "low".into(),
                value: 1,
            },
            IntEnumValue {
                name: "high".into(),
                value: 10,
            },
        ];
        let shape = Shape::new(
            ShapeId::new("com.example", "Priority"),
            ShapeKind::IntEnum {
                values: values.clone(),
            },
        );
        let source = int_enum_class(&shape, &values, &class("Priority")).render();
        assert!(source.contains("    LOW(1),\n    HIGH(10);\n"));
        assert!(source.contains("if (candidate.value == value) {"));
        assert!(source.contains("public static Priority fromValue(int value) {"));

        let test = int_enum_test(&values, &class("Priority")).unwrap().render();
        assert!(test.contains("() -> Priority.fromValue(11)"));
    }

    #[test]
    fn test_empty_enum_still_compiles() {
        let shape = Shape::new(
            ShapeId::new("com.example", "Nothing"),
            ShapeKind::Enum { values: vec![] },
        );
        let source = enum_class(&shape, &[], &class("Nothing")).render();
        assert!(source.contains("public enum Nothing {\n    ;\n\n    private final String value;"));

        let test = enum_test(&[], &class("Nothing")).unwrap().render();
        assert!(!test.contains("fromValueRoundTrips"));
        assert!(!test.contains("assertEquals"));
    }

    #[test]
    fn test_unknown_value_avoids_real_values() {
        let values = vec![EnumValue {
            name: "UNKNOWN".into(),
            value: "unknown".into(),
        }];
        let test = enum_test(&values, &class("State")).unwrap().render();
        assert!(test.contains("State.fromValue(\"unknown_\")"));
    }
}
