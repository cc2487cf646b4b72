use shapegen_codegen::builder::CodeBuilder;
use shapegen_model::Shape;

use super::{TestClass, push_docs, push_method, throws};
use crate::{ClassName, JavaFeatures, JavaFile, JavaType};

/// A resolved structure member.
#[derive(Debug, Clone)]
pub(crate) struct Field {
    pub name: String,
    pub ty: JavaType,
    pub required: bool,
}

impl Field {
    fn accessor_type(&self) -> String {
        if self.required {
            self.ty.name.clone()
        } else {
            format!("Optional<{}>", self.ty.name)
        }
    }
}

fn equals_body(name: &str, fields: &[Field], features: JavaFeatures) -> Vec<String> {
    if fields.is_empty() {
        return vec![format!("return o == this || o instanceof {};", name)];
    }
    let mut body = vec![
        "if (o == this) {".to_string(),
        "    return true;".to_string(),
        "}".to_string(),
    ];
    if features.pattern_matching {
        body.push(format!("if (!(o instanceof {} other)) {{", name));
        body.push("    return false;".to_string());
        body.push("}".to_string());
    } else {
        body.push(format!("if (!(o instanceof {})) {{", name));
        body.push("    return false;".to_string());
        body.push("}".to_string());
        body.push(format!("{} other = ({}) o;", name, name));
    }
    for (i, field) in fields.iter().enumerate() {
        let compare = format!("Objects.equals({}, other.{})", field.name, field.name);
        let lead = if i == 0 { "return " } else { "        && " };
        let end = if i + 1 == fields.len() { ";" } else { "" };
        body.push(format!("{}{}{}", lead, compare, end));
    }
    body
}

fn to_string_body(name: &str, fields: &[Field]) -> String {
    if fields.is_empty() {
        return format!("return \"{}{{}}\";", name);
    }
    let parts: Vec<String> = fields
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let sep = if i == 0 { "" } else { ", " };
            format!("\"{}{}=\" + {}", sep, f.name, f.name)
        })
        .collect();
    format!("return \"{}{{\" + {} + \"}}\";", name, parts.join(" + "))
}

pub(crate) fn structure_class(
    shape: &Shape,
    fields: &[Field],
    class: &ClassName,
    features: JavaFeatures,
) -> JavaFile {
    let name = class.simple.as_str();
    let mut b = CodeBuilder::java();
    push_docs(&mut b, shape.traits().documentation.as_deref(), &[]);
    b.push_line(&format!("public final class {} implements Serializable {{", name));
    b.push_indent();
    b.push_blank();
    b.push_line("private static final long serialVersionUID = 1L;");
    if !fields.is_empty() {
        b.push_blank();
    }
    for field in fields {
        b.push_line(&format!("private final {} {};", field.ty.name, field.name));
    }
    b.push_blank();

    let params: Vec<String> = fields
        .iter()
        .map(|f| format!("{} {}", f.ty.name, f.name))
        .collect();
    let assignments: Vec<String> = fields
        .iter()
        .map(|f| {
            if f.required && !f.ty.primitive {
                format!(
                    "this.{} = Objects.requireNonNull({}, \"{}\");",
                    f.name, f.name, f.name
                )
            } else {
                format!("this.{} = {};", f.name, f.name)
            }
        })
        .collect();
    push_method(
        &mut b,
        None,
        &format!("public {}({})", name, params.join(", ")),
        &assignments,
    );

    for field in fields {
        let body = if field.required {
            format!("return {};", field.name)
        } else {
            format!("return Optional.ofNullable({});", field.name)
        };
        b.push_blank();
        push_method(
            &mut b,
            None,
            &format!("public {} {}()", field.accessor_type(), field.name),
            &[body],
        );
    }

    b.push_blank();
    push_method(
        &mut b,
        Some("@Override"),
        "public boolean equals(Object o)",
        &equals_body(name, fields, features),
    );
    b.push_blank();
    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    push_method(
        &mut b,
        Some("@Override"),
        "public int hashCode()",
        &[format!("return Objects.hash({});", names.join(", "))],
    );
    b.push_blank();
    push_method(
        &mut b,
        Some("@Override"),
        "public String toString()",
        &[to_string_body(name, fields)],
    );
    b.push_dedent();
    b.push_line("}");

    let mut file = JavaFile::new(&class.package)
        .import("java.io.Serializable")
        .import("java.util.Objects");
    if fields.iter().any(|f| !f.required) {
        file.add_import("java.util.Optional");
    }
    for import in fields.iter().flat_map(|f| &f.ty.imports) {
        file.add_import(import.as_str());
    }
    file.body(b.build())
}

/// Passing null for every reference member must fail when any of them is
/// required. `None` when nothing is required.
pub(crate) fn structure_test(fields: &[Field], class: &ClassName) -> Option<JavaFile> {
    if !fields.iter().any(|f| f.required && !f.ty.primitive) {
        return None;
    }
    let name = class.simple.as_str();
    let args: Vec<&str> = fields.iter().map(|f| f.ty.placeholder()).collect();
    let mut test = TestClass::default();
    test.method(
        "rejectsMissingRequiredMembers",
        vec![throws(
            "NullPointerException",
            &format!("new {}({})", name, args.join(", ")),
        )],
    );
    test.render(&class.package, name)
}

#[cfg(test)]
mod tests {
    use shapegen_model::{ShapeId, ShapeKind};

    use super::*;

    fn class() -> ClassName {
        ClassName {
            package: "com.example.model".into(),
            simple: "Point".into(),
        }
    }

    fn field(name: &str, ty: &str, primitive: bool, required: bool) -> Field {
        Field {
            name: name.into(),
            ty: JavaType {
                name: ty.into(),
                imports: vec![],
                primitive,
            },
            required,
        }
    }

    #[test]
    fn test_primitive_members_skip_null_checks() {
        let shape = Shape::new(
            ShapeId::new("com.example", "Point"),
            ShapeKind::Structure { members: vec![] },
        );
        let fields = vec![field("x", "int", true, true), field("y", "int", true, true)];
        let features = JavaFeatures {
            pattern_matching: true,
            string_repeat: true,
        };
        let source = structure_class(&shape, &fields, &class(), features).render();
        assert!(source.contains("this.x = x;"));
        assert!(!source.contains("requireNonNull"));
        assert!(!source.contains("import java.util.Optional;"));
        assert!(source.contains("if (!(o instanceof Point other)) {"));
        assert!(source.contains("return \"Point{\" + \"x=\" + x + \", y=\" + y + \"}\";"));
        assert!(structure_test(&fields, &class()).is_none());
    }

    #[test]
    fn test_empty_structure() {
        let shape = Shape::new(
            ShapeId::new("com.example", "Point"),
            ShapeKind::Structure { members: vec![] },
        );
        let features = JavaFeatures {
            pattern_matching: false,
            string_repeat: true,
        };
        let source = structure_class(&shape, &[], &class(), features).render();
        assert!(source.contains("public Point() {\n    }"));
        assert!(source.contains("return o == this || o instanceof Point;"));
        assert!(source.contains("return \"Point{}\";"));
    }

    #[test]
    fn test_required_test_uses_placeholders() {
        let fields = vec![
            field("label", "String", false, true),
            field("x", "int", true, true),
        ];
        let test = structure_test(&fields, &class()).unwrap().render();
        assert!(test.contains("assertThrows(NullPointerException.class, () -> new Point(null, 0));"));
    }
}
