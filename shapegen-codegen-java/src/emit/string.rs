use shapegen_codegen::builder::CodeBuilder;
use shapegen_model::{Length, Shape};

use super::{TestClass, push_docs, push_guard, push_method, throws, wrapper_equals};
use crate::{ClassName, JavaFeatures, JavaFile, naming};

fn describe(length: Option<&Length>, pattern: Option<&str>) -> Vec<String> {
    let mut lines = Vec::new();
    match length.map(|l| (l.min, l.max)) {
        Some((Some(min), Some(max))) => lines.push(format!("Length from {} to {}.", min, max)),
        Some((Some(min), None)) => lines.push(format!("Length of at least {}.", min)),
        Some((None, Some(max))) => lines.push(format!("Length of at most {}.", max)),
        _ => {}
    }
    if let Some(pattern) = pattern {
        lines.push(format!("Must match {}.", pattern));
    }
    lines
}

fn length_guard(length: &Length, class: &str) -> Option<(&'static str, String)> {
    Some(match (length.min, length.max) {
        (Some(_), Some(_)) => (
            "value.length() < MIN_LENGTH || value.length() > MAX_LENGTH",
            format!(
                "\"{} length must be between \" + MIN_LENGTH + \" and \" + MAX_LENGTH + \", was \" + value.length()",
                class
            ),
        ),
        (Some(_), None) => (
            "value.length() < MIN_LENGTH",
            format!(
                "\"{} length must be at least \" + MIN_LENGTH + \", was \" + value.length()",
                class
            ),
        ),
        (None, Some(_)) => (
            "value.length() > MAX_LENGTH",
            format!(
                "\"{} length must be at most \" + MAX_LENGTH + \", was \" + value.length()",
                class
            ),
        ),
        (None, None) => return None,
    })
}

pub(crate) fn string_class(shape: &Shape, class: &ClassName, features: JavaFeatures) -> JavaFile {
    let name = class.simple.as_str();
    let traits = shape.traits();
    let length = traits.length.unwrap_or_default();
    let pattern = traits.pattern.as_deref();

    let mut b = CodeBuilder::java();
    push_docs(
        &mut b,
        traits.documentation.as_deref(),
        &describe(traits.length.as_ref(), pattern),
    );
    b.push_line(&format!(
        "public final class {name} implements Comparable<{name}>, Serializable {{"
    ));
    b.push_indent();
    b.push_blank();
    b.push_line("private static final long serialVersionUID = 1L;");
    if let Some(min) = length.min {
        b.push_line(&format!("public static final int MIN_LENGTH = {};", min));
    }
    if let Some(max) = length.max {
        b.push_line(&format!("public static final int MAX_LENGTH = {};", max));
    }
    if let Some(pattern) = pattern {
        b.push_line(&format!(
            "private static final Pattern PATTERN = Pattern.compile({});",
            naming::string_literal(pattern)
        ));
    }
    b.push_blank();
    b.push_line("private final String value;");
    b.push_blank();

    b.push_line(&format!("public {}(String value) {{", name));
    b.push_indent();
    push_guard(&mut b, "value == null", &format!("\"{} may not be null\"", name));
    if let Some((condition, message)) = length_guard(&length, name) {
        push_guard(&mut b, condition, &message);
    }
    if pattern.is_some() {
        push_guard(
            &mut b,
            "!PATTERN.matcher(value).matches()",
            &format!(
                "\"{} must match \" + PATTERN.pattern() + \", was \" + value",
                name
            ),
        );
    }
    b.push_line("this.value = value;");
    b.push_dedent();
    b.push_line("}");
    b.push_blank();

    push_method(&mut b, None, "public String get()", &["return value;".to_string()]);
    b.push_blank();
    push_method(
        &mut b,
        Some("@Override"),
        &format!("public int compareTo({} other)", name),
        &["return value.compareTo(other.value);".to_string()],
    );
    b.push_blank();
    push_method(
        &mut b,
        Some("@Override"),
        "public boolean equals(Object o)",
        &[wrapper_equals(name, features, |other| {
            format!("value.equals({}.value)", other)
        })],
    );
    b.push_blank();
    push_method(
        &mut b,
        Some("@Override"),
        "public int hashCode()",
        &["return value.hashCode();".to_string()],
    );
    b.push_blank();
    push_method(
        &mut b,
        Some("@Override"),
        "public String toString()",
        &["return value;".to_string()],
    );
    b.push_dedent();
    b.push_line("}");

    let mut file = JavaFile::new(&class.package).import("java.io.Serializable");
    if pattern.is_some() {
        file = file.import("java.util.regex.Pattern");
    }
    file.body(b.build())
}

fn repeated(features: JavaFeatures, count: u64) -> String {
    if features.string_repeat {
        format!("\"x\".repeat({})", count)
    } else {
        format!("new String(new char[{}]).replace('\\0', 'x')", count)
    }
}

/// Null is always rejected. Length bounds are only exercised without a
/// pattern, since a run of `x` need not match it.
pub(crate) fn string_test(shape: &Shape, class: &ClassName, features: JavaFeatures) -> JavaFile {
    let name = class.simple.as_str();
    let traits = shape.traits();
    let mut test = TestClass::default();

    test.method(
        "rejectsNull",
        vec![throws("IllegalArgumentException", &format!("new {}(null)", name))],
    );

    if let (Some(length), None) = (traits.length, traits.pattern.as_ref()) {
        let bounds: Vec<u64> = length.min.into_iter().chain(length.max).collect();
        if !bounds.is_empty() {
            let accepts = bounds
                .iter()
                .map(|&n| {
                    format!(
                        "assertEquals({}, new {}({}).get().length());",
                        n,
                        name,
                        repeated(features, n)
                    )
                })
                .collect();
            test.method("acceptsLengthBounds", accepts);
        }

        let outside: Vec<String> = [
            length.min.and_then(|min| min.checked_sub(1)),
            length.max.and_then(|max| max.checked_add(1)),
        ]
        .into_iter()
        .flatten()
        .map(|n| {
            throws(
                "IllegalArgumentException",
                &format!("new {}({})", name, repeated(features, n)),
            )
        })
        .collect();
        if !outside.is_empty() {
            test.method("rejectsOutOfRangeLength", outside);
        }
    }

    // rejectsNull is always present
    test.render(&class.package, name).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use shapegen_model::{ShapeId, ShapeKind, Traits};

    use super::*;

    fn class() -> ClassName {
        ClassName {
            package: "com.example.model".into(),
            simple: "Code".into(),
        }
    }

    const JAVA8: JavaFeatures = JavaFeatures {
        pattern_matching: false,
        string_repeat: false,
    };

    #[test]
    fn test_pattern_guard_and_import() {
        let shape = Shape::new(ShapeId::new("com.example", "Code"), ShapeKind::String)
            .with_traits(Traits::default().with_pattern("^[A-Z]{3}$"));
        let source = string_class(&shape, &class(), JAVA8).render();
        assert!(source.contains("import java.util.regex.Pattern;"));
        assert!(source.contains("Pattern.compile(\"^[A-Z]{3}$\");"));
        assert!(source.contains("if (!PATTERN.matcher(value).matches()) {"));
        assert!(source.contains("/** Must match ^[A-Z]{3}$. */"));
        assert!(!source.contains("MIN_LENGTH"));
    }

    #[test]
    fn test_patterned_string_only_tests_null() {
        let shape = Shape::new(ShapeId::new("com.example", "Code"), ShapeKind::String)
            .with_traits(
                Traits::default()
                    .with_pattern("^[A-Z]+$")
                    .with_length(Some(2), None),
            );
        let test = string_test(&shape, &class(), JAVA8).render();
        assert!(test.contains("void rejectsNull()"));
        assert!(!test.contains("acceptsLengthBounds"));
        assert!(!test.contains("assertEquals"));
    }

    #[test]
    fn test_length_tests_before_java_11() {
        let shape = Shape::new(ShapeId::new("com.example", "Code"), ShapeKind::String)
            .with_traits(Traits::default().with_length(Some(0), Some(3)));
        let test = string_test(&shape, &class(), JAVA8).render();
        assert!(test.contains(
            "assertEquals(3, new Code(new String(new char[3]).replace('\\0', 'x')).get().length());"
        ));
        assert!(test.contains("new Code(new String(new char[4])"));
        // nothing is shorter than zero
        assert_eq!(test.matches("assertThrows(").count(), 2);
    }
}
