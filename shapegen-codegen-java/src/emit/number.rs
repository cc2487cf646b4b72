use shapegen_codegen::builder::CodeBuilder;
use shapegen_model::{Range, Shape, ShapeKind};

use super::{TestClass, push_docs, push_guard, push_method, throws, wrapper_equals};
use crate::{ClassName, JavaFeatures, JavaFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberKind {
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
}

impl NumberKind {
    pub(crate) fn of(kind: &ShapeKind) -> Option<Self> {
        Some(match kind {
            ShapeKind::Byte => Self::Byte,
            ShapeKind::Short => Self::Short,
            ShapeKind::Integer => Self::Integer,
            ShapeKind::Long => Self::Long,
            ShapeKind::Float => Self::Float,
            ShapeKind::Double => Self::Double,
            _ => return None,
        })
    }

    fn primitive(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Integer => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    fn boxed(self) -> &'static str {
        match self {
            Self::Byte => "Byte",
            Self::Short => "Short",
            Self::Integer => "Integer",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
        }
    }

    fn is_floating(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    /// Limits of the primitive for integral kinds.
    fn limits(self) -> Option<(i64, i64)> {
        match self {
            Self::Byte => Some((i8::MIN.into(), i8::MAX.into())),
            Self::Short => Some((i16::MIN.into(), i16::MAX.into())),
            Self::Integer => Some((i32::MIN.into(), i32::MAX.into())),
            Self::Long => Some((i64::MIN, i64::MAX)),
            Self::Float | Self::Double => None,
        }
    }

    /// As written in prose.
    fn plain(self, value: f64) -> String {
        if self.is_floating() {
            format!("{:?}", value)
        } else {
            format!("{}", value as i64)
        }
    }

    /// As written in a constant initializer.
    fn constant(self, value: f64) -> String {
        match self {
            Self::Long => format!("{}L", value as i64),
            Self::Float => format!("{:?}F", value as f32),
            _ => self.plain(value),
        }
    }

    /// As written in a method argument, where narrowing needs a cast.
    fn argument(self, value: String) -> String {
        match self {
            Self::Byte => format!("(byte) {}", value),
            Self::Short => format!("(short) {}", value),
            _ => value,
        }
    }
}

fn describe_range(kind: NumberKind, range: &Range) -> Vec<String> {
    match (range.min, range.max) {
        (Some(min), Some(max)) => vec![format!(
            "Values from {} to {} inclusive.",
            kind.plain(min),
            kind.plain(max)
        )],
        (Some(min), None) => vec![format!("Values of at least {}.", kind.plain(min))],
        (None, Some(max)) => vec![format!("Values of at most {}.", kind.plain(max))],
        (None, None) => Vec::new(),
    }
}

/// Condition and message for the constructor's range guard.
fn range_guard(kind: NumberKind, range: &Range, class: &str) -> Option<(String, String)> {
    let (condition, message) = match (range.min, range.max) {
        (Some(_), Some(_)) => (
            "value < MIN_VALUE || value > MAX_VALUE",
            format!(
                "\"{} must be between \" + MIN_VALUE + \" and \" + MAX_VALUE + \", was \" + value",
                class
            ),
        ),
        (Some(_), None) => (
            "value < MIN_VALUE",
            format!("\"{} must be at least \" + MIN_VALUE + \", was \" + value", class),
        ),
        (None, Some(_)) => (
            "value > MAX_VALUE",
            format!("\"{} must be at most \" + MAX_VALUE + \", was \" + value", class),
        ),
        (None, None) => return None,
    };
    let condition = if kind.is_floating() {
        format!("{}.isNaN(value) || {}", kind.boxed(), condition)
    } else {
        condition.to_string()
    };
    Some((condition, message))
}

pub(crate) fn number_class(
    shape: &Shape,
    kind: NumberKind,
    class: &ClassName,
    features: JavaFeatures,
) -> JavaFile {
    let name = class.simple.as_str();
    let range = shape.traits().range.unwrap_or_default();
    let (primitive, boxed) = (kind.primitive(), kind.boxed());

    let mut b = CodeBuilder::java();
    push_docs(
        &mut b,
        shape.traits().documentation.as_deref(),
        &describe_range(kind, &range),
    );
    b.push_line(&format!(
        "public final class {name} implements Comparable<{name}>, Serializable {{"
    ));
    b.push_indent();
    b.push_blank();
    b.push_line("private static final long serialVersionUID = 1L;");
    if let Some(min) = range.min {
        b.push_line(&format!(
            "public static final {} MIN_VALUE = {};",
            primitive,
            kind.constant(min)
        ));
    }
    if let Some(max) = range.max {
        b.push_line(&format!(
            "public static final {} MAX_VALUE = {};",
            primitive,
            kind.constant(max)
        ));
    }
    b.push_blank();
    b.push_line(&format!("private final {} value;", primitive));
    b.push_blank();

    b.push_line(&format!("public {}({} value) {{", name, primitive));
    b.push_indent();
    if let Some((condition, message)) = range_guard(kind, &range, name) {
        push_guard(&mut b, &condition, &message);
    }
    b.push_line("this.value = value;");
    b.push_dedent();
    b.push_line("}");
    b.push_blank();

    push_method(
        &mut b,
        None,
        &format!("public {} get()", primitive),
        &["return value;".to_string()],
    );
    b.push_blank();
    push_method(
        &mut b,
        Some("@Override"),
        &format!("public int compareTo({} other)", name),
        &[format!("return {}.compare(value, other.value);", boxed)],
    );
    b.push_blank();
    push_method(
        &mut b,
        Some("@Override"),
        "public boolean equals(Object o)",
        &[wrapper_equals(name, features, |other| {
            format!("{}.compare(value, {}.value) == 0", boxed, other)
        })],
    );
    b.push_blank();
    push_method(
        &mut b,
        Some("@Override"),
        "public int hashCode()",
        &[format!("return {}.hashCode(value);", boxed)],
    );
    b.push_blank();
    push_method(
        &mut b,
        Some("@Override"),
        "public String toString()",
        &[format!("return {}.toString(value);", boxed)],
    );
    b.push_dedent();
    b.push_line("}");

    JavaFile::new(&class.package)
        .import("java.io.Serializable")
        .body(b.build())
}

/// Bounds are accepted, the nearest values outside them rejected. `None`
/// for unbounded numbers.
pub(crate) fn number_test(shape: &Shape, kind: NumberKind, class: &ClassName) -> Option<JavaFile> {
    let name = class.simple.as_str();
    let range = shape.traits().range.unwrap_or_default();
    let bounds: Vec<f64> = range.min.into_iter().chain(range.max).collect();

    let mut test = TestClass::default();
    if !bounds.is_empty() {
        let accepts = bounds
            .iter()
            .map(|&bound| {
                let arg = kind.argument(kind.constant(bound));
                if kind.is_floating() {
                    format!(
                        "assertEquals({}, new {}({}).get(), 0.0);",
                        kind.constant(bound),
                        name,
                        arg
                    )
                } else {
                    format!("assertEquals({}, new {}({}).get());", arg, name, arg)
                }
            })
            .collect();
        test.method("acceptsBounds", accepts);
    }

    let outside: Vec<String> = [
        range.min.and_then(|min| outside(kind, min, false)),
        range.max.and_then(|max| outside(kind, max, true)),
    ]
    .into_iter()
    .flatten()
    .map(|arg| throws("IllegalArgumentException", &format!("new {}({})", name, arg)))
    .collect();
    if !outside.is_empty() {
        test.method("rejectsOutOfRange", outside);
    }

    test.render(&class.package, name)
}

/// The argument just past `bound`, or `None` if the primitive cannot hold it.
fn outside(kind: NumberKind, bound: f64, above: bool) -> Option<String> {
    match kind.limits() {
        Some((lowest, highest)) => {
            let bound = bound as i64;
            let next = if above {
                bound.checked_add(1).filter(|n| *n <= highest)?
            } else {
                bound.checked_sub(1).filter(|n| *n >= lowest)?
            };
            Some(kind.argument(kind.constant(next as f64)))
        }
        None => Some(format!(
            "Math.{}({})",
            if above { "nextUp" } else { "nextDown" },
            kind.constant(bound)
        )),
    }
}
