//! Java naming conventions.

use shapegen_core::{to_camel_case, to_screaming_snake_case};

/// Java keywords and literals that cannot be used as identifiers.
pub const JAVA_RESERVED: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "false",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "record",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "true",
    "try",
    "var",
    "void",
    "volatile",
    "while",
    "yield",
    // would shadow java.lang types used by generated code
    "Object",
    "String",
    "Integer",
    "Override",
];

/// Append `_` to reserved words.
pub fn escape(name: &str) -> String {
    if JAVA_RESERVED.contains(&name) {
        format!("{}_", name)
    } else {
        name.to_string()
    }
}

/// Field and accessor name for a structure member.
pub fn field_name(member: &str) -> String {
    escape(&to_camel_case(member))
}

/// Constant name for an enum value, e.g. `lightBlue` -> `LIGHT_BLUE`.
pub fn enum_constant(name: &str) -> String {
    let constant = to_screaming_snake_case(name);
    if constant.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", constant)
    } else {
        constant
    }
}

/// A double-quoted Java string literal.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Text safe to place inside a `/** */` comment.
pub fn javadoc_safe(text: &str) -> String {
    text.replace("*/", "*&#47;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("class"), "class_");
        assert_eq!(escape("String"), "String_");
        assert_eq!(escape("name"), "name");
    }

    #[test]
    fn test_field_name() {
        assert_eq!(field_name("first_name"), "firstName");
        assert_eq!(field_name("Default"), "default_");
    }

    #[test]
    fn test_enum_constant() {
        assert_eq!(enum_constant("RED"), "RED");
        assert_eq!(enum_constant("lightBlue"), "LIGHT_BLUE");
        assert_eq!(enum_constant("2xl"), "_2XL");
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(string_literal("red"), "\"red\"");
        assert_eq!(string_literal("a\"b\\c\n"), "\"a\\\"b\\\\c\\n\"");
    }

    #[test]
    fn test_javadoc_safe() {
        assert_eq!(javadoc_safe("[a-z]*/x"), "[a-z]*&#47;x");
    }
}
