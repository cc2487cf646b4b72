//! TypeScript naming conventions.

use shapegen_core::{to_kebab_case, to_pascal_case};

/// Words that cannot name a type or a top-level binding.
pub const TS_RESERVED: &[&str] = &[
    // JavaScript reserved words
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "let",
    "new",
    "null",
    "return",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
    // TypeScript reserved type names
    "any",
    "boolean",
    "never",
    "number",
    "object",
    "string",
    "symbol",
    "undefined",
    "unknown",
    "bigint",
    // globals the generated modules rely on
    "Date",
    "Number",
    "RangeError",
    "ReadonlyArray",
    "Readonly",
    "Record",
    "RegExp",
    "Uint8Array",
];

/// Prefix reserved words with `_`.
pub fn escape(name: &str) -> String {
    if TS_RESERVED.contains(&name) {
        format!("_{}", name)
    } else {
        name.to_string()
    }
}

/// Type name for a shape.
pub fn type_name(shape_name: &str) -> String {
    escape(shape_name)
}

/// Module file stem for a shape, e.g. `PersonName` -> `person-name`.
pub fn module_name(shape_name: &str) -> String {
    to_kebab_case(shape_name)
}

/// Name of the validating constructor for a branded type.
pub fn constructor_name(shape_name: &str) -> String {
    format!("as{}", to_pascal_case(shape_name))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// A property key, quoted when it is not a plain identifier.
pub fn property_name(member: &str) -> String {
    if is_identifier(member) {
        member.to_string()
    } else {
        string_literal(member)
    }
}

/// A double-quoted JavaScript string literal.
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
