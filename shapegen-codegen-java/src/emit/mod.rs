//! Per-kind emitters. Each produces a [`JavaFile`] for the model class and,
//! where there is something worth checking, a JUnit 5 test skeleton.

mod enums;
mod number;
mod string;
mod structure;

pub(crate) use enums::{enum_class, enum_test, int_enum_class, int_enum_test};
pub(crate) use number::{NumberKind, number_class, number_test};
pub(crate) use string::{string_class, string_test};
pub(crate) use structure::{Field, structure_class, structure_test};

use shapegen_codegen::builder::CodeBuilder;

use crate::{JavaFeatures, JavaFile, naming};

const ASSERT_EQUALS: &str = "org.junit.jupiter.api.Assertions.assertEquals";
const ASSERT_THROWS: &str = "org.junit.jupiter.api.Assertions.assertThrows";
const JUNIT_TEST: &str = "org.junit.jupiter.api.Test";

/// Doc comment from the shape's documentation plus a constraint summary.
fn push_docs(b: &mut CodeBuilder, documentation: Option<&str>, summary: &[String]) {
    let mut lines: Vec<String> = Vec::new();
    if let Some(doc) = documentation {
        lines.extend(doc.lines().map(naming::javadoc_safe));
    }
    if !lines.is_empty() && !summary.is_empty() {
        lines.push("<p>".to_string());
    }
    lines.extend(summary.iter().map(|s| naming::javadoc_safe(s)));
    if !lines.is_empty() {
        b.push_doc_comment(&lines.join("\n"));
    }
}

/// A method with an optional annotation line and a flat body.
fn push_method(b: &mut CodeBuilder, annotation: Option<&str>, signature: &str, body: &[String]) {
    if let Some(annotation) = annotation {
        b.push_line(annotation);
    }
    b.push_line(&format!("{} {{", signature));
    b.push_indent();
    for line in body {
        b.push_line(line);
    }
    b.push_dedent();
    b.push_line("}");
}

/// `if (<condition>) { throw new IllegalArgumentException(<message>); }`
fn push_guard(b: &mut CodeBuilder, condition: &str, message: &str) {
    b.push_line(&format!("if ({}) {{", condition));
    b.push_indent();
    b.push_line(&format!("throw new IllegalArgumentException({});", message));
    b.push_dedent();
    b.push_line("}");
}

/// The `equals` body for a single-value wrapper. `same` compares `value`
/// against the other instance's, given an expression for that instance.
fn wrapper_equals(class: &str, features: JavaFeatures, same: impl Fn(&str) -> String) -> String {
    if features.pattern_matching {
        format!(
            "return o == this || (o instanceof {} other && {});",
            class,
            same("other")
        )
    } else {
        format!(
            "return o == this || (o instanceof {} && {});",
            class,
            same(&format!("(({}) o)", class))
        )
    }
}

/// Collects the `@Test` methods of a test class and which assertions they use.
#[derive(Default)]
struct TestClass {
    methods: Vec<(String, Vec<String>)>,
    uses_equals: bool,
    uses_throws: bool,
}

impl TestClass {
    fn method(&mut self, name: &str, body: Vec<String>) {
        self.uses_equals |= body.iter().any(|l| l.contains("assertEquals("));
        self.uses_throws |= body.iter().any(|l| l.contains("assertThrows("));
        self.methods.push((name.to_string(), body));
    }

    fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// `None` when no test method was added.
    fn render(self, package: &str, class: &str) -> Option<JavaFile> {
        if self.is_empty() {
            return None;
        }
        let mut b = CodeBuilder::java();
        b.push_line(&format!("class {}Test {{", class));
        b.push_indent();
        for (name, body) in &self.methods {
            b.push_blank();
            push_method(&mut b, Some("@Test"), &format!("void {}()", name), body);
        }
        b.push_dedent();
        b.push_line("}");

        let mut file = JavaFile::new(package).import(JUNIT_TEST);
        if self.uses_equals {
            file = file.static_import(ASSERT_EQUALS);
        }
        if self.uses_throws {
            file = file.static_import(ASSERT_THROWS);
        }
        Some(file.body(b.build()))
    }
}

fn throws(exception: &str, expression: &str) -> String {
    format!("assertThrows({}.class, () -> {});", exception, expression)
}
