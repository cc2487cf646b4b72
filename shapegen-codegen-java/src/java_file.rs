//! A Java compilation unit: package, imports and one top-level type.

use std::{collections::BTreeSet, path::PathBuf};

use shapegen_core::SourceFile;

/// Renders as
///
/// ```text
/// package <package>;
///
/// import static <static imports>;
///
/// import <imports>;
///
/// <body>
/// ```
///
/// Imports are sorted. Imports from `java.lang` and from the file's own
/// package are dropped.
#[derive(Debug, Clone, Default)]
pub struct JavaFile {
    package: String,
    imports: BTreeSet<String>,
    static_imports: BTreeSet<String>,
    body: String,
}

impl JavaFile {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Self::default()
        }
    }

    pub fn import(mut self, qualified: impl Into<String>) -> Self {
        self.add_import(qualified);
        self
    }

    pub fn add_import(&mut self, qualified: impl Into<String>) {
        let qualified = qualified.into();
        if !self.is_implicit(&qualified) {
            self.imports.insert(qualified);
        }
    }

    pub fn static_import(mut self, member: impl Into<String>) -> Self {
        self.static_imports.insert(member.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    fn is_implicit(&self, qualified: &str) -> bool {
        match qualified.rsplit_once('.') {
            Some((package, _)) => package == "java.lang" || package == self.package,
            None => true,
        }
    }

    pub fn render(&self) -> String {
        let mut out = format!("package {};\n\n", self.package);
        if !self.static_imports.is_empty() {
            for member in &self.static_imports {
                out.push_str(&format!("import static {};\n", member));
            }
            out.push('\n');
        }
        if !self.imports.is_empty() {
            for import in &self.imports {
                out.push_str(&format!("import {};\n", import));
            }
            out.push('\n');
        }
        out.push_str(&self.body);
        out
    }

    pub fn into_source(self, destination: PathBuf) -> SourceFile {
        SourceFile::new(destination, self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_sorts_and_filters_imports() {
        let file = JavaFile::new("com.example.model")
            .import("java.util.Objects")
            .import("java.io.Serializable")
            .import("java.lang.String")
            .import("com.example.model.Name")
            .import("com.other.model.Id")
            .body("class A {}\n");

        assert_eq!(
            file.render(),
            "package com.example.model;\n\n\
             import com.other.model.Id;\n\
             import java.io.Serializable;\n\
             import java.util.Objects;\n\n\
             class A {}\n"
        );
    }

    #[test]
    fn test_render_static_imports_first() {
        let file = JavaFile::new("p")
            .static_import("org.junit.jupiter.api.Assertions.assertEquals")
            .import("org.junit.jupiter.api.Test")
            .body("class T {}\n");
        assert_eq!(
            file.render(),
            "package p;\n\n\
             import static org.junit.jupiter.api.Assertions.assertEquals;\n\n\
             import org.junit.jupiter.api.Test;\n\n\
             class T {}\n"
        );
    }

    #[test]
    fn test_render_without_imports() {
        let file = JavaFile::new("p").body("enum E {}\n");
        assert_eq!(file.render(), "package p;\n\nenum E {}\n");
    }
}
