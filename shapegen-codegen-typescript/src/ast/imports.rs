//! TypeScript import builder.

use shapegen_codegen::builder::CodeBuilder;

/// Builder for `import { ... } from "..."` statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    from: String,
    named: Vec<String>,
    type_only: bool,
}

impl Import {
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            named: Vec::new(),
            type_only: false,
        }
    }

    /// Import a named export. Repeated names are ignored.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.named.contains(&name) {
            self.named.push(name);
        }
        self
    }

    /// Make this a type-only import (`import type { ... }`).
    pub fn type_only(mut self) -> Self {
        self.type_only = true;
        self
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn render(&self, builder: CodeBuilder) -> CodeBuilder {
        let type_kw = if self.type_only { "type " } else { "" };
        let line = if self.named.is_empty() {
            format!("import \"{}\";", self.from)
        } else {
            format!(
                "import {}{{ {} }} from \"{}\";",
                type_kw,
                self.named.join(", "),
                self.from
            )
        };
        builder.line(&line)
    }

    pub fn build(&self) -> String {
        self.render(CodeBuilder::typescript()).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_import() {
        let i = Import::new("./utils").named("foo").named("bar").build();
        assert_eq!(i, "import { foo, bar } from \"./utils\";\n");
    }

    #[test]
    fn test_type_only_import() {
        let i = Import::new("./name").named("Name").type_only().build();
        assert_eq!(i, "import type { Name } from \"./name\";\n");
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let i = Import::new("./color").named("Color").named("Color").build();
        assert_eq!(i, "import { Color } from \"./color\";\n");
    }

    #[test]
    fn test_side_effect_import() {
        let i = Import::new("./polyfill").build();
        assert_eq!(i, "import \"./polyfill\";\n");
    }
}
