//! ModuleFile: one generated `.ts` module.
//!
//! Organizes a module into imports followed by body sections, each section
//! separated by a blank line.

use shapegen_codegen::builder::CodeBuilder;

use crate::ast::Import;

#[derive(Debug, Clone, Default)]
pub struct ModuleFile {
    imports: Vec<Import>,
    sections: Vec<String>,
}

impl ModuleFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn import(mut self, import: Import) -> Self {
        self.imports.push(import);
        self
    }

    pub fn imports(mut self, imports: impl IntoIterator<Item = Import>) -> Self {
        self.imports.extend(imports);
        self
    }

    /// Add rendered code as its own section.
    pub fn section(mut self, code: impl Into<String>) -> Self {
        self.sections.push(code.into());
        self
    }

    /// Imports are sorted by module path.
    pub fn render(&self) -> String {
        let mut builder = CodeBuilder::typescript();
        let mut imports = self.imports.clone();
        imports.sort_by(|a, b| a.from().cmp(b.from()));
        for import in &imports {
            builder = import.render(builder);
        }
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 || !imports.is_empty() {
                builder.push_blank();
            }
            builder.push_raw(section);
        }
        builder.build()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.sections.is_empty()
    }
}
