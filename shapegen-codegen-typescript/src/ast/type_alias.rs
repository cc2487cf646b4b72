//! `export type Name = ...;`

use shapegen_codegen::builder::CodeBuilder;

#[derive(Debug, Clone)]
pub struct TypeAlias {
    name: String,
    doc: Option<String>,
    ty: String,
}

impl TypeAlias {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            ty: ty.into(),
        }
    }

    pub fn doc(mut self, doc: Option<&str>) -> Self {
        self.doc = doc.map(str::to_string);
        self
    }

    pub fn render(&self, builder: CodeBuilder) -> CodeBuilder {
        let builder = match &self.doc {
            Some(doc) => builder.doc_comment(doc),
            None => builder,
        };
        builder.line(&format!("export type {} = {};", self.name, self.ty))
    }

    pub fn build(&self) -> String {
        self.render(CodeBuilder::typescript()).build()
    }
}
