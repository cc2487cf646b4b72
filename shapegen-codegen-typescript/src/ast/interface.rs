//! TypeScript interface builder.

use shapegen_codegen::builder::CodeBuilder;

/// A property of an interface.
#[derive(Debug, Clone)]
pub struct InterfaceField {
    pub name: String,
    pub ty: String,
    pub optional: bool,
    pub readonly: bool,
}

impl InterfaceField {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            optional: false,
            readonly: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }
}

/// Builder for exported interfaces.
#[derive(Debug, Clone)]
pub struct Interface {
    name: String,
    doc: Option<String>,
    fields: Vec<InterfaceField>,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            fields: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: Option<&str>) -> Self {
        self.doc = doc.map(str::to_string);
        self
    }

    pub fn field_with(mut self, field: InterfaceField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn render(&self, builder: CodeBuilder) -> CodeBuilder {
        let builder = match &self.doc {
            Some(doc) => builder.doc_comment(doc),
            None => builder,
        };
        if self.fields.is_empty() {
            return builder.line(&format!("export interface {} {{}}", self.name));
        }
        builder
            .block_with_close(&format!("export interface {} {{", self.name), "}", |b| {
                b.each(&self.fields, |b, field| {
                    let readonly = if field.readonly { "readonly " } else { "" };
                    let optional = if field.optional { "?" } else { "" };
                    b.line(&format!(
                        "{}{}{}: {};",
                        readonly, field.name, optional, field.ty
                    ))
                })
            })
    }

    pub fn build(&self) -> String {
        self.render(CodeBuilder::typescript()).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_interface() {
        assert_eq!(Interface::new("Empty").build(), "export interface Empty {}\n");
    }

    #[test]
    fn test_readonly_and_optional_fields() {
        let i = Interface::new("Person")
            .field_with(InterfaceField::new("name", "Name").readonly())
            .field_with(InterfaceField::new("age", "Percent").readonly().optional())
            .build();
        assert_eq!(
            i,
            "export interface Person {\n  readonly name: Name;\n  readonly age?: Percent;\n}\n"
        );
    }

    #[test]
    fn test_doc_comment() {
        let i = Interface::new("Point").doc(Some("A point.")).build();
        assert_eq!(i, "/** A point. */\nexport interface Point {}\n");
    }
}
