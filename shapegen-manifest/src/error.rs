use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for manifest operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Carries the source content and filename so error factories don't need
/// both threaded through every call.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a parse error from a toml error.
    pub fn parse_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            src: self.named_source(),
            span,
            source,
        })
    }

    /// Create a validation error, pointing at `needle` when it can be found.
    pub fn validation_error(&self, message: impl Into<String>, needle: Option<&str>) -> Box<Error> {
        Box::new(Error::Validation {
            src: self.named_source(),
            span: needle.and_then(|n| find_key_span(&self.src, n)),
            message: message.into(),
        })
    }

    pub fn unknown_shape_type(&self, shape: &str, ty: &str) -> Box<Error> {
        Box::new(Error::UnknownShapeType {
            src: self.named_source(),
            span: find_value_span(&self.src, ty),
            shape: shape.to_string(),
            ty: ty.to_string(),
        })
    }

    pub fn unresolved_target(&self, shape: &str, target: &str) -> Box<Error> {
        Box::new(Error::UnresolvedTarget {
            src: self.named_source(),
            span: find_value_span(&self.src, target),
            shape: shape.to_string(),
            target: target.to_string(),
        })
    }

    pub fn duplicate_shape(&self, id: &str, name: &str) -> Box<Error> {
        Box::new(Error::DuplicateShape {
            src: self.named_source(),
            span: find_key_span(&self.src, name),
            id: id.to_string(),
        })
    }
}

/// Span of a TOML key such as `[shapes.Name]` or `Name = ...`.
pub(crate) fn find_key_span(src: &str, name: &str) -> Option<SourceSpan> {
    let patterns = [
        format!(".{}]", name),
        format!(".{}.", name),
        format!("{} =", name),
        format!("{}=", name),
    ];
    for pattern in &patterns {
        if let Some(pos) = src.find(pattern.as_str()) {
            let start = if pattern.starts_with('.') { pos + 1 } else { pos };
            return Some(SourceSpan::from((start, name.len())));
        }
    }
    src.find(name).map(|pos| SourceSpan::from((pos, name.len())))
}

/// Span of a quoted string value.
pub(crate) fn find_value_span(src: &str, value: &str) -> Option<SourceSpan> {
    let quoted = format!("\"{}\"", value);
    src.find(&quoted)
        .map(|pos| SourceSpan::from((pos + 1, value.len())))
        .or_else(|| find_key_span(src, value))
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(help("run from a directory containing shapegen.toml or pass --manifest"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML")]
    #[diagnostic(code(shapegen::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(shapegen::validation_error))]
    Validation {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("unknown shape type '{ty}' for '{shape}'")]
    #[diagnostic(
        code(shapegen::unknown_type),
        help(
            "valid types are: structure, union, enum, intEnum, list, map, string, integer, long, short, byte, float, double, bigInteger, bigDecimal, boolean, blob, timestamp, document, service, operation, resource"
        )
    )]
    UnknownShapeType {
        #[source_code]
        src: NamedSource<String>,
        #[label("unknown type")]
        span: Option<SourceSpan>,
        shape: String,
        ty: String,
    },

    #[error("'{shape}' refers to unknown shape '{target}'")]
    #[diagnostic(
        code(shapegen::unresolved_target),
        help("declare the shape, use an absolute id like 'com.example#Name', or a prelude shape such as 'String'")
    )]
    UnresolvedTarget {
        #[source_code]
        src: NamedSource<String>,
        #[label("not found")]
        span: Option<SourceSpan>,
        shape: String,
        target: String,
    },

    #[error("shape '{id}' is declared more than once")]
    #[diagnostic(code(shapegen::duplicate_shape))]
    DuplicateShape {
        #[source_code]
        src: NamedSource<String>,
        #[label("declared again here")]
        span: Option<SourceSpan>,
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_key_span() {
        let src = "namespace = \"a\"\n[shapes.Percent]\ntype = \"integer\"\n";
        let span = find_key_span(src, "Percent").unwrap();
        assert_eq!(&src[span.offset()..span.offset() + span.len()], "Percent");
    }

    #[test]
    fn test_find_value_span() {
        let src = "[shapes.X]\ntype = \"integr\"\n";
        let span = find_value_span(src, "integr").unwrap();
        assert_eq!(&src[span.offset()..span.offset() + span.len()], "integr");
    }
}
