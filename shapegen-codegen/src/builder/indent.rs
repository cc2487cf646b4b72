//! Indentation configuration for generated source.

/// Indentation style for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    /// Spaces with the specified width.
    Spaces(u8),
    Tab,
}

impl Indent {
    /// 4-space indentation (Java).
    pub const JAVA: Self = Self::Spaces(4);

    /// 2-space indentation (TypeScript, JavaScript, JSON).
    pub const TYPESCRIPT: Self = Self::Spaces(2);

    /// One indent level as text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spaces(2) => "  ",
            Self::Spaces(4) => "    ",
            Self::Spaces(8) => "        ",
            // Fallback to 4 whitespaces
            Self::Spaces(_) => "    ",
            Self::Tab => "\t",
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::JAVA
    }
}
