use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::{GenerationTarget, LanguageWithVersion};

/// Where a generator's output lands: a root directory, optionally qualified
/// by the target and language it was resolved for.
///
/// When neither qualifier is present the defaults apply.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    root: PathBuf,
    target: Option<GenerationTarget>,
    language: Option<LanguageWithVersion>,
}

impl Destination {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            target: None,
            language: None,
        }
    }

    pub fn with_target(mut self, target: GenerationTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_language(mut self, language: LanguageWithVersion) -> Self {
        self.language = Some(language);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn target(&self) -> Option<&GenerationTarget> {
        self.target.as_ref()
    }

    pub fn language(&self) -> Option<&LanguageWithVersion> {
        self.language.as_ref()
    }

    /// True when neither a target nor a language qualifies this destination.
    pub fn is_default(&self) -> bool {
        self.target.is_none() && self.language.is_none()
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root.display())?;
        match (&self.target, &self.language) {
            (Some(t), Some(l)) => write!(f, " ({} {})", l, t),
            (Some(t), None) => write!(f, " ({})", t),
            (None, Some(l)) => write!(f, " ({})", l),
            (None, None) => Ok(()),
        }
    }
}
