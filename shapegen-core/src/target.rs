//! Generation targets - named output categories independent of language.

use std::{borrow::Cow, fmt, str::FromStr};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize, Serializer};

/// A named kind of output, such as `model` or `client`.
///
/// Targets compare by name. The built-in targets are constants; any other
/// name makes a custom target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct GenerationTarget(Cow<'static, str>);

impl GenerationTarget {
    pub const MODEL: GenerationTarget = GenerationTarget::from_static("model");
    pub const SERVER: GenerationTarget = GenerationTarget::from_static("server");
    pub const SERVER_SPI: GenerationTarget = GenerationTarget::from_static("server-spi");
    pub const CLIENT: GenerationTarget = GenerationTarget::from_static("client");
    pub const MODEL_TEST: GenerationTarget = GenerationTarget::from_static("modeltest");
    pub const DOCS: GenerationTarget = GenerationTarget::from_static("docs");

    const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Create a target from an arbitrary (trimmed) name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.len() == name.len() {
            Self(Cow::Owned(name))
        } else {
            Self(Cow::Owned(trimmed.to_string()))
        }
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// The default set of targets generated when none are requested.
    pub fn builtin() -> IndexSet<GenerationTarget> {
        [Self::MODEL, Self::SERVER, Self::CLIENT, Self::MODEL_TEST]
            .into_iter()
            .collect()
    }

    /// Build a target set from names.
    pub fn targets<I, S>(names: I) -> IndexSet<GenerationTarget>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(GenerationTarget::new).collect()
    }

    /// Targets present in both `a` and `b`, in the order of `a`.
    pub fn intersection<'a>(
        a: impl IntoIterator<Item = &'a GenerationTarget>,
        b: &IndexSet<GenerationTarget>,
    ) -> IndexSet<GenerationTarget> {
        a.into_iter().filter(|t| b.contains(*t)).cloned().collect()
    }
}

impl fmt::Display for GenerationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GenerationTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err("generation target name must not be empty".to_string());
        }
        Ok(Self::new(s))
    }
}

impl TryFrom<String> for GenerationTarget {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Serialize for GenerationTarget {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}
