//! Target languages and their versions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};

/// A target language name, e.g. `java` or `typescript`.
///
/// Equality is case-sensitive; use [`Language::is`] for a lenient check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Language(String);

impl Language {
    /// Create a language from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The language name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Case-insensitive name comparison.
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }

    /// Pair this language with a specific version.
    pub fn with_version(self, version: LanguageVersion) -> LanguageWithVersion {
        LanguageWithVersion::new(self, version)
    }

    /// Pair this language with the wildcard version.
    pub fn with_wildcard_version(self) -> LanguageWithVersion {
        LanguageWithVersion::new(self, LanguageVersion::ANY)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `major.minor` language version. `0.0` is the wildcard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageVersion {
    major: u64,
    minor: u64,
}

impl LanguageVersion {
    /// The wildcard version, matching any version.
    pub const ANY: LanguageVersion = LanguageVersion { major: 0, minor: 0 };

    pub const fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn is_wildcard(&self) -> bool {
        *self == Self::ANY
    }

    /// Read a version from the first two runs of digits in `value`.
    ///
    /// Missing components are zero, so `"11"` is `11.0` and `"jdk"` is the
    /// wildcard. Runs too large for a `u64` saturate.
    pub fn parse_dewey_decimal(value: &str) -> Self {
        let mut parts = value
            .split(|c: char| !c.is_ascii_digit())
            .filter(|run| !run.is_empty())
            .map(|run| run.parse::<u64>().unwrap_or(u64::MAX));
        let major = parts.next().unwrap_or(0);
        let minor = parts.next().unwrap_or(0);
        Self { major, minor }
    }

    pub fn is_equal_or_less_than(&self, other: &LanguageVersion) -> bool {
        self <= other
    }
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A language plus version, parseable from a `name-major.minor` token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct LanguageWithVersion {
    language: Language,
    version: LanguageVersion,
}

impl LanguageWithVersion {
    pub fn new(language: Language, version: LanguageVersion) -> Self {
        Self { language, version }
    }

    /// Parse a `name-version` token.
    ///
    /// The name ends at the first `-`; everything after it is read with
    /// [`LanguageVersion::parse_dewey_decimal`]. Without a `-` the wildcard
    /// version is used.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        match value.find('-') {
            Some(ix) if ix > 0 => Self::new(
                Language::new(&value[..ix]),
                LanguageVersion::parse_dewey_decimal(&value[ix + 1..]),
            ),
            _ => Language::new(value).with_wildcard_version(),
        }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn version(&self) -> LanguageVersion {
        self.version
    }

    /// Case-insensitive check of the language name.
    pub fn is_language(&self, name: &str) -> bool {
        self.language.is(name)
    }

    /// Whether a generator declaring `self` can serve a request for `requested`.
    ///
    /// Names must match exactly. A wildcard on either side matches any
    /// version; otherwise the requested version must not exceed ours.
    pub fn accepts(&self, requested: &LanguageWithVersion) -> bool {
        self.language == requested.language
            && (self.version.is_wildcard()
                || requested.version.is_wildcard()
                || requested.version.is_equal_or_less_than(&self.version))
    }
}

impl fmt::Display for LanguageWithVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.language, self.version)
    }
}

impl FromStr for LanguageWithVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.starts_with('-') {
            return Err(format!(
                "invalid language '{}', expected 'name' or 'name-major.minor'",
                s
            ));
        }
        Ok(Self::parse(trimmed))
    }
}

impl TryFrom<String> for LanguageWithVersion {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Serialize for LanguageWithVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
