//! Language features available at the requested Java version.

use shapegen_core::LanguageWithVersion;

/// Version assumed when the language is requested without one.
pub const BASELINE_VERSION: u64 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JavaFeatures {
    /// `o instanceof Foo other` (Java 16).
    pub pattern_matching: bool,
    /// `String.repeat` (Java 11).
    pub string_repeat: bool,
}

impl JavaFeatures {
    pub fn of(language: &LanguageWithVersion) -> Self {
        let version = language.version();
        let major = if version.is_wildcard() {
            BASELINE_VERSION
        } else {
            version.major()
        };
        Self {
            pattern_matching: major >= 16,
            string_repeat: major >= 11,
        }
    }
}
