//! Mapping (target, shape, language) to a destination root.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use shapegen_core::{GenerationTarget, LanguageWithVersion, Settings};
use shapegen_model::Shape;

/// Decides which directory a generator's output for one shape lands in.
///
/// The session records every root it resolves; nothing is ever written
/// outside those roots.
pub trait DestinationResolver: Send + Sync {
    fn resolve(
        &self,
        target: &GenerationTarget,
        shape: &Shape,
        language: &LanguageWithVersion,
        settings: &Settings,
    ) -> PathBuf;
}

impl<F> DestinationResolver for F
where
    F: Fn(&GenerationTarget, &Shape, &LanguageWithVersion, &Settings) -> PathBuf + Send + Sync,
{
    fn resolve(
        &self,
        target: &GenerationTarget,
        shape: &Shape,
        language: &LanguageWithVersion,
        settings: &Settings,
    ) -> PathBuf {
        self(target, shape, language, settings)
    }
}

/// Default root when no map entry matches.
pub const DEFAULT_DESTINATION: &str = "target/generated-sources/shapegen";

/// A resolver backed by dot-separated keys tried from most to least specific:
///
/// 1. `lang.version.target.kind`
/// 2. `lang.target.kind`
/// 3. `lang.target`
/// 4. `target.kind`
/// 5. `target`
///
/// `kind` is `server` for service, operation and resource shapes and `model`
/// for everything else. Relative entries resolve against the base directory.
#[derive(Debug, Clone, Default)]
pub struct DestinationMap {
    base: PathBuf,
    entries: IndexMap<String, PathBuf>,
}

impl DestinationMap {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            entries: IndexMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.insert(key, path);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) {
        self.entries.insert(key.into(), path.into());
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    /// Candidate keys for a lookup, most specific first.
    pub fn keys_for(
        target: &GenerationTarget,
        shape: &Shape,
        language: &LanguageWithVersion,
    ) -> [String; 5] {
        let kind = if shape.kind().is_service_like() {
            "server"
        } else {
            "model"
        };
        let lang = language.language().name();
        [
            format!("{}.{}.{}.{}", lang, language.version(), target, kind),
            format!("{}.{}.{}", lang, target, kind),
            format!("{}.{}", lang, target),
            format!("{}.{}", target, kind),
            target.to_string(),
        ]
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        }
    }
}

impl DestinationResolver for DestinationMap {
    fn resolve(
        &self,
        target: &GenerationTarget,
        shape: &Shape,
        language: &LanguageWithVersion,
        _settings: &Settings,
    ) -> PathBuf {
        for key in Self::keys_for(target, shape, language) {
            if let Some(path) = self.entries.get(&key) {
                tracing::debug!(
                    "destination '{}' for key '{}' ({})",
                    path.display(),
                    key,
                    shape.id()
                );
                return self.absolute(path);
            }
        }
        if *target == GenerationTarget::MODEL_TEST {
            return self
                .base
                .join("src")
                .join("test")
                .join(language.language().name());
        }
        self.base.join(DEFAULT_DESTINATION)
    }
}

impl fmt::Display for DestinationMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base.display())?;
        for (key, path) in &self.entries {
            write!(f, "\n  {} = {}", key, path.display())?;
        }
        Ok(())
    }
}
