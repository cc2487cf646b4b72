//! The `shapegen.toml` project manifest.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use indexmap::IndexMap;
use serde::Deserialize;
use shapegen_core::{GenerationTarget, LanguageWithVersion};
use shapegen_model::{Model, ShapeId};
use walkdir::WalkDir;

use crate::{Error, ModelLoader, Result, error::SourceContext, model_file::MODEL_FILE_SUFFIX};

/// Default manifest filename.
pub const MANIFEST_FILE: &str = "shapegen.toml";

/// Root schema for shapegen.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub project: ProjectConfig,

    /// Free-form string settings handed to generators.
    #[serde(default)]
    pub settings: IndexMap<String, toml::Value>,

    /// Destination map entries (`"java.model" = "src/main/java"`).
    #[serde(default)]
    pub destinations: IndexMap<String, PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Model files or directories scanned for `*.shapes.toml`.
    #[serde(default)]
    pub models: Vec<PathBuf>,

    /// Namespaces to generate; empty means every non-prelude namespace.
    #[serde(default)]
    pub namespaces: Vec<String>,

    #[serde(default)]
    pub languages: Vec<LanguageWithVersion>,

    #[serde(default)]
    pub targets: Vec<GenerationTarget>,

    /// Base directory for relative destinations. Defaults to the manifest's
    /// directory.
    pub output: Option<PathBuf>,
}

/// Convert a TOML value to its string representation
pub fn toml_value_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

impl Manifest {
    /// Settings flattened to strings, in declaration order.
    pub fn string_settings(&self) -> IndexMap<String, String> {
        self.settings
            .iter()
            .filter_map(|(k, v)| toml_value_to_string(v).map(|v| (k.clone(), v)))
            .collect()
    }
}

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_manifest(s, MANIFEST_FILE)
    }
}

/// Parse a manifest from content with the given filename for error reporting.
pub fn parse_manifest(content: &str, filename: &str) -> Result<Manifest> {
    let ctx = SourceContext::new(content, filename);
    let manifest: Manifest = toml::from_str(content).map_err(|e| ctx.parse_error(e))?;
    validate_manifest(&manifest, &ctx)?;
    Ok(manifest)
}

fn validate_manifest(manifest: &Manifest, ctx: &SourceContext) -> Result<()> {
    for namespace in &manifest.project.namespaces {
        if format!("{}#X", namespace).parse::<ShapeId>().is_err() {
            return Err(ctx.validation_error(
                format!("invalid namespace '{}'", namespace),
                Some(namespace),
            ));
        }
    }
    for (key, value) in &manifest.settings {
        if toml_value_to_string(value).is_none() {
            return Err(ctx.validation_error(
                format!("setting '{}' must be a string, number or boolean", key),
                Some(key),
            ));
        }
    }
    for key in manifest.destinations.keys() {
        if key.trim().is_empty() || key.split('.').any(str::is_empty) {
            return Err(ctx.validation_error(
                format!("invalid destination key '{}'", key),
                Some(key),
            ));
        }
    }
    Ok(())
}

/// A shapegen.toml file with both raw content and parsed manifest.
#[derive(Debug)]
pub struct ShapegenToml {
    path: PathBuf,
    content: String,
    manifest: Manifest,
}

impl ShapegenToml {
    /// Open and parse a shapegen.toml file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(Error::Io {
                path: path.clone(),
                source: e,
            })
        })?;
        let manifest = parse_manifest(&content, &path.display().to_string())?;
        Ok(Self {
            path,
            content,
            manifest,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Directory containing the manifest.
    pub fn root_dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    /// Base directory for relative destinations.
    pub fn output_dir(&self) -> PathBuf {
        match &self.manifest.project.output {
            Some(output) if output.is_absolute() => output.clone(),
            Some(output) => self.root_dir().join(output),
            None => self.root_dir().to_path_buf(),
        }
    }

    /// Model files named by `project.models`, with directories expanded to
    /// their `*.shapes.toml` files in sorted order.
    pub fn model_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in &self.manifest.project.models {
            let path = self.root_dir().join(entry);
            if path.is_dir() {
                let mut found: Vec<PathBuf> = WalkDir::new(&path)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                    .map(|e| e.into_path())
                    .filter(|p| {
                        p.file_name()
                            .and_then(|n| n.to_str())
                            .is_some_and(|n| n.ends_with(MODEL_FILE_SUFFIX))
                    })
                    .collect();
                files.append(&mut found);
            } else if path.is_file() {
                files.push(path);
            } else {
                return Err(Box::new(Error::Io {
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "model path does not exist",
                    ),
                    path,
                }));
            }
        }
        Ok(files)
    }

    /// Load every model file into one model.
    pub fn load_model(&self) -> Result<Model> {
        let mut loader = ModelLoader::new();
        for file in self.model_files()? {
            loader.add_file(file)?;
        }
        loader.finish()
    }
}
