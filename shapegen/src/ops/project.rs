//! A manifest merged with command-line overrides.

use std::{path::PathBuf, sync::Arc};

use eyre::Result;
use shapegen_codegen::{DestinationMap, GenerationSession};
use shapegen_core::{GenerationSwitch, GenerationTarget, LanguageWithVersion, Settings};
use shapegen_manifest::ShapegenToml;
use shapegen_model::{Model, ShapeId};

use crate::plugins;

/// Values given on the command line. Non-empty lists replace the manifest's;
/// settings and destinations are layered on top of it.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub languages: Vec<LanguageWithVersion>,
    pub targets: Vec<GenerationTarget>,
    pub namespaces: Vec<String>,
    pub settings: Vec<(String, String)>,
    pub destinations: Vec<(String, String)>,
}

/// Engine switches requested by flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct Switches {
    pub dry_run: bool,
    pub skip_clean: bool,
    pub skip_warnings: bool,
    pub verbose: bool,
    pub debug: bool,
}

#[derive(Debug)]
pub struct Project {
    pub model: Model,
    pub languages: Vec<LanguageWithVersion>,
    pub targets: Vec<GenerationTarget>,
    pub namespaces: Vec<String>,
    pub settings: Settings,
    pub destinations: DestinationMap,
    pub output_dir: PathBuf,
}

fn replace_unless_empty<T: Clone>(manifest: &[T], overrides: Vec<T>) -> Vec<T> {
    if overrides.is_empty() {
        manifest.to_vec()
    } else {
        overrides
    }
}

impl Project {
    pub fn new(toml: &ShapegenToml, model: Model, overrides: Overrides, switches: Switches) -> Self {
        let manifest = toml.manifest();
        let output_dir = toml.output_dir();

        let settings = Settings::builder()
            .with_string_settings(manifest.string_settings())
            .with_string_settings(overrides.settings)
            .with_switch_if(switches.dry_run, GenerationSwitch::DryRun)
            .with_switch_if(switches.skip_clean, GenerationSwitch::DontCleanSourceRoots)
            .with_switch_if(switches.skip_warnings, GenerationSwitch::DontGenerateWarningFiles)
            .with_switch_if(switches.verbose, GenerationSwitch::Verbose)
            .with_switch_if(switches.debug, GenerationSwitch::Debug)
            .build();

        let mut destinations = DestinationMap::new(&output_dir);
        for (key, path) in &manifest.destinations {
            destinations.insert(key.clone(), path.clone());
        }
        for (key, path) in overrides.destinations {
            destinations.insert(key, path);
        }

        Self {
            model,
            languages: replace_unless_empty(&manifest.project.languages, overrides.languages),
            targets: replace_unless_empty(&manifest.project.targets, overrides.targets),
            namespaces: replace_unless_empty(&manifest.project.namespaces, overrides.namespaces),
            settings,
            destinations,
            output_dir,
        }
    }

    /// True if shapes in `id`'s namespace should be generated.
    pub fn includes(&self, id: &ShapeId) -> bool {
        self.namespaces.is_empty() || self.namespaces.iter().any(|ns| ns == id.namespace())
    }

    /// A session over the built-in plugins.
    pub fn session(&self) -> Result<GenerationSession> {
        GenerationSession::builder(plugins::registry())
            .languages(self.languages.iter().cloned())
            .targets(self.targets.iter().cloned())
            .settings(self.settings.clone())
            .destinations(Arc::new(self.destinations.clone()))
            .build()
    }
}
