//! Test utilities for generator plugins and the engine.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::{
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

use eyre::Result;
use shapegen_core::{
    GenerationLogger, GenerationTarget, LanguageWithVersion, Level, LogSink, Settings, SourceFile,
};
use shapegen_model::{EnumValue, Model, Shape, ShapeId, ShapeKind, Traits};
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::{
    DestinationResolver, GeneratedCode, GenerationContext, ModelElementGenerator, Problems,
    ShapeGenerator, ShapeRequest,
};

/// A log sink that keeps every message for later inspection.
#[derive(Clone, Default)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<(Level, String)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A logger writing into this sink.
    pub fn logger(&self) -> GenerationLogger {
        GenerationLogger::new(self.clone())
    }

    pub fn records(&self) -> Vec<(Level, String)> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages logged at `level`, in order.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    /// True if a message at `level` contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages(level).iter().any(|m| m.contains(needle))
    }
}

impl LogSink for RecordingSink {
    fn log(&self, level: Level, message: &str) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}

/// Counters shared between a [`FakeGenerator`] and the test holding it.
#[derive(Debug, Default)]
pub struct FakeStats {
    prepare_calls: AtomicUsize,
    element_prepare_calls: AtomicUsize,
    generate_calls: AtomicUsize,
    generated: Mutex<Vec<String>>,
}

impl FakeStats {
    /// Calls to the plugin-level `prepare` hook.
    pub fn prepare_calls(&self) -> usize {
        self.prepare_calls.load(Ordering::SeqCst)
    }

    /// Calls to `ModelElementGenerator::prepare`.
    pub fn element_prepare_calls(&self) -> usize {
        self.element_prepare_calls.load(Ordering::SeqCst)
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    /// `plugin:ShapeName` for every element generated, in order.
    pub fn generated(&self) -> Vec<String> {
        self.generated
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubsortMode {
    Keep,
    Reverse,
    Invalid,
}

/// A configurable generator writing one text file per shape.
///
/// Files land at `<destination>/<plugin>-<ShapeName>.txt` and contain the
/// plugin name, shape id, target and language.
pub struct FakeGenerator {
    name: String,
    targets: Vec<GenerationTarget>,
    languages: Vec<LanguageWithVersion>,
    global_fatal: Option<String>,
    fatal_shapes: Vec<String>,
    escaping_shapes: Vec<String>,
    subsort: SubsortMode,
    stats: Arc<FakeStats>,
}

impl FakeGenerator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            targets: Vec::new(),
            languages: Vec::new(),
            global_fatal: None,
            fatal_shapes: Vec::new(),
            escaping_shapes: Vec::new(),
            subsort: SubsortMode::Keep,
            stats: Arc::default(),
        }
    }

    /// Support a language token such as `java` or `java-11`.
    pub fn language(mut self, token: &str) -> Self {
        self.languages.push(LanguageWithVersion::parse(token));
        self
    }

    pub fn target(mut self, target: GenerationTarget) -> Self {
        self.targets.push(target);
        self
    }

    /// Record a fatal problem from the plugin-level prepare hook.
    pub fn fatal_in_prepare(mut self, message: impl Into<String>) -> Self {
        self.global_fatal = Some(message.into());
        self
    }

    /// Record a fatal problem when preparing the element for `shape_name`.
    pub fn fatal_on(mut self, shape_name: impl Into<String>) -> Self {
        self.fatal_shapes.push(shape_name.into());
        self
    }

    /// Write the file for `shape_name` two levels above its destination.
    pub fn escape_on(mut self, shape_name: impl Into<String>) -> Self {
        self.escaping_shapes.push(shape_name.into());
        self
    }

    /// Ask for this plugin's generators in reverse order.
    pub fn reverse_subsort(mut self) -> Self {
        self.subsort = SubsortMode::Reverse;
        self
    }

    /// Return a subsort that is not a permutation.
    pub fn invalid_subsort(mut self) -> Self {
        self.subsort = SubsortMode::Invalid;
        self
    }

    pub fn stats(&self) -> Arc<FakeStats> {
        Arc::clone(&self.stats)
    }
}

impl ShapeGenerator for FakeGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_targets(&self) -> Vec<GenerationTarget> {
        self.targets.clone()
    }

    fn supported_languages(&self) -> Vec<LanguageWithVersion> {
        self.languages.clone()
    }

    fn prepare(&self, _: &Model, _: &GenerationContext, problems: &mut Problems) -> Result<()> {
        self.stats.prepare_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.global_fatal {
            problems.fatal(None, message.clone());
        }
        Ok(())
    }

    fn generators_for(
        &self,
        request: &ShapeRequest<'_>,
    ) -> Result<Vec<Box<dyn ModelElementGenerator>>> {
        let shape = request.shape.id();
        let file_name = format!("{}-{}.txt", self.name, shape.name());
        let destination = if self.escaping_shapes.iter().any(|s| s == shape.name()) {
            request.destination.join("..").join("..").join("escaped").join(file_name)
        } else {
            request.destination.join(file_name)
        };
        Ok(vec![Box::new(FakeElement {
            plugin: self.name.clone(),
            shape: shape.clone(),
            destination,
            content: format!(
                "{} {} {} {}\n",
                self.name, shape, request.target, request.language
            ),
            fatal: self.fatal_shapes.iter().any(|s| s == shape.name()),
            stats: Arc::clone(&self.stats),
        })])
    }

    fn subsort(
        &self,
        _: &Model,
        generators: &[&dyn ModelElementGenerator],
    ) -> Option<Vec<usize>> {
        match self.subsort {
            SubsortMode::Keep => None,
            SubsortMode::Reverse => Some((0..generators.len()).rev().collect()),
            SubsortMode::Invalid => Some(vec![generators.len()]),
        }
    }
}

struct FakeElement {
    plugin: String,
    shape: ShapeId,
    destination: PathBuf,
    content: String,
    fatal: bool,
    stats: Arc<FakeStats>,
}

impl ModelElementGenerator for FakeElement {
    fn shape(&self) -> &ShapeId {
        &self.shape
    }

    fn prepare(
        &mut self,
        _: &GenerationTarget,
        _: &Model,
        _: &GenerationContext,
        problems: &mut Problems,
    ) -> Result<()> {
        self.stats.element_prepare_calls.fetch_add(1, Ordering::SeqCst);
        if self.fatal {
            problems.fatal(
                Some(&self.shape),
                format!("{} cannot handle", self.plugin),
            );
        }
        Ok(())
    }

    fn generate(
        &self,
        _: &GenerationContext,
        logger: &GenerationLogger,
    ) -> Result<Vec<Box<dyn GeneratedCode>>> {
        self.stats.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.stats
            .generated
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{}:{}", self.plugin, self.shape.name()));
        logger.info(format!("generating {}", self.destination.display()));
        Ok(vec![Box::new(SourceFile::new(
            self.destination.clone(),
            self.content.clone(),
        ))])
    }
}

/// A resolver placing output under `<base>/<language>/<target>`.
pub fn fake_resolver(base: impl Into<PathBuf>) -> Arc<dyn DestinationResolver> {
    let base = base.into();
    Arc::new(
        move |target: &GenerationTarget,
              _: &Shape,
              language: &LanguageWithVersion,
              _: &Settings| { base.join(language.language().name()).join(target.name()) },
    )
}

/// A temporary directory to generate into.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// [`fake_resolver`] rooted at this workspace.
    pub fn resolver(&self) -> Arc<dyn DestinationResolver> {
        fake_resolver(self.root())
    }

    pub fn snapshot(&self) -> Vec<(String, String)> {
        snapshot_dir(self.root())
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Every entry under `root` as `(relative path, contents)`, sorted by path.
/// Directories end in `/` and have empty contents.
pub fn snapshot_dir(root: &Path) -> Vec<(String, String)> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            if entry.file_type().is_dir() {
                (format!("{}/", relative), String::new())
            } else {
                let content = std::fs::read(entry.path())
                    .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                    .unwrap_or_default();
                (relative, content)
            }
        })
        .collect()
}

/// A small model in `com.example`:
///
/// - `Percent`: integer, range 0..=100
/// - `Name`: string, length 1..=64
/// - `Color`: enum RED, GREEN
/// - `Person`: structure with a required `name: Name` and `age: Percent`
pub fn sample_model() -> Model {
    const NS: &str = "com.example";
    let mut model = Model::new();
    model.insert(
        Shape::new(ShapeId::new(NS, "Percent"), ShapeKind::Integer)
            .with_traits(Traits::default().with_range(Some(0.0), Some(100.0))),
    );
    model.insert(
        Shape::new(ShapeId::new(NS, "Name"), ShapeKind::String)
            .with_traits(Traits::default().with_length(Some(1), Some(64))),
    );
    model.insert(Shape::new(
        ShapeId::new(NS, "Color"),
        ShapeKind::Enum {
            values: vec![
                EnumValue {
                    name: "RED".into(),
                    value: "red".into(),
                },
                EnumValue {
                    name: "GREEN".into(),
                    value: "green".into(),
                },
            ],
        },
    ));
    let person = ShapeId::new(NS, "Person");
    model.insert(Shape::new(
        person.clone(),
        ShapeKind::Structure { members: vec![] },
    ));
    model
        .add_member(
            &person,
            "name",
            ShapeId::new(NS, "Name"),
            Traits::default().required(),
        )
        .expect("Person is a structure");
    model
        .add_member(&person, "age", ShapeId::new(NS, "Percent"), Traits::default())
        .expect("Person is a structure");
    model
}
