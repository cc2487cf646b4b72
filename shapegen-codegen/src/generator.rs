//! The traits generator plugins implement.
//!
//! A [`ShapeGenerator`] is the discoverable unit: it declares which targets
//! and languages it supports and, for each shape the session visits, hands
//! back zero or more [`ModelElementGenerator`]s. Those produce
//! [`GeneratedCode`], which stays in memory until the results are committed.

use std::{fmt, path::Path};

use eyre::Result;
use shapegen_core::{
    GenerationLogger, GenerationTarget, LanguageWithVersion, Settings, SourceFile,
};
use shapegen_model::{Model, Shape, ShapeId};

use crate::{GenerationContext, Problems};

/// An in-memory artifact bound to an absolute destination.
pub trait GeneratedCode: Send + fmt::Debug {
    fn destination(&self) -> &Path;

    /// Write the artifact. With `dry_run` set nothing touches the disk.
    fn write(&self, dry_run: bool) -> Result<()>;
}

impl GeneratedCode for SourceFile {
    fn destination(&self) -> &Path {
        SourceFile::destination(self)
    }

    fn write(&self, dry_run: bool) -> Result<()> {
        SourceFile::write(self, dry_run).map(|_| ())
    }
}

/// Produces the code for one (shape, target, language) combination.
pub trait ModelElementGenerator: Send {
    /// The shape this generator was created for.
    fn shape(&self) -> &ShapeId;

    /// Called once, right after the generator is created and before any
    /// generator runs. Fatal problems recorded here abort the session.
    #[allow(unused_variables)]
    fn prepare(
        &mut self,
        target: &GenerationTarget,
        model: &Model,
        ctx: &GenerationContext,
        problems: &mut Problems,
    ) -> Result<()> {
        Ok(())
    }

    fn generate(
        &self,
        ctx: &GenerationContext,
        logger: &GenerationLogger,
    ) -> Result<Vec<Box<dyn GeneratedCode>>>;
}

/// Everything a plugin gets to see when asked for generators for one shape.
#[derive(Clone, Copy)]
pub struct ShapeRequest<'a> {
    pub shape: &'a Shape,
    pub model: &'a Model,
    /// The resolved destination root for this shape, target and language.
    pub destination: &'a Path,
    pub target: &'a GenerationTarget,
    pub language: &'a LanguageWithVersion,
    pub settings: &'a Settings,
    pub logger: &'a GenerationLogger,
}

/// A generator plugin.
///
/// # Example
///
/// ```ignore
/// struct Docs;
///
/// impl ShapeGenerator for Docs {
///     fn name(&self) -> &str { "docs" }
///     fn supported_targets(&self) -> Vec<GenerationTarget> { vec![GenerationTarget::DOCS] }
///     fn supported_languages(&self) -> Vec<LanguageWithVersion> {
///         vec![LanguageWithVersion::parse("markdown")]
///     }
///     fn generators_for(&self, request: &ShapeRequest<'_>)
///         -> Result<Vec<Box<dyn ModelElementGenerator>>> {
///         Ok(vec![])
///     }
/// }
/// ```
pub trait ShapeGenerator: Send + Sync {
    /// The name of this plugin, used in logs and by `shapegen list`.
    fn name(&self) -> &str;

    fn supported_targets(&self) -> Vec<GenerationTarget>;

    fn supported_languages(&self) -> Vec<LanguageWithVersion>;

    fn supports_target(&self, target: &GenerationTarget) -> bool {
        self.supported_targets().contains(target)
    }

    /// True if any supported language accepts `language` (same name, and a
    /// wildcard or equal-or-older version).
    fn supports_language(&self, language: &LanguageWithVersion) -> bool {
        self.supported_languages()
            .iter()
            .any(|supported| supported.accepts(language))
    }

    /// Global hook. The session calls it once before traversing shapes and
    /// once more the first time the plugin meets a shape, so implementations
    /// must tolerate repeated calls.
    #[allow(unused_variables)]
    fn prepare(&self, model: &Model, ctx: &GenerationContext, problems: &mut Problems) -> Result<()> {
        Ok(())
    }

    fn generators_for(
        &self,
        request: &ShapeRequest<'_>,
    ) -> Result<Vec<Box<dyn ModelElementGenerator>>>;

    /// Reorder this plugin's own generators.
    ///
    /// `generators` holds every generator this plugin contributed, in
    /// generation order. Return `Some(order)`, a permutation of indices into
    /// `generators`, to change the order; `None` keeps it.
    #[allow(unused_variables)]
    fn subsort(
        &self,
        model: &Model,
        generators: &[&dyn ModelElementGenerator],
    ) -> Option<Vec<usize>> {
        None
    }
}

impl fmt::Debug for dyn ShapeGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeGenerator")
            .field("name", &self.name())
            .finish()
    }
}
