//! Generation engine for shapegen.
//!
//! Generator plugins implement [`ShapeGenerator`] and are registered in a
//! [`GeneratorRegistry`]. A [`GenerationSession`] matches them against the
//! requested targets and languages, walks the model, and returns
//! [`GenerationResults`] that nothing has written yet. [`GenerationResults::commit`]
//! writes them, confined to the destination roots resolved during the run.
//!
//! # Module Organization
//!
//! - [`builder`] - Indentation-aware text building (CodeBuilder, Indent)
//! - [`post_task`] - Post-generate task trait and queue
//! - [`tasks`] - Provided post-generate tasks (zip, copy, symlink, run command)
//! - [`testing`] - Fakes and helpers for tests (feature-gated)

pub mod builder;
mod context;
mod destinations;
mod error;
mod generator;
pub mod post_task;
mod problems;
mod registry;
mod results;
mod session;
mod subsort;
pub mod tasks;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use context::{CategorySnapshot, ContextGuard, GenerationContext, category};
pub use destinations::{DEFAULT_DESTINATION, DestinationMap, DestinationResolver};
pub use error::GenerationError;
pub use generator::{GeneratedCode, ModelElementGenerator, ShapeGenerator, ShapeRequest};
pub use post_task::{PostGenerateTask, PostTaskQueue};
pub use problems::{Problem, Problems};
pub use registry::{GeneratorRegistry, MatchedGenerator, languages_for, targets_for};
pub use results::{GenerationResults, WARNING_FILE, WARNING_TEXT, clean_roots};
pub use session::{GenerationSession, SessionBuilder};
pub use subsort::{is_permutation, partial_reorder};
