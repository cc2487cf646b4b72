//! Core vocabulary for the shapegen code generation pipeline.
//!
//! This crate provides the leaf types shared by the engine, the plugins and
//! the CLI: targets, languages, destinations, settings and logging.

mod destination;
mod file;
mod language;
mod logger;
pub mod paths;
mod settings;
mod target;
mod utils;

pub use destination::Destination;
// File operations
pub use file::{SourceFile, WriteResult, write_file};
pub use language::{Language, LanguageVersion, LanguageWithVersion};
pub use logger::{GenerationLogger, Level, LogSink, TracingSink};
pub use settings::{
    AnyValue, ErasedKey, GenerationSwitch, Settings, SettingsBuilder, SettingsKey, Switch,
};
pub use target::GenerationTarget;
// String utilities
pub use utils::{
    to_camel_case, to_kebab_case, to_pascal_case, to_screaming_snake_case, to_snake_case,
};
