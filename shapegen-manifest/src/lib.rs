//! TOML parsing for shapegen projects.
//!
//! Two file kinds are understood: the `shapegen.toml` project manifest and
//! `*.shapes.toml` model files, which are lowered into a
//! [`shapegen_model::Model`]. Errors carry source spans for `miette`.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod model_file;
mod project;

pub use error::{Error, Result, SourceContext};
pub use model_file::{MODEL_FILE_SUFFIX, ModelLoader, parse_model_str};
pub use project::{
    MANIFEST_FILE, Manifest, ProjectConfig, ShapegenToml, parse_manifest, toml_value_to_string,
};
