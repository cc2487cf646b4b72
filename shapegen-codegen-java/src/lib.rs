//! Java generators for shapegen.
//!
//! [`JavaGenerators`] is a [`ShapeGenerator`](shapegen_codegen::ShapeGenerator)
//! plugin. Register it with a session and request language `java` (any
//! version) with targets `model` and/or `modeltest`:
//!
//! ```ignore
//! use shapegen_codegen::{GenerationSession, GeneratorRegistry};
//! use shapegen_codegen_java::JavaGenerators;
//!
//! let registry = GeneratorRegistry::new().with(JavaGenerators::new());
//! let session = GenerationSession::builder(registry)
//!     .language(LanguageWithVersion::parse("java-17"))
//!     .target(GenerationTarget::MODEL)
//!     .build()?;
//! let results = session.generate(&model, |_| true, &logger)?;
//! results.commit()?;
//! ```
//!
//! # Generated Output
//!
//! Classes land in `<destination>/<namespace>/model/<Shape>.java`, in
//! package `<namespace>.model`:
//!
//! - numbers and strings become immutable wrappers validating their range,
//!   length and pattern in the constructor
//! - enums and int enums become Java enums with `fromValue`
//! - structures become final classes with `Optional` accessors for
//!   members that are not required
//!
//! The `modeltest` target emits `<Shape>Test.java` beside them.

mod element;
mod emit;
mod features;
mod generator;
mod java_file;
mod naming;
mod type_names;

pub use features::{BASELINE_VERSION, JavaFeatures};
pub use generator::JavaGenerators;
pub use java_file::JavaFile;
pub use naming::JAVA_RESERVED;
pub use type_names::{ClassName, JavaType, MODEL_PACKAGE_SUFFIX, TYPE_NAMES, TypeNames};
