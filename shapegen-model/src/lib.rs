//! The shape graph consumed by the shapegen generation engine.
//!
//! A [`Model`] is an insertion-ordered set of [`Shape`]s addressed by
//! [`ShapeId`]. Each shape has a [`ShapeKind`] from a closed set and carries
//! constraint [`Traits`]. The engine only ever reads a model.
//!
//! # Architecture
//!
//! ```text
//! *.shapes.toml → shapegen-manifest (parsing) → shapegen-model → codegen
//! ```

mod model;
mod shape;
mod shape_id;
mod traits;

pub use model::Model;
pub use shape::{EnumValue, IntEnumValue, Shape, ShapeKind};
pub use shape_id::{PRELUDE_NAMESPACE, ShapeId};
pub use traits::{Length, Range, Traits};
