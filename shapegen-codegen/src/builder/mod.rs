//! Text building blocks shared by language generators.
//!
//! - [`CodeBuilder`] - fluent API for indented source text
//! - [`Indent`] - indentation configuration

mod code_builder;
mod indent;

pub use code_builder::CodeBuilder;
pub use indent::Indent;
