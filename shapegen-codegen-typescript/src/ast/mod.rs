//! TypeScript syntax builders rendered through [`CodeBuilder`](shapegen_codegen::builder::CodeBuilder).

mod imports;
mod interface;
mod type_alias;

pub use imports::Import;
pub use interface::{Interface, InterfaceField};
pub use type_alias::TypeAlias;
