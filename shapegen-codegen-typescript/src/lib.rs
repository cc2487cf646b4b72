//! TypeScript generators for shapegen.
//!
//! [`TypeScriptGenerators`] serves language `typescript` with target
//! `model`. Each structure, union, enum, list, map and simple shape outside
//! the prelude becomes a module at `<destination>/<namespace>/<kebab-name>.ts`:
//!
//! - structures become interfaces with `readonly` properties, optional
//!   unless the member is required
//! - unions become a union of single-property object types
//! - enums and int enums become `as const` objects plus a value type
//! - constrained strings and numbers become branded types with an
//!   `as<Name>` function that validates and brands a value
//!
//! Modules are ordered so dependencies are generated first, and every
//! generated path is registered under the [`CATEGORY`] category. The
//! [`IndexTask`] post-generate task then writes an `index.ts` re-exporting
//! each directory's modules. With the `typescript.compile` setting set to
//! `true`, `npx tsc --noEmit` runs after commit.

pub mod ast;
mod element;
mod generator;
mod index;
mod module_file;
mod modules;
mod naming;
mod order;
mod type_mapper;

pub use generator::TypeScriptGenerators;
pub use index::{CATEGORY, COMPILE_SETTING, COMPILE_TASK, INDEX_TASK, IndexTask};
pub use module_file::ModuleFile;
pub use naming::TS_RESERVED;
pub use order::dependency_order;
pub use type_mapper::{TsType, type_ref};
