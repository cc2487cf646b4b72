//! The generator plugins compiled into the CLI.

use shapegen_codegen::GeneratorRegistry;
use shapegen_codegen_java::JavaGenerators;
use shapegen_codegen_typescript::TypeScriptGenerators;

/// Every built-in plugin, in the order sessions consult them.
pub fn registry() -> GeneratorRegistry {
    GeneratorRegistry::new()
        .with(JavaGenerators::new())
        .with(TypeScriptGenerators::new())
}
