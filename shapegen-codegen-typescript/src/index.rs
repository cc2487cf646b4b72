//! Barrel `index.ts` files, written after commit.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use eyre::Result;
use indexmap::IndexMap;
use shapegen_codegen::{
    CategorySnapshot, GenerationContext, GenerationResults, PostGenerateTask,
    builder::CodeBuilder, tasks::RunCommand,
};
use shapegen_core::{GenerationLogger, SourceFile};
use shapegen_model::Model;

/// Category every generated module is registered under.
pub const CATEGORY: &str = "typescript";

/// Post-task writing the barrel files.
pub const INDEX_TASK: &str = "typescript-index";

/// Post-task type-checking the output with `tsc`.
pub const COMPILE_TASK: &str = "typescript-compile";

/// When `true`, run `npx tsc --noEmit` from the nearest `tsconfig.json`
/// after the index files are written.
pub const COMPILE_SETTING: &str = "typescript.compile";

fn render_index(modules: &[String]) -> String {
    CodeBuilder::typescript()
        .each(modules, |b, module| {
            b.line(&format!("export * from \"./{}\";", module))
        })
        .build()
}

/// Writes one `index.ts` per directory holding modules generated in this
/// run, re-exporting them in generation order.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndexTask;

impl IndexTask {
    /// Module stems per directory, for modules that are part of `results`.
    fn modules(
        results: &GenerationResults,
        categories: &CategorySnapshot,
    ) -> IndexMap<PathBuf, Vec<String>> {
        let generated: HashSet<&Path> = results.destinations().into_iter().collect();
        let mut dirs: IndexMap<PathBuf, Vec<String>> = IndexMap::new();
        for path in categories.get(CATEGORY) {
            if !generated.contains(path.as_path()) {
                continue;
            }
            let (Some(dir), Some(stem)) = (path.parent(), path.file_stem()) else {
                continue;
            };
            dirs.entry(dir.to_path_buf())
                .or_default()
                .push(stem.to_string_lossy().into_owned());
        }
        dirs
    }
}

impl PostGenerateTask for IndexTask {
    fn on_after_generate(
        &self,
        ctx: &GenerationContext,
        _: &Model,
        results: &GenerationResults,
        categories: &CategorySnapshot,
        logger: &GenerationLogger,
    ) -> Result<()> {
        let dirs = Self::modules(results, categories);
        if dirs.is_empty() {
            logger.debug("no modules to index");
            return Ok(());
        }

        let files: Vec<SourceFile> = dirs
            .iter()
            .map(|(dir, modules)| SourceFile::new(dir.join("index.ts"), render_index(modules)))
            .collect();
        let dry_run = ctx.settings().dry_run();
        let task_logger = logger.clone();
        results.on_commit(move |_| {
            for file in &files {
                if dry_run {
                    task_logger.info(format!("would write {}", file.destination().display()));
                } else {
                    task_logger.info(format!("writing {}", file.destination().display()));
                }
                file.write(dry_run)?;
            }
            Ok(())
        });

        if ctx.settings().get_bool(COMPILE_SETTING) == Some(true)
            && let Some(dir) = dirs.keys().next()
        {
            let dir = dir.clone();
            ctx.post_tasks().register(COMPILE_TASK, move || {
                RunCommand::new("npx", dir)
                    .arg("tsc")
                    .arg("--noEmit")
                    .find_up("tsconfig.json")
            });
        }
        Ok(())
    }
}
