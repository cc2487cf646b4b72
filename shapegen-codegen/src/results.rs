//! Uncommitted generation output and the commit protocol.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use eyre::{Context, Result};
use indexmap::IndexSet;
use shapegen_core::{GenerationSwitch, paths, write_file};

use crate::{GeneratedCode, GenerationContext, GenerationError};

/// Name of the marker file written beside generated code.
pub const WARNING_FILE: &str = "000-IMPORTANT.txt";

/// Contents of [`WARNING_FILE`].
pub const WARNING_TEXT: &str = "GENERATED CODE\n==============\n\n\
This directory, and perhaps many of its parents, \n\
will be DELETED and recreated the next time code \n\
generation is run.\n\n\
Do not put ANYTHING here that you want to keep.\n";

type CommitCallback = Box<dyn FnOnce(&IndexSet<PathBuf>) -> Result<()> + Send>;

/// Generated code that has not been written yet.
///
/// Nothing touches the disk until [`commit`](Self::commit) is called.
pub struct GenerationResults {
    ctx: Arc<GenerationContext>,
    generated: Vec<Box<dyn GeneratedCode>>,
    roots: IndexSet<PathBuf>,
    callbacks: Mutex<Vec<CommitCallback>>,
}

impl GenerationResults {
    pub fn new(
        ctx: Arc<GenerationContext>,
        generated: Vec<Box<dyn GeneratedCode>>,
        roots: IndexSet<PathBuf>,
    ) -> Self {
        Self {
            ctx,
            generated,
            roots,
            callbacks: Mutex::new(Vec::new()),
        }
    }

    /// Results with nothing to write.
    pub fn empty(ctx: Arc<GenerationContext>) -> Self {
        Self::new(ctx, Vec::new(), IndexSet::new())
    }

    pub fn context(&self) -> &Arc<GenerationContext> {
        &self.ctx
    }

    /// Every destination root resolved during generation.
    pub fn roots(&self) -> &IndexSet<PathBuf> {
        &self.roots
    }

    pub fn generated(&self) -> &[Box<dyn GeneratedCode>] {
        &self.generated
    }

    /// Destinations of every generated artifact, in generation order.
    pub fn destinations(&self) -> Vec<&Path> {
        self.generated.iter().map(|g| g.destination()).collect()
    }

    pub fn len(&self) -> usize {
        self.generated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generated.is_empty()
    }

    /// Run `callback` with the written paths once [`commit`](Self::commit)
    /// has written everything.
    pub fn on_commit(
        &self,
        callback: impl FnOnce(&IndexSet<PathBuf>) -> Result<()> + Send + 'static,
    ) {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(callback));
    }

    /// Write everything and return the written paths.
    ///
    /// In order:
    ///
    /// 1. every destination is checked to lie inside a known root; any
    ///    violation aborts the commit before the filesystem is touched,
    /// 2. directory children of each root are deleted (unless dry-run or
    ///    [`GenerationSwitch::DontCleanSourceRoots`]),
    /// 3. every artifact is written (dry-run writes nothing but still
    ///    reports the path),
    /// 4. a [`WARNING_FILE`] is placed in every directory that received a
    ///    file (unless [`GenerationSwitch::DontGenerateWarningFiles`]),
    /// 5. after-commit callbacks run in registration order.
    pub fn commit(&self) -> Result<IndexSet<PathBuf>> {
        let settings = self.ctx.settings();
        let dry_run = settings.dry_run();

        self.check_destinations()?;

        if dry_run || settings.is(GenerationSwitch::DontCleanSourceRoots) {
            tracing::debug!("skipping clean of {} root(s)", self.roots.len());
        } else {
            clean_roots(self.roots.iter().map(PathBuf::as_path))?;
        }

        let mut written = IndexSet::new();
        for generated in &self.generated {
            generated.write(dry_run)?;
            written.insert(paths::normalize(generated.destination()));
        }
        tracing::debug!(
            "{} {} file(s)",
            if dry_run { "would write" } else { "wrote" },
            written.len()
        );

        if !settings.is(GenerationSwitch::DontGenerateWarningFiles) {
            write_warning_files(&written, dry_run)?;
        }

        let callbacks =
            std::mem::take(&mut *self.callbacks.lock().unwrap_or_else(PoisonError::into_inner));
        for callback in callbacks {
            callback(&written)?;
        }
        Ok(written)
    }

    fn check_destinations(&self) -> Result<()> {
        let roots: Vec<PathBuf> = self.roots.iter().map(|r| paths::normalize(r)).collect();
        let outside: Vec<PathBuf> = self
            .generated
            .iter()
            .map(|g| paths::normalize(g.destination()))
            .filter(|dest| !roots.iter().any(|root| paths::is_below(dest, root)))
            .collect();
        if outside.is_empty() {
            return Ok(());
        }
        Err(GenerationError::OutsideSourceRoots {
            paths: outside,
            roots: self.roots.iter().cloned().collect(),
        }
        .into())
    }
}

impl fmt::Display for GenerationResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} source files.", self.generated.len())
    }
}

impl fmt::Debug for GenerationResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationResults")
            .field("generated", &self.generated)
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}

/// Delete the directory children of every existing root. Files sitting
/// directly in a root are left alone, and symlinks are never followed.
pub fn clean_roots<'a>(roots: impl IntoIterator<Item = &'a Path>) -> Result<usize> {
    let mut removed = 0;
    for root in roots {
        if !root.is_dir() {
            continue;
        }
        let entries = std::fs::read_dir(root)
            .wrap_err_with(|| format!("failed to list {}", root.display()))?;
        for entry in entries {
            let entry = entry.wrap_err_with(|| format!("failed to list {}", root.display()))?;
            if entry.file_type()?.is_dir() {
                let path = entry.path();
                tracing::debug!("cleaning {}", path.display());
                std::fs::remove_dir_all(&path)
                    .wrap_err_with(|| format!("failed to delete {}", path.display()))?;
                removed += 1;
            }
        }
    }
    Ok(removed)
}

fn write_warning_files(written: &IndexSet<PathBuf>, dry_run: bool) -> Result<()> {
    let dirs: IndexSet<PathBuf> = written
        .iter()
        .filter_map(|p| p.parent())
        .map(|dir| dir.canonicalize().unwrap_or_else(|_| paths::normalize(dir)))
        .collect();
    for dir in dirs {
        let marker = dir.join(WARNING_FILE);
        if dry_run {
            tracing::debug!("would write {}", marker.display());
        } else if !marker.exists() {
            write_file(&marker, WARNING_TEXT)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fs, sync::Arc};

    use shapegen_core::{Settings, SourceFile};

    use super::*;
    use crate::testing::{TestWorkspace, fake_resolver, snapshot_dir};

    fn context(settings: Settings, base: &Path) -> Arc<GenerationContext> {
        Arc::new(GenerationContext::new(Arc::new(settings), fake_resolver(base)))
    }

    fn results(
        ctx: Arc<GenerationContext>,
        root: &Path,
        files: &[(&str, &str)],
    ) -> GenerationResults {
        let generated: Vec<Box<dyn GeneratedCode>> = files
            .iter()
            .map(|(rel, content)| {
                Box::new(SourceFile::new(root.join(rel), *content)) as Box<dyn GeneratedCode>
            })
            .collect();
        GenerationResults::new(ctx, generated, IndexSet::from([root.to_path_buf()]))
    }

    #[test]
    fn test_commit_writes_files_and_markers() {
        let ws = TestWorkspace::new();
        let root = ws.root().join("out");
        let results = results(
            context(Settings::default(), ws.root()),
            &root,
            &[("com/example/A.java", "a"), ("com/example/B.java", "b")],
        );

        let written = results.commit().unwrap();

        assert_eq!(written.len(), 2);
        assert!(written.contains(&root.join("com/example/A.java")));
        assert_eq!(fs::read_to_string(root.join("com/example/B.java")).unwrap(), "b");
        assert_eq!(
            fs::read_to_string(root.join("com/example").join(WARNING_FILE)).unwrap(),
            WARNING_TEXT
        );
        assert_eq!(results.to_string(), "2 source files.");
    }

    #[test]
    fn test_clean_removes_only_directory_children() {
        let ws = TestWorkspace::new();
        let root = ws.root().join("out");
        fs::create_dir_all(root.join("stale/deep")).unwrap();
        fs::write(root.join("stale/deep/Old.java"), "old").unwrap();
        fs::write(root.join("README.md"), "keep me").unwrap();

        let results = results(
            context(Settings::default(), ws.root()),
            &root,
            &[("fresh/New.java", "new")],
        );
        results.commit().unwrap();

        assert!(!root.join("stale").exists());
        assert_eq!(fs::read_to_string(root.join("README.md")).unwrap(), "keep me");
        assert!(root.join("fresh/New.java").exists());
    }

    #[test]
    fn test_switches_skip_clean_and_markers() {
        let ws = TestWorkspace::new();
        let root = ws.root().join("out");
        fs::create_dir_all(root.join("stale")).unwrap();

        let settings = Settings::builder()
            .with_switch(GenerationSwitch::DontCleanSourceRoots)
            .with_switch(GenerationSwitch::DontGenerateWarningFiles)
            .build();
        let results = results(context(settings, ws.root()), &root, &[("a/A.java", "a")]);
        results.commit().unwrap();

        assert!(root.join("stale").exists());
        assert!(!root.join("a").join(WARNING_FILE).exists());
    }

    #[test]
    fn test_escaping_destination_aborts_before_any_write() {
        let ws = TestWorkspace::new();
        let root = ws.root().join("out");
        fs::create_dir_all(root.join("stale")).unwrap();
        let before = snapshot_dir(ws.root());

        let results = results(
            context(Settings::default(), ws.root()),
            &root,
            &[("ok/A.java", "a"), ("../escaped/B.java", "b"), ("../../C.java", "c")],
        );
        let err = results.commit().unwrap_err();

        match err.downcast_ref::<GenerationError>() {
            Some(GenerationError::OutsideSourceRoots { paths, roots }) => {
                assert_eq!(paths.len(), 2);
                assert_eq!(roots, &vec![root.clone()]);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(snapshot_dir(ws.root()), before);
    }

    #[test]
    fn test_prefix_is_not_containment() {
        let ws = TestWorkspace::new();
        let root = ws.root().join("out");
        let generated: Vec<Box<dyn GeneratedCode>> = vec![Box::new(SourceFile::new(
            ws.root().join("out-other/A.java"),
            "a",
        ))];
        let results = GenerationResults::new(
            context(Settings::default(), ws.root()),
            generated,
            IndexSet::from([root]),
        );
        assert!(results.commit().is_err());

        let at_root: Vec<Box<dyn GeneratedCode>> =
            vec![Box::new(SourceFile::new(ws.root().join("out"), "a"))];
        let results = GenerationResults::new(
            context(Settings::default(), ws.root()),
            at_root,
            IndexSet::from([ws.root().join("out")]),
        );
        let err = results.commit().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenerationError>(),
            Some(GenerationError::OutsideSourceRoots { .. })
        ));
        assert!(!ws.root().join("out").exists());
    }

    #[test]
    fn test_dry_run_leaves_disk_untouched_but_runs_callbacks() {
        let ws = TestWorkspace::new();
        let root = ws.root().join("out");
        fs::create_dir_all(root.join("stale")).unwrap();
        let before = ws.snapshot();

        let settings = Settings::builder()
            .with_switch(GenerationSwitch::DryRun)
            .build();
        let results = results(context(settings, ws.root()), &root, &[("a/A.java", "a")]);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        results.on_commit(move |paths| {
            sink.lock().unwrap().extend(paths.iter().cloned());
            Ok(())
        });

        let written = results.commit().unwrap();

        assert_eq!(ws.snapshot(), before);
        assert_eq!(written.len(), 1);
        assert_eq!(*seen.lock().unwrap(), vec![root.join("a/A.java")]);
    }

    #[test]
    fn test_callbacks_run_in_order_after_write() {
        let ws = TestWorkspace::new();
        let root = ws.root().join("out");
        let results = results(
            context(Settings::default(), ws.root()),
            &root,
            &[("A.txt", "a")],
        );
        let order = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let order = Arc::clone(&order);
            let file = root.join("A.txt");
            results.on_commit(move |_| {
                assert!(file.exists());
                order.lock().unwrap().push(i);
                Ok(())
            });
        }

        results.commit().unwrap();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_existing_marker_is_kept() {
        let ws = TestWorkspace::new();
        let root = ws.root().join("out");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join(WARNING_FILE), "custom").unwrap();

        let settings = Settings::builder()
            .with_switch(GenerationSwitch::DontCleanSourceRoots)
            .build();
        let results = results(context(settings, ws.root()), &root, &[("A.txt", "a")]);
        results.commit().unwrap();

        assert_eq!(fs::read_to_string(root.join(WARNING_FILE)).unwrap(), "custom");
    }
}
