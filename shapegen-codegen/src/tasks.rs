//! Provided post-generate tasks.
//!
//! Each one registers an after-commit callback on the results, so it acts on
//! the final set of written paths. In dry-run they log what they would do
//! and leave the filesystem alone.

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    process::Command,
    sync::Arc,
};

use chrono::{DateTime, Datelike, Local, Timelike};
use eyre::{Context, Result};
use shapegen_core::{GenerationLogger, paths};
use shapegen_model::Model;
use walkdir::WalkDir;
use zip::{CompressionMethod, ZipWriter, write::FileOptions};

use crate::{CategorySnapshot, GenerationContext, GenerationResults, PostGenerateTask};

/// Copy a generated file elsewhere once it has been committed.
#[derive(Debug, Clone)]
pub struct CopyFile {
    from: PathBuf,
    to: PathBuf,
}

impl CopyFile {
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl PostGenerateTask for CopyFile {
    fn on_after_generate(
        &self,
        ctx: &GenerationContext,
        _: &Model,
        results: &GenerationResults,
        _: &CategorySnapshot,
        logger: &GenerationLogger,
    ) -> Result<()> {
        let dry_run = ctx.settings().dry_run();
        let from = paths::normalize(&self.from);
        let to = self.to.clone();
        let logger = logger.clone();
        results.on_commit(move |written| {
            if !written.contains(&from) {
                return Ok(());
            }
            if dry_run {
                logger.info(format!("would copy {} to {}", from.display(), to.display()));
                return Ok(());
            }
            copy_with_mtime(&from, &to)
        });
        Ok(())
    }
}

/// Zip every file in a category into one archive.
#[derive(Debug, Clone)]
pub struct ZipCategory {
    category: String,
    archive: PathBuf,
    prefix: Option<PathBuf>,
}

impl ZipCategory {
    pub fn new(category: impl Into<String>, archive: impl Into<PathBuf>) -> Self {
        Self {
            category: category.into(),
            archive: archive.into(),
            prefix: None,
        }
    }

    /// Place entries under `prefix` inside the archive.
    pub fn prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

impl PostGenerateTask for ZipCategory {
    fn on_after_generate(
        &self,
        _: &GenerationContext,
        _: &Model,
        results: &GenerationResults,
        categories: &CategorySnapshot,
        logger: &GenerationLogger,
    ) -> Result<()> {
        // paths registered after this task started are not archived
        let files = categories.get(&self.category);
        if files.is_empty() {
            return Ok(());
        }
        let dry_run = results.context().settings().dry_run();
        let task = self.clone();
        let logger = logger.clone();
        results.on_commit(move |_| {
            if dry_run {
                logger.info(format!(
                    "would zip category {} to {}",
                    task.category,
                    task.archive.display()
                ));
                return Ok(());
            }
            logger.info(format!(
                "Zip category {} to {}",
                task.category,
                task.archive.display()
            ));
            task.write_archive(files.iter().map(PathBuf::as_path), &logger)
        });
        Ok(())
    }
}

impl ZipCategory {
    fn write_archive<'a>(
        &self,
        files: impl Iterator<Item = &'a Path>,
        logger: &GenerationLogger,
    ) -> Result<()> {
        if let Some(parent) = self.archive.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
        }
        let out = File::create(&self.archive)
            .wrap_err_with(|| format!("failed to create {}", self.archive.display()))?;
        let mut zip = ZipWriter::new(out);
        for file in files {
            if file.is_dir() {
                logger.warn(format!("skipping directory {}", file.display()));
                continue;
            }
            let Some(file_name) = file.file_name() else {
                continue;
            };
            let entry = match &self.prefix {
                Some(prefix) => prefix.join(file_name),
                None => PathBuf::from(file_name),
            };
            let entry = entry
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            let options = FileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(9))
                .last_modified_time(zip_time(file));
            zip.start_file(entry, options)?;
            let mut input =
                File::open(file).wrap_err_with(|| format!("failed to read {}", file.display()))?;
            io::copy(&mut input, &mut zip)?;
        }
        zip.finish()?;
        Ok(())
    }
}

fn zip_time(file: &Path) -> zip::DateTime {
    let Ok(modified) = fs::metadata(file).and_then(|m| m.modified()) else {
        return zip::DateTime::default();
    };
    let local: DateTime<Local> = modified.into();
    zip::DateTime::from_date_and_time(
        local.year().clamp(1980, 2107) as u16,
        local.month() as u8,
        local.day() as u8,
        local.hour() as u8,
        local.minute() as u8,
        local.second() as u8,
    )
    .unwrap_or_default()
}

/// Copy every file of a category into a directory. Directories in the
/// category are copied recursively, shallow files first, then by path.
#[derive(Debug, Clone)]
pub struct CopyCategory {
    category: String,
    to_dir: PathBuf,
}

impl CopyCategory {
    pub fn new(category: impl Into<String>, to_dir: impl Into<PathBuf>) -> Self {
        Self {
            category: category.into(),
            to_dir: to_dir.into(),
        }
    }
}

impl PostGenerateTask for CopyCategory {
    fn on_after_generate(
        &self,
        _: &GenerationContext,
        _: &Model,
        results: &GenerationResults,
        categories: &CategorySnapshot,
        logger: &GenerationLogger,
    ) -> Result<()> {
        let sources = categories.get(&self.category);
        if sources.is_empty() {
            return Ok(());
        }
        let dry_run = results.context().settings().dry_run();
        let task = self.clone();
        let logger = logger.clone();
        results.on_commit(move |_| {
            if dry_run {
                logger.info(format!(
                    "would copy {} path(s) of category {} to {}",
                    sources.len(),
                    task.category,
                    task.to_dir.display()
                ));
                return Ok(());
            }
            logger.info(format!(
                "Copy {} files for category {} to {}",
                sources.len(),
                task.category,
                task.to_dir.display()
            ));
            fs::create_dir_all(&task.to_dir)
                .wrap_err_with(|| format!("failed to create {}", task.to_dir.display()))?;
            for source in &sources {
                if source.is_dir() {
                    for file in files_by_depth(source) {
                        let relative = file.strip_prefix(source).unwrap_or(&file);
                        copy_with_mtime(&file, &task.to_dir.join(relative))?;
                    }
                } else if let Some(name) = source.file_name() {
                    copy_with_mtime(source, &task.to_dir.join(name))?;
                }
            }
            Ok(())
        });
        Ok(())
    }
}

/// Non-directory entries under `dir`, shallowest first, then by path.
fn files_by_depth(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<(usize, PathBuf)> = WalkDir::new(dir)
        .max_depth(200)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| !entry.file_type().is_dir())
        .map(|entry| (entry.depth(), entry.into_path()))
        .collect();
    files.sort();
    files.into_iter().map(|(_, path)| path).collect()
}

fn copy_with_mtime(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
    }
    fs::copy(from, to)
        .wrap_err_with(|| format!("failed to copy {} to {}", from.display(), to.display()))?;
    let modified = fs::metadata(from)?.modified()?;
    File::options().write(true).open(to)?.set_modified(modified)?;
    Ok(())
}

/// Link `link` to `source` with a relative symlink once `source` has been
/// committed. An existing file or link at `link` is replaced.
#[derive(Debug, Clone)]
pub struct SymlinkFile {
    source: PathBuf,
    link: PathBuf,
}

impl SymlinkFile {
    pub fn new(source: impl Into<PathBuf>, link: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            link: link.into(),
        }
    }
}

impl PostGenerateTask for SymlinkFile {
    fn on_after_generate(
        &self,
        _: &GenerationContext,
        _: &Model,
        results: &GenerationResults,
        _: &CategorySnapshot,
        logger: &GenerationLogger,
    ) -> Result<()> {
        let source = paths::normalize(&self.source);
        let link = paths::normalize(&self.link);
        let logger = logger.clone();
        results.on_commit(move |written| {
            if !written.contains(&source) || !source.exists() {
                return Ok(());
            }
            let parent = link.parent().unwrap_or(Path::new("."));
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
            let target = paths::relative_to(parent, &source);
            if fs::symlink_metadata(&link).is_ok() {
                fs::remove_file(&link)
                    .wrap_err_with(|| format!("failed to delete {}", link.display()))?;
            }
            logger.info(format!(
                "Symlink {} to {} as {}",
                source.display(),
                link.display(),
                target.display()
            ));
            create_symlink(&target, &link)
                .wrap_err_with(|| format!("failed to link {}", link.display()))
        });
        Ok(())
    }
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

/// Run an external program after commit, such as a package manager build.
///
/// Failures to start the program and non-zero exits are logged as errors and
/// never fail the build; the tool may simply not be installed. Files found
/// under the configured output directories are registered into a category.
#[derive(Debug, Clone)]
pub struct RunCommand {
    program: String,
    args: Vec<String>,
    dir: PathBuf,
    marker: Option<String>,
    outputs: Vec<PathBuf>,
    category: Option<String>,
}

impl RunCommand {
    pub fn new(program: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            dir: dir.into(),
            marker: None,
            outputs: Vec::new(),
            category: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Run in the nearest ancestor of the directory containing `file`.
    pub fn find_up(mut self, file: impl Into<String>) -> Self {
        self.marker = Some(file.into());
        self
    }

    /// Register files under `dir` (relative to the working directory) into
    /// `category` after the program succeeds.
    pub fn collect(mut self, dir: impl Into<PathBuf>, category: impl Into<String>) -> Self {
        self.outputs.push(dir.into());
        self.category = Some(category.into());
        self
    }

    fn working_dir(&self) -> Option<PathBuf> {
        let Some(marker) = &self.marker else {
            return Some(self.dir.clone());
        };
        self.dir
            .ancestors()
            .find(|dir| dir.join(marker).exists())
            .map(Path::to_path_buf)
    }

    fn run(&self, ctx: &GenerationContext, logger: &GenerationLogger) -> Result<()> {
        let Some(dir) = self.working_dir() else {
            logger.warn(format!(
                "no {} found above {}; not running {}",
                self.marker.as_deref().unwrap_or_default(),
                self.dir.display(),
                self.program
            ));
            return Ok(());
        };
        let mut logger = logger.child(&self.program);
        if let Some(first) = self.args.first() {
            logger = logger.child(first);
        }
        logger.info(format!("running in {}", dir.display()));

        let output = match Command::new(&self.program)
            .args(&self.args)
            .current_dir(&dir)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                logger.error(format!("failed to start {}: {}", self.program, e));
                return Ok(());
            }
        };
        for line in String::from_utf8_lossy(&output.stdout).lines() {
            logger.info(line);
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            logger.warn(line);
        }
        if !output.status.success() {
            logger.error(format!("{} exited with {}", self.program, output.status));
            return Ok(());
        }

        if let Some(category) = &self.category {
            for out in &self.outputs {
                let out = dir.join(out);
                let files = WalkDir::new(&out)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| entry.file_type().is_file())
                    .map(|entry| entry.into_path());
                ctx.register_paths(category, files);
            }
        }
        Ok(())
    }
}

impl PostGenerateTask for RunCommand {
    fn on_after_generate(
        &self,
        _: &GenerationContext,
        _: &Model,
        results: &GenerationResults,
        _: &CategorySnapshot,
        logger: &GenerationLogger,
    ) -> Result<()> {
        let ctx = Arc::clone(results.context());
        let task = self.clone();
        let logger = logger.clone();
        results.on_commit(move |_| {
            if ctx.settings().dry_run() {
                logger.info(format!("would run {} {}", task.program, task.args.join(" ")));
                return Ok(());
            }
            task.run(&ctx, &logger)
        });
        Ok(())
    }
}
