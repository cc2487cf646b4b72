use std::path::{Path, PathBuf};

use eyre::{Context, Result};

/// Write `content` to `path`, creating parent directories as needed.
pub fn write_file(path: &Path, content: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, content).wrap_err_with(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// Nothing touched the disk (dry run)
    Skipped,
}

/// An in-memory text file bound to an absolute destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    destination: PathBuf,
    content: String,
}

impl SourceFile {
    pub fn new(destination: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            content: content.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Write the file unless `dry_run` is set.
    pub fn write(&self, dry_run: bool) -> Result<WriteResult> {
        if dry_run {
            return Ok(WriteResult::Skipped);
        }
        write_file(&self.destination, &self.content)?;
        Ok(WriteResult::Written)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_write_file_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("c").join("test.txt");

        write_file(&path, "nested").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "nested");
    }

    #[test]
    fn test_write_file_overwrites_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.txt");

        write_file(&path, "first").unwrap();
        write_file(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_source_file_dry_run_touches_nothing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gen").join("Foo.java");
        let file = SourceFile::new(&path, "class Foo {}");

        assert_eq!(file.write(true).unwrap(), WriteResult::Skipped);
        assert!(!path.exists());
        assert!(!temp.path().join("gen").exists());

        assert_eq!(file.write(false).unwrap(), WriteResult::Written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "class Foo {}");
    }
}
