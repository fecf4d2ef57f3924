//! Temporary directory lifetime management.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::trace;
use walkdir::WalkDir;

use super::{check_affix, unique_name};
use crate::errors::{OskitError, Result};

/// A directory created (or adopted) on construction and recursively
/// deleted on drop.
#[derive(Debug)]
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    /// Unique directory under the OS temp directory.
    pub fn new() -> Result<Self> {
        Self::with_prefix("")
    }

    /// Unique directory under the OS temp directory, its name starting
    /// with `prefix`. A prefix containing `..` fails with
    /// [`OskitError::InvalidArgument`].
    pub fn with_prefix(prefix: &str) -> Result<Self> {
        check_affix(prefix)?;
        let path = loop {
            let candidate = unique_temp_path(prefix);
            match fs::create_dir(&candidate) {
                Ok(()) => break candidate,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        };
        trace!(path = %path.display(), "temp directory created");
        Ok(Self { path })
    }

    /// Adopt an existing directory: it is deleted when this instance drops.
    pub fn adopt(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the live directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a named subdirectory (intermediate components included).
    /// The name must be relative and stay under this directory.
    pub fn create_subdir(&self, name: impl AsRef<Path>) -> Result<PathBuf> {
        let name = name.as_ref();
        if name.is_absolute() || name.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(OskitError::InvalidArgument(format!(
                "subdirectory must be relative and stay under the root: {}",
                name.display()
            )));
        }
        let path = self.path.join(name);
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Create a subdirectory named `<prefix><unique token>`.
    pub fn create_unique_subdir(&self, prefix: &str) -> Result<PathBuf> {
        check_affix(prefix)?;
        loop {
            let path = self.path.join(unique_name(prefix, ""));
            match fs::create_dir(&path) {
                Ok(()) => return Ok(path),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Delete every file under this directory, keeping the directory tree.
    /// All deletions are attempted; the first failure is reported.
    pub fn delete_all_files(&self) -> Result<()> {
        let mut first_err: Option<std::io::Error> = None;
        for entry in WalkDir::new(&self.path).into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file() {
                if let Err(e) = fs::remove_file(entry.path()) {
                    first_err.get_or_insert(e);
                }
            }
        }
        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_dir_all(&self.path) {
                trace!(path = %self.path.display(), error = %e, "temp directory removal failed");
            }
        }
    }
}

/// Combine the OS temp directory, `prefix` and a unique token without
/// creating anything.
pub fn unique_temp_path(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(unique_name(prefix, ""))
}
