//! Temporary file lifetime management.

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::trace;

use super::{check_affix, unique_name};
use crate::errors::Result;

/// A file created on construction, held open read/write for the instance's
/// lifetime, and deleted on drop.
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
    file: Option<File>,
}

impl TempFile {
    /// Extensionless unique file in the OS temp directory.
    pub fn new() -> Result<Self> {
        Self::create_unique(&std::env::temp_dir(), "", "")
    }

    /// Unique file in the OS temp directory named
    /// `<prefix><token><extension>`.
    ///
    /// Affixes containing `..` fail with
    /// [`crate::OskitError::InvalidArgument`].
    pub fn with_affixes(prefix: &str, extension: &str) -> Result<Self> {
        check_affix(prefix)?;
        check_affix(extension)?;
        Self::create_unique(&std::env::temp_dir(), prefix, extension)
    }

    /// Extensionless unique file under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::create_unique(dir.as_ref(), "", "")
    }

    /// Unique file under `dir` with the given affixes.
    pub fn in_dir_with_affixes(
        dir: impl AsRef<Path>,
        prefix: &str,
        extension: &str,
    ) -> Result<Self> {
        check_affix(prefix)?;
        check_affix(extension)?;
        Self::create_unique(dir.as_ref(), prefix, extension)
    }

    /// Create (or truncate) the file at an explicit path and own it: the
    /// file is deleted when the instance drops.
    pub fn at_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        Ok(Self {
            path,
            file: Some(file),
        })
    }

    /// Path of the live file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The open handle.
    pub fn file(&self) -> &File {
        self.file.as_ref().expect("file handle present until drop")
    }

    /// The open handle, mutably.
    pub fn file_mut(&mut self) -> &mut File {
        self.file.as_mut().expect("file handle present until drop")
    }

    fn create_unique(dir: &Path, prefix: &str, extension: &str) -> Result<Self> {
        loop {
            let path = dir.join(unique_name(prefix, extension));
            match OpenOptions::new()
                .read(true)
                .write(true)
                .create_new(true)
                .open(&path)
            {
                Ok(file) => {
                    trace!(path = %path.display(), "temp file created");
                    return Ok(Self {
                        path,
                        file: Some(file),
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            drop(file);
            if let Err(e) = fs::remove_file(&self.path) {
                trace!(path = %self.path.display(), error = %e, "temp file removal failed");
            }
        }
    }
}
