//! Auto-numbered file creation and discovery.
//!
//! Creates files of the form `{dir}/{name}{sep}{n}[.ext]`, picking the
//! first free `n`, and finds the highest `n` already present among files
//! matching a `prefix{n}postfix` pattern.

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::{OskitError, Result};

/// A numbered file: the open handle plus the path that won the race.
/// Unlike [`crate::TempFile`], the file is not deleted on drop.
pub struct NumberedFile {
    path: PathBuf,
    file: File,
}

impl NumberedFile {
    /// Create `{dir}/{name}-{n}[.ext]` with the lowest free `n >= 1`.
    /// A `dir` of `None` means the current directory.
    pub fn create(dir: Option<&Path>, name: &str, ext: Option<&str>) -> Result<Self> {
        Self::create_with(dir, name, ext, "-", 1)
    }

    /// Create `{dir}/{name}{separator}{n}[.ext]`, trying `n = floor,
    /// floor+1, ...` until a fresh file can be created.
    pub fn create_with(
        dir: Option<&Path>,
        name: &str,
        ext: Option<&str>,
        separator: &str,
        floor: u64,
    ) -> Result<Self> {
        let mut n = floor;
        loop {
            let path = build_numbered_path(dir, name, separator, n, ext);
            match OpenOptions::new()
                .read(true)
                .write(true)
                .create_new(true)
                .open(&path)
            {
                Ok(file) => return Ok(Self { path, file }),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    /// Consume the guard, returning the open handle.
    pub fn into_file(self) -> File {
        self.file
    }
}

fn build_numbered_path(
    dir: Option<&Path>,
    name: &str,
    separator: &str,
    n: u64,
    ext: Option<&str>,
) -> PathBuf {
    let mut file_name = format!("{name}{separator}{n}");
    if let Some(ext) = ext {
        file_name.push('.');
        file_name.push_str(ext);
    }
    match dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Highest numeric value among files matching `prefix{n}postfix`.
///
/// The `{n}` specifier marks where the digits sit; it may appear anywhere
/// in the file name or extension, but not in the directory part. Returns
/// `None` when no file with an all-digit middle matches. A missing or
/// malformed specifier fails with [`OskitError::InvalidArgument`].
pub fn highest_numbered(pattern: &str) -> Result<Option<u64>> {
    let (prefix, specifier, postfix) = split_pattern(pattern)?;
    if specifier != "n" {
        return Err(OskitError::InvalidArgument(format!(
            "invalid specifier: {specifier:?}"
        )));
    }
    let (dir, name_prefix) = split_dir_from_name_prefix(&prefix);
    highest_in_dir(&dir, &name_prefix, &postfix)
}

/// Highest `n` among `{dir}/{name_prefix}<digits>{postfix}` files.
pub fn highest_in_dir(dir: &Path, name_prefix: &str, postfix: &str) -> Result<Option<u64>> {
    let mut highest: Option<u64> = None;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        let Some(rest) = file_name.strip_prefix(name_prefix) else {
            continue;
        };
        let Some(middle) = rest.strip_suffix(postfix) else {
            continue;
        };
        // Names like prefix-final.postfix have noise in the middle; skip them.
        if middle.is_empty() || !middle.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        if let Ok(n) = middle.parse::<u64>() {
            highest = Some(highest.map_or(n, |h| h.max(n)));
        }
    }

    Ok(highest)
}

/// Split `prefix{specifier}postfix` into its three parts.
pub fn split_pattern(pattern: &str) -> Result<(String, String, String)> {
    if pattern.is_empty() {
        return Err(OskitError::InvalidArgument("empty pattern".to_string()));
    }
    let Some(open) = pattern.find('{') else {
        return Err(OskitError::InvalidArgument(format!(
            "missing specifier in {pattern:?}"
        )));
    };
    let Some(close) = pattern.find('}') else {
        return Err(OskitError::InvalidArgument(format!(
            "malformed specifier in {pattern:?}"
        )));
    };
    if close <= open + 1 {
        return Err(OskitError::InvalidArgument(format!(
            "malformed specifier in {pattern:?}"
        )));
    }

    Ok((
        pattern[..open].to_string(),
        pattern[open + 1..close].to_string(),
        pattern[close + 1..].to_string(),
    ))
}

/// Split a combined path-and-name prefix into (directory, name prefix).
fn split_dir_from_name_prefix(prefix: &str) -> (PathBuf, String) {
    if prefix.is_empty() {
        return (PathBuf::from("."), String::new());
    }
    if prefix.ends_with(std::path::MAIN_SEPARATOR) || prefix.ends_with('/') {
        return (PathBuf::from(prefix), String::new());
    }
    let path = Path::new(prefix);
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => (
            parent.to_path_buf(),
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        ),
        _ => (PathBuf::from("."), prefix.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_pattern_parts() {
        assert_eq!(
            split_pattern("pre{n}post").unwrap(),
            ("pre".to_string(), "n".to_string(), "post".to_string())
        );
        assert_eq!(
            split_pattern("{n}").unwrap(),
            (String::new(), "n".to_string(), String::new())
        );
        assert_eq!(
            split_pattern("a/b/c-{n}.log").unwrap(),
            ("a/b/c-".to_string(), "n".to_string(), ".log".to_string())
        );
    }

    #[test]
    fn split_pattern_rejects_malformed() {
        assert!(split_pattern("").is_err());
        assert!(split_pattern("nope").is_err());
        assert!(split_pattern("{}").is_err());
        assert!(split_pattern("}{").is_err());
    }

    #[test]
    fn dir_and_name_prefix() {
        let (dir, name) = split_dir_from_name_prefix("log-");
        assert_eq!(dir, Path::new("."));
        assert_eq!(name, "log-");

        let (dir, name) = split_dir_from_name_prefix("/var/tmp/log-");
        assert_eq!(dir, Path::new("/var/tmp"));
        assert_eq!(name, "log-");

        let (dir, name) = split_dir_from_name_prefix("logs/");
        assert_eq!(dir, Path::new("logs/"));
        assert_eq!(name, "");
    }

    #[test]
    fn numbered_path_shapes() {
        assert_eq!(
            build_numbered_path(None, "f", "-", 3, Some("txt")),
            Path::new("f-3.txt")
        );
        assert_eq!(
            build_numbered_path(Some(Path::new("/d")), "f", "_", 12, None),
            Path::new("/d/f_12")
        );
    }
}
