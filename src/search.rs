//! File and directory enumeration by glob pattern.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::errors::{OskitError, Result};

/// Compile glob patterns into a matcher; an empty set matches everything.
fn compile_patterns(patterns: &[&str]) -> Result<GlobSet> {
    let patterns: &[&str] = if patterns.is_empty() { &["*"] } else { patterns };
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| OskitError::InvalidArgument(format!("bad glob {pattern:?}: {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| OskitError::InvalidArgument(e.to_string()))
}

/// File-name patterns plus enumeration over directory top levels.
#[derive(Debug)]
pub struct FileSearch {
    matcher: GlobSet,
    patterns: Vec<String>,
}

impl FileSearch {
    /// `patterns` are file-name globs; an empty slice means `*`.
    pub fn new(patterns: &[&str]) -> Result<Self> {
        let matcher = compile_patterns(patterns)?;
        let patterns = if patterns.is_empty() {
            vec!["*".to_string()]
        } else {
            patterns.iter().map(|p| p.to_string()).collect()
        };
        Ok(Self { matcher, patterns })
    }

    /// The configured patterns.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Files whose names match any pattern, top level of each directory
    /// only, sorted within each directory. An empty `dirs` means the
    /// current directory.
    pub fn files_in(&self, dirs: &[&Path]) -> Result<Vec<PathBuf>> {
        let cwd;
        let dirs: Vec<&Path> = if dirs.is_empty() {
            cwd = env::current_dir()?;
            vec![cwd.as_path()]
        } else {
            dirs.to_vec()
        };

        let mut found = Vec::new();
        for dir in dirs {
            let mut in_dir = Vec::new();
            for entry in fs::read_dir(dir)? {
                let entry = entry?;
                if !entry.file_type()?.is_file() {
                    continue;
                }
                if self.matcher.is_match(Path::new(&entry.file_name())) {
                    in_dir.push(entry.path());
                }
            }
            in_dir.sort();
            found.extend(in_dir);
        }
        Ok(found)
    }
}

/// Directory enumeration under a set of roots, with optional recursion
/// and exclusions.
pub struct Directories {
    roots: Vec<PathBuf>,
    recursive: bool,
    exclusions: Vec<PathBuf>,
}

impl Directories {
    /// An empty `roots` means the current directory.
    pub fn new(roots: &[&Path]) -> Self {
        let roots = if roots.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            roots.iter().map(|r| r.to_path_buf()).collect()
        };
        Self {
            roots,
            recursive: true,
            exclusions: Vec::new(),
        }
    }

    /// Whether to descend below the roots. Defaults to true.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Directories to omit from the results (compared as absolute paths).
    pub fn exclude(mut self, paths: &[&Path]) -> Self {
        self.exclusions = paths.iter().map(|p| p.to_path_buf()).collect();
        self
    }

    /// Enumerate directories whose names match `pattern`, as absolute
    /// paths. Non-recursive mode returns the roots themselves.
    pub fn directories(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let matcher = compile_patterns(&[pattern])?;
        let mut found = Vec::new();

        for root in &self.roots {
            if !self.recursive {
                found.push(std::path::absolute(root)?);
                continue;
            }
            for entry in WalkDir::new(root)
                .min_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if !entry.file_type().is_dir() {
                    continue;
                }
                if !matcher.is_match(entry.file_name()) {
                    continue;
                }
                let abs = std::path::absolute(entry.path())?;
                if self.exclusions.iter().any(|x| *x == abs) {
                    continue;
                }
                found.push(abs);
            }
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patterns_fall_back_to_match_all() {
        let search = FileSearch::new(&[]).unwrap();
        assert_eq!(search.patterns(), ["*"]);
    }

    #[test]
    fn bad_glob_is_invalid_argument() {
        let err = FileSearch::new(&["[unclosed"]).unwrap_err();
        assert!(matches!(err, OskitError::InvalidArgument(_)));
    }
}
