//! Temporary files and directories.
//!
//! Both types create their target eagerly and delete it when dropped.
//! Unique names combine epoch millis, the process id and a process-wide
//! counter; creation retries on the (unlikely) collision.

mod dir;
mod file;

pub use dir::{TempDir, unique_temp_path};
pub use file::TempFile;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use crate::errors::{OskitError, Result};

static SEQ: AtomicU64 = AtomicU64::new(0);

/// Build a candidate name `<prefix><millis>-<pid>-<seq><extension>`.
/// A leading dot is supplied for non-empty extensions that lack one.
pub(crate) fn unique_name(prefix: &str, extension: &str) -> String {
    let epoch_ms = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let pid = std::process::id();
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);

    let mut name = format!("{prefix}{epoch_ms}-{pid}-{seq}");
    if !extension.is_empty() {
        if !extension.starts_with('.') {
            name.push('.');
        }
        name.push_str(extension);
    }
    name
}

/// Reject affixes that could escape the temp root.
pub(crate) fn check_affix(affix: &str) -> Result<()> {
    if affix.contains("..") {
        return Err(OskitError::InvalidArgument(format!(
            "affix must not contain '..': {affix:?}"
        )));
    }
    Ok(())
}
