//! Small OS utility helpers.
//!
//! Independent, self-contained wrappers over filesystem and console
//! primitives:
//!
//! - [`console::Capture`]: re-entrant, thread-safe capture of the crate's
//!   console output target, with timeout-bounded acquisition.
//! - [`LockFile`]: cross-process mutual exclusion backed by an exclusively
//!   locked file, with bounded exponential backoff.
//! - [`TempFile`] / [`TempDir`]: temporary artifacts deleted on drop.
//! - [`NumberedFile`]: auto-numbered file creation and highest-number
//!   discovery.
//! - [`FileSearch`] / [`Directories`]: enumeration by glob pattern.
//! - [`console::Prompt`]: yes/no and free-text console prompts.
//!
//! Components fail fast with typed errors (see [`OskitError`]); callers
//! typically match on [`OskitError::Timeout`] and treat everything else as
//! fatal. The crate emits `tracing` events but never installs a subscriber.

pub mod console;
pub mod errors;
pub mod lock;
pub mod numbered;
pub mod search;
pub mod temp;

pub use console::{Capture, Prompt};
pub use errors::{OskitError, Result};
pub use lock::{LockFile, LockOptions};
pub use numbered::{NumberedFile, highest_numbered};
pub use search::{Directories, FileSearch};
pub use temp::{TempDir, TempFile, unique_temp_path};

/// Convenience imports for downstream crates.
pub mod prelude {
    pub use crate::console::{Capture, Prompt};
    pub use crate::errors::{OskitError, Result};
    pub use crate::lock::{LockFile, LockOptions};
    pub use crate::numbered::NumberedFile;
    pub use crate::search::{Directories, FileSearch};
    pub use crate::temp::{TempDir, TempFile};
}
