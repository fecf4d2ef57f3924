//! Exclusive lock file.
//!
//! Uses a file as a mutual-exclusion token between threads and processes:
//! the file is held open with an exclusive OS lock while a [`LockFile`]
//! guard is alive, and deleted when the guard drops.
//!
//! Design:
//! - Acquisition opens-or-creates the file read/write and takes an
//!   exclusive lock on it. Contention sleeps and retries, doubling the
//!   delay for the first few retries and then holding it constant, until
//!   the deadline elapses.
//! - Any filesystem error other than contention aborts the acquisition
//!   immediately.
//!
//! Notes:
//! - The lock is released when the guard is dropped; removal of the
//!   on-disk file is best-effort.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;
use tracing::{trace, warn};

use crate::errors::{OskitError, Result};

/// Retry tuning for [`LockFile::acquire_with`].
#[derive(Debug, Clone)]
pub struct LockOptions {
    /// Total wait budget. `None` waits forever.
    pub max_wait: Option<Duration>,
    /// Sleep before the first retry.
    pub first_delay: Duration,
    /// Number of times the delay is multiplied before it is held constant.
    pub growth_limit: u32,
    /// Factor applied to the delay while under the growth limit.
    pub multiplier: u32,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            max_wait: None,
            first_delay: Duration::from_millis(50),
            growth_limit: 3,
            multiplier: 2,
        }
    }
}

/// Retry delay schedule: grows geometrically for `growth_limit` steps,
/// then stays constant.
struct Backoff {
    delay: Duration,
    multiplier: u32,
    remaining_growth: u32,
}

impl Backoff {
    fn new(options: &LockOptions) -> Self {
        Self {
            delay: options.first_delay,
            multiplier: options.multiplier,
            remaining_growth: options.growth_limit,
        }
    }

    /// Delay to sleep before the next retry.
    fn next_delay(&mut self) -> Duration {
        let current = self.delay;
        if self.remaining_growth > 0 {
            self.remaining_growth -= 1;
            self.delay *= self.multiplier;
        }
        current
    }
}

/// RAII guard held while the lock file is exclusively owned.
///
/// The file's presence is the lock: it exists at [`LockFile::path`] while
/// the guard is alive and is deleted when the guard drops.
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
    file: Option<File>,
}

impl LockFile {
    /// Acquire the lock at `path`, waiting forever.
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self> {
        Self::acquire_with(path, LockOptions::default())
    }

    /// Acquire the lock at `path` under `options`.
    ///
    /// Blocks, retrying with backoff, until the file can be exclusively
    /// locked or the deadline elapses ([`OskitError::Timeout`]).
    pub fn acquire_with(path: impl AsRef<Path>, options: LockOptions) -> Result<Self> {
        let path = std::path::absolute(path.as_ref())?;
        let deadline = options.max_wait.map(|budget| (budget, Instant::now() + budget));
        let mut backoff = Backoff::new(&options);
        let started = Instant::now();

        loop {
            if let Some((budget, deadline)) = deadline {
                if Instant::now() > deadline {
                    warn!(
                        path = %path.display(),
                        waited_ms = started.elapsed().as_millis() as u64,
                        "lock wait deadline elapsed"
                    );
                    return Err(OskitError::Timeout(budget));
                }
            }

            match try_open_exclusive(&path)? {
                Some(file) => {
                    trace!(
                        path = %path.display(),
                        waited_ms = started.elapsed().as_millis() as u64,
                        "lock file acquired"
                    );
                    return Ok(Self {
                        path,
                        file: Some(file),
                    });
                }
                None => {
                    let delay = backoff.next_delay();
                    trace!(
                        path = %path.display(),
                        delay_ms = delay.as_millis() as u64,
                        "lock file busy, backing off"
                    );
                    thread::sleep(delay);
                }
            }
        }
    }

    /// Single non-blocking attempt. `Ok(None)` when the lock is held
    /// elsewhere.
    pub fn try_acquire(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = std::path::absolute(path.as_ref())?;
        Ok(try_open_exclusive(&path)?.map(|file| Self {
            path,
            file: Some(file),
        }))
    }

    /// Absolute path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = FileExt::unlock(&file);
            drop(file);
            // Removal may race a waiter re-creating the file; ignore errors.
            if let Err(e) = fs::remove_file(&self.path) {
                trace!(path = %self.path.display(), error = %e, "lock file removal failed");
            } else {
                trace!(path = %self.path.display(), "lock file released");
            }
        }
    }
}

/// Open-or-create `path` and take an exclusive OS lock on it.
/// `Ok(None)` means the file is locked elsewhere.
fn try_open_exclusive(path: &Path) -> Result<Option<File>> {
    // Never truncate: the file may be a lock currently held elsewhere.
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;

    match file.try_lock_exclusive() {
        Ok(()) => Ok(Some(file)),
        Err(e) if is_contended(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn is_contended(e: &io::Error) -> bool {
    e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
