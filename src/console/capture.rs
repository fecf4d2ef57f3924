//! Re-entrant console output capture.
//!
//! Redirects the process-wide console target (see [`super::sink`]) into a
//! per-instance buffer for the lifetime of a [`Capture`] guard.
//!
//! Design:
//! - One thread at a time owns redirection; other threads block in
//!   [`Capture::new`] / [`Capture::with_timeout`] until the outermost guard
//!   on the owner thread drops.
//! - The owner thread may construct further guards without blocking; each
//!   nested guard stacks a fresh buffer in front of the previous target.
//! - Bookkeeping (owner thread, nesting depth) lives behind a lightweight
//!   mutex; cross-thread exclusion is a condvar gate, so the owner never
//!   waits on a lock it already holds.
//!
//! Notes:
//! - Guards must drop in LIFO order relative to their construction. That is
//!   a caller contract, not an enforced invariant.
//! - A leaked guard (`mem::forget`) leaves the console redirected; there is
//!   no finalizer-style recovery.

use std::marker::PhantomData;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use tracing::trace;

use super::sink;
use crate::errors::{OskitError, Result};

struct CaptureState {
    owner: Option<ThreadId>,
    depth: u64,
}

static STATE: Mutex<CaptureState> = Mutex::new(CaptureState {
    owner: None,
    depth: 0,
});
static GATE: Condvar = Condvar::new();

fn lock_state() -> MutexGuard<'static, CaptureState> {
    STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Guard that captures console output while alive.
///
/// Construction blocks until this thread owns redirection (or re-enters it);
/// dropping the guard restores the previous target. The guard is bound to
/// the constructing thread and cannot be sent to another.
#[derive(Debug)]
pub struct Capture {
    buffer: Arc<Mutex<String>>,
    outermost: bool,
    _not_send: PhantomData<*const ()>,
}

impl Capture {
    /// Capture console output, waiting indefinitely for any other thread's
    /// capture to finish.
    pub fn new() -> Result<Self> {
        Self::acquire(None)
    }

    /// Capture console output, waiting at most `timeout` for any other
    /// thread's capture to finish.
    ///
    /// Fails with [`OskitError::Timeout`] when the wait budget elapses; no
    /// redirection occurs in that case.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::acquire(Some(timeout))
    }

    /// Snapshot of everything written to the console since this guard was
    /// constructed. Reading does not drain the buffer.
    pub fn captured(&self) -> String {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn acquire(timeout: Option<Duration>) -> Result<Self> {
        let me = thread::current().id();
        let mut state = lock_state();

        let outermost = if state.owner == Some(me) {
            state.depth += 1;
            trace!(depth = state.depth, "nested console capture");
            false
        } else {
            match timeout {
                None => {
                    while state.owner.is_some() {
                        state = GATE.wait(state).unwrap_or_else(PoisonError::into_inner);
                    }
                }
                Some(budget) => {
                    let deadline = Instant::now() + budget;
                    while state.owner.is_some() {
                        let now = Instant::now();
                        if now >= deadline {
                            trace!(budget_ms = budget.as_millis() as u64, "console capture wait timed out");
                            return Err(OskitError::Timeout(budget));
                        }
                        let (guard, _) = GATE
                            .wait_timeout(state, deadline - now)
                            .unwrap_or_else(PoisonError::into_inner);
                        state = guard;
                    }
                }
            }
            state.owner = Some(me);
            trace!("console capture acquired");
            true
        };

        let buffer = Arc::new(Mutex::new(String::new()));
        sink::push_buffer(Arc::clone(&buffer));
        drop(state);

        Ok(Self {
            buffer,
            outermost,
            _not_send: PhantomData,
        })
    }
}

impl Drop for Capture {
    fn drop(&mut self) {
        let mut state = lock_state();
        sink::pop_buffer(&self.buffer);
        if self.outermost {
            state.owner = None;
            state.depth = 0;
            trace!("console capture released");
            GATE.notify_one();
        } else {
            state.depth = state.depth.saturating_sub(1);
        }
    }
}
