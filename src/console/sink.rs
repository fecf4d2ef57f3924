//! Process-wide console output target.
//!
//! The crate owns a redirectable "console": by default every write goes to
//! real stdout, but [`super::Capture`] can stack an in-memory buffer in
//! front of it. Writes always land in the topmost buffer, or in stdout when
//! no capture is active.
//!
//! Notes:
//! - Target swaps happen only under the capture bookkeeping lock.
//! - This module returns io::Result to keep low-level errors precise.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Stack of active capture buffers. Empty stack means real stdout.
static REDIRECT: Mutex<Vec<Arc<Mutex<String>>>> = Mutex::new(Vec::new());

fn current_buffer() -> Option<Arc<Mutex<String>>> {
    REDIRECT
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .last()
        .cloned()
}

/// Write `text` to the active console target.
pub fn write(text: &str) -> io::Result<()> {
    match current_buffer() {
        Some(buffer) => {
            buffer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_str(text);
            Ok(())
        }
        None => {
            let mut out = io::stdout().lock();
            out.write_all(text.as_bytes())?;
            out.flush()
        }
    }
}

/// Write `text` followed by a newline to the active console target.
pub fn write_line(text: &str) -> io::Result<()> {
    match current_buffer() {
        Some(buffer) => {
            let mut buffer = buffer.lock().unwrap_or_else(PoisonError::into_inner);
            buffer.push_str(text);
            buffer.push('\n');
            Ok(())
        }
        None => {
            let mut out = io::stdout().lock();
            out.write_all(text.as_bytes())?;
            out.write_all(b"\n")?;
            out.flush()
        }
    }
}

/// Write one line per item.
pub fn write_all_lines<I, S>(lines: I) -> io::Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for line in lines {
        write_line(line.as_ref())?;
    }
    Ok(())
}

/// Stack a capture buffer in front of the current target.
pub(crate) fn push_buffer(buffer: Arc<Mutex<String>>) {
    REDIRECT
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(buffer);
}

/// Remove `buffer` from the redirection stack, restoring whatever was
/// active before it. Guards release in LIFO order; a buffer that is no
/// longer topmost is still removed so the rest of the stack stays intact.
pub(crate) fn pop_buffer(buffer: &Arc<Mutex<String>>) {
    let mut stack = REDIRECT.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(idx) = stack.iter().rposition(|b| Arc::ptr_eq(b, buffer)) {
        stack.remove(idx);
    }
}
