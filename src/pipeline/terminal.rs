//! The terminal driver interface consumed by the run loop.

use std::fmt;

use crate::error::TermError;
use crate::input::Event;
use crate::styled::Text;
use crate::view::Buffer;

/// A terminal the run loop can drive.
///
/// `read_event` is called from a dedicated reader thread while the other
/// methods are called from the driver thread, hence `Send + Sync`.
pub trait Terminal: Send + Sync {
    /// Put the terminal into the mode the run loop needs. Dropping the
    /// returned guard undoes it.
    fn setup(&self) -> Result<Restore, TermError>;

    /// Current size as `(rows, cols)`.
    fn size(&self) -> (usize, usize);

    /// Block until the next event. Returns [`TermError::Stopped`] once
    /// [`close_reader`](Self::close_reader) has been called.
    fn read_event(&self) -> Result<Event, TermError>;

    /// Make `read_event` return [`TermError::Stopped`].
    fn close_reader(&self);

    /// Show `buf`, preceded by `msg` if there is one. With `full`, the
    /// previous frame is erased instead of updated in place.
    fn update_buffer(&self, msg: Option<&Text>, buf: &Buffer, full: bool) -> Result<(), TermError>;

    /// Forget the frame on screen, so the next update starts afresh.
    fn reset_buffer(&self);
}

/// Undoes a [`Terminal::setup`] when dropped.
pub struct Restore(Option<Box<dyn FnOnce() + Send>>);

impl Restore {
    pub fn new(f: impl FnOnce() + Send + 'static) -> Self {
        Self(Some(Box::new(f)))
    }

    /// A guard with nothing to undo.
    pub fn noop() -> Self {
        Self(None)
    }
}

impl Drop for Restore {
    fn drop(&mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}

impl fmt::Debug for Restore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Restore").field(&self.0.is_some()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_restore_runs_once_on_drop() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let guard = Restore::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(count.load(Ordering::SeqCst), 0);
        drop(guard);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        drop(Restore::noop());
    }
}
