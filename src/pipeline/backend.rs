//! Crossterm-backed terminal driver.
//!
//! Raw mode and bracketed paste are enabled for the duration of a run.
//! Autowrap is turned off so a line exactly as wide as the terminal does not
//! push the cursor onto the next line. The screen is never switched to the
//! alternate buffer; the UI is drawn inline below the cursor.

use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste};
use crossterm::terminal::{self, DisableLineWrap, EnableLineWrap};
use crossterm::{cursor, execute};
use parking_lot::Mutex;

use super::terminal::{Restore, Terminal};
use super::writer::Writer;
use crate::error::TermError;
use crate::input::convert::convert_event;
use crate::input::Event;
use crate::styled::Text;
use crate::view::Buffer;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);
const FALLBACK_SIZE: (usize, usize) = (24, 80);

/// A [`Terminal`] on the process's stdin and stdout.
pub struct CrosstermTerminal {
    writer: Mutex<Writer<Stdout>>,
    /// Events converted but not yet returned; a paste converts to many.
    pending: Mutex<VecDeque<Event>>,
    stopped: AtomicBool,
    poll_interval: Duration,
}

impl CrosstermTerminal {
    pub fn new() -> Self {
        Self {
            writer: Mutex::new(Writer::new(io::stdout())),
            pending: Mutex::new(VecDeque::new()),
            stopped: AtomicBool::new(false),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// How long `read_event` waits for input before checking whether the
    /// reader has been closed.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for CrosstermTerminal {
    fn setup(&self) -> Result<Restore, TermError> {
        terminal::enable_raw_mode().map_err(|err| TermError::Setup(err.to_string()))?;
        if let Err(err) = execute!(io::stdout(), EnableBracketedPaste, DisableLineWrap) {
            let _ = terminal::disable_raw_mode();
            return Err(TermError::Setup(err.to_string()));
        }
        self.stopped.store(false, Ordering::SeqCst);
        tracing::debug!("terminal set up");

        Ok(Restore::new(|| {
            if let Err(err) = execute!(io::stdout(), DisableBracketedPaste, EnableLineWrap, cursor::Show) {
                tracing::warn!(%err, "cannot restore terminal modes");
            }
            if let Err(err) = terminal::disable_raw_mode() {
                tracing::warn!(%err, "cannot leave raw mode");
            }
            tracing::debug!("terminal restored");
        }))
    }

    fn size(&self) -> (usize, usize) {
        match terminal::size() {
            Ok((cols, rows)) => (rows as usize, cols as usize),
            Err(err) => {
                tracing::warn!(%err, "cannot get terminal size");
                FALLBACK_SIZE
            }
        }
    }

    fn read_event(&self) -> Result<Event, TermError> {
        loop {
            if self.stopped.load(Ordering::SeqCst) {
                return Err(TermError::Stopped);
            }
            if let Some(event) = self.pending.lock().pop_front() {
                return Ok(event);
            }
            if !event::poll(self.poll_interval)? {
                continue;
            }
            let events = convert_event(event::read()?);
            self.pending.lock().extend(events);
        }
    }

    fn close_reader(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    fn update_buffer(&self, msg: Option<&Text>, buf: &Buffer, full: bool) -> Result<(), TermError> {
        self.writer.lock().update_buffer(msg, buf, full)?;
        Ok(())
    }

    fn reset_buffer(&self) {
        self.writer.lock().reset_buffer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_reader_stops_without_touching_tty() {
        let term = CrosstermTerminal::new().with_poll_interval(Duration::from_millis(5));
        assert_eq!(term.poll_interval(), Duration::from_millis(5));
        term.close_reader();
        assert!(matches!(term.read_event(), Err(TermError::Stopped)));
    }

    #[test]
    fn test_pending_events_drain_in_order() {
        let term = CrosstermTerminal::new();
        term.pending.lock().extend([Event::PasteSetting(true), Event::PasteSetting(false)]);
        assert_eq!(term.read_event().ok(), Some(Event::PasteSetting(true)));
        assert_eq!(term.read_event().ok(), Some(Event::PasteSetting(false)));
    }
}
