//! Harness - Driving a component on demand in tests.
//!
//! The run loop is a push system: input arrives whenever the user types and
//! the UI refreshes at once. A harness is a pull system instead. Sending an
//! event mutates state, but the effect is only observable at the next
//! render. Refresh requests made in between (by [`Context::add_msg`] or a
//! background task) are therefore handled lazily, at the start of every
//! `send` and `render`.
//!
//! # Example
//!
//! ```
//! use imtui::comp::{comp, React, Reaction};
//! use imtui::harness::Harness;
//! use imtui::input::Event;
//! use imtui::view::{text, AnyView};
//! use imtui::Text;
//!
//! let echo = comp(|c| {
//!     let last = c.state("last", String::new());
//!     let view: AnyView = Box::new(text(vec![Text::plain(last.get())]));
//!     let react: React = Box::new(move |event| match event {
//!         Event::Key(key) => {
//!             let _ = last.set(key.to_string());
//!             Reaction::Consumed
//!         }
//!         _ => Reaction::Unused,
//!     });
//!     (view, react)
//! });
//!
//! let mut h = Harness::new(echo);
//! h.send_keys(&["Ctrl-A"]).unwrap();
//! assert_eq!(h.render(20, 1).plain_lines(), vec!["Ctrl-A"]);
//! ```
//!
//! [`ScriptedTerminal`] is a [`Terminal`] for exercising the full run loop
//! without a tty: events are queued up front or from another thread, and
//! every frame written is recorded.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::comp::{with_init, Comp, Context, Reaction};
use crate::error::{KeyError, TermError};
use crate::host::HostFrame;
use crate::input::{Event, Key};
use crate::pipeline::{Restore, StatefulComp, Terminal};
use crate::state::{StateMap, Value};
use crate::styled::Text;
use crate::view::Buffer;

/// Width used by [`Harness::render_default`].
pub const DEFAULT_WIDTH: usize = 40;
/// Height used by [`Harness::render_default`].
pub const DEFAULT_HEIGHT: usize = 10;

/// A component under test.
pub struct Harness {
    f: Comp,
    sc: StatefulComp,
}

impl Harness {
    pub fn new(f: Comp) -> Self {
        let sc = StatefulComp::new(f.clone(), frame());
        Self { f, sc }
    }

    /// Recreate the component on a fresh state tree, with the given state
    /// variables initialized before its first call. The previous tree
    /// receives the finish signal.
    pub fn setup<K, I>(&mut self, pairs: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        self.sc = StatefulComp::new(with_init(self.f.clone(), pairs), frame());
    }

    /// Send events one by one, returning each reaction.
    pub fn send(&mut self, events: impl IntoIterator<Item = Event>) -> Vec<Reaction> {
        events
            .into_iter()
            .map(|event| {
                self.sc.refresh_if_requested();
                self.sc.react(event)
            })
            .collect()
    }

    /// Send each character of `s` as an unmodified key.
    pub fn send_text(&mut self, s: &str) -> Vec<Reaction> {
        self.send(s.chars().map(|c| Event::Key(Key::char(c))))
    }

    /// Send events by name: key names as accepted by [`Key::parse`], plus
    /// `start-paste` and `end-paste`. Nothing is sent if any name is invalid.
    pub fn send_keys(&mut self, names: &[&str]) -> Result<Vec<Reaction>, KeyError> {
        let events = names
            .iter()
            .map(|name| match *name {
                "start-paste" => Ok(Event::PasteSetting(true)),
                "end-paste" => Ok(Event::PasteSetting(false)),
                name => Event::key(name),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.send(events))
    }

    pub fn render(&mut self, width: usize, height: usize) -> Buffer {
        self.sc.refresh_if_requested();
        self.sc.render(width, height)
    }

    /// Render at [`DEFAULT_WIDTH`] x [`DEFAULT_HEIGHT`].
    pub fn render_default(&mut self) -> Buffer {
        self.render(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    pub fn refresh(&mut self) {
        self.sc.refresh();
    }

    /// Block until something requests a refresh, then refresh.
    pub fn wait_refresh(&mut self) {
        self.sc.wait_refresh();
    }

    pub fn context(&self) -> Context {
        self.sc.context()
    }

    pub fn state(&self) -> StateMap {
        self.sc.snapshot()
    }

    pub fn pop_msgs(&self) -> Option<Text> {
        self.sc.merge_and_pop_msgs()
    }
}

fn frame() -> HostFrame {
    HostFrame::new("harness")
}

// =============================================================================
// ScriptedTerminal
// =============================================================================

const READ_POLL: Duration = Duration::from_millis(5);

/// One frame written through [`Terminal::update_buffer`].
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub msg: Option<Text>,
    pub buf: Buffer,
    pub full: bool,
}

/// An in-memory [`Terminal`].
pub struct ScriptedTerminal {
    size: Mutex<(usize, usize)>,
    tx: flume::Sender<Result<Event, TermError>>,
    rx: flume::Receiver<Result<Event, TermError>>,
    stopped: AtomicBool,
    frames: Mutex<Vec<Frame>>,
    setups: AtomicUsize,
    restored: Arc<AtomicBool>,
}

impl ScriptedTerminal {
    /// A terminal of `rows` x `cols` with `events` queued for reading.
    pub fn new(rows: usize, cols: usize, events: impl IntoIterator<Item = Event>) -> Self {
        let (tx, rx) = flume::unbounded();
        for event in events {
            let _ = tx.send(Ok(event));
        }
        Self {
            size: Mutex::new((rows, cols)),
            tx,
            rx,
            stopped: AtomicBool::new(false),
            frames: Mutex::new(Vec::new()),
            setups: AtomicUsize::new(0),
            restored: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Queue another event.
    pub fn push(&self, event: Event) {
        let _ = self.tx.send(Ok(event));
    }

    /// Queue a read failure.
    pub fn push_error(&self, err: TermError) {
        let _ = self.tx.send(Err(err));
    }

    pub fn resize(&self, rows: usize, cols: usize) {
        *self.size.lock() = (rows, cols);
    }

    /// Every frame written so far.
    pub fn frames(&self) -> Vec<Frame> {
        self.frames.lock().clone()
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.frames.lock().last().cloned()
    }

    pub fn setup_count(&self) -> usize {
        self.setups.load(Ordering::SeqCst)
    }

    /// Whether the guard from the last setup has been dropped.
    pub fn is_restored(&self) -> bool {
        self.restored.load(Ordering::SeqCst)
    }

    pub fn is_reader_closed(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl Terminal for ScriptedTerminal {
    fn setup(&self) -> Result<Restore, TermError> {
        self.setups.fetch_add(1, Ordering::SeqCst);
        self.stopped.store(false, Ordering::SeqCst);
        self.restored.store(false, Ordering::SeqCst);
        let restored = self.restored.clone();
        Ok(Restore::new(move || restored.store(true, Ordering::SeqCst)))
    }

    fn size(&self) -> (usize, usize) {
        *self.size.lock()
    }

    fn read_event(&self) -> Result<Event, TermError> {
        loop {
            if self.stopped.load(Ordering::SeqCst) {
                return Err(TermError::Stopped);
            }
            match self.rx.recv_timeout(READ_POLL) {
                Ok(result) => return result,
                Err(flume::RecvTimeoutError::Timeout) => continue,
                Err(flume::RecvTimeoutError::Disconnected) => return Err(TermError::Stopped),
            }
        }
    }

    fn close_reader(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    fn update_buffer(&self, msg: Option<&Text>, buf: &Buffer, full: bool) -> Result<(), TermError> {
        self.frames.lock().push(Frame {
            msg: msg.cloned(),
            buf: buf.clone(),
            full,
        });
        Ok(())
    }

    fn reset_buffer(&self) {
        self.frames.lock().clear();
    }
}
