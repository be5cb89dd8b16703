//! The event loop.
//!
//! A reader thread feeds terminal events through a rendezvous channel. The
//! driver renders, then waits for whichever comes first: an event, which is
//! handled and followed by a refresh, or a refresh request from a background
//! task. A finishing reaction ends the loop after one last render.

use std::fmt;
use std::sync::Arc;
use std::thread;

use crate::comp::{Comp, Context, Reaction};
use crate::error::{Error, TermError};
use crate::host::HostFrame;
use crate::input::Event;
use crate::state::StateMap;
use crate::view::Buffer;

use super::stateful::StatefulComp;
use super::terminal::Terminal;

/// How a frame shorter than the terminal is padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    /// No padding; the frame takes only the lines it needs.
    #[default]
    None,
    Top,
    Center,
    Bottom,
}

/// Options for [`run`].
pub struct RunConfig {
    pub frame: HostFrame,
    /// Upper bound on the height given to the component.
    pub max_height: Option<usize>,
    pub justify: Justify,
    /// Called once with the root context before the first render.
    pub on_context_ready: Option<Box<dyn FnOnce(Context)>>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frame: HostFrame::default(),
            max_height: None,
            justify: Justify::None,
            on_context_ready: None,
        }
    }
}

impl RunConfig {
    pub fn with_frame(mut self, frame: HostFrame) -> Self {
        self.frame = frame;
        self
    }

    pub fn max_height(mut self, max_height: usize) -> Self {
        self.max_height = Some(max_height);
        self
    }

    pub fn justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }

    pub fn on_context_ready(mut self, f: impl FnOnce(Context) + 'static) -> Self {
        self.on_context_ready = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("frame", &self.frame)
            .field("max_height", &self.max_height)
            .field("justify", &self.justify)
            .field("on_context_ready", &self.on_context_ready.is_some())
            .finish()
    }
}

/// How the event loop ended, with the final state tree.
#[derive(Debug, Clone)]
pub enum Finished {
    /// A [`Reaction::Finish`].
    Normal(StateMap),
    /// A [`Reaction::FinishEOF`], signalling end of input.
    Eof(StateMap),
}

impl Finished {
    pub fn state(&self) -> &StateMap {
        match self {
            Finished::Normal(state) | Finished::Eof(state) => state,
        }
    }

    pub fn into_state(self) -> StateMap {
        match self {
            Finished::Normal(state) | Finished::Eof(state) => state,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Finished::Eof(_))
    }
}

enum Wake {
    Event(Result<Event, TermError>),
    /// The reader thread is gone.
    ReaderGone,
    Refresh,
}

/// Run `f` on `term` until it finishes.
///
/// Read errors from the terminal end the loop and are returned.
pub fn run<T>(f: Comp, term: Arc<T>, config: RunConfig) -> Result<Finished, Error>
where
    T: Terminal + 'static,
{
    let RunConfig {
        frame,
        max_height,
        justify: justification,
        on_context_ready,
    } = config;

    let _restore = term.setup()?;

    let (event_tx, event_rx) = flume::bounded::<Result<Event, TermError>>(0);
    let reader = term.clone();
    thread::Builder::new()
        .name("imtui-reader".to_string())
        .spawn(move || {
            loop {
                let result = match reader.read_event() {
                    Err(TermError::Stopped) => break,
                    result => result,
                };
                if let Err(err) = &result {
                    tracing::warn!(%err, "cannot read terminal event");
                }
                if event_tx.send(result).is_err() {
                    break;
                }
            }
            tracing::debug!("reader thread exiting");
        })
        .map_err(TermError::Io)?;

    let mut sc = StatefulComp::new(f, frame);
    if let Some(on_context_ready) = on_context_ready {
        on_context_ready(sc.context());
    }

    let result = drive(&mut sc, &*term, &event_rx, max_height, justification);

    sc.finish();
    term.close_reader();
    tracing::debug!(ok = result.is_ok(), "event loop finished");
    result
}

fn drive<T: Terminal + ?Sized>(
    sc: &mut StatefulComp,
    term: &T,
    events: &flume::Receiver<Result<Event, TermError>>,
    max_height: Option<usize>,
    justification: Justify,
) -> Result<Finished, Error> {
    let mut full = false;
    let mut reader_gone = false;

    loop {
        let (rows, cols) = term.size();
        let height = max_height.map_or(rows, |max| rows.min(max));
        let buf = justify(sc.render(cols, height), height, justification);
        let msg = sc.merge_and_pop_msgs();
        term.update_buffer(msg.as_ref(), &buf, full)?;
        full = false;

        let wake = if reader_gone {
            let _ = sc.refresh_rx().recv();
            Wake::Refresh
        } else {
            flume::Selector::new()
                .recv(events, |result| match result {
                    Ok(event) => Wake::Event(event),
                    Err(_) => Wake::ReaderGone,
                })
                .recv(sc.refresh_rx(), |_| Wake::Refresh)
                .wait()
        };

        match wake {
            Wake::Event(Ok(event)) => {
                if event == Event::Resize {
                    full = true;
                }
                let reaction = sc.react(event);
                if reaction.is_finish() {
                    return finish(sc, term, max_height, reaction).map_err(Error::from);
                }
            }
            Wake::Event(Err(err)) => return Err(err.into()),
            Wake::ReaderGone => {
                tracing::debug!("event channel closed, waiting on refreshes only");
                reader_gone = true;
            }
            Wake::Refresh => sc.refresh(),
        }
    }
}

/// Write the final frame with an empty line below it and the cursor on that
/// line, so whatever runs next starts on a fresh line.
fn finish<T: Terminal + ?Sized>(
    sc: &StatefulComp,
    term: &T,
    max_height: Option<usize>,
    reaction: Reaction,
) -> Result<Finished, TermError> {
    let (rows, cols) = term.size();
    let height = max_height.map_or(rows, |max| rows.min(max));
    let mut buf = sc.render(cols, height);
    buf.extend_down(Buffer::from_lines(cols, vec![Vec::new()]), true);
    let msg = sc.merge_and_pop_msgs();
    term.update_buffer(msg.as_ref(), &buf, false)?;

    let state = sc.snapshot();
    Ok(match reaction {
        Reaction::FinishEOF => Finished::Eof(state),
        _ => Finished::Normal(state),
    })
}

/// Pad `buf` with empty lines to `height` lines. A buffer already that tall
/// is returned unchanged.
pub fn justify(buf: Buffer, height: usize, justification: Justify) -> Buffer {
    let width = buf.width;
    let padding = height.saturating_sub(buf.height());
    if padding == 0 {
        return buf;
    }
    match justification {
        Justify::None => buf,
        Justify::Top => {
            let mut buf = buf;
            buf.extend_down(empty_lines(width, padding), false);
            buf
        }
        Justify::Center => {
            let top = padding / 2;
            let mut out = empty_lines(width, top);
            out.extend_down(buf, true);
            out.extend_down(empty_lines(width, padding - top), false);
            out
        }
        Justify::Bottom => {
            let mut out = empty_lines(width, padding);
            out.extend_down(buf, true);
            out
        }
    }
}

fn empty_lines(width: usize, n: usize) -> Buffer {
    Buffer::from_lines(width, vec![Vec::new(); n])
}
