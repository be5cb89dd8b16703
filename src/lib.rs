//! # imtui
//!
//! Immediate-mode Terminal UI runtime with a managed state tree.
//!
//! ## Architecture
//!
//! A component ([`Comp`]) is a plain function from a [`Context`] to a view
//! and an event handler. It keeps nothing between calls: all state lives in
//! one copy-on-write tree owned by the runtime, and the context addresses a
//! subtree of it. Whenever state changes, the component is called again and
//! its fresh view is rendered.
//!
//! ```text
//! terminal events ─→ React ─→ state tree ─→ Comp ─→ View ─→ Buffer ─→ terminal
//!                                 ↑
//!                    background tasks (update_async / refresh)
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Colours, attributes, styles, cells and positions
//! - [`styled`] - Styled text
//! - [`state`] - The state tree, typed state variables and conversions
//! - [`host`] - Adapting callables from a scripting host to native functions
//! - [`input`] - Keys and events, with crossterm conversion
//! - [`view`] - Views and the buffers they render to
//! - [`comp`] - Components, contexts and reactions
//! - [`pipeline`] - The stateful component, event loop and terminal driver
//! - [`harness`] - Driving components on demand in tests
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use imtui::{comp, run, CrosstermTerminal, Event, Key, React, Reaction, RunConfig, Text};
//! use imtui::view::{text, AnyView};
//!
//! let counter = comp(|c| {
//!     let value = c.state("value", 0i64);
//!     let view: AnyView = Box::new(text(vec![Text::plain(value.get().to_string())]));
//!     let react: React = Box::new(move |event| match event {
//!         Event::Key(key) if key == Key::ENTER => {
//!             let _ = value.swap(|n| n + 1);
//!             Reaction::Consumed
//!         }
//!         Event::Key(key) if key == Key::ESCAPE => Reaction::Finish,
//!         _ => Reaction::Unused,
//!     });
//!     (view, react)
//! });
//!
//! let finished = run(counter, Arc::new(CrosstermTerminal::new()), RunConfig::default())?;
//! println!("{:?}", finished.state().get("value"));
//! # Ok::<(), imtui::Error>(())
//! ```

pub mod comp;
pub mod error;
pub mod harness;
pub mod host;
pub mod input;
pub mod pipeline;
mod runtime;
pub mod state;
pub mod styled;
pub mod types;
pub mod view;

// Re-export commonly used items
pub use types::*;

pub use error::{
    ConvertError, Error, HostError, HostErrorKind, KeyError, LayoutError, Result, StateError,
    TermError,
};

pub use styled::{Segment, Text};

pub use state::{StateMap, StateSubTreeVar, StateValue, StateVar, Value};

pub use host::{adapt, Func, HostCallable, HostFn, HostFrame};

pub use input::{Event, Key, KeyCode, Mod, MouseButton, MouseEvent, MouseKind};

pub use view::{AnyView, Buffer, View};

pub use comp::{comp, react_nop, with_before, with_init, Binding, Comp, Context, React, Reaction};

pub use pipeline::{
    run, CrosstermTerminal, Finished, Justify, Restore, RunConfig, StatefulComp, Terminal,
};
