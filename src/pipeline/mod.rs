//! Pipeline - From components to the terminal
//!
//! This module connects a root component to a terminal driver.
//!
//! # Pipeline Architecture
//!
//! ```text
//! reader thread ──events──┐
//!                         ├─→ driver: react / refresh → render → Writer
//! background tasks ─refresh┘
//! ```
//!
//! - [`StatefulComp`] - A component bound to its state tree; renders and reacts
//! - [`run`] - The event loop, returning a [`Finished`] state snapshot
//! - [`Terminal`] - The driver interface, implemented by [`CrosstermTerminal`]
//! - [`Writer`] - Line-based delta output used by the crossterm driver
//!
//! Renders never overlap with each other or with a react pass; both run on
//! the driver thread under the batch lock.

mod backend;
mod run;
mod stateful;
mod terminal;
mod writer;

pub use backend::CrosstermTerminal;
pub use run::{justify, run, Finished, Justify, RunConfig};
pub use stateful::StatefulComp;
pub use terminal::{Restore, Terminal};
pub use writer::Writer;
