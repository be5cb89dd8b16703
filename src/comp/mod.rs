//! Comp Module - The component contract
//!
//! A component ([`Comp`]) is a function from a [`Context`] to a pair of a
//! [`View`](crate::view::View) and a [`React`]. It is called again every time
//! the state changes; everything that must survive between calls lives in the
//! state tree, addressed through the context.
//!
//! - [`Comp`] / [`comp`] - The component function type and its constructor
//! - [`React`] / [`Reaction`] - Event handling
//! - [`with_init`] / [`with_before`] - Wrappers that parameterize a component
//! - [`Context`] - Capability handle into the state tree
//!
//! # Example
//!
//! ```
//! use imtui::comp::{comp, React, Reaction};
//! use imtui::input::{Event, Key};
//! use imtui::view::{text, AnyView};
//! use imtui::Text;
//!
//! let counter = comp(|c| {
//!     let value = c.state("value", 0i64);
//!     let view: AnyView = Box::new(text(vec![Text::plain(value.get().to_string())]));
//!     let react: React = Box::new(move |event| match event {
//!         Event::Key(key) if key == Key::ENTER => {
//!             let _ = value.swap(|n| n + 1);
//!             Reaction::Consumed
//!         }
//!         _ => Reaction::Unused,
//!     });
//!     (view, react)
//! });
//! # let _ = counter;
//! ```

mod context;

pub use context::{Binding, Context};

use std::fmt;
use std::sync::Arc;

use crate::error::ConvertError;
use crate::host::HostFrame;
use crate::state::convert::{native, StateValue};
use crate::state::Value;
use crate::input::Event;
use crate::view::AnyView;

/// A component.
pub type Comp = Arc<dyn Fn(Context) -> (AnyView, React) + Send + Sync>;

/// How a component handles an event.
pub type React = Box<dyn Fn(Event) -> Reaction>;

/// Make a [`Comp`] from a closure.
pub fn comp<F>(f: F) -> Comp
where
    F: Fn(Context) -> (AnyView, React) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a component so that the given state variables are initialized
/// before its first call. Later calls find the variables already set, so
/// the pairs act as mount-time parameters.
pub fn with_init<K, I>(f: Comp, pairs: I) -> Comp
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    let pairs: Vec<(String, Value)> = pairs.into_iter().map(|(k, v)| (k.into(), v)).collect();
    Arc::new(move |c: Context| {
        for (key, value) in &pairs {
            c.state(key, value.clone());
        }
        f(c)
    })
}

/// Wrap a component so that `before` runs ahead of every call.
pub fn with_before<F>(f: Comp, before: F) -> Comp
where
    F: Fn(&Context) + Send + Sync + 'static,
{
    Arc::new(move |c: Context| {
        before(&c);
        f(c)
    })
}

/// A [`React`] that uses no event.
pub fn react_nop() -> React {
    Box::new(|_| Reaction::Unused)
}

impl StateValue for Comp {
    fn from_value(value: &Value, _: &HostFrame) -> Result<Self, ConvertError> {
        native(value, "comp")
    }

    fn into_value(self) -> Value {
        Value::native(self)
    }
}

// =============================================================================
// Reaction
// =============================================================================

/// The result of handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reaction {
    /// The event was not used; an outer handler may use it.
    Unused,
    /// The event was used.
    Consumed,
    /// The event loop should end.
    Finish,
    /// The event loop should end, reporting end of input.
    FinishEOF,
}

impl Reaction {
    pub fn as_str(self) -> &'static str {
        match self {
            Reaction::Unused => "unused",
            Reaction::Consumed => "consumed",
            Reaction::Finish => "finish",
            Reaction::FinishEOF => "finish-eof",
        }
    }

    pub fn is_finish(self) -> bool {
        matches!(self, Reaction::Finish | Reaction::FinishEOF)
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateValue for Reaction {
    fn from_value(value: &Value, _: &HostFrame) -> Result<Self, ConvertError> {
        match value {
            Value::Str(s) => match s.as_ref() {
                "unused" => Ok(Reaction::Unused),
                "consumed" => Ok(Reaction::Consumed),
                "finish" => Ok(Reaction::Finish),
                "finish-eof" => Ok(Reaction::FinishEOF),
                other => Err(ConvertError::Parse {
                    input: other.to_string(),
                    expected: "reaction",
                }),
            },
            other => native(other, "reaction"),
        }
    }

    fn into_value(self) -> Value {
        Value::from(self.as_str())
    }
}
