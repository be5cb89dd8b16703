//! Input Module - Events delivered to a component's React function
//!
//! - **Key** - [`Key`], [`KeyCode`] and [`Mod`], with parsing and display
//! - **Event** - [`Event`], the unit of input the run loop dispatches
//! - **Convert** - Conversion from crossterm's event model
//!
//! Events are small `Copy` values that are hashable and comparable, so a
//! React function can `match` on them directly.
//!
//! # Example
//!
//! ```
//! use imtui::input::{Event, Key};
//!
//! let event = Event::from(Key::ENTER);
//! assert_eq!(event, Event::key("Enter").unwrap());
//! ```

pub mod convert;
mod key;

pub use key::{Key, KeyCode, Mod};

use crate::error::{ConvertError, KeyError};
use crate::host::HostFrame;
use crate::state::convert::{native, StateValue};
use crate::state::Value;

// =============================================================================
// Mouse
// =============================================================================

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// What the mouse did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseKind {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    Moved,
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
}

/// A pointer event. Coordinates are 0-indexed terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseKind,
    pub row: u16,
    pub col: u16,
    pub mods: Mod,
}

// =============================================================================
// Event
// =============================================================================

/// A terminal input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Key(Key),
    /// Start (`true`) or end (`false`) of a bracketed paste.
    PasteSetting(bool),
    Mouse(MouseEvent),
    /// The terminal was resized. The new size is read from the driver.
    Resize,
}

impl Event {
    /// A key event from a symbolic key name.
    pub fn key(name: &str) -> Result<Event, KeyError> {
        Key::parse(name).map(Event::Key)
    }

    pub fn as_key(&self) -> Option<Key> {
        match self {
            Event::Key(key) => Some(*key),
            _ => None,
        }
    }
}

impl From<Key> for Event {
    fn from(key: Key) -> Self {
        Event::Key(key)
    }
}

const START_PASTE: &str = "start-paste";
const END_PASTE: &str = "end-paste";

/// Keys and paste markers are stored as strings so a host can read and
/// write them; other events are stored natively.
impl StateValue for Event {
    fn from_value(value: &Value, frame: &HostFrame) -> Result<Self, ConvertError> {
        match value {
            Value::Str(s) => match s.as_ref() {
                START_PASTE => Ok(Event::PasteSetting(true)),
                END_PASTE => Ok(Event::PasteSetting(false)),
                other => Event::key(other).map_err(|_| ConvertError::Parse {
                    input: other.to_string(),
                    expected: "event",
                }),
            },
            other => native(other, "event").or_else(|_| Key::from_value(other, frame).map(Event::Key)),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Event::Key(key) => key.into_value(),
            Event::PasteSetting(true) => Value::from(START_PASTE),
            Event::PasteSetting(false) => Value::from(END_PASTE),
            other => Value::native(other),
        }
    }
}

impl StateValue for Key {
    fn from_value(value: &Value, _: &HostFrame) -> Result<Self, ConvertError> {
        match value {
            Value::Str(s) => Key::parse(s).map_err(|_| ConvertError::Parse {
                input: s.to_string(),
                expected: "key",
            }),
            other => native(other, "key"),
        }
    }

    fn into_value(self) -> Value {
        Value::from(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_key_helper() {
        assert_eq!(Event::key("Ctrl-["), Ok(Event::Key(Key::ESCAPE)));
        assert_eq!(Event::key("Enter").unwrap().as_key(), Some(Key::ENTER));
        assert_eq!(Event::Resize.as_key(), None);
    }

    #[test]
    fn test_event_state_value() {
        let frame = HostFrame::default();
        assert_eq!(Event::from(Key::ENTER).into_value(), Value::from("Enter"));
        assert_eq!(Event::PasteSetting(true).into_value(), Value::from("start-paste"));
        assert_eq!(
            Event::from_value(&Value::from("end-paste"), &frame),
            Ok(Event::PasteSetting(false))
        );
        assert_eq!(
            Event::from_value(&Value::from("Alt-x"), &frame),
            Ok(Event::Key(Key::new(KeyCode::Char('x'), Mod::ALT)))
        );
        let mouse = Event::Mouse(MouseEvent {
            kind: MouseKind::Down(MouseButton::Left),
            row: 1,
            col: 2,
            mods: Mod::empty(),
        });
        assert_eq!(Event::from_value(&mouse.into_value(), &frame), Ok(mouse));
        assert!(Event::from_value(&Value::Int(1), &frame).is_err());
    }

    #[test]
    fn test_events_are_hashable() {
        use std::collections::HashSet;
        let set: HashSet<Event> = [Event::from(Key::ENTER), Event::from(Key::ENTER), Event::Resize]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }
}
