//! Keys - A single keyboard input with modifiers.
//!
//! Printable keys are stored as their character. Tab, Enter and Backspace are
//! the characters `'\t'`, `'\n'` and `0x7f`; Escape is `Ctrl-[`. Other special
//! keys have their own [`KeyCode`] variants.
//!
//! # Example
//!
//! ```
//! use imtui::input::{Key, KeyCode, Mod};
//!
//! let key = Key::parse("C-x").unwrap();
//! assert_eq!(key, Key::new(KeyCode::Char('X'), Mod::CTRL));
//! assert_eq!(key.to_string(), "Ctrl-X");
//! assert_eq!(Key::parse("Alt+Enter").unwrap().to_string(), "Alt-Enter");
//! ```

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::error::KeyError;

bitflags! {
    /// Modifier keys.
    ///
    /// Shift is only applied to special keys (e.g. `Shift-F1`); an uppercase
    /// letter is not considered shift-modified.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Mod: u8 {
        const SHIFT = 1 << 0;
        const ALT = 1 << 1;
        const CTRL = 1 << 2;
    }
}

/// The base key, without modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    /// Placeholder used by binding tables for the fallback entry.
    Default,
    /// Function key F1..F12.
    F(u8),
    Up,
    Down,
    Right,
    Left,
    Home,
    Insert,
    Delete,
    End,
    PageUp,
    PageDown,
    Char(char),
}

impl KeyCode {
    pub const TAB: KeyCode = KeyCode::Char('\t');
    pub const ENTER: KeyCode = KeyCode::Char('\n');
    pub const BACKSPACE: KeyCode = KeyCode::Char('\x7f');

    /// Symbolic name, if the key has one.
    pub fn name(self) -> Option<&'static str> {
        const F_NAMES: [&str; 12] = [
            "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
        ];
        Some(match self {
            KeyCode::Default => "Default",
            KeyCode::F(n) => return F_NAMES.get(usize::from(n).checked_sub(1)?).copied(),
            KeyCode::Up => "Up",
            KeyCode::Down => "Down",
            KeyCode::Right => "Right",
            KeyCode::Left => "Left",
            KeyCode::Home => "Home",
            KeyCode::Insert => "Insert",
            KeyCode::Delete => "Delete",
            KeyCode::End => "End",
            KeyCode::PageUp => "PageUp",
            KeyCode::PageDown => "PageDown",
            KeyCode::Char('\t') => "Tab",
            KeyCode::Char('\n') => "Enter",
            KeyCode::Char('\x7f') => "Backspace",
            KeyCode::Char(_) => return None,
        })
    }

    fn from_name(name: &str) -> Option<KeyCode> {
        let code = match name {
            "Default" => KeyCode::Default,
            "Up" => KeyCode::Up,
            "Down" => KeyCode::Down,
            "Right" => KeyCode::Right,
            "Left" => KeyCode::Left,
            "Home" => KeyCode::Home,
            "Insert" => KeyCode::Insert,
            "Delete" => KeyCode::Delete,
            "End" => KeyCode::End,
            "PageUp" => KeyCode::PageUp,
            "PageDown" => KeyCode::PageDown,
            "Tab" => KeyCode::TAB,
            "Enter" => KeyCode::ENTER,
            "Backspace" => KeyCode::BACKSPACE,
            _ => {
                let n: u8 = name.strip_prefix('F')?.parse().ok()?;
                return (1..=12).contains(&n).then_some(KeyCode::F(n));
            }
        };
        Some(code)
    }
}

/// A keyboard input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    pub mods: Mod,
    pub code: KeyCode,
}

impl Key {
    pub const fn new(code: KeyCode, mods: Mod) -> Self {
        Self { mods, code }
    }

    /// An unmodified key.
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Mod::empty())
    }

    /// An unmodified character key.
    pub const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const ENTER: Key = Key::plain(KeyCode::ENTER);
    pub const TAB: Key = Key::plain(KeyCode::TAB);
    pub const BACKSPACE: Key = Key::plain(KeyCode::BACKSPACE);
    pub const ESCAPE: Key = Key::new(KeyCode::Char('['), Mod::CTRL);

    /// Parse a symbolic key.
    ///
    /// ```text
    /// Key     = { Mod ('+' | '-') } BareKey
    /// Mod     = S | Shift | A | Alt | M | Meta | C | Ctrl
    /// BareKey = FunctionKeyName | SingleChar
    /// ```
    ///
    /// A literal control character is turned into its Ctrl form (`"\x1b"` is
    /// `Ctrl-[`, as are `Esc` and `Escape`). Letters with Ctrl are
    /// uppercased, and `Ctrl-I` / `Ctrl-J` are normalized to Tab / Enter.
    pub fn parse(s: &str) -> Result<Key, KeyError> {
        let mut mods = Mod::empty();
        let mut rest = s;
        while rest.chars().nth(1).is_some() {
            let Some(i) = rest.find(['+', '-']) else {
                break;
            };
            mods |= match &rest[..i] {
                "S" | "Shift" => Mod::SHIFT,
                "A" | "Alt" | "M" | "Meta" => Mod::ALT,
                "C" | "Ctrl" => Mod::CTRL,
                other => return Err(KeyError::BadModifier(other.to_string())),
            };
            rest = &rest[i + 1..];
        }

        let mut chars = rest.chars();
        if let (Some(mut c), None) = (chars.next(), chars.next()) {
            if (c as u32) < 0x20 {
                if mods.contains(Mod::CTRL) {
                    return Err(KeyError::CtrlWithControlChar(c));
                }
                mods |= Mod::CTRL;
                c = char::from(c as u8 + 0x40);
            }
            if mods.contains(Mod::CTRL) {
                c = c.to_ascii_uppercase();
                match c {
                    'I' => return Ok(Key::new(KeyCode::TAB, mods - Mod::CTRL)),
                    'J' => return Ok(Key::new(KeyCode::ENTER, mods - Mod::CTRL)),
                    _ => {}
                }
            }
            return Ok(Key::new(KeyCode::Char(c), mods));
        }

        if matches!(rest, "Esc" | "Escape") {
            return Ok(Key::new(KeyCode::Char('['), mods | Mod::CTRL));
        }
        KeyCode::from_name(rest)
            .map(|code| Key::new(code, mods))
            .ok_or_else(|| KeyError::BadKey(s.to_string()))
    }
}

impl FromStr for Key {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::parse(s)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.contains(Mod::CTRL) {
            f.write_str("Ctrl-")?;
        }
        if self.mods.contains(Mod::ALT) {
            f.write_str("Alt-")?;
        }
        if self.mods.contains(Mod::SHIFT) {
            f.write_str("Shift-")?;
        }
        match (self.code.name(), self.code) {
            (Some(name), _) => f.write_str(name),
            (None, KeyCode::Char(c)) => write!(f, "{c}"),
            (None, KeyCode::F(n)) => write!(f, "(bad function key F{n})"),
            (None, _) => Ok(()),
        }
    }
}
