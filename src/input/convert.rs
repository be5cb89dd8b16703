//! Conversion from crossterm events.
//!
//! - `convert_event` - One crossterm event to zero or more [`Event`]s
//! - `convert_key_event` - Crossterm key press to [`Key`]
//! - `convert_mouse_event` - Crossterm mouse event to [`MouseEvent`]
//!
//! A bracketed paste arrives from crossterm as one string; it is delivered as
//! `PasteSetting(true)`, one key per character, then `PasteSetting(false)`.

use crossterm::event::{
    Event as CrosstermEvent, KeyCode as CrosstermKeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind,
    KeyModifiers, MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent, MouseEventKind,
};

use super::{Event, Key, KeyCode, Mod, MouseButton, MouseEvent, MouseKind};

/// Convert one crossterm event. Key releases and focus changes produce
/// nothing.
pub fn convert_event(event: CrosstermEvent) -> Vec<Event> {
    match event {
        CrosstermEvent::Key(key) => convert_key_event(key).map(Event::Key).into_iter().collect(),
        CrosstermEvent::Mouse(mouse) => vec![Event::Mouse(convert_mouse_event(mouse))],
        CrosstermEvent::Resize(_, _) => vec![Event::Resize],
        CrosstermEvent::Paste(text) => {
            let mut events = Vec::with_capacity(text.len() + 2);
            events.push(Event::PasteSetting(true));
            events.extend(text.chars().map(|c| Event::Key(paste_key(c))));
            events.push(Event::PasteSetting(false));
            events
        }
        CrosstermEvent::FocusGained | CrosstermEvent::FocusLost => Vec::new(),
    }
}

fn paste_key(c: char) -> Key {
    match c {
        '\r' => Key::ENTER,
        c => Key::char(c),
    }
}

/// Convert a crossterm key event. Returns `None` for releases and for keys
/// with no counterpart.
pub fn convert_key_event(event: CrosstermKeyEvent) -> Option<Key> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let mut mods = convert_modifiers(event.modifiers);
    let code = match event.code {
        CrosstermKeyCode::Char(c) => {
            // Shift is folded into the character itself.
            mods -= Mod::SHIFT;
            if mods.contains(Mod::CTRL) {
                KeyCode::Char(c.to_ascii_uppercase())
            } else {
                KeyCode::Char(c)
            }
        }
        CrosstermKeyCode::Enter => KeyCode::ENTER,
        CrosstermKeyCode::Tab => KeyCode::TAB,
        CrosstermKeyCode::BackTab => {
            mods |= Mod::SHIFT;
            KeyCode::TAB
        }
        CrosstermKeyCode::Backspace => KeyCode::BACKSPACE,
        CrosstermKeyCode::Esc => {
            mods |= Mod::CTRL;
            KeyCode::Char('[')
        }
        CrosstermKeyCode::Up => KeyCode::Up,
        CrosstermKeyCode::Down => KeyCode::Down,
        CrosstermKeyCode::Left => KeyCode::Left,
        CrosstermKeyCode::Right => KeyCode::Right,
        CrosstermKeyCode::Home => KeyCode::Home,
        CrosstermKeyCode::End => KeyCode::End,
        CrosstermKeyCode::PageUp => KeyCode::PageUp,
        CrosstermKeyCode::PageDown => KeyCode::PageDown,
        CrosstermKeyCode::Insert => KeyCode::Insert,
        CrosstermKeyCode::Delete => KeyCode::Delete,
        CrosstermKeyCode::F(n) if (1..=12).contains(&n) => KeyCode::F(n),
        _ => return None,
    };
    Some(Key::new(code, mods))
}

/// Convert a crossterm mouse event.
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> MouseEvent {
    let kind = match event.kind {
        MouseEventKind::Down(btn) => MouseKind::Down(convert_mouse_button(btn)),
        MouseEventKind::Up(btn) => MouseKind::Up(convert_mouse_button(btn)),
        MouseEventKind::Drag(btn) => MouseKind::Drag(convert_mouse_button(btn)),
        MouseEventKind::Moved => MouseKind::Moved,
        MouseEventKind::ScrollUp => MouseKind::ScrollUp,
        MouseEventKind::ScrollDown => MouseKind::ScrollDown,
        MouseEventKind::ScrollLeft => MouseKind::ScrollLeft,
        MouseEventKind::ScrollRight => MouseKind::ScrollRight,
    };
    MouseEvent {
        kind,
        row: event.row,
        col: event.column,
        mods: convert_modifiers(event.modifiers),
    }
}

fn convert_mouse_button(btn: CrosstermMouseButton) -> MouseButton {
    match btn {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

fn convert_modifiers(mods: KeyModifiers) -> Mod {
    let mut out = Mod::empty();
    if mods.contains(KeyModifiers::CONTROL) {
        out |= Mod::CTRL;
    }
    if mods.contains(KeyModifiers::ALT) || mods.contains(KeyModifiers::META) {
        out |= Mod::ALT;
    }
    if mods.contains(KeyModifiers::SHIFT) {
        out |= Mod::SHIFT;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: CrosstermKeyCode, modifiers: KeyModifiers) -> CrosstermKeyEvent {
        CrosstermKeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_convert_chars() {
        let key = convert_key_event(press(CrosstermKeyCode::Char('A'), KeyModifiers::SHIFT));
        assert_eq!(key, Some(Key::char('A')));
        let key = convert_key_event(press(CrosstermKeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(key, Some(Key::parse("Ctrl-C").unwrap()));
    }

    #[test]
    fn test_convert_special_keys() {
        let esc = convert_key_event(press(CrosstermKeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(esc, Some(Key::ESCAPE));
        let enter = convert_key_event(press(CrosstermKeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(enter, Some(Key::ENTER));
        let back_tab = convert_key_event(press(CrosstermKeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(back_tab, Some(Key::new(KeyCode::TAB, Mod::SHIFT)));
        let f13 = convert_key_event(press(CrosstermKeyCode::F(13), KeyModifiers::NONE));
        assert_eq!(f13, None);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut event = press(CrosstermKeyCode::Enter, KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(convert_key_event(event), None);
    }

    #[test]
    fn test_convert_paste() {
        let events = convert_event(CrosstermEvent::Paste("hi".into()));
        assert_eq!(
            events,
            vec![
                Event::PasteSetting(true),
                Event::Key(Key::char('h')),
                Event::Key(Key::char('i')),
                Event::PasteSetting(false),
            ]
        );
    }

    #[test]
    fn test_convert_mouse() {
        let event = convert_mouse_event(CrosstermMouseEvent {
            kind: MouseEventKind::Down(CrosstermMouseButton::Left),
            column: 4,
            row: 2,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(event.kind, MouseKind::Down(MouseButton::Left));
        assert_eq!((event.row, event.col), (2, 4));
    }
}
