//! Terminal key events to abstract keys.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::events::Key;

/// Map a key press; `None` for keys the client does not use.
pub fn map_key(event: KeyEvent) -> Option<Key> {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = event.modifiers.contains(KeyModifiers::ALT);
    let key = match event.code {
        KeyCode::Char('c') if ctrl => Key::Quit,
        KeyCode::Char('b') if ctrl => Key::ToggleFocus,
        KeyCode::Char('j') if ctrl => Key::Newline,
        KeyCode::Enter if ctrl || alt => Key::Newline,
        KeyCode::Enter => Key::Enter,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Esc => Key::Escape,
        KeyCode::Char(' ') => Key::Select,
        KeyCode::Char(c) if !ctrl && !alt && !c.is_control() => Key::Char(c),
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
        map_key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn control_bindings() {
        assert_eq!(
            press(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(Key::Quit)
        );
        assert_eq!(
            press(KeyCode::Char('b'), KeyModifiers::CONTROL),
            Some(Key::ToggleFocus)
        );
        assert_eq!(
            press(KeyCode::Enter, KeyModifiers::CONTROL),
            Some(Key::Newline)
        );
        assert_eq!(press(KeyCode::Char('x'), KeyModifiers::CONTROL), None);
    }

    #[test]
    fn plain_keys() {
        assert_eq!(press(KeyCode::Enter, KeyModifiers::NONE), Some(Key::Enter));
        assert_eq!(
            press(KeyCode::Char(' '), KeyModifiers::NONE),
            Some(Key::Select)
        );
        assert_eq!(
            press(KeyCode::Char('Ä'), KeyModifiers::SHIFT),
            Some(Key::Char('Ä'))
        );
        assert_eq!(press(KeyCode::F(1), KeyModifiers::NONE), None);
    }
}
