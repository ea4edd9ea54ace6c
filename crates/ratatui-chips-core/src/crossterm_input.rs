use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;
use crate::input::MouseButton;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;

/// Converts a crossterm event into an [`InputEvent`].
///
/// Key releases/repeats-as-release and events the chip widgets never look at (resize, scroll,
/// mouse motion) map to `None`.
pub fn input_event_from_crossterm(ev: crossterm::event::Event) -> Option<InputEvent> {
    use crossterm::event::Event;

    match ev {
        Event::Key(key) => {
            if key.kind == crossterm::event::KeyEventKind::Release {
                return None;
            }
            key_event_from_crossterm(key).map(InputEvent::Key)
        }
        Event::Paste(s) => Some(InputEvent::Paste(s)),
        Event::Mouse(m) => mouse_event_from_crossterm(m).map(InputEvent::Mouse),
        Event::FocusGained => Some(InputEvent::FocusGained),
        Event::FocusLost => Some(InputEvent::FocusLost),
        _ => None,
    }
}

pub fn key_event_from_crossterm(key: crossterm::event::KeyEvent) -> Option<KeyEvent> {
    use crossterm::event::KeyCode as Ct;

    let code = match key.code {
        Ct::Char(c) => KeyCode::Char(c),
        Ct::Enter => KeyCode::Enter,
        Ct::Backspace => KeyCode::Backspace,
        Ct::Delete => KeyCode::Delete,
        Ct::Tab => KeyCode::Tab,
        Ct::BackTab => KeyCode::BackTab,
        Ct::Esc => KeyCode::Esc,
        Ct::Left => KeyCode::Left,
        Ct::Right => KeyCode::Right,
        Ct::Up => KeyCode::Up,
        Ct::Down => KeyCode::Down,
        Ct::Home => KeyCode::Home,
        Ct::End => KeyCode::End,
        _ => return None,
    };

    Some(KeyEvent::new(code).with_modifiers(modifiers_from_crossterm(key.modifiers)))
}

pub fn mouse_event_from_crossterm(m: crossterm::event::MouseEvent) -> Option<MouseEvent> {
    use crossterm::event::MouseEventKind as Ct;

    let kind = match m.kind {
        Ct::Down(b) => MouseEventKind::Down(mouse_button_from_crossterm(b)),
        Ct::Up(b) => MouseEventKind::Up(mouse_button_from_crossterm(b)),
        _ => return None,
    };

    Some(MouseEvent {
        x: m.column,
        y: m.row,
        kind,
        modifiers: modifiers_from_crossterm(m.modifiers),
    })
}

fn modifiers_from_crossterm(m: crossterm::event::KeyModifiers) -> KeyModifiers {
    use crossterm::event::KeyModifiers as Ct;

    KeyModifiers {
        shift: m.contains(Ct::SHIFT),
        ctrl: m.contains(Ct::CONTROL),
        alt: m.contains(Ct::ALT),
    }
}

fn mouse_button_from_crossterm(b: crossterm::event::MouseButton) -> MouseButton {
    match b {
        crossterm::event::MouseButton::Left => MouseButton::Left,
        crossterm::event::MouseButton::Right => MouseButton::Right,
        crossterm::event::MouseButton::Middle => MouseButton::Middle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::Event;
    use crossterm::event::KeyEventKind;

    #[test]
    fn press_maps_and_release_is_dropped() {
        let press = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Left,
            crossterm::event::KeyModifiers::SHIFT,
        );
        assert_eq!(
            input_event_from_crossterm(Event::Key(press)),
            Some(InputEvent::Key(
                KeyEvent::new(KeyCode::Left).with_modifiers(KeyModifiers::shift())
            ))
        );

        let mut release = press;
        release.kind = KeyEventKind::Release;
        assert_eq!(input_event_from_crossterm(Event::Key(release)), None);
    }

    #[test]
    fn unsupported_keys_are_none() {
        let f1 = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::F(1),
            crossterm::event::KeyModifiers::NONE,
        );
        assert_eq!(key_event_from_crossterm(f1), None);
    }
}
