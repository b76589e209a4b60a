use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start from a menu screen, otherwise jump.
    Press,
    Pause,
    BossMode,
    Restart,
    Quit,
}

pub fn command_for(event: &Event) -> Option<Command> {
    match event {
        Event::Key(key) => command_for_key(key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(_) => Some(Command::Press),
            _ => None,
        },
        _ => None,
    }
}

fn command_for_key(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Up => Some(Command::Press),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::Pause),
        KeyCode::Char('b') | KeyCode::Char('B') => Some(Command::BossMode),
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => Some(Command::Restart),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{MouseButton, MouseEvent};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(command_for(&key(KeyCode::Char(' '))), Some(Command::Press));
        assert_eq!(command_for(&key(KeyCode::Up)), Some(Command::Press));
        assert_eq!(command_for(&key(KeyCode::Char('p'))), Some(Command::Pause));
        assert_eq!(command_for(&key(KeyCode::Char('b'))), Some(Command::BossMode));
        assert_eq!(command_for(&key(KeyCode::Enter)), Some(Command::Restart));
        assert_eq!(command_for(&key(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(command_for(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(command_for(&ev), Some(Command::Quit));
    }

    #[test]
    fn key_release_is_ignored() {
        let mut k = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        k.kind = KeyEventKind::Release;
        assert_eq!(command_for(&Event::Key(k)), None);
    }

    #[test]
    fn click_is_a_press() {
        let ev = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(command_for(&ev), Some(Command::Press));
    }
}
