//! Key mapping from terminal events to commands.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Game(GameAction),
    ToggleTheme,
    Quit,
}

/// Map a key press. Releases and unbound keys map to `None`.
pub fn map_key(key: KeyEvent) -> Option<KeyCommand> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if should_quit(key) {
        return Some(KeyCommand::Quit);
    }

    let action = match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => GameAction::MoveLeft,
        KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => GameAction::MoveRight,
        KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => GameAction::SoftDrop,

        // Rotation (clockwise only)
        KeyCode::Up | KeyCode::Char('k' | 'K' | 'w' | 'W' | 'x' | 'X') => GameAction::Rotate,

        KeyCode::Char(' ' | 'q' | 'Q') => GameAction::HardDrop,
        KeyCode::Char('p' | 'P') => GameAction::Pause,
        KeyCode::Char('r' | 'R') => GameAction::Restart,
        KeyCode::Enter => GameAction::Start,

        KeyCode::Char('t' | 'T') => return Some(KeyCommand::ToggleTheme),
        _ => return None,
    };
    Some(KeyCommand::Game(action))
}

/// Esc or Ctrl-C. Plain `q` is hard drop, not quit.
pub fn should_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (matches!(key.code, KeyCode::Char('c' | 'C'))
            && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(code: KeyCode) -> Option<GameAction> {
        match map_key(KeyEvent::from(code)) {
            Some(KeyCommand::Game(action)) => Some(action),
            _ => None,
        }
    }

    #[test]
    fn test_movement_keys() {
        assert_eq!(game(KeyCode::Left), Some(GameAction::MoveLeft));
        assert_eq!(game(KeyCode::Right), Some(GameAction::MoveRight));
        assert_eq!(game(KeyCode::Down), Some(GameAction::SoftDrop));

        assert_eq!(game(KeyCode::Char('H')), Some(GameAction::MoveLeft));
        assert_eq!(game(KeyCode::Char('a')), Some(GameAction::MoveLeft));
        assert_eq!(game(KeyCode::Char('d')), Some(GameAction::MoveRight));
        assert_eq!(game(KeyCode::Char('J')), Some(GameAction::SoftDrop));
    }

    #[test]
    fn test_rotation_keys() {
        for code in [
            KeyCode::Up,
            KeyCode::Char('k'),
            KeyCode::Char('W'),
            KeyCode::Char('x'),
        ] {
            assert_eq!(game(code), Some(GameAction::Rotate), "{:?}", code);
        }
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(game(KeyCode::Char(' ')), Some(GameAction::HardDrop));
        assert_eq!(game(KeyCode::Char('q')), Some(GameAction::HardDrop));
        assert_eq!(game(KeyCode::Char('p')), Some(GameAction::Pause));
        assert_eq!(game(KeyCode::Char('R')), Some(GameAction::Restart));
        assert_eq!(game(KeyCode::Enter), Some(GameAction::Start));
    }

    #[test]
    fn test_app_keys() {
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char('t'))),
            Some(KeyCommand::ToggleTheme)
        );
        assert_eq!(map_key(KeyEvent::from(KeyCode::Esc)), Some(KeyCommand::Quit));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyCommand::Quit)
        );
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut key = KeyEvent::from(KeyCode::Left);
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key(key), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('q'))));
    }
}
