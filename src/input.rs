use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    Direction(Direction),
    Enter,
    Backspace,
    Pause,
    Char(char),
}

impl InputEvent {
    /// Translates a terminal key press. Keys with no meaning in the game map
    /// to `None` and are dropped.
    pub fn from_key_event(ev: &KeyEvent) -> Option<Self> {
        if is_ctrl_c(ev) {
            return Some(InputEvent::Quit);
        }

        if ev.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return None;
        }

        match ev.code {
            KeyCode::Up => Some(InputEvent::Direction(Direction::Up)),
            KeyCode::Down => Some(InputEvent::Direction(Direction::Down)),
            KeyCode::Left => Some(InputEvent::Direction(Direction::Left)),
            KeyCode::Right => Some(InputEvent::Direction(Direction::Right)),
            KeyCode::Enter => Some(InputEvent::Enter),
            KeyCode::Backspace => Some(InputEvent::Backspace),
            KeyCode::Esc => Some(InputEvent::Pause),
            KeyCode::Char(c) if !c.is_control() => Some(InputEvent::Char(c)),
            _ => None,
        }
    }

    /// The heading this event asks for while playing. WASD doubles as the
    /// arrow keys here; while typing a name they are plain letters.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            InputEvent::Direction(dir) => Some(*dir),
            InputEvent::Char('w') => Some(Direction::Up),
            InputEvent::Char('a') => Some(Direction::Left),
            InputEvent::Char('s') => Some(Direction::Down),
            InputEvent::Char('d') => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Folds one tick's worth of events into the turn to hand to the snake.
///
/// The last direction key that isn't the reverse of `heading` wins. A
/// reversal is dropped on its own and leaves any earlier valid key in place.
/// Nothing steers while paused.
pub fn latest_direction(events: &[InputEvent], heading: Direction, paused: bool) -> Option<Direction> {
    if paused {
        return None;
    }

    events.iter()
        .filter_map(InputEvent::direction)
        .filter(|dir| !dir.is_opposite(heading))
        .last()
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
