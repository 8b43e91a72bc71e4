use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::input::{Direction, GameInput};

/// Terminal event translated for the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ControlEvent {
    Game(GameInput),
    /// Mouse pointer moved to a terminal cell; stands in for a tracked
    /// finger tip.
    Pointer { column: u16, row: u16 },
}

/// Waits up to `timeout` for one terminal event the game cares about.
pub fn poll_event(timeout: Duration) -> io::Result<Option<ControlEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    Ok(match event::read()? {
        Event::Key(key) => map_key(key).map(ControlEvent::Game),
        Event::Mouse(mouse) => map_mouse(mouse),
        _ => None,
    })
}

/// Maps a key press to a game input. Releases and repeats are ignored.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let input = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => GameInput::Quit,
        KeyCode::Up | KeyCode::Char('w' | 'W') => GameInput::Direction(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S') => GameInput::Direction(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A') => GameInput::Direction(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D') => GameInput::Direction(Direction::Right),
        KeyCode::Char('p' | 'P' | ' ') => GameInput::Pause,
        KeyCode::Char('r' | 'R') => GameInput::Reset,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => GameInput::Quit,
        _ => return None,
    };
    Some(input)
}

fn map_mouse(mouse: MouseEvent) -> Option<ControlEvent> {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_) => {
            Some(ControlEvent::Pointer {
                column: mouse.column,
                row: mouse.row,
            })
        }
        _ => None,
    }
}
