use serde::{Deserialize, Serialize};

use crate::snake::Point;

/// Canonical movement directions for the segment chain.
///
/// `Stop` is the resting heading of a fresh chain; nothing moves while it is
/// active.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Stop,
}

impl Direction {
    /// Returns the opposite direction. `Stop` is its own opposite.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Stop => Self::Stop,
        }
    }

    /// Returns the unit grid offset of one step, with `Up` as `+y`.
    #[must_use]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Stop => (0, 0),
        }
    }
}

/// Per-tick steering signal handed to [`crate::game::GameSession::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Steer {
    /// New head position sampled from a tracked pointer (trail model).
    Toward(Point),
    /// Latest key-derived direction (chain model).
    Heading(Direction),
    /// Timer tick without fresh input.
    Coast,
}

/// Control events that are not tied to a tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Pause,
    Reset,
    Quit,
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    current == Direction::Stop || next != current.opposite()
}

#[cfg(test)]
mod tests {
    use super::{direction_change_is_valid, Direction};

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
        assert_eq!(Direction::Stop.opposite(), Direction::Stop);
    }

    #[test]
    fn reversals_are_rejected() {
        assert!(!direction_change_is_valid(Direction::Up, Direction::Down));
        assert!(!direction_change_is_valid(Direction::Down, Direction::Up));
        assert!(!direction_change_is_valid(
            Direction::Left,
            Direction::Right
        ));
        assert!(!direction_change_is_valid(
            Direction::Right,
            Direction::Left
        ));

        assert!(direction_change_is_valid(Direction::Up, Direction::Left));
        assert!(direction_change_is_valid(Direction::Up, Direction::Right));
    }

    #[test]
    fn any_direction_leaves_stop() {
        for next in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert!(direction_change_is_valid(Direction::Stop, next));
        }
    }

    #[test]
    fn offsets_point_up_along_positive_y() {
        assert_eq!(Direction::Up.offset(), (0, 1));
        assert_eq!(Direction::Right.offset(), (1, 0));
        assert_eq!(Direction::Stop.offset(), (0, 0));
    }
}
