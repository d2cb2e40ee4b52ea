//! Keyboard input
//!
//! An arrow key sets the ball's speed along its axis to a fixed magnitude and
//! leaves the other axis alone.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::maze::Direction;

/// Arrow keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            _ => None,
        }
    }

    /// Unit vector in world space (y grows downward)
    pub fn axis(self) -> Vec2 {
        match self {
            Key::Up => Vec2::NEG_Y,
            Key::Down => Vec2::Y,
            Key::Left => Vec2::NEG_X,
            Key::Right => Vec2::X,
        }
    }
}

impl From<Direction> for Key {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Key::Up,
            Direction::Right => Key::Right,
            Direction::Down => Key::Down,
            Direction::Left => Key::Left,
        }
    }
}

/// New velocity after pressing `key`
pub fn apply_key(velocity: Vec2, key: Key, speed: f32) -> Vec2 {
    match key {
        Key::Up => Vec2::new(velocity.x, -speed),
        Key::Down => Vec2::new(velocity.x, speed),
        Key::Left => Vec2::new(-speed, velocity.y),
        Key::Right => Vec2::new(speed, velocity.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::maze::Cell;

    #[test]
    fn test_from_code() {
        assert_eq!(Key::from_code("ArrowUp"), Some(Key::Up));
        assert_eq!(Key::from_code("ArrowDown"), Some(Key::Down));
        assert_eq!(Key::from_code("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_code("ArrowRight"), Some(Key::Right));
        assert_eq!(Key::from_code("w"), None);
    }

    #[test]
    fn test_key_overrides_axis() {
        let velocity = Vec2::new(-120.0, 40.0);
        assert_eq!(apply_key(velocity, Key::Right, 300.0), Vec2::new(300.0, 40.0));
        assert_eq!(apply_key(velocity, Key::Left, 300.0), Vec2::new(-300.0, 40.0));
        assert_eq!(apply_key(velocity, Key::Up, 300.0), Vec2::new(-120.0, -300.0));
        assert_eq!(apply_key(velocity, Key::Down, 300.0), Vec2::new(-120.0, 300.0));
    }

    #[test]
    fn test_repeated_press_does_not_accumulate() {
        let once = apply_key(Vec2::ZERO, Key::Right, 300.0);
        let twice = apply_key(once, Key::Right, 300.0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_direction_maps_to_same_axis() {
        let origin = Cell::new(1, 1);
        for direction in Direction::ALL {
            let next = direction.step(origin, 3, 3).unwrap();
            let step = Vec2::new(
                next.col as f32 - origin.col as f32,
                next.row as f32 - origin.row as f32,
            );
            assert_eq!(Key::from(direction).axis(), step);
        }
    }

    #[test]
    fn test_axis_matches_override_direction() {
        for key in [Key::Up, Key::Down, Key::Left, Key::Right] {
            let velocity = apply_key(Vec2::ZERO, key, 1.0);
            assert_eq!(velocity, key.axis());
        }
    }
}
