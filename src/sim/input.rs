//! Device-independent input codes
//!
//! The platform layer maps its native key and button codes onto these before
//! calling the session's input handlers.

use serde::{Deserialize, Serialize};

/// Keyboard keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    W,
    Left,
    A,
    Right,
    D,
    Space,
    Digit1,
    Digit2,
    Escape,
}

impl Key {
    pub fn is_jump(self) -> bool {
        matches!(self, Key::Up | Key::W)
    }

    pub fn is_left(self) -> bool {
        matches!(self, Key::Left | Key::A)
    }

    pub fn is_right(self) -> bool {
        matches!(self, Key::Right | Key::D)
    }
}

/// Mouse buttons the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Attack with the selected weapon
    Left,
    /// Cycle weapons
    Right,
}
