#![forbid(unsafe_code)]

//! Input event types consumed by the gesture zone and shells.
//!
//! This is the minimal surface the overlay engine needs: pointer phases with
//! positions, and the handful of keys that drive accessible interaction
//! (Enter/Space activation, Escape close, Tab focus cycling).

use crate::geometry::Vec2;

bitflags::bitflags! {
    /// Keyboard modifier flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
    }
}

/// Keys the overlay engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Enter,
    Space,
    Escape,
    Tab,
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A key press with SHIFT held.
    #[must_use]
    pub const fn shifted(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::SHIFT,
        }
    }
}

/// Phase of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The gesture was interrupted (e.g. capture lost). Treated like a
    /// cancelled drag: all ephemeral state must reset.
    Cancel,
}

/// A pointer event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Vec2,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(phase: PointerPhase, position: Vec2) -> Self {
        Self { phase, position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_key_has_no_modifiers() {
        let key = KeyEvent::plain(KeyCode::Enter);
        assert!(key.modifiers.is_empty());
    }

    #[test]
    fn shifted_key_has_shift() {
        let key = KeyEvent::shifted(KeyCode::Tab);
        assert!(key.modifiers.contains(Modifiers::SHIFT));
    }
}
