#![forbid(unsafe_code)]

//! Squash-stretch feedback: anisotropic scale compression on the close axis.
//!
//! Compression applies only while the gesture travels *toward* close;
//! everything else is the identity scale. Drag end always resets to identity
//! regardless of trigger policy.
//!
//! # Invariants
//!
//! 1. Both scales are in `(0, 1]` for all finite inputs (intensity is clamped
//!    so the floor is 0.5).
//! 2. `DragPhase::Ended` always yields the identity.
//! 3. Only the close-axis scale ever compresses; the cross axis stays 1.

use sheetstack_core::{Axis, Position, Vec2, Viewport};

/// Default compression intensity.
pub const DEFAULT_SQUASH_INTENSITY: f32 = 0.15;

/// Upper bound on intensity so scales never approach zero.
const MAX_INTENSITY: f32 = 0.5;

/// When the compression is applied during a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SquashTrigger {
    /// Fixed partial compression the instant a drag begins.
    Start,
    /// Continuous recompute from the live offset.
    #[default]
    During,
    /// Both: the larger compression of the two.
    Both,
}

/// Squash-stretch configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SquashConfig {
    pub enabled: bool,
    pub trigger: SquashTrigger,
    /// Maximum compression fraction, clamped to `[0, 0.5]`.
    pub intensity: f32,
}

impl Default for SquashConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            trigger: SquashTrigger::default(),
            intensity: DEFAULT_SQUASH_INTENSITY,
        }
    }
}

impl SquashConfig {
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn trigger(mut self, trigger: SquashTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    #[must_use]
    pub fn intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }
}

/// Ephemeral anisotropic scale state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquashState {
    pub scale_x: f32,
    pub scale_y: f32,
}

impl SquashState {
    /// No deformation.
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
    };
}

impl Default for SquashState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Gesture phase as seen by the squash computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Pointer just went down; offset is still ~zero.
    Started,
    /// Pointer is moving with a live cumulative offset.
    Moving,
    /// Pointer released or gesture cancelled.
    Ended,
}

/// Compute the squash state for the current gesture sample.
#[must_use]
pub fn evaluate_squash(
    offset: Vec2,
    close_direction: Position,
    viewport: Viewport,
    config: &SquashConfig,
    phase: DragPhase,
) -> SquashState {
    if !config.enabled || phase == DragPhase::Ended {
        return SquashState::IDENTITY;
    }
    let intensity = if config.intensity.is_finite() {
        config.intensity.clamp(0.0, MAX_INTENSITY)
    } else {
        0.0
    };
    if intensity == 0.0 {
        return SquashState::IDENTITY;
    }

    let axis = close_direction.axis();
    let raw = offset.component(axis);
    let towards = if raw.is_finite() {
        (raw * close_direction.close_sign()).max(0.0)
    } else {
        0.0
    };

    let start_compression = intensity * 0.5;
    let during_compression = {
        let extent = viewport.extent_along(axis);
        if extent <= 0.0 {
            if towards > 0.0 { intensity } else { 0.0 }
        } else {
            intensity * (towards / extent).min(1.0)
        }
    };

    let compression = match (config.trigger, phase) {
        (SquashTrigger::Start, DragPhase::Started) => start_compression,
        // Held for the rest of the drag, but only while travelling toward close.
        (SquashTrigger::Start, DragPhase::Moving) => {
            if towards > 0.0 {
                start_compression
            } else {
                0.0
            }
        }
        (SquashTrigger::During, DragPhase::Started) => 0.0,
        (SquashTrigger::During, DragPhase::Moving) => during_compression,
        (SquashTrigger::Both, DragPhase::Started) => start_compression,
        (SquashTrigger::Both, DragPhase::Moving) => {
            if towards > 0.0 {
                start_compression.max(during_compression)
            } else {
                0.0
            }
        }
        (_, DragPhase::Ended) => 0.0,
    };

    let scale = (1.0 - compression).clamp(1.0 - MAX_INTENSITY, 1.0);
    match axis {
        Axis::Vertical => SquashState {
            scale_x: 1.0,
            scale_y: scale,
        },
        Axis::Horizontal => SquashState {
            scale_x: scale,
            scale_y: 1.0,
        },
    }
}
