#![forbid(unsafe_code)]

//! Drag-resistance physics: close progress, elastic push-back intensity, and
//! the drag-end dismissal rule.
//!
//! # Invariants
//!
//! 1. `close_progress` and `resistance_intensity` are in `[0, 1]` for all
//!    finite inputs.
//! 2. Movement strictly away from the close direction never increases
//!    `close_progress` (away travel contributes zero, never negative).
//! 3. No output is ever NaN: degenerate denominators (zero threshold, empty
//!    viewport) resolve to saturated progress rather than dividing.
//!
//! # Failure Modes
//!
//! - Non-finite offsets/velocities are treated as zero on the affected axis.
//! - `close_threshold` outside `[0, 1]` is clamped.

use sheetstack_core::{Position, Vec2, Viewport};

/// Default distance (px) of away-travel tolerated before resistance engages.
pub const DEFAULT_RESISTANCE_THRESHOLD_PX: f32 = 30.0;
/// Default resistance strength multiplier.
pub const DEFAULT_RESISTANCE_STRENGTH: f32 = 0.7;

/// Fraction of the viewport extent over which resistance ramps to full.
const AWAY_RANGE_FRACTION: f32 = 0.2;
/// Axis travel below this is reported as `DragDirection::None`.
const DIRECTION_DEAD_ZONE_PX: f32 = 5.0;
/// Velocity toward close (px/s) that dismisses regardless of distance.
const FLICK_VELOCITY_PX_S: f32 = 400.0;
/// Velocity magnitude (px/s) that assists a past-half-way drag.
const ASSIST_VELOCITY_PX_S: f32 = 200.0;
/// Progress beyond which an assisted (lower-velocity) dismissal qualifies.
const ASSIST_PROGRESS: f32 = 0.5;

/// Resistance configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResistanceConfig {
    /// Whether resistance is computed at all.
    pub enabled: bool,
    /// Away-travel distance (px) before resistance engages.
    pub threshold_px: f32,
    /// Multiplier applied to the ramped intensity, in `[0, 1]`.
    pub strength: f32,
    /// Whether the gesture zone should render intensity feedback.
    pub visual_feedback: bool,
}

impl Default for ResistanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_px: DEFAULT_RESISTANCE_THRESHOLD_PX,
            strength: DEFAULT_RESISTANCE_STRENGTH,
            visual_feedback: true,
        }
    }
}

impl ResistanceConfig {
    /// Enable or disable resistance.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the away-travel threshold in pixels.
    #[must_use]
    pub fn threshold_px(mut self, px: f32) -> Self {
        self.threshold_px = px;
        self
    }

    /// Set the strength multiplier.
    #[must_use]
    pub fn strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    /// Enable or disable visual feedback.
    #[must_use]
    pub fn visual_feedback(mut self, visual: bool) -> Self {
        self.visual_feedback = visual;
        self
    }
}

/// Which way the pointer is travelling relative to the close direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragDirection {
    TowardsClose,
    Away,
    #[default]
    None,
}

/// Ephemeral drag state, recomputed per pointer move and reset on drag end.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragState {
    /// Away travel has exceeded the resistance threshold.
    pub is_beyond_limit: bool,
    /// Close progress has saturated; releasing now dismisses.
    pub should_close: bool,
    /// Resistance intensity in `[0, 1]`.
    pub resistance_intensity: f32,
    /// Distance-based close progress in `[0, 1]`.
    pub close_progress: f32,
    /// Dominant travel direction on the close axis.
    pub direction: DragDirection,
}

/// Replace non-finite values with zero so all downstream math stays total.
fn finite(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

/// Signed travel on the close axis: positive is toward close.
fn signed_close_travel(offset: Vec2, close_direction: Position) -> f32 {
    finite(offset.component(close_direction.axis())) * close_direction.close_sign()
}

/// Distance-based close progress in `[0, 1]`.
///
/// The gesture must cover `close_threshold` of the viewport extent on the
/// close axis to saturate. A zero denominator saturates immediately once
/// there is any toward-close travel.
#[must_use]
pub fn close_progress(
    offset: Vec2,
    close_direction: Position,
    close_threshold: f32,
    viewport: Viewport,
) -> f32 {
    let towards = signed_close_travel(offset, close_direction).max(0.0);
    if towards <= 0.0 {
        return 0.0;
    }
    let extent = viewport.extent_along(close_direction.axis());
    let denom = extent * finite(close_threshold).clamp(0.0, 1.0);
    if denom <= 0.0 {
        return 1.0;
    }
    (towards / denom).min(1.0)
}

/// Evaluate the full drag state for a cumulative pointer offset.
#[must_use]
pub fn evaluate_drag(
    offset: Vec2,
    close_direction: Position,
    close_threshold: f32,
    viewport: Viewport,
    config: &ResistanceConfig,
) -> DragState {
    let signed = signed_close_travel(offset, close_direction);
    let away = (-signed).max(0.0);

    let progress = close_progress(offset, close_direction, close_threshold, viewport);

    let is_beyond_limit = away > config.threshold_px.max(0.0);
    let resistance_intensity = if config.enabled && is_beyond_limit {
        let range = viewport.extent_along(close_direction.axis()) * AWAY_RANGE_FRACTION;
        let overshoot = away - config.threshold_px.max(0.0);
        let ramp = if range <= 0.0 {
            1.0
        } else {
            (overshoot / range).min(1.0)
        };
        (ramp * config.strength.clamp(0.0, 1.0)).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let direction = if signed.abs() > DIRECTION_DEAD_ZONE_PX {
        if signed > 0.0 {
            DragDirection::TowardsClose
        } else {
            DragDirection::Away
        }
    } else {
        DragDirection::None
    };

    DragState {
        is_beyond_limit,
        should_close: progress >= 1.0,
        resistance_intensity,
        close_progress: progress,
        direction,
    }
}

/// Drag-end dismissal rule: hybrid distance + velocity snap.
///
/// Dismisses when any of the following holds:
/// 1. close progress has saturated (`>= 1`);
/// 2. velocity toward close exceeds 400 px/s;
/// 3. close progress exceeds 0.5 and velocity magnitude exceeds 200 px/s.
#[must_use]
pub fn should_dismiss(
    offset: Vec2,
    velocity: Vec2,
    close_direction: Position,
    close_threshold: f32,
    viewport: Viewport,
) -> bool {
    let progress = close_progress(offset, close_direction, close_threshold, viewport);
    if progress >= 1.0 {
        return true;
    }
    let v_toward =
        finite(velocity.component(close_direction.axis())) * close_direction.close_sign();
    if v_toward > FLICK_VELOCITY_PX_S {
        return true;
    }
    progress > ASSIST_PROGRESS
        && Vec2::new(finite(velocity.x), finite(velocity.y)).magnitude() > ASSIST_VELOCITY_PX_S
}
