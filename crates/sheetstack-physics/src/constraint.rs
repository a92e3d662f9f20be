#![forbid(unsafe_code)]

//! Drag-constraint shaping for the two shell patterns.
//!
//! These functions transform a raw cumulative pointer offset into the offset
//! a shell actually displays. The raw offset still feeds the resistance and
//! dismissal math in [`crate::resistance`]; constraints only shape what the
//! user sees.
//!
//! - Dialogs are bidirectional-elastic: toward-close travel passes through,
//!   away-from-close (and cross-axis) travel is rubber-banded to a bounded
//!   overshoot.
//! - Panels are strictly unidirectional: they can never be dragged past
//!   their rest position away from close, and never off-axis.

use sheetstack_core::{Position, Vec2};

/// Rubber-band damping: monotonic, bounded by `max`, ~linear near zero.
fn rubber_band(distance: f32, max: f32) -> f32 {
    if max <= 0.0 || !distance.is_finite() || distance <= 0.0 {
        return 0.0;
    }
    max * distance / (distance + max)
}

/// Shape a dialog drag offset: elastic overshoot away from close.
///
/// The close-axis toward component passes through untouched. The away
/// component and both signs of the cross axis compress asymptotically toward
/// `max_overshoot_px`.
#[must_use]
pub fn constrain_dialog_offset(
    offset: Vec2,
    close_direction: Position,
    max_overshoot_px: f32,
) -> Vec2 {
    let axis = close_direction.axis();
    let sign = close_direction.close_sign();
    let raw = offset.component(axis);
    let signed = if raw.is_finite() { raw * sign } else { 0.0 };

    let shaped_axis = if signed >= 0.0 {
        signed * sign
    } else {
        -rubber_band(-signed, max_overshoot_px) * sign
    };

    let cross_raw = offset.component(axis.cross());
    let cross = if cross_raw.is_finite() { cross_raw } else { 0.0 };
    let shaped_cross = cross.signum() * rubber_band(cross.abs(), max_overshoot_px);

    Vec2::ZERO
        .with_component(axis, shaped_axis)
        .with_component(axis.cross(), shaped_cross)
}

/// Shape a panel drag offset: unidirectional, on-axis only.
#[must_use]
pub fn constrain_panel_offset(offset: Vec2, close_direction: Position) -> Vec2 {
    let axis = close_direction.axis();
    let sign = close_direction.close_sign();
    let raw = offset.component(axis);
    let towards = if raw.is_finite() {
        (raw * sign).max(0.0)
    } else {
        0.0
    };
    Vec2::ZERO.with_component(axis, towards * sign)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn dialog_toward_close_passes_through() {
        let shaped = constrain_dialog_offset(Vec2::new(0.0, 250.0), Position::Bottom, 64.0);
        assert_eq!(shaped.y, 250.0);
        assert_eq!(shaped.x, 0.0);
    }

    #[test]
    fn dialog_away_is_bounded_by_overshoot() {
        let shaped = constrain_dialog_offset(Vec2::new(0.0, -10_000.0), Position::Bottom, 64.0);
        assert!(shaped.y < 0.0);
        assert!(shaped.y > -64.0, "overshoot must stay under the bound");
    }

    #[test]
    fn dialog_rubber_band_is_monotonic() {
        let near = constrain_dialog_offset(Vec2::new(0.0, -40.0), Position::Bottom, 64.0);
        let far = constrain_dialog_offset(Vec2::new(0.0, -400.0), Position::Bottom, 64.0);
        assert!(far.y < near.y);
    }

    #[test]
    fn dialog_cross_axis_is_damped_both_ways() {
        let right = constrain_dialog_offset(Vec2::new(500.0, 0.0), Position::Bottom, 64.0);
        let left = constrain_dialog_offset(Vec2::new(-500.0, 0.0), Position::Bottom, 64.0);
        assert!(right.x > 0.0 && right.x < 64.0);
        assert!(left.x < 0.0 && left.x > -64.0);
    }

    #[test]
    fn panel_cannot_move_away_or_off_axis() {
        let shaped = constrain_panel_offset(Vec2::new(37.0, -120.0), Position::Bottom);
        assert_eq!(shaped, Vec2::ZERO);

        let shaped = constrain_panel_offset(Vec2::new(37.0, 80.0), Position::Bottom);
        assert_eq!(shaped, Vec2::new(0.0, 80.0));
    }

    #[test]
    fn panel_respects_each_close_sign() {
        let shaped = constrain_panel_offset(Vec2::new(-90.0, 5.0), Position::Left);
        assert_eq!(shaped, Vec2::new(-90.0, 0.0));
        let shaped = constrain_panel_offset(Vec2::new(90.0, 5.0), Position::Left);
        assert_eq!(shaped, Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn panel_offset_never_reverses(
            x in -5000.0f32..5000.0,
            y in -5000.0f32..5000.0,
        ) {
            for pos in [Position::Top, Position::Bottom, Position::Left, Position::Right] {
                let shaped = constrain_panel_offset(Vec2::new(x, y), pos);
                let toward = shaped.component(pos.axis()) * pos.close_sign();
                prop_assert!(toward >= 0.0);
                prop_assert_eq!(shaped.component(pos.axis().cross()), 0.0);
            }
        }

        #[test]
        fn dialog_away_overshoot_is_bounded(
            away in 0.0f32..50_000.0,
            max in 1.0f32..200.0,
        ) {
            let shaped = constrain_dialog_offset(
                Vec2::new(0.0, -away),
                Position::Bottom,
                max,
            );
            prop_assert!(shaped.y <= 0.0);
            prop_assert!(shaped.y >= -max);
        }
    }
}
