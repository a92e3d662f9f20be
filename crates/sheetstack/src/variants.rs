#![forbid(unsafe_code)]

//! Animation variants: the hidden / visible / exit poses of an overlay.
//!
//! Translation values are percentages of the overlay's own extent along the
//! close axis, signed toward the anchored edge. Under reduced motion every
//! translate and scale channel is dropped and only opacity animates.

use crate::motion::{MotionPreference, TransitionSpec};
use sheetstack_core::{Axis, Position};

/// Off-screen travel of the hidden pose, percent of the overlay extent.
pub const HIDDEN_TRAVEL_PCT: f32 = 110.0;

/// Off-screen travel of the exit pose. Slightly past hidden so a spring
/// overshoot never pops the element back into view.
pub const EXIT_TRAVEL_PCT: f32 = 120.0;

/// Scale of the hidden pose.
pub const HIDDEN_SCALE: f32 = 0.96;

/// One animation pose. A `None` channel means "do not animate this channel".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variant {
    /// Horizontal translation, percent of the overlay width.
    pub translate_x: Option<f32>,
    /// Vertical translation, percent of the overlay height.
    pub translate_y: Option<f32>,
    pub scale: Option<f32>,
    pub opacity: f32,
    pub transition: TransitionSpec,
}

impl Variant {
    /// Whether this pose animates opacity and nothing else.
    #[must_use]
    pub fn is_opacity_only(&self) -> bool {
        self.translate_x.is_none() && self.translate_y.is_none() && self.scale.is_none()
    }
}

/// The three poses an overlay moves between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantSet {
    pub hidden: Variant,
    pub visible: Variant,
    pub exit: Variant,
}

/// Build the variant set for an overlay anchored at `position`.
#[must_use]
pub fn build_variants(position: Position, preference: MotionPreference) -> VariantSet {
    if preference.is_reduced() {
        let fade = |opacity, transition| Variant {
            translate_x: None,
            translate_y: None,
            scale: None,
            opacity,
            transition,
        };
        return VariantSet {
            hidden: fade(0.0, TransitionSpec::enter(preference)),
            visible: fade(1.0, TransitionSpec::enter(preference)),
            exit: fade(0.0, TransitionSpec::exit(preference)),
        };
    }

    // The overlay hides past the edge it is anchored to, so off-screen
    // travel carries the close-direction sign.
    let sign = position.close_sign();
    let pose = |travel_pct: f32, scale, opacity, transition| {
        let (translate_x, translate_y) = match position.axis() {
            Axis::Horizontal => (Some(sign * travel_pct), Some(0.0)),
            Axis::Vertical => (Some(0.0), Some(sign * travel_pct)),
        };
        Variant {
            translate_x,
            translate_y,
            scale,
            opacity,
            transition,
        }
    };

    VariantSet {
        hidden: pose(
            HIDDEN_TRAVEL_PCT,
            Some(HIDDEN_SCALE),
            0.0,
            TransitionSpec::enter(preference),
        ),
        visible: pose(0.0, Some(1.0), 1.0, TransitionSpec::enter(preference)),
        exit: pose(EXIT_TRAVEL_PCT, None, 0.0, TransitionSpec::exit(preference)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Spring;

    #[test]
    fn bottom_anchored_travel_is_positive_y() {
        let set = build_variants(Position::Bottom, MotionPreference::Full);
        assert_eq!(set.hidden.translate_y, Some(HIDDEN_TRAVEL_PCT));
        assert_eq!(set.hidden.translate_x, Some(0.0));
        assert_eq!(set.exit.translate_y, Some(EXIT_TRAVEL_PCT));
        assert_eq!(set.visible.translate_y, Some(0.0));
    }

    #[test]
    fn top_and_left_travel_negative() {
        let top = build_variants(Position::Top, MotionPreference::Full);
        assert_eq!(top.hidden.translate_y, Some(-HIDDEN_TRAVEL_PCT));

        let left = build_variants(Position::Left, MotionPreference::Full);
        assert_eq!(left.hidden.translate_x, Some(-HIDDEN_TRAVEL_PCT));
        assert_eq!(left.hidden.translate_y, Some(0.0));
    }

    #[test]
    fn exit_travels_past_hidden() {
        assert!(EXIT_TRAVEL_PCT > HIDDEN_TRAVEL_PCT);
        let set = build_variants(Position::Right, MotionPreference::Full);
        let hidden = set.hidden.translate_x.unwrap_or(0.0);
        let exit = set.exit.translate_x.unwrap_or(0.0);
        assert!(exit > hidden);
    }

    #[test]
    fn full_motion_uses_springs() {
        let set = build_variants(Position::Bottom, MotionPreference::Full);
        assert_eq!(set.visible.transition, TransitionSpec::Spring(Spring::ENTER));
        assert_eq!(set.exit.transition, TransitionSpec::Spring(Spring::EXIT));
        assert_eq!(set.hidden.scale, Some(HIDDEN_SCALE));
    }

    #[test]
    fn reduced_motion_is_opacity_only() {
        let set = build_variants(Position::Bottom, MotionPreference::Reduced);
        for variant in [set.hidden, set.visible, set.exit] {
            assert!(variant.is_opacity_only());
            assert!(matches!(variant.transition, TransitionSpec::Tween { .. }));
        }
        assert_eq!(set.hidden.opacity, 0.0);
        assert_eq!(set.visible.opacity, 1.0);
        assert_eq!(set.exit.opacity, 0.0);
    }
}
