#![forbid(unsafe_code)]

//! Backdrop: the dimming layer behind an overlay.
//!
//! Opacity tracks drag close-progress so the scene behind brightens as the
//! overlay is pulled away, but never fully clears before dismissal.

/// Backdrop configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BackdropConfig {
    /// Resting opacity while the overlay is fully presented.
    pub opacity: f32,
    /// Backdrop blur radius in pixels.
    pub blur_px: f32,
    /// Opacity never drops below this while the overlay is still up.
    pub opacity_floor: f32,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            opacity: 0.6,
            blur_px: 8.0,
            opacity_floor: 0.1,
        }
    }
}

impl BackdropConfig {
    #[must_use]
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    #[must_use]
    pub fn blur_px(mut self, blur_px: f32) -> Self {
        self.blur_px = blur_px;
        self
    }

    #[must_use]
    pub fn opacity_floor(mut self, floor: f32) -> Self {
        self.opacity_floor = floor;
        self
    }

    /// Backdrop opacity for a drag at `close_progress` in `[0, 1]`.
    #[must_use]
    pub fn opacity_for_progress(&self, close_progress: f32) -> f32 {
        let progress = if close_progress.is_finite() {
            close_progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let opacity = self.opacity.clamp(0.0, 1.0);
        let floor = self.opacity_floor.clamp(0.0, opacity);
        (opacity * (1.0 - progress)).max(floor)
    }
}

/// Whether a backdrop click should close the overlay.
#[must_use]
pub fn backdrop_click_closes(interaction_locked: bool, close_on_outside_click: bool) -> bool {
    !interaction_locked && close_on_outside_click
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn opacity_fades_with_progress() {
        let cfg = BackdropConfig::default();
        assert_eq!(cfg.opacity_for_progress(0.0), 0.6);
        assert!((cfg.opacity_for_progress(0.5) - 0.3).abs() < 1e-6);
        assert_eq!(cfg.opacity_for_progress(1.0), 0.1, "floor holds at full progress");
    }

    #[test]
    fn floor_never_exceeds_resting_opacity() {
        let cfg = BackdropConfig::default().opacity(0.2).opacity_floor(0.5);
        assert_eq!(cfg.opacity_for_progress(1.0), 0.2);
    }

    #[test]
    fn degenerate_progress_is_total() {
        let cfg = BackdropConfig::default();
        assert_eq!(cfg.opacity_for_progress(f32::NAN), 0.6);
        assert_eq!(cfg.opacity_for_progress(-3.0), 0.6);
        assert_eq!(cfg.opacity_for_progress(7.0), 0.1);
    }

    #[test]
    fn click_close_respects_lock_and_option() {
        assert!(backdrop_click_closes(false, true));
        assert!(!backdrop_click_closes(true, true));
        assert!(!backdrop_click_closes(false, false));
    }

    proptest! {
        #[test]
        fn opacity_stays_in_unit_range(
            progress in -2.0f32..3.0,
            opacity in -1.0f32..2.0,
            floor in -1.0f32..2.0,
        ) {
            let cfg = BackdropConfig::default().opacity(opacity).opacity_floor(floor);
            let value = cfg.opacity_for_progress(progress);
            prop_assert!((0.0..=1.0).contains(&value));
        }
    }
}
