#![forbid(unsafe_code)]

//! Motion preference detection and transition specifications.
//!
//! All animated surfaces ask [`MotionPreference`] before choosing a
//! transition: under [`MotionPreference::Reduced`] every spring collapses to
//! a short opacity tween and translate/scale channels are dropped entirely.

use std::env;

/// Exit/enter tween length under reduced motion.
pub const REDUCED_MOTION_DURATION_MS: u32 = 120;

/// Whether the embedder wants full motion or a reduced, opacity-only profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionPreference {
    /// Springs, travel, and scale as configured.
    #[default]
    Full,
    /// Opacity-only tweens; no translation or scaling.
    Reduced,
}

impl MotionPreference {
    #[must_use]
    pub fn is_reduced(self) -> bool {
        self == Self::Reduced
    }
}

/// Detect the motion preference from environment variables.
///
/// Preference order: `SHEETSTACK_REDUCED_MOTION`, then `REDUCED_MOTION`.
/// Any truthy value (`1`, `true`, `yes`, `on`, case-insensitive) selects
/// [`MotionPreference::Reduced`].
#[must_use]
pub fn detect_motion_preference() -> MotionPreference {
    let app = env::var("SHEETSTACK_REDUCED_MOTION").ok();
    let generic = env::var("REDUCED_MOTION").ok();
    detect_motion_preference_from(app.as_deref(), generic.as_deref())
}

/// Pure detection core, split out for testability.
#[must_use]
pub fn detect_motion_preference_from(
    app: Option<&str>,
    generic: Option<&str>,
) -> MotionPreference {
    if app.or(generic).is_some_and(is_truthy) {
        MotionPreference::Reduced
    } else {
        MotionPreference::Full
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Spring parameters in CSS-spring convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl Spring {
    pub const ENTER: Self = Self {
        stiffness: 300.0,
        damping: 30.0,
        mass: 1.0,
    };

    pub const EXIT: Self = Self {
        stiffness: 260.0,
        damping: 26.0,
        mass: 1.0,
    };
}

/// How a variant change should animate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionSpec {
    Spring(Spring),
    Tween { duration_ms: u32 },
}

impl TransitionSpec {
    /// Transition for entering the visible state.
    #[must_use]
    pub fn enter(preference: MotionPreference) -> Self {
        match preference {
            MotionPreference::Full => Self::Spring(Spring::ENTER),
            MotionPreference::Reduced => Self::Tween {
                duration_ms: REDUCED_MOTION_DURATION_MS,
            },
        }
    }

    /// Transition for leaving toward the exit state.
    #[must_use]
    pub fn exit(preference: MotionPreference) -> Self {
        match preference {
            MotionPreference::Full => Self::Spring(Spring::EXIT),
            MotionPreference::Reduced => Self::Tween {
                duration_ms: REDUCED_MOTION_DURATION_MS,
            },
        }
    }
}
