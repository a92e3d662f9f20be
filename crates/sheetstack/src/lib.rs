#![forbid(unsafe_code)]

//! Sheetstack: a headless, gesture-driven overlay engine.
//!
//! The engine is split along three seams:
//!
//! - [`store`]: the shared overlay registry with stacking, lifecycle, and
//!   change notification.
//! - Gesture surfaces: [`handlebar`] turns pointer samples into drag events,
//!   backed by the physics in `sheetstack-physics`.
//! - Shells: [`dialog`] and [`panel`] bind one store entry to a gesture zone,
//!   an accessibility controller, a [`backdrop`], and the [`variants`] poses.
//!
//! Everything is single-threaded and clockless: time-dependent operations
//! take an explicit `now` so embedders and tests control the clock.

pub mod backdrop;
pub mod dialog;
pub mod handlebar;
pub mod motion;
pub mod panel;
pub mod store;
pub mod variants;

pub use backdrop::{BackdropConfig, backdrop_click_closes};
pub use dialog::{
    DEFAULT_MAX_OVERSHOOT_PX, DialogConfig, DialogShell, DragTransform, KeyResponse, SizeBounds,
};
pub use handlebar::{
    Handlebar, HandlebarConfig, HandlebarEvent, HandlebarFeedback, LoadingConfig,
    MIN_TOUCH_TARGET_PX, TAP_SLOP_PX, shimmer_phase,
};
pub use motion::{
    MotionPreference, REDUCED_MOTION_DURATION_MS, Spring, TransitionSpec,
    detect_motion_preference, detect_motion_preference_from,
};
pub use panel::{PagePanelShell, PanelConfig};
pub use store::{
    BASE_Z_INDEX, DIALOG_CLOSE_DELAY, KindView, OpenOptions, OverlayInstance, OverlayStore,
    Subscription,
};
pub use variants::{
    EXIT_TRAVEL_PCT, HIDDEN_SCALE, HIDDEN_TRAVEL_PCT, Variant, VariantSet, build_variants,
};

pub use sheetstack_a11y as a11y;
pub use sheetstack_physics as physics;

pub use sheetstack_core::{
    Axis, KeyCode, KeyEvent, Modifiers, OverlayId, OverlayKind, PanelSize, PointerEvent,
    PointerPhase, Position, Vec2, Viewport,
};
