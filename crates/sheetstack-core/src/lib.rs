#![forbid(unsafe_code)]

//! Core vocabulary for sheetstack: geometry, pointer/key events, overlay
//! identity, and the position/kind/size enums shared by every other crate.
//!
//! Everything here is plain data. Gesture physics lives in
//! `sheetstack-physics`, accessibility in `sheetstack-a11y`, and the reactive
//! store plus shells in `sheetstack`.

pub mod event;
pub mod geometry;
pub mod id;
pub mod overlay;

pub use event::{KeyCode, KeyEvent, Modifiers, PointerEvent, PointerPhase};
pub use geometry::{Axis, Vec2, Viewport};
pub use id::OverlayId;
pub use overlay::{OverlayKind, PanelSize, Position};
