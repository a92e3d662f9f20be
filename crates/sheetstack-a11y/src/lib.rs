#![forbid(unsafe_code)]

//! Accessibility layer for sheetstack overlays.
//!
//! Three cooperating pieces, composed by [`AccessibilityController`]:
//!
//! - [`OverlayIds`]: a per-instance ARIA id namespace (container/title/
//!   description) from a process-wide counter, or externally supplied ids.
//! - [`FocusTrap`]: a bounded focus trap over an explicit member list built
//!   once per open. Tab and Shift+Tab wrap within the list; releasing the
//!   trap restores the previously focused node exactly once.
//! - [`Announcer`]: a polite live region. Writes clear the region, wait
//!   ~100 ms, then set the text, so identical consecutive messages are still
//!   announced by screen readers.
//!
//! # Invariants
//!
//! 1. One live region per controller lifetime.
//! 2. The trap installs once per open and releases at most once per close.
//! 3. An empty focusable list skips initial focus; it is not an error.

pub mod announcer;
pub mod controller;
pub mod focus;
pub mod ids;

pub use announcer::{ANNOUNCE_DELAY, Announcer};
pub use controller::{AccessibilityController, AccessibilityOptions};
pub use focus::{FocusTrap, NodeId};
pub use ids::OverlayIds;
