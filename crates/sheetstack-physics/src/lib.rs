#![forbid(unsafe_code)]

//! Pure gesture physics for the sheetstack overlay engine.
//!
//! Everything in this crate is a total function over explicit structs:
//! no store access, no rendering, no clocks. Given finite inputs, outputs are
//! always finite and within their documented ranges, so the functions are
//! unit-testable without any UI environment.
//!
//! # Modules
//!
//! - [`resistance`]: close-progress and elastic push-back from pointer
//!   offset and velocity, plus the drag-end dismissal rule.
//! - [`squash`]: anisotropic scale feedback while dragging toward close.
//! - [`constraint`]: shell-specific offset shaping (dialog rubber-band,
//!   panel unidirectional clamp).

pub mod constraint;
pub mod resistance;
pub mod squash;

pub use constraint::{constrain_dialog_offset, constrain_panel_offset};
pub use resistance::{
    DragDirection, DragState, ResistanceConfig, evaluate_drag, should_dismiss,
};
pub use squash::{DragPhase, SquashConfig, SquashState, SquashTrigger, evaluate_squash};
