#![forbid(unsafe_code)]

//! Overlay taxonomy: kinds, attachment positions, and panel sizes.

use crate::geometry::Axis;

/// The two overlay presentation patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    /// Centered, bidirectional-elastic, closes toward a configured edge.
    Dialog,
    /// Edge-attached, strictly unidirectional drag.
    Panel,
}

impl OverlayKind {
    /// Lowercase name used in screen-reader announcements.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dialog => "dialog",
            Self::Panel => "panel",
        }
    }
}

/// Edge an overlay is attached to, and the direction a dismissing drag
/// travels toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl Position {
    /// The axis a drag along this close direction travels on.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Top | Self::Bottom => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }

    /// Sign of movement along [`Self::axis`] that approaches dismissal.
    ///
    /// Screen coordinates: +x is right, +y is down. A bottom-attached panel
    /// closes by dragging down (+1), a top-attached one by dragging up (-1).
    #[must_use]
    pub const fn close_sign(self) -> f32 {
        match self {
            Self::Top | Self::Left => -1.0,
            Self::Bottom | Self::Right => 1.0,
        }
    }

    /// The side opposite this one.
    ///
    /// Explicit lookup, never derived arithmetic: the handlebar for an
    /// edge-attached overlay sits on the side opposite the attachment edge,
    /// facing the content, and sign errors here invert the whole gesture.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Panel extent on its attachment axis, as a fraction of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelSize {
    Small,
    #[default]
    Medium,
    Large,
    Full,
}

impl PanelSize {
    /// Viewport fraction this size resolves to.
    #[must_use]
    pub const fn fraction(self) -> f32 {
        match self {
            Self::Small => 0.25,
            Self::Medium => 0.5,
            Self::Large => 0.75,
            Self::Full => 1.0,
        }
    }
}
