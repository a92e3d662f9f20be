#![forbid(unsafe_code)]

//! The handlebar: the gesture zone on an overlay's closing edge.
//!
//! A small tap-slop state machine turns raw pointer samples into drag
//! lifecycle events, feeding the resistance and squash physics with the
//! cumulative offset. When interaction is locked (loading with
//! `lock_interaction`), every close attempt degrades to a [`Shake`] so the
//! embedder can play a refusal wiggle instead.
//!
//! # Invariants
//!
//! 1. Pointer-up and [`Handlebar::cancel`] always reset the offset, drag
//!    state, and squash state synchronously, before any event is returned.
//! 2. A press that never leaves the tap slop is a tap; crossing the slop
//!    promotes it to a drag and it can never become a tap again.
//! 3. While locked, no event other than [`Shake`] is produced.
//!
//! [`Shake`]: HandlebarEvent::Shake

use sheetstack_core::{KeyCode, KeyEvent, PointerEvent, PointerPhase, Position, Vec2, Viewport};
use sheetstack_physics::{
    DragPhase, DragState, ResistanceConfig, SquashConfig, SquashState, evaluate_drag,
    evaluate_squash, should_dismiss,
};
use std::time::Duration;

use crate::motion::MotionPreference;

/// Minimum hit-target extent (px) for the gesture zone.
pub const MIN_TOUCH_TARGET_PX: f32 = 48.0;

/// Pointer travel (px) within which a press still counts as a tap.
pub const TAP_SLOP_PX: f32 = 8.0;

/// Visual feedback gains applied to the resistance intensity.
const FEEDBACK_SCALE_GAIN: f32 = 0.15;
const FEEDBACK_OPACITY_DROP: f32 = 0.3;
const FEEDBACK_BLUR_PX: f32 = 2.0;

/// Loading state configuration for an overlay.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadingConfig {
    pub is_loading: bool,
    /// Announced to screen readers when loading starts.
    pub message: Option<String>,
    /// Refuse close gestures while loading.
    pub lock_interaction: bool,
    /// Shimmer cycles per second.
    pub shimmer_speed: f32,
}

impl LoadingConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            is_loading: false,
            message: None,
            lock_interaction: true,
            shimmer_speed: 1.0,
        }
    }

    #[must_use]
    pub fn is_loading(mut self, loading: bool) -> Self {
        self.is_loading = loading;
        self
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn lock_interaction(mut self, lock: bool) -> Self {
        self.lock_interaction = lock;
        self
    }

    #[must_use]
    pub fn shimmer_speed(mut self, speed: f32) -> Self {
        self.shimmer_speed = speed;
        self
    }
}

/// Gesture zone configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlebarConfig {
    /// Direction a drag must travel to close.
    pub close_direction: Position,
    /// Fraction of the viewport extent a drag must cover to saturate.
    pub close_threshold: f32,
    pub resistance: ResistanceConfig,
    pub squash: SquashConfig,
    /// Hit-target extent perpendicular to the edge, floored at
    /// [`MIN_TOUCH_TARGET_PX`].
    pub hit_extent_px: f32,
    pub tap_slop_px: f32,
}

impl Default for HandlebarConfig {
    fn default() -> Self {
        Self {
            close_direction: Position::Bottom,
            close_threshold: 0.25,
            resistance: ResistanceConfig::default(),
            squash: SquashConfig::default(),
            hit_extent_px: MIN_TOUCH_TARGET_PX,
            tap_slop_px: TAP_SLOP_PX,
        }
    }
}

impl HandlebarConfig {
    #[must_use]
    pub fn close_direction(mut self, direction: Position) -> Self {
        self.close_direction = direction;
        self
    }

    #[must_use]
    pub fn close_threshold(mut self, threshold: f32) -> Self {
        self.close_threshold = threshold;
        self
    }

    #[must_use]
    pub fn resistance(mut self, resistance: ResistanceConfig) -> Self {
        self.resistance = resistance;
        self
    }

    #[must_use]
    pub fn squash(mut self, squash: SquashConfig) -> Self {
        self.squash = squash;
        self
    }

    #[must_use]
    pub fn hit_extent_px(mut self, px: f32) -> Self {
        self.hit_extent_px = px;
        self
    }

    /// Effective hit extent after the touch-target floor.
    #[must_use]
    pub fn effective_hit_extent_px(&self) -> f32 {
        self.hit_extent_px.max(MIN_TOUCH_TARGET_PX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GesturePhase {
    Idle,
    Pressed { origin: Vec2 },
    Dragging { origin: Vec2 },
}

/// Events produced by the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandlebarEvent {
    DragStarted,
    DragMoved {
        drag: DragState,
        squash: SquashState,
    },
    DragEnded {
        dismiss: bool,
    },
    /// A press-and-release within the tap slop, or an activation key.
    TapClose,
    /// Close attempt refused because interaction is locked.
    Shake,
}

/// The gesture zone state machine.
#[derive(Debug)]
pub struct Handlebar {
    config: HandlebarConfig,
    phase: GesturePhase,
    offset: Vec2,
    drag_state: DragState,
    squash_state: SquashState,
}

impl Handlebar {
    #[must_use]
    pub fn new(config: HandlebarConfig) -> Self {
        Self {
            config,
            phase: GesturePhase::Idle,
            offset: Vec2::ZERO,
            drag_state: DragState::default(),
            squash_state: SquashState::IDENTITY,
        }
    }

    #[must_use]
    pub fn config(&self) -> &HandlebarConfig {
        &self.config
    }

    /// Edge the handlebar sits on: opposite the close direction.
    #[must_use]
    pub fn side(&self) -> Position {
        self.config.close_direction.opposite()
    }

    /// Cumulative drag offset from the press origin.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    #[must_use]
    pub fn drag_state(&self) -> DragState {
        self.drag_state
    }

    #[must_use]
    pub fn squash_state(&self) -> SquashState {
        self.squash_state
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, GesturePhase::Dragging { .. })
    }

    /// Begin a press. While locked the press is refused with a shake.
    pub fn on_pointer_down(&mut self, position: Vec2, locked: bool) -> Option<HandlebarEvent> {
        if locked {
            return Some(HandlebarEvent::Shake);
        }
        self.phase = GesturePhase::Pressed { origin: position };
        self.offset = Vec2::ZERO;
        self.drag_state = DragState::default();
        self.squash_state = evaluate_squash(
            Vec2::ZERO,
            self.config.close_direction,
            Viewport::new(0.0, 0.0),
            &self.config.squash,
            DragPhase::Started,
        );
        Some(HandlebarEvent::DragStarted)
    }

    /// Feed a pointer move sample.
    ///
    /// Returns `None` while the press is still within the tap slop.
    pub fn on_pointer_move(
        &mut self,
        position: Vec2,
        viewport: Viewport,
    ) -> Option<HandlebarEvent> {
        let origin = match self.phase {
            GesturePhase::Idle => return None,
            GesturePhase::Pressed { origin } => {
                if (position - origin).magnitude() <= self.config.tap_slop_px {
                    return None;
                }
                self.phase = GesturePhase::Dragging { origin };
                origin
            }
            GesturePhase::Dragging { origin } => origin,
        };

        self.offset = position - origin;
        self.drag_state = evaluate_drag(
            self.offset,
            self.config.close_direction,
            self.config.close_threshold,
            viewport,
            &self.config.resistance,
        );
        self.squash_state = evaluate_squash(
            self.offset,
            self.config.close_direction,
            viewport,
            &self.config.squash,
            DragPhase::Moving,
        );
        Some(HandlebarEvent::DragMoved {
            drag: self.drag_state,
            squash: self.squash_state,
        })
    }

    /// End the gesture. State is reset before the event is returned, so a
    /// non-dismissing release snaps back immediately.
    pub fn on_pointer_up(
        &mut self,
        position: Vec2,
        velocity: Vec2,
        viewport: Viewport,
    ) -> Option<HandlebarEvent> {
        let event = match self.phase {
            GesturePhase::Idle => None,
            GesturePhase::Pressed { .. } => Some(HandlebarEvent::TapClose),
            GesturePhase::Dragging { origin } => {
                let offset = position - origin;
                let dismiss = should_dismiss(
                    offset,
                    velocity,
                    self.config.close_direction,
                    self.config.close_threshold,
                    viewport,
                );
                Some(HandlebarEvent::DragEnded { dismiss })
            }
        };
        self.reset();
        event
    }

    /// Abort the gesture and reset all ephemeral state.
    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Dispatch a raw pointer event by phase. `velocity` is read on `Up`
    /// only; `Cancel` resets without an event.
    pub fn on_pointer(
        &mut self,
        event: PointerEvent,
        velocity: Vec2,
        viewport: Viewport,
        locked: bool,
    ) -> Option<HandlebarEvent> {
        match event.phase {
            PointerPhase::Down => self.on_pointer_down(event.position, locked),
            PointerPhase::Move => self.on_pointer_move(event.position, viewport),
            PointerPhase::Up => self.on_pointer_up(event.position, velocity, viewport),
            PointerPhase::Cancel => {
                self.cancel();
                None
            }
        }
    }

    fn reset(&mut self) {
        self.phase = GesturePhase::Idle;
        self.offset = Vec2::ZERO;
        self.drag_state = DragState::default();
        self.squash_state = SquashState::IDENTITY;
    }

    /// Keyboard activation: Enter and Space close (or shake when locked).
    pub fn on_key(&mut self, event: KeyEvent, locked: bool) -> Option<HandlebarEvent> {
        match event.code {
            KeyCode::Enter | KeyCode::Space => {
                if locked {
                    Some(HandlebarEvent::Shake)
                } else {
                    Some(HandlebarEvent::TapClose)
                }
            }
            _ => None,
        }
    }

    /// Render feedback derived from the current resistance intensity.
    #[must_use]
    pub fn feedback(&self) -> HandlebarFeedback {
        if !self.config.resistance.visual_feedback {
            return HandlebarFeedback::NEUTRAL;
        }
        let intensity = self.drag_state.resistance_intensity;
        HandlebarFeedback {
            scale: 1.0 + FEEDBACK_SCALE_GAIN * intensity,
            opacity: 1.0 - FEEDBACK_OPACITY_DROP * intensity,
            blur_px: FEEDBACK_BLUR_PX * intensity,
        }
    }
}

/// Visual feedback of the gesture zone itself while resisting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandlebarFeedback {
    pub scale: f32,
    pub opacity: f32,
    pub blur_px: f32,
}

impl HandlebarFeedback {
    pub const NEUTRAL: Self = Self {
        scale: 1.0,
        opacity: 1.0,
        blur_px: 0.0,
    };
}

/// Phase of the loading shimmer in `[0, 1)`, or `None` under reduced motion.
#[must_use]
pub fn shimmer_phase(
    elapsed: Duration,
    speed: f32,
    preference: MotionPreference,
) -> Option<f32> {
    if preference.is_reduced() || !speed.is_finite() || speed <= 0.0 {
        return None;
    }
    Some((elapsed.as_secs_f32() * speed).fract())
}
