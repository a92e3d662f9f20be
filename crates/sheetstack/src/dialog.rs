#![forbid(unsafe_code)]

//! The dialog shell: a centered, bidirectional-elastic overlay.
//!
//! Wires one [`OverlayStore`] entry to a [`Handlebar`], an
//! [`AccessibilityController`], and the backdrop/variant layers. Dialogs are
//! removed on a deadline: [`DialogShell::poll`] sweeps the entry once the
//! exit window has passed.
//!
//! # Invariants
//!
//! 1. While closing or interaction-locked, every close gesture degrades to a
//!    shake; the stack is never mutated twice for one entry.
//! 2. Closing cancels any in-flight gesture before the store transitions, so
//!    the displayed offset is zero during the exit animation.
//! 3. Focus restore is handed out exactly once per open/close cycle.

use sheetstack_a11y::{AccessibilityController, NodeId};
use sheetstack_core::{KeyCode, KeyEvent, OverlayId, OverlayKind, Vec2, Viewport};
use sheetstack_physics::constrain_dialog_offset;
use tracing::debug;
use web_time::Instant;

use crate::backdrop::{BackdropConfig, backdrop_click_closes};
use crate::handlebar::{Handlebar, HandlebarConfig, HandlebarEvent, LoadingConfig};
use crate::motion::MotionPreference;
use crate::store::{OpenOptions, OverlayStore};
use crate::variants::{VariantSet, build_variants};

/// Default elastic overshoot bound for dialog drags.
pub const DEFAULT_MAX_OVERSHOOT_PX: f32 = 64.0;

/// Content size bounds for a dialog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for SizeBounds {
    fn default() -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(f32::INFINITY, f32::INFINITY),
        }
    }
}

impl SizeBounds {
    /// Resolve a content size against the bounds and the viewport.
    #[must_use]
    pub fn resolve(&self, content: Vec2, viewport: Viewport) -> Vec2 {
        let clamp_axis = |value: f32, min: f32, max: f32, limit: f32| {
            let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
            let upper = max.min(limit).max(0.0);
            let lower = min.clamp(0.0, upper);
            value.clamp(lower, upper)
        };
        Vec2::new(
            clamp_axis(content.x, self.min.x, self.max.x, viewport.width),
            clamp_axis(content.y, self.min.y, self.max.y, viewport.height),
        )
    }
}

/// Dialog shell configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogConfig {
    pub handlebar: HandlebarConfig,
    pub size: SizeBounds,
    pub backdrop: BackdropConfig,
    pub accessibility: sheetstack_a11y::AccessibilityOptions,
    pub loading: LoadingConfig,
    /// Elastic overshoot bound for away and cross-axis drag.
    pub max_overshoot_px: f32,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            handlebar: HandlebarConfig::default(),
            size: SizeBounds::default(),
            backdrop: BackdropConfig::default(),
            accessibility: sheetstack_a11y::AccessibilityOptions::default(),
            loading: LoadingConfig::new(),
            max_overshoot_px: DEFAULT_MAX_OVERSHOOT_PX,
        }
    }
}

impl DialogConfig {
    #[must_use]
    pub fn handlebar(mut self, handlebar: HandlebarConfig) -> Self {
        self.handlebar = handlebar;
        self
    }

    #[must_use]
    pub fn size(mut self, size: SizeBounds) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn backdrop(mut self, backdrop: BackdropConfig) -> Self {
        self.backdrop = backdrop;
        self
    }

    #[must_use]
    pub fn accessibility(mut self, options: sheetstack_a11y::AccessibilityOptions) -> Self {
        self.accessibility = options;
        self
    }

    #[must_use]
    pub fn loading(mut self, loading: LoadingConfig) -> Self {
        self.loading = loading;
        self
    }

    #[must_use]
    pub fn max_overshoot_px(mut self, px: f32) -> Self {
        self.max_overshoot_px = px;
        self
    }
}

/// What the shell did with a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResponse {
    /// The overlay began closing; restore focus to this node if any.
    Closed { restore_focus: Option<NodeId> },
    /// Focus moved within the trap.
    Focused(NodeId),
    /// A close attempt was refused (locked).
    Shaken,
    Ignored,
}

/// The displayed transform of the overlay surface during a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTransform {
    pub offset: Vec2,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl DragTransform {
    pub const IDENTITY: Self = Self {
        offset: Vec2::ZERO,
        scale_x: 1.0,
        scale_y: 1.0,
    };
}

/// A dialog bound to one store entry.
#[derive(Debug)]
pub struct DialogShell<C> {
    store: OverlayStore<C>,
    config: DialogConfig,
    handlebar: Handlebar,
    a11y: AccessibilityController,
    variants: VariantSet,
    id: Option<OverlayId>,
}

impl<C> DialogShell<C> {
    #[must_use]
    pub fn new(store: OverlayStore<C>, config: DialogConfig, motion: MotionPreference) -> Self {
        let handlebar = Handlebar::new(config.handlebar.clone());
        let a11y = AccessibilityController::new(config.accessibility.clone());
        let variants = build_variants(config.handlebar.close_direction, motion);
        Self {
            store,
            config,
            handlebar,
            a11y,
            variants,
            id: None,
        }
    }

    // -- lifecycle ---------------------------------------------------------

    /// Open the dialog: push the store entry, trap focus, announce.
    ///
    /// Returns the id plus the node that should take initial focus.
    pub fn open(
        &mut self,
        content: C,
        focusables: Vec<NodeId>,
        previously_focused: Option<NodeId>,
        now: Instant,
    ) -> (OverlayId, Option<NodeId>) {
        let id = self.store.open(
            OverlayKind::Dialog,
            content,
            OpenOptions::default().position(self.config.handlebar.close_direction),
        );
        self.id = Some(id);
        let initial = self
            .a11y
            .on_open(OverlayKind::Dialog, focusables, previously_focused, now);
        debug!(%id, "dialog opened");
        (id, initial)
    }

    /// Begin closing. Returns the node focus should be restored to.
    pub fn close(&mut self, now: Instant) -> Option<NodeId> {
        let id = self.id?;
        self.handlebar.cancel();
        self.store.close(Some(id), now);
        debug!(%id, "dialog closing");
        self.a11y.on_close()
    }

    /// Drive deadline removal and pending announcements.
    pub fn poll(&mut self, now: Instant) {
        for removed in self.store.poll(now) {
            if self.id == Some(removed) {
                self.id = None;
            }
        }
        self.a11y.poll(now);
    }

    /// Set or clear the loading state, announcing the message when loading
    /// starts.
    pub fn set_loading(&mut self, loading: bool, message: Option<String>, now: Instant) {
        let Some(id) = self.id else { return };
        if loading {
            let text = message
                .clone()
                .or_else(|| self.config.loading.message.clone());
            if let Some(text) = &text {
                self.a11y.on_loading(text, now);
            }
            self.store.set_loading(id, true, text);
        } else {
            self.store.set_loading(id, false, None);
        }
    }

    // -- input -------------------------------------------------------------

    pub fn on_pointer_down(&mut self, position: Vec2) -> Option<HandlebarEvent> {
        self.handlebar.on_pointer_down(position, self.is_locked())
    }

    pub fn on_pointer_move(
        &mut self,
        position: Vec2,
        viewport: Viewport,
    ) -> Option<HandlebarEvent> {
        self.handlebar.on_pointer_move(position, viewport)
    }

    /// End the gesture; a dismissing release closes the dialog.
    pub fn on_pointer_up(
        &mut self,
        position: Vec2,
        velocity: Vec2,
        viewport: Viewport,
        now: Instant,
    ) -> Option<HandlebarEvent> {
        let event = self.handlebar.on_pointer_up(position, velocity, viewport)?;
        match event {
            HandlebarEvent::TapClose | HandlebarEvent::DragEnded { dismiss: true } => {
                self.close(now);
            }
            _ => {}
        }
        Some(event)
    }

    /// Abort any in-flight gesture.
    pub fn cancel_gesture(&mut self) {
        self.handlebar.cancel();
    }

    /// Route a key event: Escape closes, Tab cycles the trap, Enter/Space
    /// activate the handlebar.
    pub fn on_key(&mut self, event: KeyEvent, now: Instant) -> KeyResponse {
        match event.code {
            KeyCode::Escape => {
                if !self.a11y.options().escape_close || !self.is_open() {
                    KeyResponse::Ignored
                } else if self.is_locked() {
                    KeyResponse::Shaken
                } else {
                    let restore_focus = self.close(now);
                    KeyResponse::Closed { restore_focus }
                }
            }
            KeyCode::Tab => match self
                .a11y
                .handle_tab(event.modifiers.contains(sheetstack_core::Modifiers::SHIFT))
            {
                Some(node) => KeyResponse::Focused(node),
                None => KeyResponse::Ignored,
            },
            KeyCode::Enter | KeyCode::Space => {
                match self.handlebar.on_key(event, self.is_locked()) {
                    Some(HandlebarEvent::TapClose) => {
                        let restore_focus = self.close(now);
                        KeyResponse::Closed { restore_focus }
                    }
                    Some(HandlebarEvent::Shake) => KeyResponse::Shaken,
                    _ => KeyResponse::Ignored,
                }
            }
        }
    }

    /// Backdrop click: closes unless locked or configured not to.
    ///
    /// Returns the focus-restore node when it closed.
    pub fn on_backdrop_click(&mut self, now: Instant) -> Option<Option<NodeId>> {
        if !self.is_open() {
            return None;
        }
        if backdrop_click_closes(
            self.is_locked(),
            self.a11y.options().close_on_outside_click,
        ) {
            Some(self.close(now))
        } else {
            None
        }
    }

    // -- render queries ----------------------------------------------------

    /// Displayed transform: elastic-constrained offset plus squash scales.
    #[must_use]
    pub fn transform(&self) -> DragTransform {
        let offset = constrain_dialog_offset(
            self.handlebar.offset(),
            self.config.handlebar.close_direction,
            self.config.max_overshoot_px,
        );
        let squash = self.handlebar.squash_state();
        DragTransform {
            offset,
            scale_x: squash.scale_x,
            scale_y: squash.scale_y,
        }
    }

    /// Resolve the content's natural size against the configured bounds and
    /// the viewport.
    #[must_use]
    pub fn resolve_size(&self, content: Vec2, viewport: Viewport) -> Vec2 {
        self.config.size.resolve(content, viewport)
    }

    /// Backdrop opacity for the current drag progress.
    #[must_use]
    pub fn backdrop_opacity(&self) -> f32 {
        self.config
            .backdrop
            .opacity_for_progress(self.handlebar.drag_state().close_progress)
    }

    #[must_use]
    pub fn variants(&self) -> &VariantSet {
        &self.variants
    }

    #[must_use]
    pub fn handlebar(&self) -> &Handlebar {
        &self.handlebar
    }

    #[must_use]
    pub fn accessibility(&self) -> &AccessibilityController {
        &self.a11y
    }

    #[must_use]
    pub fn id(&self) -> Option<OverlayId> {
        self.id
    }

    /// Open and not yet closing.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.id.is_some_and(|id| self.store.is_interactive(id))
    }

    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.id.is_some_and(|id| {
            self.store
                .with_instance(id, |e| e.is_closing)
                .unwrap_or(false)
        })
    }

    /// Close attempts are refused while closing or loading-locked.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        let Some(id) = self.id else { return true };
        self.store
            .with_instance(id, |e| {
                e.is_closing || (e.is_loading && self.config.loading.lock_interaction)
            })
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DIALOG_CLOSE_DELAY;
    use sheetstack_a11y::AccessibilityOptions;

    const VIEWPORT: Viewport = Viewport {
        width: 400.0,
        height: 1000.0,
    };

    fn shell() -> DialogShell<&'static str> {
        DialogShell::new(
            OverlayStore::new(),
            DialogConfig::default(),
            MotionPreference::Full,
        )
    }

    #[test]
    fn open_close_poll_lifecycle() {
        let mut shell = shell();
        let t0 = Instant::now();

        let (id, initial) = shell.open("body", vec![10, 11], Some(99), t0);
        assert_eq!(initial, Some(10));
        assert!(shell.is_open());

        let restore = shell.close(t0);
        assert_eq!(restore, Some(99));
        assert!(!shell.is_open());
        assert!(shell.is_closing());
        assert!(shell.store.contains(id));

        shell.poll(t0 + DIALOG_CLOSE_DELAY);
        assert!(shell.store.is_empty());
        assert_eq!(shell.id(), None);
    }

    #[test]
    fn escape_closes_and_restores_focus() {
        let mut shell = shell();
        let t0 = Instant::now();
        shell.open("body", vec![1], Some(42), t0);

        let response = shell.on_key(KeyEvent::plain(KeyCode::Escape), t0);
        assert_eq!(
            response,
            KeyResponse::Closed {
                restore_focus: Some(42)
            }
        );
        // A second Escape hits a closing dialog: ignored, not shaken.
        assert_ne!(
            shell.on_key(KeyEvent::plain(KeyCode::Escape), t0),
            KeyResponse::Closed { restore_focus: None }
        );
    }

    #[test]
    fn escape_can_be_disabled() {
        let mut shell = DialogShell::new(
            OverlayStore::<&str>::new(),
            DialogConfig::default()
                .accessibility(AccessibilityOptions::default().escape_close(false)),
            MotionPreference::Full,
        );
        let t0 = Instant::now();
        shell.open("body", vec![1], None, t0);
        assert_eq!(
            shell.on_key(KeyEvent::plain(KeyCode::Escape), t0),
            KeyResponse::Ignored
        );
        assert!(shell.is_open());
    }

    #[test]
    fn tab_cycles_the_trap() {
        let mut shell = shell();
        let t0 = Instant::now();
        shell.open("body", vec![1, 2, 3], None, t0);

        assert_eq!(
            shell.on_key(KeyEvent::plain(KeyCode::Tab), t0),
            KeyResponse::Focused(2)
        );
        assert_eq!(
            shell.on_key(KeyEvent::shifted(KeyCode::Tab), t0),
            KeyResponse::Focused(1)
        );
    }

    #[test]
    fn dismissing_drag_closes_the_dialog() {
        let mut shell = shell();
        let t0 = Instant::now();
        shell.open("body", vec![], None, t0);

        shell.on_pointer_down(Vec2::ZERO);
        shell.on_pointer_move(Vec2::new(0.0, 260.0), VIEWPORT);
        let event = shell.on_pointer_up(Vec2::new(0.0, 260.0), Vec2::ZERO, VIEWPORT, t0);
        assert_eq!(event, Some(HandlebarEvent::DragEnded { dismiss: true }));
        assert!(shell.is_closing());
        assert_eq!(shell.transform(), DragTransform::IDENTITY, "gesture reset on close");
    }

    #[test]
    fn non_dismissing_release_snaps_back() {
        let mut shell = shell();
        let t0 = Instant::now();
        shell.open("body", vec![], None, t0);

        shell.on_pointer_down(Vec2::ZERO);
        shell.on_pointer_move(Vec2::new(0.0, 60.0), VIEWPORT);
        assert!(shell.transform().offset.y > 0.0);
        assert!(shell.backdrop_opacity() < 0.6);

        let event = shell.on_pointer_up(Vec2::new(0.0, 60.0), Vec2::ZERO, VIEWPORT, t0);
        assert_eq!(event, Some(HandlebarEvent::DragEnded { dismiss: false }));
        assert!(shell.is_open());
        assert_eq!(shell.transform(), DragTransform::IDENTITY);
        assert_eq!(shell.backdrop_opacity(), 0.6);
    }

    #[test]
    fn away_drag_is_elastically_bounded() {
        let mut shell = shell();
        let t0 = Instant::now();
        shell.open("body", vec![], None, t0);

        shell.on_pointer_down(Vec2::ZERO);
        shell.on_pointer_move(Vec2::new(0.0, -5000.0), VIEWPORT);
        let transform = shell.transform();
        assert!(transform.offset.y < 0.0);
        assert!(transform.offset.y > -DEFAULT_MAX_OVERSHOOT_PX);
    }

    #[test]
    fn loading_locks_interaction_and_announces() {
        let mut shell = shell();
        let t0 = Instant::now();
        shell.open("body", vec![], None, t0);

        shell.set_loading(true, Some("Saving changes".into()), t0);
        assert!(shell.is_locked());
        assert_eq!(shell.on_pointer_down(Vec2::ZERO), Some(HandlebarEvent::Shake));
        assert_eq!(
            shell.on_key(KeyEvent::plain(KeyCode::Escape), t0),
            KeyResponse::Shaken
        );
        assert_eq!(shell.on_backdrop_click(t0), None);

        shell.poll(t0 + sheetstack_a11y::ANNOUNCE_DELAY);
        assert_eq!(shell.accessibility().live_text(), "Saving changes");

        shell.set_loading(false, None, t0);
        assert!(!shell.is_locked());
        assert!(shell.on_backdrop_click(t0).is_some());
    }

    #[test]
    fn backdrop_click_respects_option() {
        let mut shell = DialogShell::new(
            OverlayStore::<&str>::new(),
            DialogConfig::default()
                .accessibility(AccessibilityOptions::default().close_on_outside_click(false)),
            MotionPreference::Full,
        );
        let t0 = Instant::now();
        shell.open("body", vec![], None, t0);
        assert_eq!(shell.on_backdrop_click(t0), None);
        assert!(shell.is_open());
    }

    #[test]
    fn size_bounds_resolve_within_viewport() {
        let bounds = SizeBounds {
            min: Vec2::new(280.0, 160.0),
            max: Vec2::new(560.0, 720.0),
        };
        let resolved = bounds.resolve(Vec2::new(900.0, 100.0), VIEWPORT);
        assert_eq!(resolved, Vec2::new(400.0, 160.0));

        let resolved = bounds.resolve(Vec2::new(f32::NAN, 300.0), VIEWPORT);
        assert_eq!(resolved.x, 280.0);
        assert_eq!(resolved.y, 300.0);
    }

    #[test]
    fn reduced_motion_variants_are_opacity_only() {
        let shell = DialogShell::new(
            OverlayStore::<&str>::new(),
            DialogConfig::default(),
            MotionPreference::Reduced,
        );
        assert!(shell.variants().visible.is_opacity_only());
    }
}
