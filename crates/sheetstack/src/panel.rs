#![forbid(unsafe_code)]

//! The page-panel shell: an edge-anchored, unidirectional overlay.
//!
//! Panels differ from dialogs on three axes: their drag is strictly
//! unidirectional (never past rest, never off-axis), their position and size
//! are live store fields that can be changed remotely while open, and their
//! removal is driven by the embedder's exit-transition callback rather than a
//! deadline.
//!
//! # Invariants
//!
//! 1. A closing panel stays in the stack until
//!    [`PagePanelShell::on_exit_transition_end`]; polling never removes it.
//! 2. Changing position mid-gesture cancels the gesture before the close
//!    direction flips.
//! 3. The displayed offset never moves the panel past its rest position.

use sheetstack_a11y::{AccessibilityController, NodeId};
use sheetstack_core::{KeyCode, KeyEvent, OverlayId, OverlayKind, PanelSize, Position, Vec2, Viewport};
use sheetstack_physics::constrain_panel_offset;
use tracing::debug;
use web_time::Instant;

use crate::backdrop::{BackdropConfig, backdrop_click_closes};
use crate::dialog::{DragTransform, KeyResponse};
use crate::handlebar::{Handlebar, HandlebarConfig, HandlebarEvent, LoadingConfig};
use crate::motion::MotionPreference;
use crate::store::{OpenOptions, OverlayStore};
use crate::variants::{VariantSet, build_variants};

/// Panel shell configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    /// Initial anchored edge. Can be changed while open via
    /// [`PagePanelShell::set_position`].
    pub position: Position,
    /// Initial fractional extent.
    pub size: PanelSize,
    pub handlebar: HandlebarConfig,
    pub backdrop: BackdropConfig,
    pub accessibility: sheetstack_a11y::AccessibilityOptions,
    pub loading: LoadingConfig,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            position: Position::Bottom,
            size: PanelSize::Medium,
            handlebar: HandlebarConfig::default(),
            backdrop: BackdropConfig::default(),
            accessibility: sheetstack_a11y::AccessibilityOptions::default(),
            loading: LoadingConfig::new(),
        }
    }
}

impl PanelConfig {
    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn size(mut self, size: PanelSize) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn handlebar(mut self, handlebar: HandlebarConfig) -> Self {
        self.handlebar = handlebar;
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
}

/// A page panel bound to one store entry.
#[derive(Debug)]
pub struct PagePanelShell<C> {
    store: OverlayStore<C>,
    config: PanelConfig,
    handlebar: Handlebar,
    a11y: AccessibilityController,
    motion: MotionPreference,
    id: Option<OverlayId>,
}

impl<C> PagePanelShell<C> {
    #[must_use]
    pub fn new(store: OverlayStore<C>, config: PanelConfig, motion: MotionPreference) -> Self {
        let handlebar = Handlebar::new(
            config.handlebar.clone().close_direction(config.position),
        );
        let a11y = AccessibilityController::new(config.accessibility.clone());
        Self {
            store,
            config,
            handlebar,
            a11y,
            motion,
            id: None,
        }
    }

    // -- lifecycle ---------------------------------------------------------

    /// Open the panel at its configured edge and size.
    pub fn open(
        &mut self,
        content: C,
        focusables: Vec<NodeId>,
        previously_focused: Option<NodeId>,
        now: Instant,
    ) -> (OverlayId, Option<NodeId>) {
        let id = self.store.open(
            OverlayKind::Panel,
            content,
            OpenOptions::default()
                .position(self.config.position)
                .size(self.config.size),
        );
        self.id = Some(id);
        let initial = self
            .a11y
            .on_open(OverlayKind::Panel, focusables, previously_focused, now);
        debug!(%id, "panel opened");
        (id, initial)
    }

    /// Begin closing. The entry stays in the stack until
    /// [`on_exit_transition_end`] fires.
    ///
    /// [`on_exit_transition_end`]: PagePanelShell::on_exit_transition_end
    pub fn close(&mut self, now: Instant) -> Option<NodeId> {
        let id = self.id?;
        self.handlebar.cancel();
        self.store.close(Some(id), now);
        debug!(%id, "panel closing");
        self.a11y.on_close()
    }

    /// Exit-transition completion callback: actually remove the entry.
    pub fn on_exit_transition_end(&mut self) {
        if let Some(id) = self.id
            && !self.store.is_interactive(id)
        {
            self.store.complete_close(id);
            self.id = None;
        }
    }

    /// Drive pending announcements. Panels are not deadline-swept, so this
    /// never removes the entry.
    pub fn poll(&mut self, now: Instant) {
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

    // -- remote control ----------------------------------------------------

    /// Re-anchor the open panel. Cancels any in-flight gesture so the close
    /// direction never flips mid-drag.
    pub fn set_position(&mut self, position: Position) {
        let Some(id) = self.id else { return };
        if self.position() == position {
            return;
        }
        self.handlebar.cancel();
        self.handlebar = Handlebar::new(
            self.config.handlebar.clone().close_direction(position),
        );
        self.store.set_position(id, position);
    }

    /// Resize the open panel.
    pub fn set_size(&mut self, size: PanelSize) {
        if let Some(id) = self.id {
            self.store.set_size(id, size);
        }
    }

    /// The live anchored edge.
    #[must_use]
    pub fn position(&self) -> Position {
        self.id
            .and_then(|id| self.store.with_instance(id, |e| e.position))
            .unwrap_or(self.config.position)
    }

    /// The live fractional size.
    #[must_use]
    pub fn size(&self) -> PanelSize {
        self.id
            .and_then(|id| self.store.with_instance(id, |e| e.size))
            .flatten()
            .unwrap_or(self.config.size)
    }

    /// Pixel extent of the panel along its close axis.
    #[must_use]
    pub fn resolved_extent(&self, viewport: Viewport) -> f32 {
        self.size().fraction() * viewport.extent_along(self.position().axis())
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

    /// End the gesture; a dismissing release begins the close.
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

    pub fn cancel_gesture(&mut self) {
        self.handlebar.cancel();
    }

    /// Route a key event, mirroring the dialog shell's policy.
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

    /// Displayed transform: unidirectional offset plus squash scales.
    #[must_use]
    pub fn transform(&self) -> DragTransform {
        let offset = constrain_panel_offset(self.handlebar.offset(), self.position());
        let squash = self.handlebar.squash_state();
        DragTransform {
            offset,
            scale_x: squash.scale_x,
            scale_y: squash.scale_y,
        }
    }

    #[must_use]
    pub fn backdrop_opacity(&self) -> f32 {
        self.config
            .backdrop
            .opacity_for_progress(self.handlebar.drag_state().close_progress)
    }

    /// Variants for the live position; recomputed because the anchored edge
    /// can change while open.
    #[must_use]
    pub fn variants(&self) -> VariantSet {
        build_variants(self.position(), self.motion)
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
