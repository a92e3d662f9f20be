#![forbid(unsafe_code)]

//! The accessibility controller: ids + focus trap + announcer behind one
//! facade, gated by per-instance [`AccessibilityOptions`].

use crate::announcer::Announcer;
use crate::focus::{FocusTrap, NodeId};
use crate::ids::OverlayIds;
use sheetstack_core::OverlayKind;
use web_time::Instant;

/// Per-instance accessibility options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessibilityOptions {
    /// Close on Escape.
    pub escape_close: bool,
    /// ARIA role of the container.
    pub role: String,
    /// Externally supplied labelling id (`aria-labelledby`).
    pub labelled_by: Option<String>,
    /// Externally supplied description id (`aria-describedby`).
    pub described_by: Option<String>,
    /// Lock background scrolling while open.
    pub lock_scroll: bool,
    /// Close when the backdrop is clicked.
    pub close_on_outside_click: bool,
    /// Overlay content is itself scrollable.
    pub scrollable: bool,
    /// Generate a fresh id namespace per instance.
    pub generate_unique_ids: bool,
    /// Trap focus within the overlay while open.
    pub enable_focus_trap: bool,
    /// Emit live-region announcements.
    pub announce_to_screen_reader: bool,
}

impl Default for AccessibilityOptions {
    fn default() -> Self {
        Self {
            escape_close: true,
            role: "dialog".to_string(),
            labelled_by: None,
            described_by: None,
            lock_scroll: true,
            close_on_outside_click: true,
            scrollable: false,
            generate_unique_ids: true,
            enable_focus_trap: true,
            announce_to_screen_reader: true,
        }
    }
}

impl AccessibilityOptions {
    #[must_use]
    pub fn escape_close(mut self, value: bool) -> Self {
        self.escape_close = value;
        self
    }

    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    #[must_use]
    pub fn labelled_by(mut self, id: impl Into<String>) -> Self {
        self.labelled_by = Some(id.into());
        self
    }

    #[must_use]
    pub fn described_by(mut self, id: impl Into<String>) -> Self {
        self.described_by = Some(id.into());
        self
    }

    #[must_use]
    pub fn lock_scroll(mut self, value: bool) -> Self {
        self.lock_scroll = value;
        self
    }

    #[must_use]
    pub fn close_on_outside_click(mut self, value: bool) -> Self {
        self.close_on_outside_click = value;
        self
    }

    #[must_use]
    pub fn scrollable(mut self, value: bool) -> Self {
        self.scrollable = value;
        self
    }

    #[must_use]
    pub fn generate_unique_ids(mut self, value: bool) -> Self {
        self.generate_unique_ids = value;
        self
    }

    #[must_use]
    pub fn enable_focus_trap(mut self, value: bool) -> Self {
        self.enable_focus_trap = value;
        self
    }

    #[must_use]
    pub fn announce_to_screen_reader(mut self, value: bool) -> Self {
        self.announce_to_screen_reader = value;
        self
    }
}

/// Accessibility facade for one overlay shell.
///
/// Owns exactly one announcer (one live region) for its whole lifetime; the
/// focus trap is re-activated per open.
#[derive(Debug)]
pub struct AccessibilityController {
    ids: OverlayIds,
    options: AccessibilityOptions,
    trap: FocusTrap,
    announcer: Announcer,
}

impl AccessibilityController {
    /// Create a controller.
    ///
    /// With `generate_unique_ids` set, a fresh id namespace is allocated.
    /// Otherwise the externally supplied labelling ids are used (missing ones
    /// fall back to generated values so the triple stays well-formed).
    #[must_use]
    pub fn new(options: AccessibilityOptions) -> Self {
        let ids = if options.generate_unique_ids {
            OverlayIds::generate()
        } else {
            let generated = OverlayIds::generate();
            OverlayIds::external(
                generated.container.clone(),
                options
                    .labelled_by
                    .clone()
                    .unwrap_or(generated.title),
                options
                    .described_by
                    .clone()
                    .unwrap_or(generated.description),
            )
        };
        Self {
            ids,
            options,
            trap: FocusTrap::new(),
            announcer: Announcer::new(),
        }
    }

    /// The instance's id namespace.
    #[must_use]
    pub fn ids(&self) -> &OverlayIds {
        &self.ids
    }

    /// The options this controller was built with.
    #[must_use]
    pub fn options(&self) -> &AccessibilityOptions {
        &self.options
    }

    /// Handle overlay open: trap focus and announce.
    ///
    /// Returns the node that should receive initial focus, if any.
    pub fn on_open(
        &mut self,
        kind: OverlayKind,
        focusables: Vec<NodeId>,
        previously_focused: Option<NodeId>,
        now: Instant,
    ) -> Option<NodeId> {
        if self.options.announce_to_screen_reader {
            self.announcer.announce_opened(kind, now);
        }
        if self.options.enable_focus_trap {
            self.trap.activate(focusables, previously_focused)
        } else {
            None
        }
    }

    /// Handle overlay close: release the trap.
    ///
    /// Returns the node focus should be restored to, exactly once.
    pub fn on_close(&mut self) -> Option<NodeId> {
        self.trap.release()
    }

    /// Announce a loading message. Called whenever loading starts or the
    /// message changes while loading.
    pub fn on_loading(&mut self, message: &str, now: Instant) {
        if self.options.announce_to_screen_reader && !message.is_empty() {
            self.announcer.announce(message.to_string(), now);
        }
    }

    /// Cycle trapped focus. Returns the newly focused node while trapped.
    pub fn handle_tab(&mut self, shift: bool) -> Option<NodeId> {
        self.trap.handle_tab(shift)
    }

    /// Whether focus is currently trapped.
    #[must_use]
    pub fn is_focus_trapped(&self) -> bool {
        self.trap.is_active()
    }

    /// Drive pending announcements. Returns `true` when text published.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.announcer.poll(now)
    }

    /// Current live-region text.
    #[must_use]
    pub fn live_text(&self) -> &str {
        self.announcer.live_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announcer::ANNOUNCE_DELAY;

    #[test]
    fn open_traps_focus_and_announces() {
        let mut ctl = AccessibilityController::new(AccessibilityOptions::default());
        let t0 = Instant::now();

        let initial = ctl.on_open(OverlayKind::Dialog, vec![3, 4], Some(100), t0);
        assert_eq!(initial, Some(3));
        assert!(ctl.is_focus_trapped());

        ctl.poll(t0 + ANNOUNCE_DELAY);
        assert_eq!(ctl.live_text(), "dialog opened");
    }

    #[test]
    fn close_restores_previous_focus_once() {
        let mut ctl = AccessibilityController::new(AccessibilityOptions::default());
        ctl.on_open(OverlayKind::Dialog, vec![1], Some(77), Instant::now());

        assert_eq!(ctl.on_close(), Some(77));
        assert_eq!(ctl.on_close(), None);
        assert!(!ctl.is_focus_trapped());
    }

    #[test]
    fn focus_trap_can_be_disabled() {
        let mut ctl = AccessibilityController::new(
            AccessibilityOptions::default().enable_focus_trap(false),
        );
        let initial = ctl.on_open(OverlayKind::Dialog, vec![1, 2], Some(5), Instant::now());
        assert_eq!(initial, None);
        assert!(!ctl.is_focus_trapped());
        assert_eq!(ctl.handle_tab(false), None);
    }

    #[test]
    fn announcements_can_be_disabled() {
        let mut ctl = AccessibilityController::new(
            AccessibilityOptions::default().announce_to_screen_reader(false),
        );
        let t0 = Instant::now();
        ctl.on_open(OverlayKind::Panel, vec![], None, t0);
        ctl.on_loading("Loading data", t0);
        assert!(!ctl.poll(t0 + ANNOUNCE_DELAY));
        assert_eq!(ctl.live_text(), "");
    }

    #[test]
    fn loading_message_is_announced() {
        let mut ctl = AccessibilityController::new(AccessibilityOptions::default());
        let t0 = Instant::now();
        ctl.on_loading("Saving changes", t0);
        assert!(ctl.poll(t0 + ANNOUNCE_DELAY));
        assert_eq!(ctl.live_text(), "Saving changes");
    }

    #[test]
    fn external_labelling_ids_are_respected() {
        let ctl = AccessibilityController::new(
            AccessibilityOptions::default()
                .generate_unique_ids(false)
                .labelled_by("my-title")
                .described_by("my-desc"),
        );
        assert_eq!(ctl.ids().title, "my-title");
        assert_eq!(ctl.ids().description, "my-desc");
    }

    #[test]
    fn tab_cycles_within_trap() {
        let mut ctl = AccessibilityController::new(AccessibilityOptions::default());
        ctl.on_open(OverlayKind::Dialog, vec![1, 2, 3], None, Instant::now());
        assert_eq!(ctl.handle_tab(false), Some(2));
        assert_eq!(ctl.handle_tab(false), Some(3));
        assert_eq!(ctl.handle_tab(false), Some(1));
        assert_eq!(ctl.handle_tab(true), Some(3));
    }
}
