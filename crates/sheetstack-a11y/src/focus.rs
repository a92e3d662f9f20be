#![forbid(unsafe_code)]

//! Bounded focus trap.
//!
//! The trap operates over an explicit member list built once at activation,
//! never a live per-keystroke query of the content tree. Content whose
//! focusable set changes must re-activate the trap with the new list.
//!
//! # Invariants
//!
//! 1. Tab cycling wraps in both directions and never leaves the member list.
//! 2. `release()` returns the previously focused node exactly once;
//!    subsequent calls return `None` (teardown runs at most once).
//! 3. Activating with an empty list is legal: initial focus is skipped and
//!    `handle_tab` returns `None`.

use ahash::AHashSet;

/// Identifier for a focusable node in the embedder's tree.
pub type NodeId = u64;

/// Focus trap over a bounded member list.
#[derive(Debug, Default)]
pub struct FocusTrap {
    members: Vec<NodeId>,
    previous: Option<NodeId>,
    cursor: Option<usize>,
    active: bool,
}

impl FocusTrap {
    /// Create an inactive trap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate the trap.
    ///
    /// Records `previously_focused` for restoration, deduplicates `members`
    /// preserving first-seen order, and returns the node that should receive
    /// initial focus (the first member), or `None` when the list is empty.
    pub fn activate(
        &mut self,
        members: Vec<NodeId>,
        previously_focused: Option<NodeId>,
    ) -> Option<NodeId> {
        let mut seen = AHashSet::with_capacity(members.len());
        self.members = members
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();
        self.previous = previously_focused;
        self.cursor = if self.members.is_empty() { None } else { Some(0) };
        self.active = true;
        self.current()
    }

    /// Whether the trap is currently installed.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of trapped members.
    #[inline]
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// The node currently holding focus inside the trap, if any.
    #[must_use]
    pub fn current(&self) -> Option<NodeId> {
        self.cursor.map(|i| self.members[i])
    }

    /// Move focus to a specific member. Returns `false` if `id` is not a
    /// member or the trap is inactive.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.active {
            return false;
        }
        match self.members.iter().position(|m| *m == id) {
            Some(i) => {
                self.cursor = Some(i);
                true
            }
            None => false,
        }
    }

    /// Cycle focus forward (`shift = false`) or backward (`shift = true`),
    /// wrapping at both ends. Returns the newly focused node.
    pub fn handle_tab(&mut self, shift: bool) -> Option<NodeId> {
        if !self.active || self.members.is_empty() {
            return None;
        }
        let len = self.members.len();
        let next = match self.cursor {
            Some(i) if shift => (i + len - 1) % len,
            Some(i) => (i + 1) % len,
            None => {
                if shift {
                    len - 1
                } else {
                    0
                }
            }
        };
        self.cursor = Some(next);
        Some(self.members[next])
    }

    /// Release the trap, returning the node focus should be restored to.
    ///
    /// Idempotent: only the first call after activation returns the
    /// previously focused node.
    pub fn release(&mut self) -> Option<NodeId> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.members.clear();
        self.cursor = None;
        self.previous.take()
    }
}
