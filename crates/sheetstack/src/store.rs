#![forbid(unsafe_code)]

//! The overlay store: a shared, version-tracked registry of open overlays.
//!
//! The store is the single source of truth for which overlays exist, their
//! stacking order, and their lifecycle phase. Shells ([`DialogShell`],
//! [`PagePanelShell`]) mutate it; embedders subscribe to re-render on change.
//!
//! # Architecture
//!
//! `OverlayStore<C>` uses `Rc<RefCell<..>>` for single-threaded shared
//! ownership, so cloning the store is cheap and every clone sees the same
//! stack. Subscribers are stored as `Rc` callbacks and removed eagerly when
//! their [`Subscription`] guard drops.
//!
//! Removal is clockless: a closing dialog records a deadline and is swept by
//! [`OverlayStore::poll`]; a closing panel waits for
//! [`OverlayStore::complete_close`] from the exit-transition callback.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes the stack.
//! 2. Subscribers are notified in registration order, after the store's
//!    borrow is released (callbacks may re-enter the store).
//! 3. Z-indices are assigned at open time (`BASE_Z_INDEX` + depth) and never
//!    reassigned, so relative order is stable for an entry's whole lifetime.
//! 4. A closing entry never transitions back to interactive; the only exits
//!    are `poll` (dialogs) and `complete_close` (panels).
//! 5. Closing an unknown or already-closing id is a no-op.
//!
//! [`DialogShell`]: crate::dialog::DialogShell
//! [`PagePanelShell`]: crate::panel::PagePanelShell

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use sheetstack_core::{OverlayId, OverlayKind, PanelSize, Position};
use tracing::debug;
use web_time::Instant;

/// Z-index of the first overlay; each further entry stacks one higher.
pub const BASE_Z_INDEX: u32 = 1000;

/// How long a closing dialog stays in the stack before `poll` removes it.
/// Matches the exit animation so the element survives until it finishes.
pub const DIALOG_CLOSE_DELAY: Duration = Duration::from_millis(320);

/// How a closing entry leaves the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Removal {
    /// Still open; not leaving.
    None,
    /// Swept by [`OverlayStore::poll`] once the deadline passes.
    Deadline(Instant),
    /// Waits for [`OverlayStore::complete_close`].
    AwaitCallback,
}

/// One overlay in the stack.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayInstance<C> {
    pub id: OverlayId,
    pub kind: OverlayKind,
    pub content: C,
    pub position: Position,
    pub size: Option<PanelSize>,
    pub is_loading: bool,
    pub loading_message: Option<String>,
    pub z_index: u32,
    pub is_closing: bool,
    removal: Removal,
}

/// Options for opening an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenOptions {
    /// Edge the overlay is anchored to (and closes toward).
    pub position: Position,
    /// Fractional extent, panels only.
    pub size: Option<PanelSize>,
}

impl OpenOptions {
    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn size(mut self, size: PanelSize) -> Self {
        self.size = Some(size);
        self
    }
}

struct Inner<C> {
    stack: Vec<OverlayInstance<C>>,
    version: u64,
    subscribers: Vec<(u64, Rc<dyn Fn()>)>,
    next_subscriber_id: u64,
}

impl<C> Inner<C> {
    fn entry(&self, id: OverlayId) -> Option<&OverlayInstance<C>> {
        self.stack.iter().find(|e| e.id == id)
    }

    fn entry_mut(&mut self, id: OverlayId) -> Option<&mut OverlayInstance<C>> {
        self.stack.iter_mut().find(|e| e.id == id)
    }

    /// Most recently opened entry of `kind`, closing or not.
    fn latest_of_kind(&self, kind: OverlayKind) -> Option<&OverlayInstance<C>> {
        self.stack.iter().rev().find(|e| e.kind == kind)
    }
}

/// RAII subscription guard. Dropping it unsubscribes.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Unsubscribe now instead of at drop.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Shared overlay registry. Cloning shares the same underlying stack.
pub struct OverlayStore<C> {
    inner: Rc<RefCell<Inner<C>>>,
}

impl<C> Clone for OverlayStore<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C> fmt::Debug for OverlayStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("OverlayStore")
            .field("depth", &inner.stack.len())
            .field("version", &inner.version)
            .finish()
    }
}

impl<C> Default for OverlayStore<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> OverlayStore<C> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                stack: Vec::new(),
                version: 0,
                subscribers: Vec::new(),
                next_subscriber_id: 0,
            })),
        }
    }

    // -- mutation ----------------------------------------------------------

    /// Push a new overlay onto the stack.
    ///
    /// The new entry gets `BASE_Z_INDEX + depth`, so it renders above
    /// everything already open.
    pub fn open(&self, kind: OverlayKind, content: C, options: OpenOptions) -> OverlayId {
        let id = OverlayId::next();
        {
            let mut inner = self.inner.borrow_mut();
            let z_index = BASE_Z_INDEX + inner.stack.len() as u32;
            inner.stack.push(OverlayInstance {
                id,
                kind,
                content,
                position: options.position,
                size: options.size,
                is_loading: false,
                loading_message: None,
                z_index,
                is_closing: false,
                removal: Removal::None,
            });
            debug!(%id, kind = kind.as_str(), z_index, "overlay opened");
        }
        self.notify();
        id
    }

    /// Begin closing an overlay. `target = None` closes the top-most entry
    /// that is not already closing.
    ///
    /// Dialogs are scheduled for removal at `now + DIALOG_CLOSE_DELAY` and
    /// swept by [`poll`]; panels stay until [`complete_close`]. Unknown and
    /// already-closing ids are ignored.
    ///
    /// [`poll`]: OverlayStore::poll
    /// [`complete_close`]: OverlayStore::complete_close
    pub fn close(&self, target: Option<OverlayId>, now: Instant) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let id = match target {
                Some(id) => Some(id),
                None => inner
                    .stack
                    .iter()
                    .rev()
                    .find(|e| !e.is_closing)
                    .map(|e| e.id),
            };
            match id.and_then(|id| inner.entry_mut(id)) {
                Some(entry) if !entry.is_closing => {
                    entry.is_closing = true;
                    entry.removal = match entry.kind {
                        OverlayKind::Dialog => Removal::Deadline(now + DIALOG_CLOSE_DELAY),
                        OverlayKind::Panel => Removal::AwaitCallback,
                    };
                    debug!(id = %entry.id, kind = entry.kind.as_str(), "overlay closing");
                    true
                }
                _ => false,
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Begin closing every open overlay, each under its kind's removal policy.
    pub fn close_all(&self, now: Instant) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let mut changed = false;
            for entry in &mut inner.stack {
                if !entry.is_closing {
                    entry.is_closing = true;
                    entry.removal = match entry.kind {
                        OverlayKind::Dialog => Removal::Deadline(now + DIALOG_CLOSE_DELAY),
                        OverlayKind::Panel => Removal::AwaitCallback,
                    };
                    changed = true;
                }
            }
            if changed {
                debug!("closing all overlays");
            }
            changed
        };
        if changed {
            self.notify();
        }
    }

    /// Remove an entry now, closing or not. The exit-transition completion
    /// hook for panels; idempotent.
    pub fn complete_close(&self, id: OverlayId) {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let before = inner.stack.len();
            inner.stack.retain(|e| e.id != id);
            inner.stack.len() != before
        };
        if removed {
            debug!(%id, "overlay removed");
            self.notify();
        }
    }

    /// Sweep closing dialogs whose deadline has passed. Returns the removed
    /// ids in stack order.
    pub fn poll(&self, now: Instant) -> Vec<OverlayId> {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let mut removed = Vec::new();
            inner.stack.retain(|e| {
                if let Removal::Deadline(due) = e.removal
                    && now >= due
                {
                    removed.push(e.id);
                    false
                } else {
                    true
                }
            });
            removed
        };
        if !removed.is_empty() {
            for id in &removed {
                debug!(%id, "overlay removed");
            }
            self.notify();
        }
        removed
    }

    /// Set or clear the loading state of an entry.
    pub fn set_loading(&self, id: OverlayId, loading: bool, message: Option<String>) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            match inner.entry_mut(id) {
                Some(entry) if entry.is_loading != loading || entry.loading_message != message => {
                    entry.is_loading = loading;
                    entry.loading_message = message;
                    true
                }
                _ => false,
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Re-anchor an open entry to a different edge.
    pub fn set_position(&self, id: OverlayId, position: Position) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            match inner.entry_mut(id) {
                Some(entry) if entry.position != position => {
                    entry.position = position;
                    true
                }
                _ => false,
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Resize an open entry.
    pub fn set_size(&self, id: OverlayId, size: PanelSize) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            match inner.entry_mut(id) {
                Some(entry) if entry.size != Some(size) => {
                    entry.size = Some(size);
                    true
                }
                _ => false,
            }
        };
        if changed {
            self.notify();
        }
    }

    // -- queries -----------------------------------------------------------

    /// Number of entries, closing ones included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.inner.borrow().stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().stack.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: OverlayId) -> bool {
        self.inner.borrow().entry(id).is_some()
    }

    /// An entry accepts input only while it exists and is not closing.
    #[must_use]
    pub fn is_interactive(&self, id: OverlayId) -> bool {
        self.inner
            .borrow()
            .entry(id)
            .is_some_and(|e| !e.is_closing)
    }

    /// Id of the top-most entry.
    #[must_use]
    pub fn top_id(&self) -> Option<OverlayId> {
        self.inner.borrow().stack.last().map(|e| e.id)
    }

    /// Id of the most recently opened dialog.
    #[must_use]
    pub fn dialog_id(&self) -> Option<OverlayId> {
        self.inner
            .borrow()
            .latest_of_kind(OverlayKind::Dialog)
            .map(|e| e.id)
    }

    /// Id of the most recently opened panel.
    #[must_use]
    pub fn panel_id(&self) -> Option<OverlayId> {
        self.inner
            .borrow()
            .latest_of_kind(OverlayKind::Panel)
            .map(|e| e.id)
    }

    /// Monotonic change counter. Bumps once per stack mutation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Run `f` against an entry without cloning it out.
    pub fn with_instance<R>(
        &self,
        id: OverlayId,
        f: impl FnOnce(&OverlayInstance<C>) -> R,
    ) -> Option<R> {
        self.inner.borrow().entry(id).map(f)
    }

    /// Run `f` against the top-most entry.
    pub fn with_top<R>(&self, f: impl FnOnce(&OverlayInstance<C>) -> R) -> Option<R> {
        self.inner.borrow().stack.last().map(f)
    }

    /// Snapshot of all ids in stack order (bottom first).
    #[must_use]
    pub fn ids(&self) -> Vec<OverlayId> {
        self.inner.borrow().stack.iter().map(|e| e.id).collect()
    }

    /// Kind-scoped view over the most recent dialog.
    #[must_use]
    pub fn dialog_view(&self) -> KindView<C> {
        KindView {
            store: self.clone(),
            kind: OverlayKind::Dialog,
        }
    }

    /// Kind-scoped view over the most recent panel.
    #[must_use]
    pub fn panel_view(&self) -> KindView<C> {
        KindView {
            store: self.clone(),
            kind: OverlayKind::Panel,
        }
    }

    // -- change notification -----------------------------------------------

    /// Register a change callback. The callback fires after every stack
    /// mutation until the returned guard drops.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription
    where
        C: 'static,
    {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_subscriber_id;
            inner.next_subscriber_id += 1;
            inner.subscribers.push((id, Rc::new(callback)));
            id
        };
        let weak: Weak<RefCell<Inner<C>>> = Rc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().subscribers.retain(|(sid, _)| *sid != id);
                }
            })),
        }
    }

    /// Bump the version and fire subscribers. Callbacks run with the borrow
    /// released so they may re-enter the store.
    fn notify(&self) {
        let callbacks: Vec<Rc<dyn Fn()>> = {
            let mut inner = self.inner.borrow_mut();
            inner.version += 1;
            inner.subscribers.iter().map(|(_, cb)| Rc::clone(cb)).collect()
        };
        for callback in callbacks {
            callback();
        }
    }
}

/// A view of the store scoped to one overlay kind, always tracking the most
/// recently opened entry of that kind.
pub struct KindView<C> {
    store: OverlayStore<C>,
    kind: OverlayKind,
}

impl<C> Clone for KindView<C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            kind: self.kind,
        }
    }
}

impl<C> fmt::Debug for KindView<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindView")
            .field("kind", &self.kind)
            .field("id", &self.id())
            .finish()
    }
}

impl<C> KindView<C> {
    /// Id of the entry this view currently tracks.
    #[must_use]
    pub fn id(&self) -> Option<OverlayId> {
        self.store
            .inner
            .borrow()
            .latest_of_kind(self.kind)
            .map(|e| e.id)
    }

    /// Whether an entry of this kind is open and not closing.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.store
            .inner
            .borrow()
            .latest_of_kind(self.kind)
            .is_some_and(|e| !e.is_closing)
    }

    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.store
            .inner
            .borrow()
            .latest_of_kind(self.kind)
            .is_some_and(|e| e.is_closing)
    }

    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.store
            .inner
            .borrow()
            .latest_of_kind(self.kind)
            .map(|e| e.position)
    }

    #[must_use]
    pub fn size(&self) -> Option<PanelSize> {
        self.store
            .inner
            .borrow()
            .latest_of_kind(self.kind)
            .and_then(|e| e.size)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.store
            .inner
            .borrow()
            .latest_of_kind(self.kind)
            .is_some_and(|e| e.is_loading)
    }

    #[must_use]
    pub fn loading_message(&self) -> Option<String> {
        self.store
            .inner
            .borrow()
            .latest_of_kind(self.kind)
            .and_then(|e| e.loading_message.clone())
    }

    /// Run `f` against the tracked entry's content without cloning it out.
    pub fn with_content<R>(&self, f: impl FnOnce(&C) -> R) -> Option<R> {
        self.store
            .inner
            .borrow()
            .latest_of_kind(self.kind)
            .map(|e| f(&e.content))
    }

    /// Open a new entry of this view's kind.
    pub fn open(&self, content: C, options: OpenOptions) -> OverlayId {
        self.store.open(self.kind, content, options)
    }

    /// Close the tracked entry.
    pub fn close(&self, now: Instant) {
        if let Some(id) = self.id() {
            self.store.close(Some(id), now);
        }
    }

    /// Set or clear the tracked entry's loading state.
    pub fn set_loading(&self, loading: bool, message: Option<String>) {
        if let Some(id) = self.id() {
            self.store.set_loading(id, loading, message);
        }
    }
}
