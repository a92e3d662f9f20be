#![forbid(unsafe_code)]

//! Polite live-region announcer.
//!
//! Screen readers only re-announce a live region when its text *changes*, so
//! writing the same message twice in a row would be silent. The announcer
//! therefore clears the region first, waits [`ANNOUNCE_DELAY`], then sets the
//! text — the clear-then-set makes identical consecutive messages announce.
//!
//! The announcer is single-threaded and clockless: the embedder drives it by
//! passing `now` into [`Announcer::announce`] and [`Announcer::poll`].

use sheetstack_core::OverlayKind;
use std::time::Duration;
use web_time::Instant;

/// Delay between clearing the region and setting the new text.
pub const ANNOUNCE_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug)]
struct Pending {
    text: String,
    due: Instant,
}

/// One polite live region, owned for the controller's whole lifetime.
#[derive(Debug, Default)]
pub struct Announcer {
    live_text: String,
    pending: Option<Pending>,
}

impl Announcer {
    /// Create an empty announcer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an announcement: clears the region now, publishes at
    /// `now + ANNOUNCE_DELAY`. A newer announcement replaces a pending one.
    pub fn announce(&mut self, text: impl Into<String>, now: Instant) {
        self.live_text.clear();
        self.pending = Some(Pending {
            text: text.into(),
            due: now + ANNOUNCE_DELAY,
        });
    }

    /// Announce that an overlay of `kind` has opened.
    pub fn announce_opened(&mut self, kind: OverlayKind, now: Instant) {
        self.announce(format!("{} opened", kind.as_str()), now);
    }

    /// Publish the pending text if its delay has elapsed.
    ///
    /// Returns `true` when text was published this call.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.pending.as_ref().is_some_and(|p| now >= p.due)
            && let Some(p) = self.pending.take()
        {
            self.live_text = p.text;
            return true;
        }
        false
    }

    /// Current contents of the live region.
    #[must_use]
    pub fn live_text(&self) -> &str {
        &self.live_text
    }

    /// Whether an announcement is waiting to publish.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn announce_clears_then_sets_after_delay() {
        let mut a = Announcer::new();
        let t0 = Instant::now();

        a.announce("dialog opened", t0);
        assert_eq!(a.live_text(), "", "region must clear immediately");
        assert!(a.has_pending());

        assert!(!a.poll(t0 + Duration::from_millis(50)));
        assert_eq!(a.live_text(), "");

        assert!(a.poll(t0 + ANNOUNCE_DELAY));
        assert_eq!(a.live_text(), "dialog opened");
        assert!(!a.has_pending());
    }

    #[test]
    fn identical_consecutive_messages_reannounce() {
        let mut a = Announcer::new();
        let t0 = Instant::now();

        a.announce("Saving…", t0);
        a.poll(t0 + ANNOUNCE_DELAY);
        assert_eq!(a.live_text(), "Saving…");

        // Same text again: the clear makes it a fresh change for the reader.
        let t1 = t0 + Duration::from_secs(1);
        a.announce("Saving…", t1);
        assert_eq!(a.live_text(), "", "must pass through the cleared state");
        assert!(a.poll(t1 + ANNOUNCE_DELAY));
        assert_eq!(a.live_text(), "Saving…");
    }

    #[test]
    fn newer_announcement_replaces_pending() {
        let mut a = Announcer::new();
        let t0 = Instant::now();

        a.announce("first", t0);
        a.announce("second", t0 + Duration::from_millis(10));

        assert!(a.poll(t0 + Duration::from_millis(10) + ANNOUNCE_DELAY));
        assert_eq!(a.live_text(), "second");
        assert!(!a.poll(t0 + Duration::from_secs(5)), "nothing left to publish");
    }

    #[test]
    fn opened_announcement_names_the_kind() {
        let mut a = Announcer::new();
        let t0 = Instant::now();
        a.announce_opened(OverlayKind::Panel, t0);
        a.poll(t0 + ANNOUNCE_DELAY);
        assert_eq!(a.live_text(), "panel opened");
    }
}
