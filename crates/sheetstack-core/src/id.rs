#![forbid(unsafe_code)]

//! Globally unique overlay identifiers.
//!
//! An [`OverlayId`] is a process-wide monotonic counter composed with a
//! unix-millisecond timestamp. The counter alone guarantees uniqueness within
//! a process; the timestamp makes ids useful as stable DOM/ARIA id suffixes
//! across sessions.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use web_time::{SystemTime, UNIX_EPOCH};

/// Global counter for unique overlay IDs.
static OVERLAY_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque, globally unique overlay identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId {
    seq: u64,
    stamp_ms: u64,
}

impl OverlayId {
    /// Allocate the next unique id.
    #[must_use]
    pub fn next() -> Self {
        Self {
            seq: OVERLAY_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
            stamp_ms: unix_millis(),
        }
    }

    /// Monotonic sequence number.
    #[inline]
    #[must_use]
    pub const fn seq(self) -> u64 {
        self.seq
    }

    /// Creation timestamp in unix milliseconds.
    #[inline]
    #[must_use]
    pub const fn timestamp_ms(self) -> u64 {
        self.stamp_ms
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay-{}-{}", self.seq, self.stamp_ms)
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
