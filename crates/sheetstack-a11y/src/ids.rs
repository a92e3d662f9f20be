#![forbid(unsafe_code)]

//! ARIA id namespace generation.

use std::sync::atomic::{AtomicU64, Ordering};
use web_time::{SystemTime, UNIX_EPOCH};

/// Global counter for a11y id namespaces.
static A11Y_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Per-instance id namespace: the container element plus its labelling ids.
///
/// `container` is what `aria-labelledby`/`aria-describedby` point into; the
/// title/description ids are derived so the triple is always consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayIds {
    pub container: String,
    pub title: String,
    pub description: String,
}

impl OverlayIds {
    /// Generate a fresh namespace from the process-wide counter + timestamp.
    #[must_use]
    pub fn generate() -> Self {
        let seq = A11Y_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let container = format!("overlay-{seq}-{stamp}");
        Self {
            title: format!("{container}-title"),
            description: format!("{container}-desc"),
            container,
        }
    }

    /// Use externally supplied ids instead of generated ones.
    #[must_use]
    pub fn external(
        container: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            container: container.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}
