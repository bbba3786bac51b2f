//! Supersession of in-flight catalog fetches.
//!
//! Interactive consumers fire a new catalog fetch on every filter change, and
//! responses can arrive out of order. A [`QuerySequence`] hands out a
//! [`FetchTicket`] per fetch; when a response lands, the caller checks the
//! ticket and discards the result if a newer fetch has since been issued.
//! Only the latest fetch's result should ever reach the screen.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Generation counter for overlapping catalog fetches.
#[derive(Debug, Clone, Default)]
pub struct QuerySequence {
    current: Arc<AtomicU64>,
}

impl QuerySequence {
    /// Create a sequence with no fetches issued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of a new fetch, superseding all earlier tickets.
    #[must_use]
    pub fn begin(&self) -> FetchTicket {
        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        FetchTicket {
            current: Arc::clone(&self.current),
            generation,
        }
    }
}

/// A claim on one fetch. Stale once a later fetch begins.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    current: Arc<AtomicU64>,
    generation: u64,
}

impl FetchTicket {
    /// Whether this ticket still represents the latest fetch.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }
}
