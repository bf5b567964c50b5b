//! Seen-event bookkeeping for suppressing retried webhook deliveries.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Remembers which webhook deliveries were already taken in.
///
/// Created empty at process start and never torn down. Implementations must
/// make [`EventLog::record`] an atomic check-and-insert.
pub trait EventLog: Send + Sync {
    /// Records `event_id`, returning `true` only for its first sighting.
    fn record(&self, event_id: &str) -> bool;

    /// Number of distinct ids recorded so far.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime set of event ids.
///
/// Grows without bound: nothing is ever evicted.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    seen: Mutex<HashSet<String>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventLog for InMemoryEventLog {
    fn record(&self, event_id: &str) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(event_id.to_string())
    }

    fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
