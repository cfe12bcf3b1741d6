//! Run sequencing: the most recently started run wins.
//!
//! A caller that can start a new run while the results of an earlier one are
//! still pending takes a [`RunTicket`] per run. Before handing results on, the
//! run checks its ticket; if a newer run started in the meantime the stale
//! results are dropped. Checks happen between runs, never inside the event
//! loop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared, monotonically increasing run counter.
#[derive(Debug, Clone, Default)]
pub struct RunSequence {
    latest: Arc<AtomicU64>,
}

impl RunSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run, superseding every earlier ticket.
    pub fn begin(&self) -> RunTicket {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        RunTicket {
            id,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Id of the most recently started run (0 before any run).
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

/// Identity of one run within a [`RunSequence`].
#[derive(Debug, Clone)]
pub struct RunTicket {
    id: u64,
    latest: Arc<AtomicU64>,
}

impl RunTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether no newer run has started.
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.id
    }

    /// Pass `output` through if this run is still current, drop it otherwise.
    pub fn publish<T>(&self, output: T) -> Option<T> {
        if self.is_current() {
            Some(output)
        } else {
            None
        }
    }
}
