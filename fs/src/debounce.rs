//! Timer-coalescing queue for file-change events.
//!
//! Rapid-fire events for the same path collapse into a single flush once the
//! path has been quiet for the configured period. The struct itself holds no
//! timers; the watcher loop feeds it `Instant`s and sleeps until
//! [`Debouncer::next_deadline`], which keeps this piece trivially testable.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub struct Debouncer {
    quiet_period: Duration,
    pending: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: HashMap::new(),
        }
    }

    /// Note a change event for `path` observed at `now`. Re-arms the path's
    /// deadline, so a steady stream of events keeps pushing the flush out.
    pub fn record(&mut self, path: PathBuf, now: Instant) {
        self.pending.insert(path, now + self.quiet_period);
    }

    /// Earliest pending deadline, if any path is waiting to flush.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().min().copied()
    }

    /// Drain every path whose quiet period has elapsed as of `now`.
    /// Returned paths are sorted for deterministic processing order.
    pub fn take_due(&mut self, now: Instant) -> Vec<PathBuf> {
        let mut due: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(path, _)| path.clone())
            .collect();

        for path in &due {
            self.pending.remove(path);
        }

        due.sort();
        due
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
