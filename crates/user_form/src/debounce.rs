//! Per-key debounce timers driven by explicit time.
//!
//! `schedule` arms (or re-arms) the timer for a key; `due` drains every key whose
//! quiet period has elapsed. Keys never share a timer. The owner decides where
//! `now` comes from, which keeps this module free of clocks and async runtimes:
//! the TUI passes `Instant::now()` on every tick, tests pass synthetic instants.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Debounce window used by the form unless configured otherwise.
pub const DEFAULT_QUIET: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct Debouncer<K> {
    quiet: Duration,
    deadlines: HashMap<K, Instant>,
}

impl<K> Default for Debouncer<K> {
    fn default() -> Self {
        Self {
            quiet: DEFAULT_QUIET,
            deadlines: HashMap::new(),
        }
    }
}

impl<K> Debouncer<K>
where
    K: Copy + Eq + Hash + Ord + std::fmt::Debug,
{
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadlines: HashMap::new(),
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Arm the timer for `key` at `now + quiet`. A pending timer for the same key is
    /// superseded. Returns true if a pending timer was replaced.
    pub fn schedule(&mut self, key: K, now: Instant) -> bool {
        let replaced = self.deadlines.insert(key, now + self.quiet).is_some();
        tracing::trace!(?key, replaced, "debounce armed");
        replaced
    }

    /// Drop the pending timer for `key`, if any.
    pub fn cancel(&mut self, key: K) -> bool {
        self.deadlines.remove(&key).is_some()
    }

    pub fn clear(&mut self) {
        self.deadlines.clear();
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.deadlines.contains_key(&key)
    }

    pub fn pending(&self) -> usize {
        self.deadlines.len()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    /// Remove and return every key whose deadline is at or before `now`, ordered by
    /// deadline (ties broken by key order).
    pub fn due(&mut self, now: Instant) -> Vec<K> {
        let mut fired: Vec<(Instant, K)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, deadline)| (*deadline, *key))
            .collect();
        fired.sort();
        for (_, key) in &fired {
            self.deadlines.remove(key);
        }
        fired.into_iter().map(|(_, key)| key).collect()
    }
}
