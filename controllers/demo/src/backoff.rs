//! # Fibonacci Backoff
//!
//! Requeue delays for failed reconciliations.
//!
//! The sequence is counted in minutes: 1m, 1m, 2m, 3m, 5m, 8m, 10m (max).
//! [`BackoffTracker`] keeps one sequence per object so a failing `Demo` does
//! not slow down retries of the others. A successful reconciliation resets
//! that object's sequence.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Minimum backoff in minutes
pub const MIN_BACKOFF_MINUTES: u64 = 1;

/// Maximum backoff in minutes
pub const MAX_BACKOFF_MINUTES: u64 = 10;

/// Fibonacci backoff calculator
///
/// Each backoff is the sum of the previous two, capped at `max_minutes`.
#[derive(Debug, Clone)]
pub struct FibonacciBackoff {
    /// Previous backoff value in minutes
    prev_minutes: u64,
    /// Current backoff value in minutes
    current_minutes: u64,
    /// Maximum backoff value in minutes
    max_minutes: u64,
}

impl FibonacciBackoff {
    /// Create a new Fibonacci backoff with specified minimum and maximum values in minutes
    #[must_use]
    pub fn new(min_minutes: u64, max_minutes: u64) -> Self {
        Self {
            prev_minutes: 0,
            current_minutes: min_minutes,
            max_minutes,
        }
    }

    /// Get the next backoff duration in seconds and advance the sequence
    pub fn next_backoff_seconds(&mut self) -> u64 {
        let result_seconds = self.current_minutes * 60;

        let next_minutes = self.prev_minutes + self.current_minutes;
        self.prev_minutes = self.current_minutes;
        self.current_minutes = std::cmp::min(next_minutes, self.max_minutes);

        result_seconds
    }

    /// Get the next backoff duration as a `Duration` and advance the sequence
    pub fn next_backoff(&mut self) -> Duration {
        Duration::from_secs(self.next_backoff_seconds())
    }
}

impl Default for FibonacciBackoff {
    fn default() -> Self {
        Self::new(MIN_BACKOFF_MINUTES, MAX_BACKOFF_MINUTES)
    }
}

/// Per-object backoff state (namespace/name -> backoff)
#[derive(Debug, Default)]
pub struct BackoffTracker {
    states: Mutex<HashMap<String, FibonacciBackoff>>,
}

impl BackoffTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next requeue delay for `key`, advancing its sequence.
    pub fn next(&self, key: &str) -> Duration {
        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        states.entry(key.to_string()).or_default().next_backoff()
    }

    /// Forget the failure history of `key`.
    pub fn reset(&self, key: &str) {
        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        states.remove(key);
    }

    /// Number of objects currently backing off
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.states.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fibonacci_backoff_sequence() {
        let mut backoff = FibonacciBackoff::new(1, 10);

        // 1m, 1m, 2m, 3m, 5m, 8m, 10m (max)
        assert_eq!(backoff.next_backoff_seconds(), 60);
        assert_eq!(backoff.next_backoff_seconds(), 60);
        assert_eq!(backoff.next_backoff_seconds(), 120);
        assert_eq!(backoff.next_backoff_seconds(), 180);
        assert_eq!(backoff.next_backoff_seconds(), 300);
        assert_eq!(backoff.next_backoff_seconds(), 480);
        assert_eq!(backoff.next_backoff_seconds(), 600);
        // 13m would be next, capped at 10m
        assert_eq!(backoff.next_backoff_seconds(), 600);
        assert_eq!(backoff.next_backoff_seconds(), 600);
    }

    #[test]
    fn test_fibonacci_backoff_default_bounds() {
        let mut backoff = FibonacciBackoff::default();

        assert_eq!(backoff.next_backoff(), Duration::from_secs(MIN_BACKOFF_MINUTES * 60));
        for _ in 0..10 {
            backoff.next_backoff();
        }
        assert_eq!(backoff.next_backoff(), Duration::from_secs(MAX_BACKOFF_MINUTES * 60));
    }

    #[test]
    fn test_tracker_keeps_objects_independent() {
        let tracker = BackoffTracker::new();

        assert_eq!(tracker.next("default/a"), Duration::from_secs(60));
        assert_eq!(tracker.next("default/a"), Duration::from_secs(60));
        assert_eq!(tracker.next("default/a"), Duration::from_secs(120));

        // A different object starts its own sequence
        assert_eq!(tracker.next("default/b"), Duration::from_secs(60));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_tracker_reset_after_success() {
        let tracker = BackoffTracker::new();

        tracker.next("default/a");
        tracker.next("default/a");
        assert_eq!(tracker.next("default/a"), Duration::from_secs(120));

        tracker.reset("default/a");
        assert_eq!(tracker.len(), 0);
        assert_eq!(tracker.next("default/a"), Duration::from_secs(60));
    }
}
