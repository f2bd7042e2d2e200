// src/engine/trigger.rs

use std::time::{Duration, Instant};

use crate::watch::WatchProfile;

/// What the trigger decided about a single change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerDecision {
    /// Directory event, or path outside the watched subtree / excluded.
    Ignored,
    /// Relevant path, but inside the cooldown window since the last accepted
    /// trigger.
    Cooldown,
    /// Relevant path outside the cooldown window; a rebuild should run.
    Fire,
}

/// Debounce state for rebuild triggers.
///
/// Owns the single piece of mutable state in the system: the timestamp of the
/// last accepted trigger. The runtime is the only caller, so no locking is
/// needed.
///
/// `evaluate` is a pure read (it never mutates the timestamp); the runtime
/// calls `mark_fired` after dispatching the rebuild, unconditionally, so that
/// a failing build is not retried before the cooldown elapses either.
#[derive(Debug)]
pub struct DebouncedTrigger {
    profile: WatchProfile,
    cooldown: Duration,
    last_fired: Option<Instant>,
}

impl DebouncedTrigger {
    pub fn new(profile: WatchProfile, cooldown: Duration) -> Self {
        Self {
            profile,
            cooldown,
            last_fired: None,
        }
    }

    /// Decide what to do with a change event at `path` (relative to project
    /// root) observed at `now`.
    pub fn evaluate(&self, rel_path: &str, is_dir: bool, now: Instant) -> TriggerDecision {
        if is_dir {
            return TriggerDecision::Ignored;
        }
        if !self.profile.matches(rel_path) {
            return TriggerDecision::Ignored;
        }

        if let Some(last) = self.last_fired {
            if now.duration_since(last) < self.cooldown {
                return TriggerDecision::Cooldown;
            }
        }

        TriggerDecision::Fire
    }

    /// Record that a trigger was accepted at `now`.
    ///
    /// The stored timestamp is non-decreasing for the lifetime of the
    /// process.
    pub fn mark_fired(&mut self, now: Instant) {
        self.last_fired = Some(match self.last_fired {
            Some(prev) => prev.max(now),
            None => now,
        });
    }

    /// Timestamp of the last accepted trigger, if any.
    pub fn last_fired(&self) -> Option<Instant> {
        self.last_fired
    }

    /// The path filter this trigger applies.
    pub fn profile(&self) -> &WatchProfile {
        &self.profile
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}
