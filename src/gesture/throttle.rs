//! Inference rate limiting and hand-presence tracking.

use std::time::{Duration, Instant};

/// Accepts at most one frame per interval.
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    interval: Duration,
    last_accepted: Option<Instant>,
}

impl FrameThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: None,
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Whether a frame at `now` would be accepted, without consuming it.
    pub fn is_due(&self, now: Instant) -> bool {
        self.last_accepted
            .is_none_or(|at| now.saturating_duration_since(at) >= self.interval)
    }

    pub fn accept(&mut self, now: Instant) -> bool {
        let due = self.is_due(now);
        if due {
            self.last_accepted = Some(now);
        }
        due
    }

    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Hand seen this frame
    Seen,
    /// Hand missing, still inside the grace period
    Missing,
    /// Grace period just expired
    Lost,
    /// No hand, and none was being tracked
    Absent,
}

/// Tracks whether a hand is present, tolerating short detection gaps.
#[derive(Debug, Clone)]
pub struct HandPresence {
    grace: Duration,
    last_seen: Option<Instant>,
    detected: bool,
}

impl HandPresence {
    pub fn new(grace: Duration) -> Self {
        Self {
            grace,
            last_seen: None,
            detected: false,
        }
    }

    pub fn set_grace(&mut self, grace: Duration) {
        self.grace = grace;
    }

    pub fn is_detected(&self) -> bool {
        self.detected
    }

    pub fn observe(&mut self, seen: bool, now: Instant) -> Presence {
        if seen {
            self.last_seen = Some(now);
            self.detected = true;
            return Presence::Seen;
        }
        self.check(now)
    }

    /// Expire the grace period without a new frame.
    pub fn check(&mut self, now: Instant) -> Presence {
        if !self.detected {
            return Presence::Absent;
        }
        let expired = self
            .last_seen
            .is_none_or(|at| now.saturating_duration_since(at) >= self.grace);
        if expired {
            self.detected = false;
            Presence::Lost
        } else {
            Presence::Missing
        }
    }

    pub fn reset(&mut self) {
        self.last_seen = None;
        self.detected = false;
    }
}
