//! Coalescing of "transform changed" notifications and settle-delayed
//! commits to persistence.

use super::transform::Viewport;
use std::time::{Duration, Instant};

/// Where a viewport change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Rapid continuous input (wheel, drag, gesture pan). Render
    /// notifications are rate limited.
    Continuous,
    /// One-shot changes (keyboard, fit, focus, reset). Rendered on the next poll.
    Discrete,
}

/// What the host should do after a poll.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformSignals {
    /// Re-render with the current transform
    pub redraw: bool,
    /// The viewport settled; hand it to persistence
    pub committed: Option<Viewport>,
}

#[derive(Debug, Clone)]
pub struct TransformScheduler {
    render_interval: Duration,
    settle_delay: Duration,
    redraw_pending: bool,
    redraw_immediate: bool,
    last_redraw: Option<Instant>,
    last_change: Option<Instant>,
    last_committed: Option<Viewport>,
}

impl TransformScheduler {
    pub fn new(render_interval: Duration, settle_delay: Duration) -> Self {
        Self {
            render_interval,
            settle_delay,
            redraw_pending: false,
            redraw_immediate: false,
            last_redraw: None,
            last_change: None,
            last_committed: None,
        }
    }

    pub fn set_timings(&mut self, render_interval: Duration, settle_delay: Duration) {
        self.render_interval = render_interval;
        self.settle_delay = settle_delay;
    }

    pub fn mark_changed(&mut self, origin: ChangeOrigin, now: Instant) {
        self.redraw_pending = true;
        if origin == ChangeOrigin::Discrete {
            self.redraw_immediate = true;
        }
        self.last_change = Some(now);
    }

    /// Treat `viewport` as already persisted (e.g. just loaded from the store).
    pub fn mark_committed(&mut self, viewport: Viewport) {
        self.last_committed = Some(viewport);
    }

    pub fn has_pending_commit(&self) -> bool {
        self.last_change.is_some()
    }

    pub fn poll(&mut self, now: Instant, current: Viewport) -> TransformSignals {
        let mut signals = TransformSignals::default();

        if self.redraw_pending {
            let due = self.redraw_immediate
                || self
                    .last_redraw
                    .is_none_or(|at| now.saturating_duration_since(at) >= self.render_interval);
            if due {
                signals.redraw = true;
                self.redraw_pending = false;
                self.redraw_immediate = false;
                self.last_redraw = Some(now);
            }
        }

        if let Some(changed_at) = self.last_change {
            if now.saturating_duration_since(changed_at) >= self.settle_delay {
                self.last_change = None;
                if self.last_committed != Some(current) {
                    self.last_committed = Some(current);
                    signals.committed = Some(current);
                }
            }
        }

        signals
    }

    /// Emit a pending commit now, ignoring the settle delay.
    pub fn flush(&mut self, current: Viewport) -> Option<Viewport> {
        self.last_change.take()?;
        if self.last_committed == Some(current) {
            return None;
        }
        self.last_committed = Some(current);
        Some(current)
    }

    /// Drop pending work without emitting it.
    pub fn reset(&mut self) {
        self.redraw_pending = false;
        self.redraw_immediate = false;
        self.last_change = None;
    }
}
