//! Open-hand hold that resets the view.
//!
//! The open pose must be held still (centre drift within tolerance) for the
//! hold duration. After firing, the detector cools down and stays disarmed
//! until the pose is released, so one long hold fires once. A gap in hand
//! frames longer than the hand-loss grace breaks the hold.

use crate::geometry::Point;
use crate::settings::GestureSettings;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ResetDetector {
    hold: Duration,
    cooldown: Duration,
    drift_tolerance: f32,
    max_gap: Duration,
    anchor: Option<(Instant, Point)>,
    last_frame: Option<Instant>,
    cooldown_until: Option<Instant>,
    armed: bool,
}

impl ResetDetector {
    pub fn new(settings: &GestureSettings) -> Self {
        Self {
            hold: settings.reset_hold(),
            cooldown: settings.reset_cooldown(),
            drift_tolerance: settings.reset_drift_tolerance,
            max_gap: settings.hand_loss_grace(),
            anchor: None,
            last_frame: None,
            cooldown_until: None,
            armed: true,
        }
    }

    /// Take new timings without forgetting a running cooldown.
    pub fn set_timings(&mut self, settings: &GestureSettings) {
        self.hold = settings.reset_hold();
        self.cooldown = settings.reset_cooldown();
        self.drift_tolerance = settings.reset_drift_tolerance;
        self.max_gap = settings.hand_loss_grace();
    }

    pub fn is_holding(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn in_cooldown(&self, now: Instant) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }

    /// Feed one classified frame. Returns `true` when the reset fires.
    pub fn update(&mut self, open_five: bool, center: Point, now: Instant) -> bool {
        let gap_too_long = self
            .last_frame
            .is_some_and(|last| now.saturating_duration_since(last) > self.max_gap);
        self.last_frame = Some(now);
        if gap_too_long {
            self.anchor = None;
        }

        if !open_five {
            self.anchor = None;
            self.armed = true;
            return false;
        }
        if !self.armed || self.in_cooldown(now) {
            self.anchor = None;
            return false;
        }

        match self.anchor {
            None => {
                self.anchor = Some((now, center));
                false
            }
            Some((_, origin)) if origin.distance(center) > self.drift_tolerance => {
                self.anchor = Some((now, center));
                false
            }
            Some((since, _)) if now.saturating_duration_since(since) >= self.hold => {
                self.anchor = None;
                self.armed = false;
                self.cooldown_until = Some(now + self.cooldown);
                true
            }
            Some(_) => false,
        }
    }

    /// Drop a hold in progress. Cooldown and arming are kept.
    pub fn reset_hold(&mut self) {
        self.anchor = None;
        self.last_frame = None;
    }

    /// Forget any hold in progress and the cooldown.
    pub fn reset(&mut self) {
        self.reset_hold();
        self.cooldown_until = None;
        self.armed = true;
    }
}
