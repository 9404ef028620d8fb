//! Pinch calibration: learn the user's natural pinch ratio.
//!
//! The user holds a pinch; qualifying frames accumulate until enough
//! consecutive ones are seen. Releasing the pinch (or losing the hand)
//! starts the count over. If the timeout passes first, a fallback ratio
//! is used so gesture control stays usable.

use crate::settings::GestureSettings;
use std::time::{Duration, Instant};

/// Result of a finished calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationOutcome {
    pub pinch_ratio: f32,
    pub timed_out: bool,
}

/// What a single frame (or tick) did to the calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationStep {
    /// Nothing worth reporting
    Pending,
    /// Progress crossed into a new bucket (or dropped back to zero)
    Progress(u8),
    Done(CalibrationOutcome),
}

#[derive(Debug, Clone)]
pub struct Calibrator {
    started: Instant,
    timeout: Duration,
    required: usize,
    release_ratio: f32,
    fallback_ratio: f32,
    bucket: u8,
    count: usize,
    sum: f64,
    reported: u8,
}

impl Calibrator {
    pub fn new(settings: &GestureSettings, now: Instant) -> Self {
        Self {
            started: now,
            timeout: settings.calibration_timeout(),
            required: settings.calibration_frames.max(1),
            release_ratio: settings.calibration_release_ratio,
            fallback_ratio: settings.calibration_fallback_ratio,
            bucket: settings.progress_bucket_percent.clamp(1, 100),
            count: 0,
            sum: 0.0,
            reported: 0,
        }
    }

    /// Consecutive qualifying frames so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Progress rounded down to the reporting bucket.
    pub fn progress_percent(&self) -> u8 {
        let raw = (self.count * 100 / self.required).min(100) as u8;
        raw / self.bucket * self.bucket
    }

    /// Feed one frame. `pinch_ratio` is `None` when no usable hand was seen.
    pub fn feed(&mut self, pinch_ratio: Option<f32>, now: Instant) -> CalibrationStep {
        if let Some(step) = self.tick(now) {
            return step;
        }

        match pinch_ratio {
            Some(ratio) if ratio.is_finite() && ratio <= self.release_ratio => {
                self.count += 1;
                self.sum += f64::from(ratio);
            }
            _ => {
                if self.count > 0 {
                    tracing::debug!("Calibration pinch released after {} frames", self.count);
                }
                self.count = 0;
                self.sum = 0.0;
            }
        }

        if self.count >= self.required {
            let mean = (self.sum / self.count as f64) as f32;
            return CalibrationStep::Done(CalibrationOutcome {
                pinch_ratio: mean,
                timed_out: false,
            });
        }

        let percent = self.progress_percent();
        if percent != self.reported {
            self.reported = percent;
            CalibrationStep::Progress(percent)
        } else {
            CalibrationStep::Pending
        }
    }

    /// Timeout check, also driven between frames.
    pub fn tick(&self, now: Instant) -> Option<CalibrationStep> {
        (now.saturating_duration_since(self.started) >= self.timeout).then(|| {
            CalibrationStep::Done(CalibrationOutcome {
                pinch_ratio: self.fallback_ratio,
                timed_out: true,
            })
        })
    }
}
