//! Pose classification with enter/stay hysteresis.

use super::landmarks::HandMetrics;
use crate::geometry::Point;
use crate::settings::GestureSettings;

/// Classification of one hand sample.
///
/// `pan_enter` is the narrow band needed to start a pan; `pan_stay` is the
/// wider band that keeps an active pan alive. `pan_enter` implies `pan_stay`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseReading {
    pub open_five: bool,
    pub pan_enter: bool,
    pub pan_stay: bool,
    pub pinch_ratio: f32,
    pub center: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseClassifier {
    enter_ratio: f32,
    stay_ratio: f32,
    open_extension: f32,
    open_gap: f32,
}

impl PoseClassifier {
    /// Thresholds scaled from the user's calibrated pinch ratio.
    pub fn new(pinch_ratio: f32, settings: &GestureSettings) -> Self {
        let stay_factor = settings.pan_stay_factor.max(settings.pan_enter_factor);
        Self {
            enter_ratio: pinch_ratio * settings.pan_enter_factor,
            stay_ratio: pinch_ratio * stay_factor,
            open_extension: settings.open_extension,
            open_gap: settings.open_gap,
        }
    }

    pub fn enter_ratio(&self) -> f32 {
        self.enter_ratio
    }

    pub fn stay_ratio(&self) -> f32 {
        self.stay_ratio
    }

    pub fn classify(&self, metrics: &HandMetrics) -> PoseReading {
        let open_five = self.is_open_five(metrics);
        let pinch = metrics.pinch_ratio;
        PoseReading {
            open_five,
            pan_enter: !open_five && pinch <= self.enter_ratio,
            pan_stay: !open_five && pinch <= self.stay_ratio,
            pinch_ratio: pinch,
            center: metrics.center,
        }
    }

    /// Every finger extended and every adjacent pair of tips spread apart.
    fn is_open_five(&self, metrics: &HandMetrics) -> bool {
        metrics.extensions.iter().all(|&e| e >= self.open_extension)
            && metrics.gaps.iter().all(|&g| g >= self.open_gap)
    }
}
