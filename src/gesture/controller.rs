//! Gesture control state machine.
//!
//! Turns the noisy per-frame landmark stream into discrete pan and reset
//! gestures that drive a [`ViewportHost`]. All per-phase data lives inside
//! the phase variant, so a pan session cannot outlive the panning phase.
//!
//! ## State Transitions
//!
//! ```text
//! Disabled    -> Enabling      (enable; environment supports a camera)
//! Enabling    -> Calibrating   (camera ready; not yet calibrated, or calibration requested)
//! Enabling    -> Idle          (camera ready; already calibrated)
//! Enabling    -> Disabled      (camera error)
//! Calibrating -> Idle          (enough pinch frames, or timeout fallback)
//! Idle        -> Panning       (pose enters the pan band)
//! Panning     -> Idle          (pose leaves the stay band, hand lost, or reset fired)
//! Idle        -> Calibrating   (request_calibration)
//! Any         -> Disabled      (disable / teardown)
//! ```
//!
//! The open-hand reset runs alongside Idle and Panning.

use super::calibration::{CalibrationOutcome, CalibrationStep, Calibrator};
use super::camera::{AcquisitionTicket, CameraBackend, CameraLease, CameraStream};
use super::landmarks::HandLandmarks;
use super::mailbox::LandmarkSample;
use super::pan::{PanSession, PanTuning};
use super::pose::PoseClassifier;
use super::reset::ResetDetector;
use super::throttle::{FrameThrottle, HandPresence, Presence};
use crate::error::CameraError;
use crate::geometry::Point;
use crate::notifications::{Notice, NotificationSink};
use crate::settings::GestureSettings;
use crate::viewport::ViewportHost;
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum GesturePhase {
    /// Camera off
    Disabled,

    /// Waiting for the backend to deliver a stream
    Enabling { ticket: AcquisitionTicket },

    /// Learning the user's pinch ratio
    Calibrating { calibrator: Calibrator },

    /// Tracking, no gesture in progress
    Idle,

    /// Pinch-drag pan in progress
    Panning { session: PanSession },
}

impl GesturePhase {
    /// Phases in which landmark frames are consumed.
    pub fn accepts_frames(&self) -> bool {
        matches!(
            self,
            Self::Calibrating { .. } | Self::Idle | Self::Panning { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Enabling { .. } => "enabling",
            Self::Calibrating { .. } => "calibrating",
            Self::Idle => "idle",
            Self::Panning { .. } => "panning",
        }
    }
}

/// Learned pinch ratio, `None` until the first calibration finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalibrationState {
    pub pinch_ratio: Option<f32>,
}

/// What one frame (or tick) did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Frame arrived while no camera session is running
    Inactive,
    /// Dropped by the inference rate limit
    Throttled,
    /// No usable hand, still inside the grace period (or none tracked)
    NoHand,
    /// Grace period expired; any pan was abandoned
    HandLost,
    Calibration(CalibrationStep),
    /// Hand tracked, nothing triggered
    Tracking,
    PanStarted,
    /// Pan applied; carries the viewport pan after clamping
    Panned(Point),
    PanEnded,
    ViewReset,
}

pub struct GestureController {
    phase: GesturePhase,
    settings: GestureSettings,
    tuning: PanTuning,
    backend: Box<dyn CameraBackend>,
    sink: Box<dyn NotificationSink>,
    lease: Option<CameraLease>,
    generation: u64,
    calibration: CalibrationState,
    calibrate_on_ready: bool,
    reset: ResetDetector,
    throttle: FrameThrottle,
    presence: HandPresence,
}

impl GestureController {
    pub fn new(
        settings: GestureSettings,
        backend: Box<dyn CameraBackend>,
        sink: Box<dyn NotificationSink>,
    ) -> Self {
        Self {
            phase: GesturePhase::Disabled,
            tuning: PanTuning::from(&settings),
            reset: ResetDetector::new(&settings),
            throttle: FrameThrottle::new(settings.inference_interval()),
            presence: HandPresence::new(settings.hand_loss_grace()),
            settings,
            backend,
            sink,
            lease: None,
            generation: 0,
            calibration: CalibrationState::default(),
            calibrate_on_ready: false,
        }
    }

    // ========================================================================
    // State queries
    // ========================================================================

    pub fn phase(&self) -> &GesturePhase {
        &self.phase
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.phase, GesturePhase::Disabled)
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.phase, GesturePhase::Panning { .. })
    }

    pub fn hand_detected(&self) -> bool {
        self.presence.is_detected()
    }

    pub fn calibration(&self) -> CalibrationState {
        self.calibration
    }

    pub fn has_camera(&self) -> bool {
        self.lease.is_some()
    }

    pub fn settings(&self) -> &GestureSettings {
        &self.settings
    }

    /// Whether the host should run inference for a frame at `now`.
    pub fn wants_frame(&self, now: Instant) -> bool {
        self.phase.accepts_frames() && self.throttle.is_due(now)
    }

    // ========================================================================
    // User-facing controls
    // ========================================================================

    pub fn toggle(&mut self) -> bool {
        if self.is_enabled() {
            self.disable();
            false
        } else {
            self.enable()
        }
    }

    /// Start acquiring the camera. Returns `false` if already enabled or
    /// the environment cannot provide one.
    pub fn enable(&mut self) -> bool {
        if self.is_enabled() {
            return false;
        }
        if let Err(err) = self.backend.environment().check() {
            self.calibrate_on_ready = false;
            self.report_camera_error(&err);
            return false;
        }

        self.generation += 1;
        let ticket = AcquisitionTicket {
            generation: self.generation,
        };
        tracing::debug!("Gesture control enabling (generation {})", ticket.generation);
        self.phase = GesturePhase::Enabling { ticket };
        self.sink.on_info(Notice::gesture_starting());
        self.backend.request(ticket);
        true
    }

    /// Turn gesture control off and release the camera.
    pub fn disable(&mut self) {
        if !self.is_enabled() && self.lease.is_none() {
            return;
        }
        self.teardown();
        self.sink.on_info(Notice::gesture_disabled());
    }

    /// Synchronously drop everything: session, camera, timers. Pending
    /// acquisitions become stale. Emits nothing.
    pub fn teardown(&mut self) {
        if self.is_enabled() {
            tracing::debug!("Gesture control teardown from {}", self.phase.name());
        }
        self.generation += 1;
        self.phase = GesturePhase::Disabled;
        if let Some(mut lease) = self.lease.take() {
            lease.release();
        }
        self.calibrate_on_ready = false;
        self.reset.reset();
        self.throttle.reset();
        self.presence.reset();
    }

    /// Start (or restart) calibration. When the camera is not running yet,
    /// calibration starts as soon as it is.
    pub fn request_calibration(&mut self, now: Instant) {
        match self.phase {
            GesturePhase::Disabled => {
                self.calibrate_on_ready = true;
                self.enable();
            }
            GesturePhase::Enabling { .. } => self.calibrate_on_ready = true,
            _ => self.begin_calibration(now),
        }
    }

    pub fn apply_settings(&mut self, settings: GestureSettings) {
        self.tuning = PanTuning::from(&settings);
        self.throttle.set_interval(settings.inference_interval());
        self.presence.set_grace(settings.hand_loss_grace());
        self.reset.set_timings(&settings);
        self.settings = settings;
    }

    // ========================================================================
    // Camera completion
    // ========================================================================

    /// Deliver the result of a [`CameraBackend::request`].
    ///
    /// Stale tickets release their stream immediately. Returns whether the
    /// stream was adopted.
    pub fn camera_ready(
        &mut self,
        ticket: AcquisitionTicket,
        result: Result<Box<dyn CameraStream>, CameraError>,
        now: Instant,
    ) -> bool {
        let current = matches!(self.phase, GesturePhase::Enabling { ticket: t } if t == ticket);
        if !current {
            if let Ok(mut stream) = result {
                stream.stop();
                tracing::debug!(
                    "Released stale camera stream (generation {}, current {})",
                    ticket.generation,
                    self.generation
                );
            }
            return false;
        }

        match result {
            Err(err) => {
                self.phase = GesturePhase::Disabled;
                self.calibrate_on_ready = false;
                self.report_camera_error(&err);
                false
            }
            Ok(stream) => {
                self.lease = Some(CameraLease::new(stream, ticket.generation));
                self.throttle.reset();
                self.presence.reset();
                self.reset.reset();
                self.sink.on_info(Notice::gesture_enabled());

                let recalibrate = std::mem::take(&mut self.calibrate_on_ready);
                if recalibrate || self.calibration.pinch_ratio.is_none() {
                    self.begin_calibration(now);
                } else {
                    self.phase = GesturePhase::Idle;
                }
                true
            }
        }
    }

    fn report_camera_error(&mut self, err: &CameraError) {
        tracing::error!("Gesture control unavailable: {}", err);
        self.sink.on_error(Notice::camera_error(err));
    }

    // ========================================================================
    // Frame processing
    // ========================================================================

    pub fn process_sample(&mut self, sample: LandmarkSample, host: &mut dyn ViewportHost) -> GestureEvent {
        self.process_frame(sample.at, sample.hand.as_ref(), host)
    }

    /// Consume one inference result.
    pub fn process_frame(
        &mut self,
        now: Instant,
        hand: Option<&HandLandmarks>,
        host: &mut dyn ViewportHost,
    ) -> GestureEvent {
        if !self.phase.accepts_frames() {
            return GestureEvent::Inactive;
        }
        if !self.throttle.accept(now) {
            return GestureEvent::Throttled;
        }

        let metrics = hand.and_then(HandLandmarks::metrics);
        let presence = self.presence.observe(metrics.is_some(), now);
        if presence == Presence::Lost {
            self.on_hand_lost();
        }

        if let GesturePhase::Calibrating { calibrator } = &mut self.phase {
            let step = calibrator.feed(metrics.map(|m| m.pinch_ratio), now);
            self.on_calibration_step(step);
            return GestureEvent::Calibration(step);
        }

        let Some(metrics) = metrics else {
            return if presence == Presence::Lost {
                GestureEvent::HandLost
            } else {
                GestureEvent::NoHand
            };
        };

        let ratio = self
            .calibration
            .pinch_ratio
            .unwrap_or(self.settings.calibration_fallback_ratio);
        let reading = PoseClassifier::new(ratio, &self.settings).classify(&metrics);

        if self.reset.update(reading.open_five, reading.center, now) {
            if self.is_panning() {
                self.phase = GesturePhase::Idle;
            }
            tracing::info!("Open-hand reset: restoring default view");
            host.restore_default_view(now);
            self.sink.on_info(Notice::view_reset());
            return GestureEvent::ViewReset;
        }

        match &mut self.phase {
            GesturePhase::Panning { session } => {
                if reading.pan_stay {
                    let pan = session.step(reading.center, host.viewport_size(), &self.tuning);
                    host.set_pan(pan, now);
                    GestureEvent::Panned(host.viewport().pan)
                } else {
                    tracing::debug!("Pan ended (pinch ratio {:.3})", reading.pinch_ratio);
                    self.phase = GesturePhase::Idle;
                    GestureEvent::PanEnded
                }
            }
            GesturePhase::Idle if reading.pan_enter => {
                tracing::debug!("Pan started (pinch ratio {:.3})", reading.pinch_ratio);
                let session = PanSession::open(reading.center, reading.pinch_ratio, host.viewport());
                self.phase = GesturePhase::Panning { session };
                GestureEvent::PanStarted
            }
            _ => GestureEvent::Tracking,
        }
    }

    /// Time-driven checks between inference frames: calibration timeout
    /// and hand-loss grace expiry.
    pub fn tick(&mut self, now: Instant) -> Option<GestureEvent> {
        if let GesturePhase::Calibrating { calibrator } = &self.phase {
            if let Some(step) = calibrator.tick(now) {
                self.on_calibration_step(step);
                return Some(GestureEvent::Calibration(step));
            }
        }
        if self.phase.accepts_frames() && self.presence.check(now) == Presence::Lost {
            self.on_hand_lost();
            return Some(GestureEvent::HandLost);
        }
        None
    }

    fn on_hand_lost(&mut self) {
        tracing::debug!("Hand lost");
        self.reset.reset_hold();
        if self.is_panning() {
            self.phase = GesturePhase::Idle;
        }
    }

    // ========================================================================
    // Calibration
    // ========================================================================

    fn begin_calibration(&mut self, now: Instant) {
        tracing::info!("Calibration started");
        self.phase = GesturePhase::Calibrating {
            calibrator: Calibrator::new(&self.settings, now),
        };
        self.reset.reset();
        self.sink.on_info(Notice::calibration_started());
    }

    fn on_calibration_step(&mut self, step: CalibrationStep) {
        match step {
            CalibrationStep::Pending => {}
            CalibrationStep::Progress(percent) => {
                self.sink.on_info(Notice::calibration_progress(percent));
            }
            CalibrationStep::Done(outcome) => self.finish_calibration(outcome),
        }
    }

    fn finish_calibration(&mut self, outcome: CalibrationOutcome) {
        self.calibration.pinch_ratio = Some(outcome.pinch_ratio);
        self.phase = GesturePhase::Idle;
        if outcome.timed_out {
            tracing::warn!(
                "Calibration timed out, using fallback pinch ratio {:.3}",
                outcome.pinch_ratio
            );
            self.sink.on_info(Notice::calibration_fallback());
        } else {
            tracing::info!("Calibrated pinch ratio {:.3}", outcome.pinch_ratio);
            self.sink.on_info(Notice::calibration_done());
        }
    }
}

impl Drop for GestureController {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for GestureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureController")
            .field("phase", &self.phase.name())
            .field("generation", &self.generation)
            .field("calibration", &self.calibration)
            .field("lease", &self.lease)
            .finish()
    }
}
