//! Hands-free viewport control from webcam hand landmarks.
//!
//! - `landmarks` - 21-point samples and scale-free measurements
//! - `pose` - open-hand / pan classification with hysteresis
//! - `calibration` - learns the user's pinch ratio
//! - `pan` - dead zone, gain and smoothing for pinch-drag panning
//! - `reset` - open-hand hold with cooldown
//! - `throttle` - inference rate limit and hand-loss grace
//! - `camera` - backend traits and the scoped camera lease
//! - `mailbox` - newest-sample handoff from the inference thread
//! - `controller` - the state machine tying it together

mod calibration;
mod camera;
mod controller;
mod landmarks;
mod mailbox;
mod pan;
mod pose;
mod reset;
mod throttle;

pub use calibration::{CalibrationOutcome, CalibrationStep, Calibrator};
pub use camera::{AcquisitionTicket, CameraBackend, CameraEnvironment, CameraLease, CameraStream};
pub use controller::{CalibrationState, GestureController, GestureEvent, GesturePhase};
pub use landmarks::{
    HandLandmarks, HandMetrics, INDEX_MCP, INDEX_TIP, LANDMARK_COUNT, MIDDLE_MCP, MIDDLE_TIP,
    PINKY_MCP, PINKY_TIP, RING_MCP, RING_TIP, THUMB_TIP, WRIST,
};
pub use mailbox::{LandmarkMailbox, LandmarkSample};
pub use pan::{PanSession, PanTuning, apply_dead_zone};
pub use pose::{PoseClassifier, PoseReading};
pub use reset::ResetDetector;
pub use throttle::{FrameThrottle, HandPresence, Presence};
