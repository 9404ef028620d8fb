//! Single-slot handoff from the inference thread to the UI thread.
//!
//! Inference produces samples faster than the UI may consume them; only the
//! newest one matters, so posting overwrites whatever is waiting.

use super::landmarks::HandLandmarks;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

/// One inference result. `hand` is `None` when no hand was detected.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSample {
    pub at: Instant,
    pub hand: Option<HandLandmarks>,
}

#[derive(Debug, Clone, Default)]
pub struct LandmarkMailbox {
    slot: Arc<Mutex<Option<LandmarkSample>>>,
}

impl LandmarkMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any unread sample.
    pub fn post(&self, sample: LandmarkSample) {
        *self.slot.lock() = Some(sample);
    }

    pub fn take(&self) -> Option<LandmarkSample> {
        self.slot.lock().take()
    }

    pub fn clear(&self) {
        self.slot.lock().take();
    }
}
