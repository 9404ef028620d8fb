//! Camera acquisition and scoped ownership.
//!
//! Acquisition is asynchronous: the controller asks the backend for a
//! stream and tags the request with an [`AcquisitionTicket`]. The backend
//! hands the stream back later. A ticket that no longer matches the
//! controller's generation means the request was superseded (gesture
//! control was turned off, or toggled again), and the stream must be
//! released immediately instead of adopted.

use crate::error::CameraError;

/// Properties of the host environment that gate camera access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraEnvironment {
    /// Camera APIs are only exposed in secure contexts
    pub secure_context: bool,
    pub media_devices: bool,
}

impl CameraEnvironment {
    pub const AVAILABLE: Self = Self {
        secure_context: true,
        media_devices: true,
    };

    /// Reject environments that can never provide a camera.
    pub fn check(&self) -> Result<(), CameraError> {
        if !self.media_devices {
            return Err(CameraError::Unsupported);
        }
        if !self.secure_context {
            return Err(CameraError::InsecureContext);
        }
        Ok(())
    }
}

/// Identifies one acquisition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AcquisitionTicket {
    pub generation: u64,
}

/// A running camera stream together with its inference pipeline.
pub trait CameraStream {
    /// Stop all tracks and release the inference model.
    fn stop(&mut self);

    fn label(&self) -> &str {
        "camera"
    }
}

pub trait CameraBackend {
    fn environment(&self) -> CameraEnvironment {
        CameraEnvironment::AVAILABLE
    }

    /// Start acquiring a stream. The result is delivered back through
    /// `GestureController::camera_ready` with the same ticket.
    fn request(&mut self, ticket: AcquisitionTicket);
}

/// Exclusive owner of a live stream. Dropping the lease stops it.
pub struct CameraLease {
    stream: Option<Box<dyn CameraStream>>,
    generation: u64,
}

impl CameraLease {
    pub fn new(stream: Box<dyn CameraStream>, generation: u64) -> Self {
        tracing::info!("Camera acquired: {} (generation {})", stream.label(), generation);
        Self {
            stream: Some(stream),
            generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stop the stream now. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            tracing::info!("Camera released: {} (generation {})", stream.label(), self.generation);
        }
    }
}

impl Drop for CameraLease {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for CameraLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraLease")
            .field("generation", &self.generation)
            .field("live", &self.stream.is_some())
            .finish()
    }
}
