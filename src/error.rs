//! Error types for camera acquisition, landmark payloads and settings I/O.

use thiserror::Error;

/// Why the camera could not be acquired.
///
/// Each variant is surfaced to the user with its own message; none of them
/// is retried automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// The user (or a policy) refused camera access
    #[error("camera permission denied")]
    PermissionDenied,

    /// No video input device is present
    #[error("no camera device found")]
    NoDevice,

    /// The device exists but another application holds it
    #[error("camera is in use by another application")]
    DeviceBusy,

    /// Camera access requires a secure context (HTTPS or localhost)
    #[error("camera requires a secure context")]
    InsecureContext,

    /// The host environment has no camera API at all
    #[error("camera access is not supported here")]
    Unsupported,

    /// Anything the backend could not classify
    #[error("camera error: {0}")]
    Other(String),
}

impl CameraError {
    /// Stable notification key for this failure.
    pub fn notice_key(&self) -> &'static str {
        match self {
            CameraError::PermissionDenied => "camera.permission_denied",
            CameraError::NoDevice => "camera.no_device",
            CameraError::DeviceBusy => "camera.busy",
            CameraError::InsecureContext => "camera.insecure_context",
            CameraError::Unsupported => "camera.unsupported",
            CameraError::Other(_) => "camera.failed",
        }
    }
}

/// A hand detection payload that does not have the 21-point topology.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected} hand landmarks, got {found}")]
pub struct LandmarkCountError {
    pub expected: usize,
    pub found: usize,
}

/// Errors that can occur while loading or saving settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to persist settings file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("no configuration directory available")]
    NoConfigDir,
}

/// Result type alias for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;
