//! Floor-plan viewport and spatial-selection engine.
//!
//! Pan/zoom over a floor-plan image, room hit testing, object selection and
//! group moves, and a webcam hand-gesture channel that drives the same
//! viewport. The crate has no UI toolkit dependency: a hosting view feeds it
//! pointer, wheel, keyboard and camera events and reads back state.

pub mod constants;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod hit_testing;
pub mod input;
pub mod logging;
pub mod notifications;
pub mod perf;
pub mod selection;
pub mod settings;
pub mod settings_watcher;
pub mod spatial_index;
pub mod types;
pub mod view;
pub mod viewport;

pub use error::{CameraError, LandmarkCountError, SettingsError};
pub use geometry::{Point, Rect, Size};
pub use notifications::{Bilingual, Notice, NotificationSink};
pub use settings::Settings;
pub use types::{FloorPlan, MapObject, ObjectId, PlanId, Room, RoomId, RoomShape};
pub use view::{FloorPlanView, FrameOutput, PlanStore};
pub use viewport::{Viewport, ViewportController};
