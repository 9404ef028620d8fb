//! Viewport transform: `{zoom, pan}` and everything that moves it.
//!
//! - `transform` - pure screen/world math, clamping, fit-to-content
//! - `animation` - eased focus-to-point
//! - `scheduler` - coalesced redraw signals and settle-delayed commits
//! - `controller` - the stateful per-view object the rest of the crate writes through

mod animation;
mod controller;
mod scheduler;
mod transform;

pub use animation::FocusAnimation;
pub use controller::{ViewportController, ViewportHost};
pub use scheduler::{ChangeOrigin, TransformScheduler, TransformSignals};
pub use transform::{PanBounds, Viewport, clamp_zoom, fit_to_content};
