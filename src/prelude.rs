//! Convenience imports for typical viewer applications.
//!
//! ```no_run
//! use meshview::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut app = meshview::default();
//!     app.set_source(ModelSource::parse("assets/example.obj"));
//!     app.run()
//! }
//! ```

pub use crate::app::ViewerApp;
pub use crate::config::{ReplacePolicy, ViewerConfig};
pub use crate::default;
pub use crate::gfx::camera::CameraManager;
pub use crate::gfx::scene::Scene;
pub use crate::gfx::{fitting_distance, frame_model, BoundingBox};
pub use crate::loader::{ModelSource, SourceError};

pub use cgmath::{InnerSpace, Vector3, Zero};
