//! Graphics: camera system, auto-framing, scene state and the wgpu
//! rendering pipeline.

pub mod camera;
pub mod framing;
pub mod rendering;
pub mod resources;
pub mod scene;

pub use camera::orbit_camera::OrbitCamera;
pub use framing::{fitting_distance, frame_model, BoundingBox};
pub use rendering::render_engine::RenderEngine;
