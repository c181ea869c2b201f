//! Scene management: the camera, the active model, and vertex formats.

pub mod model;
pub mod scene;
pub mod vertex;

pub use model::{DrawModel, Mesh, Model};
pub use scene::{Scene, ROTATE_STEP};
pub use vertex::Vertex3D;
