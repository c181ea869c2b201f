//! GPU resource management: global uniforms and textures.

pub mod global_bindings;
pub mod texture_resource;

pub use global_bindings::{GlobalBindings, GlobalUBO, LightConfig};
pub use texture_resource::TextureResource;
