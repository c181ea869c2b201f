//! Convenience wrappers for common wgpu operations.

pub mod binding_builder;
pub mod binding_types;
pub mod uniform_buffer;

pub use binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc};
pub use binding_types::*;
pub use uniform_buffer::UniformBuffer;
