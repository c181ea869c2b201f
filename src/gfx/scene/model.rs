//! Drawable model: mesh parts plus a position/rotation transform.

use std::ops::Range;

use cgmath::{Matrix4, Rad, Vector3, Zero};
use wgpu::Device;

use crate::gfx::framing::BoundingBox;
use crate::loader::obj::MeshData;

use super::vertex::Vertex3D;

/// A single drawable part of a model, with lazily created GPU buffers.
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
}

impl Mesh {
    /// Builds a mesh from flat position/normal arrays (three floats per
    /// vertex) and a triangle index list, as produced by the OBJ parser.
    pub fn new(positions: Vec<f32>, normals: Vec<f32>, indices: Vec<u32>) -> Self {
        let index_count = indices.len() as u32;

        let mut vertices = Vec::with_capacity(positions.len() / 3);
        for i in 0..positions.len() / 3 {
            vertices.push(Vertex3D {
                position: [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]],
                normal: [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]],
            });
        }

        Self {
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
            index_count,
        }
    }

    pub fn from_data(data: MeshData) -> Self {
        Self::new(data.positions, data.normals, data.indices)
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Iterates over vertex positions in the mesh's local frame.
    pub fn positions(&self) -> impl Iterator<Item = Vector3<f32>> + '_ {
        self.vertices
            .iter()
            .map(|v| Vector3::new(v.position[0], v.position[1], v.position[2]))
    }

    fn init_gpu_buffers(&mut self, device: &Device) {
        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Model Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );
        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Model Index Buffer"),
                contents: bytemuck::cast_slice(&self.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );
        self.vertex_buffer = Some(vertex_buffer);
        self.index_buffer = Some(index_buffer);
    }
}

/// GPU-side transform state for a model.
pub struct ModelGpuResources {
    pub transform_buffer: wgpu::Buffer,
    pub transform_bind_group: wgpu::BindGroup,
}

/// The active model: the single object the viewer displays at a time.
///
/// `position` holds the re-centering offset applied by the framing pass;
/// `rotation` holds the Euler angles accumulated from the rotate commands.
/// Both are unbounded, with the usual periodic rotation semantics.
pub struct Model {
    pub name: String,
    pub meshes: Vec<Mesh>,
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub gpu_resources: Option<ModelGpuResources>,
    transform_dirty: bool,
}

impl Model {
    pub fn new(name: String, meshes: Vec<Mesh>) -> Self {
        Self {
            name,
            meshes,
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            gpu_resources: None,
            transform_dirty: true,
        }
    }

    /// Builds a model from parsed mesh parts. The model name comes from the
    /// first named part, like the object name in an OBJ file.
    pub fn from_mesh_data(parts: Vec<MeshData>) -> Self {
        let name = parts
            .iter()
            .map(|p| p.name.as_str())
            .find(|n| !n.is_empty())
            .unwrap_or("model")
            .to_string();
        let meshes = parts.into_iter().map(Mesh::from_data).collect();
        Self::new(name, meshes)
    }

    /// Translation * X-rotation * Y-rotation * Z-rotation.
    pub fn transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
    }

    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.position += delta;
        self.transform_dirty = true;
    }

    pub fn rotate_x(&mut self, angle: Rad<f32>) {
        self.rotation.x += angle.0;
        self.transform_dirty = true;
    }

    pub fn rotate_y(&mut self, angle: Rad<f32>) {
        self.rotation.y += angle.0;
        self.transform_dirty = true;
    }

    pub fn rotate_z(&mut self, angle: Rad<f32>) {
        self.rotation.z += angle.0;
        self.transform_dirty = true;
    }

    /// World-space bounding box with the current transform applied.
    pub fn world_bounds(&self) -> BoundingBox {
        let transform = self.transform();
        let mut bounds = BoundingBox::empty();
        for mesh in &self.meshes {
            for position in mesh.positions() {
                let world = transform * position.extend(1.0);
                bounds.extend(world.truncate());
            }
        }
        bounds
    }

    pub fn triangle_count(&self) -> u32 {
        self.meshes.iter().map(|m| m.index_count() / 3).sum()
    }

    pub fn vertex_count(&self) -> u32 {
        self.meshes.iter().map(|m| m.vertex_count()).sum()
    }

    /// Uploads vertex/index buffers and the transform uniform. Must be
    /// called once the GPU context exists, before the model is drawn.
    pub fn init_gpu_resources(&mut self, device: &Device, layout: &wgpu::BindGroupLayout) {
        for mesh in self.meshes.iter_mut() {
            mesh.init_gpu_buffers(device);
        }

        let transform = self.transform();
        let transform_data: &[f32; 16] = transform.as_ref();

        let transform_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Model Transform Buffer"),
                contents: bytemuck::cast_slice(transform_data),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        let transform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Transform Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
        });

        self.gpu_resources = Some(ModelGpuResources {
            transform_buffer,
            transform_bind_group,
        });
        self.transform_dirty = true;
    }

    /// Syncs the transform uniform to the GPU if it changed since the last
    /// frame. cgmath matrices are column-major, which the GPU expects.
    pub fn update_transform(&mut self, queue: &wgpu::Queue) {
        if !self.transform_dirty {
            return;
        }
        if let Some(gpu_resources) = &self.gpu_resources {
            let transform = self.transform();
            let transform_data: &[f32; 16] = transform.as_ref();
            queue.write_buffer(
                &gpu_resources.transform_buffer,
                0,
                bytemuck::cast_slice(transform_data),
            );
            self.transform_dirty = false;
        }
    }
}

pub trait DrawModel<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
    fn draw_model(&mut self, model: &'a Model);
}

impl<'a, 'b> DrawModel<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        self.draw_mesh_instanced(mesh, 0..1);
    }

    fn draw_mesh_instanced(&mut self, mesh: &'b Mesh, instances: Range<u32>) {
        let (Some(vertex_buffer), Some(index_buffer)) =
            (&mesh.vertex_buffer, &mesh.index_buffer)
        else {
            return; // Not uploaded yet.
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, instances);
    }

    fn draw_model(&mut self, model: &'b Model) {
        let Some(gpu_resources) = &model.gpu_resources else {
            return;
        };
        self.set_bind_group(1, &gpu_resources.transform_bind_group, &[]);
        for mesh in &model.meshes {
            self.draw_mesh(mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_4;

    fn triangle_model() -> Model {
        let mesh = Mesh::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            vec![0, 1, 2],
        );
        Model::new("triangle".into(), vec![mesh])
    }

    #[test]
    fn counts() {
        let model = triangle_model();
        assert_eq!(model.vertex_count(), 3);
        assert_eq!(model.triangle_count(), 1);
    }

    #[test]
    fn translation_moves_world_bounds() {
        let mut model = triangle_model();
        model.translate(Vector3::new(2.0, 0.0, 0.0));
        let bounds = model.world_bounds();
        assert_relative_eq!(bounds.min.x, 2.0, epsilon = 1e-6);
        assert_relative_eq!(bounds.max.x, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn rotation_accumulates() {
        let mut model = triangle_model();
        model.rotate_y(Rad(FRAC_PI_4));
        model.rotate_y(Rad(FRAC_PI_4));
        assert_relative_eq!(model.rotation.y, FRAC_PI_4 * 2.0, epsilon = 1e-6);
    }

    #[test]
    fn eight_quarter_turns_restore_transform() {
        let mut model = triangle_model();
        let original = model.transform();
        for _ in 0..8 {
            model.rotate_x(Rad(FRAC_PI_4));
        }
        let rotated = model.transform();
        let a: &[f32; 16] = original.as_ref();
        let b: &[f32; 16] = rotated.as_ref();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-5);
        }
    }

    #[test]
    fn model_name_from_first_named_part() {
        let parts = vec![
            MeshData {
                name: String::new(),
                positions: vec![0.0, 0.0, 0.0],
                normals: vec![0.0, 1.0, 0.0],
                indices: vec![0],
            },
            MeshData {
                name: "teapot".into(),
                positions: vec![0.0, 0.0, 0.0],
                normals: vec![0.0, 1.0, 0.0],
                indices: vec![0],
            },
        ];
        let model = Model::from_mesh_data(parts);
        assert_eq!(model.name, "teapot");
    }
}
