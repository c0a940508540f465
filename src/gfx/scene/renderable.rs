use std::rc::Rc;

use cgmath::{Matrix4, SquareMatrix};
use serde::{Deserialize, Serialize};
use wgpu::util::DeviceExt;

use crate::gfx::mesh::Mesh;

/// Primitive topology used to interpret a mesh at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    /// Every vertex drawn as a point; the index buffer is not used.
    Points,
    #[default]
    Triangles,
}

impl DrawMode {
    pub fn toggled(self) -> Self {
        match self {
            DrawMode::Points => DrawMode::Triangles,
            DrawMode::Triangles => DrawMode::Points,
        }
    }

    /// Pipeline topology matching this draw mode.
    pub fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            DrawMode::Points => wgpu::PrimitiveTopology::PointList,
            DrawMode::Triangles => wgpu::PrimitiveTopology::TriangleList,
        }
    }
}

// GPU resources: geometry buffers plus the world transform uniform
pub struct RenderableGpuResources {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    pub index_count: u32,
    pub transform_buffer: wgpu::Buffer,
    pub transform_bind_group: wgpu::BindGroup,
}

/// Drawable instance of a shared mesh, owned by a model node.
///
/// `world` always mirrors the owning node's world transform; the scene graph
/// pushes it after every transform change.
pub struct Renderable {
    mesh: Rc<Mesh>,
    world: Matrix4<f32>,
    draw_mode: DrawMode,
    pub gpu_resources: Option<RenderableGpuResources>, // None until init_gpu_resources called
}

impl Renderable {
    pub fn new(mesh: Rc<Mesh>, draw_mode: DrawMode) -> Self {
        Self {
            mesh,
            world: Matrix4::identity(),
            draw_mode,
            gpu_resources: None,
        }
    }

    pub fn mesh(&self) -> &Rc<Mesh> {
        &self.mesh
    }

    pub fn world_transform(&self) -> &Matrix4<f32> {
        &self.world
    }

    pub(crate) fn set_world_transform(&mut self, world: Matrix4<f32>) {
        self.world = world;
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        self.draw_mode = mode;
    }

    /// Uploads geometry and the current world transform.
    pub fn init_gpu_resources(&mut self, device: &wgpu::Device, layout: &wgpu::BindGroupLayout) {
        let vertices = self.mesh.to_vertices();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(self.mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        // cgmath matrices are column-major, which is what the GPU expects
        let transform_data: &[f32; 16] = self.world.as_ref();

        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Transform Uniform Buffer"),
            contents: bytemuck::cast_slice(transform_data),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let transform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Transform Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
        });

        self.gpu_resources = Some(RenderableGpuResources {
            vertex_buffer,
            index_buffer,
            vertex_count: vertices.len() as u32,
            index_count: self.mesh.indices().len() as u32,
            transform_buffer,
            transform_bind_group,
        });
    }

    /// Writes the world transform to the GPU if resources exist.
    pub fn update_transform(&self, queue: &wgpu::Queue) {
        if let Some(gpu_resources) = &self.gpu_resources {
            let transform_data: &[f32; 16] = self.world.as_ref();
            queue.write_buffer(
                &gpu_resources.transform_buffer,
                0,
                bytemuck::cast_slice(transform_data),
            );
        }
    }
}

/// Layout of the per-renderable world transform uniform (binding 0, vertex stage).
pub fn transform_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Transform Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// One draw request emitted per model node during scene traversal.
#[derive(Clone, Copy)]
pub struct DrawCall<'a> {
    pub node: &'a str,
    pub renderable: &'a Renderable,
}

impl<'a> DrawCall<'a> {
    pub fn vertices(&self) -> &'a [f32] {
        self.renderable.mesh.vertices()
    }

    pub fn indices(&self) -> &'a [u32] {
        self.renderable.mesh.indices()
    }

    pub fn mode(&self) -> DrawMode {
        self.renderable.draw_mode
    }

    pub fn world(&self) -> &'a Matrix4<f32> {
        &self.renderable.world
    }
}

/// Receiver of draw calls; implemented by rendering backends.
pub trait RenderTarget {
    fn draw(&mut self, call: DrawCall<'_>);
}

pub trait DrawRenderable {
    /// Binds the renderable's transform at `transform_slot` and issues its draw.
    ///
    /// The caller is responsible for having a pipeline bound whose topology
    /// matches [`Renderable::draw_mode`].
    fn draw_renderable(&mut self, renderable: &Renderable, transform_slot: u32);
}

impl DrawRenderable for wgpu::RenderPass<'_> {
    fn draw_renderable(&mut self, renderable: &Renderable, transform_slot: u32) {
        let Some(gpu) = &renderable.gpu_resources else {
            return; // Skip drawing if not uploaded
        };

        self.set_bind_group(transform_slot, &gpu.transform_bind_group, &[]);
        self.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        match renderable.draw_mode {
            DrawMode::Points => self.draw(0..gpu.vertex_count, 0..1),
            DrawMode::Triangles => {
                self.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                self.draw_indexed(0..gpu.index_count, 0, 0..1);
            }
        }
    }
}

/// [`RenderTarget`] adapter that forwards scene draw calls into a wgpu render pass.
pub struct RenderPassTarget<'p, 'e> {
    pub pass: &'p mut wgpu::RenderPass<'e>,
    pub transform_slot: u32,
}

impl RenderTarget for RenderPassTarget<'_, '_> {
    fn draw(&mut self, call: DrawCall<'_>) {
        self.pass.draw_renderable(call.renderable, self.transform_slot);
    }
}

/// Records draw calls in traversal order. Useful for headless hosts and tests.
#[derive(Debug, Default, Clone)]
pub struct DrawLog {
    pub calls: Vec<RecordedDraw>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub node: String,
    pub mode: DrawMode,
    pub world: Matrix4<f32>,
    pub vertex_count: usize,
    pub index_count: usize,
}

impl RenderTarget for DrawLog {
    fn draw(&mut self, call: DrawCall<'_>) {
        self.calls.push(RecordedDraw {
            node: call.node.to_string(),
            mode: call.mode(),
            world: *call.world(),
            vertex_count: call.vertices().len() / 3,
            index_count: call.indices().len(),
        });
    }
}
