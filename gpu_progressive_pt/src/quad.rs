use wgpu::{BufferUsages, Device, IndexFormat, Queue, RenderPass, VertexAttribute, VertexBufferLayout};
use progressive_common::gpu_buffer::GPUBuffer;

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// The image plane quad both passes draw. Its corners come from
/// `ProjectionMatrix::quad_corners` and change only on resize.
pub struct FullScreenQuad {
    vertex_buffer: GPUBuffer,
    index_buffer: GPUBuffer,
}

impl FullScreenQuad {
    pub const VERTEX_ATTRIBUTES: [VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub fn new(device: &Device, corners: &[[f32; 3]; 4]) -> Self {
        let vertex_buffer = GPUBuffer::new_from_bytes(device,
                                                      BufferUsages::VERTEX,
                                                      bytemuck::cast_slice(corners),
                                                      Some("quad vertex buffer"));
        let index_buffer = GPUBuffer::new_from_bytes(device,
                                                     BufferUsages::INDEX,
                                                     bytemuck::cast_slice(&QUAD_INDICES),
                                                     Some("quad index buffer"));
        Self {
            vertex_buffer,
            index_buffer,
        }
    }

    pub fn vertex_layout() -> VertexBufferLayout<'static> {
        VertexBufferLayout {
            array_stride: size_of::<[f32; 3]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::VERTEX_ATTRIBUTES,
        }
    }

    pub fn update(&self, queue: &Queue, corners: &[[f32; 3]; 4]) {
        self.vertex_buffer.queue_for_gpu(queue, bytemuck::cast_slice(corners));
    }

    pub fn draw(&self, pass: &mut RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.buffer().slice(..));
        pass.set_index_buffer(self.index_buffer.buffer().slice(..), IndexFormat::Uint32);
        pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }
}
