use wgpu::{BindGroupEntry, BindGroupLayoutEntry, BindingType, Buffer, BufferBindingType, BufferSize, BufferUsages, Device, Queue, ShaderStages};
use wgpu::util::{BufferInitDescriptor, DeviceExt};

pub struct GPUBuffer {
    buffer: Buffer,
    usage: BufferUsages,
}

impl GPUBuffer {
    pub fn new_from_bytes(device: &Device,
                          usage: BufferUsages,
                          data: &[u8],
                          label: Option<&str>) -> Self {
        let buffer = device.create_buffer_init(&BufferInitDescriptor {
            label,
            contents: data,
            usage: usage | BufferUsages::COPY_DST,
        });
        Self {
            buffer,
            usage,
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn queue_for_gpu(&self, queue: &Queue, data: &[u8]) {
        queue.write_buffer(&self.buffer, 0, data);
    }

    pub fn layout(&self, visibility: ShaderStages, binding: u32, read_only: bool) -> BindGroupLayoutEntry {
        let buffer_binding_type = if self.usage.contains(BufferUsages::STORAGE) {
            BufferBindingType::Storage { read_only }
        } else {
            BufferBindingType::Uniform
        };
        BindGroupLayoutEntry {
            binding,
            visibility,
            ty: BindingType::Buffer {
                ty: buffer_binding_type,
                has_dynamic_offset: false,
                min_binding_size: BufferSize::new(self.buffer.size()),
            },
            count: None,
        }
    }

    pub fn binding(&self, binding: u32) -> BindGroupEntry<'_> {
        BindGroupEntry {
            binding,
            resource: self.buffer.as_entire_binding(),
        }
    }
}
