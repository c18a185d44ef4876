use wgpu::{BindGroup, BindGroupDescriptor, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingResource, BindingType, CommandEncoder, Device, RenderPipeline, ShaderStages, TextureFormat, TextureSampleType, TextureView, TextureViewDimension};
use progressive_common::gpu_buffer::GPUBuffer;
use crate::quad::FullScreenQuad;
use crate::targets::{AccumulationTargets, DEPTH_FORMAT};

/// Resolves the accumulated sum onto the surface: divide by the sample
/// count, then gamma.
pub struct PresentKernel {
    bind_group_layout: BindGroupLayout,
    // bind_groups[i] reads the sum held by target i
    bind_groups: [BindGroup; 2],
    pipeline: RenderPipeline,
}

impl PresentKernel {
    pub fn new(device: &Device,
               surface_format: TextureFormat,
               targets: &AccumulationTargets,
               present_buffer: &GPUBuffer,
               view_buffer: &GPUBuffer) -> Self {
        let shader = device.create_shader_module(
            wgpu::include_wgsl!("../../progressive_common/shaders/present.wgsl")
        );

        let bind_group_layout = device.create_bind_group_layout(
            &BindGroupLayoutDescriptor {
                label: Some("present bind group layout"),
                entries: &[
                    BindGroupLayoutEntry {
                        binding: 0,
                        visibility: ShaderStages::FRAGMENT,
                        ty: BindingType::Texture {
                            sample_type: TextureSampleType::Float { filterable: false },
                            view_dimension: TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    present_buffer.layout(ShaderStages::FRAGMENT, 1, true),
                    view_buffer.layout(ShaderStages::VERTEX, 2, true),
                ],
            }
        );

        let bind_groups = Self::bind_groups(device, &bind_group_layout, targets,
                                            present_buffer, view_buffer);

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("present pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("present pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                compilation_options: Default::default(),
                buffers: &[FullScreenQuad::vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Cw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        Self {
            bind_group_layout,
            bind_groups,
            pipeline,
        }
    }

    fn bind_groups(device: &Device,
                   layout: &BindGroupLayout,
                   targets: &AccumulationTargets,
                   present_buffer: &GPUBuffer,
                   view_buffer: &GPUBuffer) -> [BindGroup; 2] {
        [0, 1].map(|idx| device.create_bind_group(
            &BindGroupDescriptor {
                label: Some("present bind group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: BindingResource::TextureView(targets.sum_view(idx)),
                    },
                    present_buffer.binding(1),
                    view_buffer.binding(2),
                ],
            }
        ))
    }

    /// Points the pass at freshly allocated targets after a resize.
    pub fn rebind(&mut self,
                  device: &Device,
                  targets: &AccumulationTargets,
                  present_buffer: &GPUBuffer,
                  view_buffer: &GPUBuffer) {
        self.bind_groups = Self::bind_groups(device, &self.bind_group_layout, targets,
                                             present_buffer, view_buffer);
    }

    pub fn run(&self,
               encoder: &mut CommandEncoder,
               view: &TextureView,
               targets: &AccumulationTargets,
               quad: &FullScreenQuad) {
        let mut present_pass = encoder.begin_render_pass(
            &wgpu::RenderPassDescriptor {
                label: Some("present render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: targets.screen_depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
        present_pass.set_pipeline(&self.pipeline);
        present_pass.set_bind_group(0, &self.bind_groups[targets.front()], &[]);
        quad.draw(&mut present_pass);
    }
}
