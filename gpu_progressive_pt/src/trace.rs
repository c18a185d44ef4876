use wgpu::{BindGroup, BindGroupDescriptor, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingResource, BindingType, CommandEncoder, Device, RenderPipeline, ShaderModule, ShaderStages, TextureSampleType, TextureViewDimension};
use progressive_common::gpu_buffer::GPUBuffer;
use progressive_common::parameters::FrameMode;
use crate::quad::FullScreenQuad;
use crate::targets::{AccumulationTargets, ACCUM_FORMAT, DEPTH_FORMAT};

/// Traces one sample per pixel into the back accumulation target. There is
/// one pipeline per [`FrameMode`]: reset writes the sample alone, accumulating
/// writes the previous sum plus the sample.
pub struct TraceKernel {
    bind_group_layout: BindGroupLayout,
    // bind_groups[i] reads the sum held by target i
    bind_groups: [BindGroup; 2],
    replace_pipeline: RenderPipeline,
    additive_pipeline: RenderPipeline,
}

impl TraceKernel {
    pub fn new(device: &Device,
               targets: &AccumulationTargets,
               view_buffer: &GPUBuffer,
               scene_buffer: &GPUBuffer,
               frame_buffer: &GPUBuffer) -> Self {
        let shader = device.create_shader_module(
            wgpu::include_wgsl!("../../progressive_common/shaders/trace.wgsl")
        );

        let visibility = ShaderStages::VERTEX_FRAGMENT;
        let bind_group_layout = device.create_bind_group_layout(
            &BindGroupLayoutDescriptor {
                label: Some("trace bind group layout"),
                entries: &[
                    view_buffer.layout(visibility, 0, true),
                    scene_buffer.layout(visibility, 1, true),
                    frame_buffer.layout(visibility, 2, true),
                    BindGroupLayoutEntry {
                        binding: 3,
                        visibility: ShaderStages::FRAGMENT,
                        ty: BindingType::Texture {
                            sample_type: TextureSampleType::Float { filterable: false },
                            view_dimension: TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                ],
            }
        );

        let bind_groups = Self::bind_groups(device, &bind_group_layout, targets,
                                            view_buffer, scene_buffer, frame_buffer);

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("trace pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let replace_pipeline = Self::pipeline(device, &shader, &pipeline_layout,
                                              "fs_reset", "trace replace pipeline");
        let additive_pipeline = Self::pipeline(device, &shader, &pipeline_layout,
                                               "fs_accumulate", "trace additive pipeline");

        Self {
            bind_group_layout,
            bind_groups,
            replace_pipeline,
            additive_pipeline,
        }
    }

    fn bind_groups(device: &Device,
                   layout: &BindGroupLayout,
                   targets: &AccumulationTargets,
                   view_buffer: &GPUBuffer,
                   scene_buffer: &GPUBuffer,
                   frame_buffer: &GPUBuffer) -> [BindGroup; 2] {
        [0, 1].map(|idx| device.create_bind_group(
            &BindGroupDescriptor {
                label: Some("trace bind group"),
                layout,
                entries: &[
                    view_buffer.binding(0),
                    scene_buffer.binding(1),
                    frame_buffer.binding(2),
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: BindingResource::TextureView(targets.sum_view(idx)),
                    },
                ],
            }
        ))
    }

    /// Points the pass at freshly allocated targets after a resize.
    pub fn rebind(&mut self,
                  device: &Device,
                  targets: &AccumulationTargets,
                  view_buffer: &GPUBuffer,
                  scene_buffer: &GPUBuffer,
                  frame_buffer: &GPUBuffer) {
        self.bind_groups = Self::bind_groups(device, &self.bind_group_layout, targets,
                                             view_buffer, scene_buffer, frame_buffer);
    }

    fn pipeline(device: &Device,
                shader: &ShaderModule,
                layout: &wgpu::PipelineLayout,
                fragment_entry: &str,
                label: &str) -> RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs"),
                compilation_options: Default::default(),
                buffers: &[FullScreenQuad::vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ACCUM_FORMAT,
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
        })
    }

    /// Records the trace pass and swaps the targets, so afterwards the front
    /// target holds this frame's sum. The written target is loaded, never
    /// cleared: every pixel is overwritten anyway.
    pub fn run(&self,
               encoder: &mut CommandEncoder,
               targets: &mut AccumulationTargets,
               quad: &FullScreenQuad,
               mode: FrameMode) {
        let pipeline = match mode {
            FrameMode::Reset => &self.replace_pipeline,
            FrameMode::Accumulating => &self.additive_pipeline,
        };

        let mut trace_pass = encoder.begin_render_pass(
            &wgpu::RenderPassDescriptor {
                label: Some("trace render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: targets.back_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: targets.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
        trace_pass.set_pipeline(pipeline);
        trace_pass.set_bind_group(0, &self.bind_groups[targets.front()], &[]);
        quad.draw(&mut trace_pass);
        drop(trace_pass);

        targets.swap();
    }
}
