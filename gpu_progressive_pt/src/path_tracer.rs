use std::sync::Arc;
use rand::rngs::ThreadRng;
use wgpu::BufferUsages;
use winit::window::Window;
use progressive_common::camera_controller::CameraController;
use progressive_common::error::RendererError;
use progressive_common::gpu_buffer::GPUBuffer;
use progressive_common::gpu_structs::{ShaderParameters, UniformBlock, MAX_LIGHTS, MAX_PLANES, MAX_SPHERES};
use progressive_common::parameters::{RenderParameters, RenderProgress};
use progressive_common::projection_matrix::ProjectionMatrix;
use progressive_common::scene::Scene;
use progressive_common::wgpu_state::WgpuState;
use crate::frame_scheduler::{FrameRenderer, FrameStats};
use crate::present::PresentKernel;
use crate::quad::FullScreenQuad;
use crate::targets::AccumulationTargets;
use crate::trace::TraceKernel;

pub struct PathTracer {
    wgpu_state: WgpuState,
    render_parameters: RenderParameters,
    shader_parameters: ShaderParameters,
    view_buffer: GPUBuffer,
    scene_buffer: GPUBuffer,
    frame_buffer: GPUBuffer,
    present_buffer: GPUBuffer,
    targets: AccumulationTargets,
    quad: FullScreenQuad,
    trace_kernel: TraceKernel,
    present_kernel: PresentKernel,
    render_progress: RenderProgress,
    rng: ThreadRng,
    paused: bool,
}

impl PathTracer {
    pub fn new(window: Arc<Window>,
               scene: &Scene,
               rp: &RenderParameters) -> Result<Self, RendererError> {
        check_capacity("spheres", scene.spheres.len(), MAX_SPHERES)?;
        check_capacity("planes", scene.planes.len(), MAX_PLANES)?;
        check_capacity("lights", scene.lights.len(), MAX_LIGHTS)?;

        // create the connection to the GPU
        let wgpu_state = WgpuState::new(window)?;
        let device = wgpu_state.device();

        // the window manager may not have honoured the requested size
        let mut render_parameters = *rp;
        render_parameters.set_viewport(wgpu_state.size());

        let targets = AccumulationTargets::new(&wgpu_state, render_parameters.viewport_size())?;

        // everything set once goes through the named slots before the first frame
        let projection = ProjectionMatrix::new(&render_parameters);
        let mut shader_parameters = ShaderParameters::new();
        projection.upload(&mut shader_parameters);
        scene.upload(&mut shader_parameters);
        log::info!("uploaded scene: {} spheres, {} planes, {} lights",
            scene.spheres.len(), scene.planes.len(), scene.lights.len());

        let uniform = |block, label| GPUBuffer::new_from_bytes(device,
                                                               BufferUsages::UNIFORM,
                                                               shader_parameters.bytes(block),
                                                               Some(label));
        let view_buffer = uniform(UniformBlock::View, "view buffer");
        let scene_buffer = uniform(UniformBlock::Scene, "scene buffer");
        let frame_buffer = uniform(UniformBlock::Frame, "frame buffer");
        let present_buffer = uniform(UniformBlock::Present, "present buffer");
        // the buffers were created from the current contents
        shader_parameters.take_dirty();

        let quad = FullScreenQuad::new(device, &projection.quad_corners());

        let trace_kernel = TraceKernel::new(device,
                                            &targets,
                                            &view_buffer,
                                            &scene_buffer,
                                            &frame_buffer);
        let present_kernel = PresentKernel::new(device,
                                                wgpu_state.surface_format(),
                                                &targets,
                                                &present_buffer,
                                                &view_buffer);

        Ok(Self {
            wgpu_state,
            render_parameters,
            shader_parameters,
            view_buffer,
            scene_buffer,
            frame_buffer,
            present_buffer,
            targets,
            quad,
            trace_kernel,
            present_kernel,
            render_progress: RenderProgress::new(),
            rng: rand::rng(),
            paused: false,
        })
    }

    pub fn sample_count(&self) -> u32 {
        self.render_progress.sample_count()
    }

    /// Minimized windows have nothing to draw into.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // writes every block touched since the last flush
    fn flush(&mut self) {
        let queue = self.wgpu_state.queue();
        for block in self.shader_parameters.take_dirty() {
            let buffer = match block {
                UniformBlock::View => &self.view_buffer,
                UniformBlock::Scene => &self.scene_buffer,
                UniformBlock::Frame => &self.frame_buffer,
                UniformBlock::Present => &self.present_buffer,
            };
            buffer.queue_for_gpu(queue, self.shader_parameters.bytes(block));
        }
    }

    pub fn resize(&mut self, new_size: (u32, u32)) -> Result<(), RendererError> {
        if new_size.0 == 0 || new_size.1 == 0 {
            log::info!("window minimized, rendering paused");
            self.paused = true;
            return Ok(());
        }
        self.paused = false;
        if new_size == self.targets.size() {
            return Ok(());
        }

        log::info!("resizing to {}x{}", new_size.0, new_size.1);
        self.wgpu_state.resize(new_size);
        self.render_parameters.set_viewport(new_size);

        self.targets = AccumulationTargets::new(&self.wgpu_state, new_size)?;
        self.trace_kernel.rebind(self.wgpu_state.device(),
                                 &self.targets,
                                 &self.view_buffer,
                                 &self.scene_buffer,
                                 &self.frame_buffer);
        self.present_kernel.rebind(self.wgpu_state.device(),
                                   &self.targets,
                                   &self.present_buffer,
                                   &self.view_buffer);

        let projection = ProjectionMatrix::new(&self.render_parameters);
        projection.upload(&mut self.shader_parameters);
        self.quad.update(self.wgpu_state.queue(), &projection.quad_corners());

        // the new targets hold nothing
        self.render_progress.restart();
        Ok(())
    }
}

impl FrameRenderer for PathTracer {
    fn render_frame(&mut self, camera_controller: &mut CameraController)
        -> Result<FrameStats, RendererError> {
        let plan = self.render_progress.plan_frame(camera_controller, &mut self.rng);
        plan.upload_trace(&mut self.shader_parameters);
        plan.upload_present(&mut self.shader_parameters);
        self.flush();

        let mut encoder = self.wgpu_state.device().create_command_encoder(
            &wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        self.trace_kernel.run(&mut encoder, &mut self.targets, &self.quad, plan.mode);

        let output = match self.wgpu_state.surface().get_current_texture() {
            Ok(output) => Some(output),
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RendererError::SurfaceOutOfMemory),
            Err(err @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!("surface {err}, reconfiguring and skipping present");
                self.wgpu_state.reconfigure();
                None
            }
            Err(err) => {
                log::warn!("skipping present: {err}");
                None
            }
        };

        // the trace pass is submitted either way, so the sample stays counted
        let Some(output) = output else {
            self.wgpu_state.queue().submit(Some(encoder.finish()));
            return Ok(FrameStats {
                mode: plan.mode,
                sample_count: plan.sample_count,
                presented: false,
            });
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.present_kernel.run(&mut encoder, &view, &self.targets, &self.quad);
        self.wgpu_state.queue().submit(Some(encoder.finish()));
        output.present();

        Ok(FrameStats {
            mode: plan.mode,
            sample_count: plan.sample_count,
            presented: true,
        })
    }
}

fn check_capacity(kind: &'static str, count: usize, max: usize) -> Result<(), RendererError> {
    if count > max {
        return Err(RendererError::SceneCapacity { kind, count, max });
    }
    Ok(())
}
