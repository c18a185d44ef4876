use std::sync::Arc;
use wgpu::{TextureFormat, TextureUsages};
use winit::window::Window;
use crate::error::RendererError;

pub struct WgpuState {
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl WgpuState {
    pub fn new(window: Arc<Window>) -> Result<WgpuState, RendererError> {
        pollster::block_on(WgpuState::new_async(window))
    }

    async fn new_async(window: Arc<Window>) -> Result<WgpuState, RendererError> {
        let size = {
            let viewport = window.inner_size();
            (viewport.width.max(1), viewport.height.max(1))
        };

        let instance = wgpu::Instance::new(
            wgpu::InstanceDescriptor {
                backends: wgpu::Backends::PRIMARY,
                ..Default::default()
            }
        );

        let surface = instance.create_surface(Arc::clone(&window))?;

        let adapter = instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            }
        ).await.ok_or(RendererError::AdapterNotFound)?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?}, {:?})", info.name, info.device_type, info.backend);

        let (device, queue) = adapter.request_device(
            &wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: Some("path tracer device"),
                memory_hints: Default::default(),
            },
            None,
        ).await?;

        let surface_capabilities = surface.get_capabilities(&adapter);

        // the present shader does its own gamma, so prefer a linear swapchain
        let format = surface_capabilities.formats.iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RendererError::AdapterNotFound)?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.0,
            height: size.1,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);
        log::info!("surface configured {}x{} as {:?}", size.0, size.1, format);

        Ok(Self {
            surface,
            surface_config,
            adapter,
            device,
            queue,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }
    pub fn surface_format(&self) -> TextureFormat {
        self.surface_config.format
    }
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
    pub fn surface(&self) -> &wgpu::Surface<'static> {
        &self.surface
    }

    pub fn resize(&mut self, new_size: (u32, u32))
    {
        self.surface_config.width = new_size.0;
        self.surface_config.height = new_size.1;
        self.reconfigure();
    }

    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Checks that `format` can back a render target, and that a later pass
    /// can read it when `sampled` is set.
    pub fn validate_target(&self, target: &'static str, format: TextureFormat, sampled: bool)
        -> Result<(), RendererError> {
        let features = self.adapter.get_texture_format_features(format);
        let incomplete = |reason| RendererError::IncompleteFramebuffer { target, format, reason };

        if !features.allowed_usages.contains(TextureUsages::RENDER_ATTACHMENT) {
            return Err(incomplete("format is not renderable"));
        }
        if sampled && !features.allowed_usages.contains(TextureUsages::TEXTURE_BINDING) {
            return Err(incomplete("format cannot be bound as a texture"));
        }
        Ok(())
    }
}
