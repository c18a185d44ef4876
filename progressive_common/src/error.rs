//! Errors raised while bringing up or driving the renderer.
//!
//! Everything here is fatal: the binary reports it and exits.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RendererError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create rendering surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("no GPU adapter can present to this window")]
    AdapterNotFound,

    #[error("failed to create GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    /// An off-screen render target cannot be used the way the passes need.
    #[error("{target} target with format {format:?} is incomplete: {reason}")]
    IncompleteFramebuffer {
        target: &'static str,
        format: wgpu::TextureFormat,
        reason: &'static str,
    },

    #[error("scene has {count} {kind}, the trace shader holds at most {max}")]
    SceneCapacity {
        kind: &'static str,
        count: usize,
        max: usize,
    },

    #[error("GPU ran out of memory while acquiring the next frame")]
    SurfaceOutOfMemory,

    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}
