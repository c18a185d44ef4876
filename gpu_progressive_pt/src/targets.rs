use wgpu::{Device, Extent3d, Texture, TextureDescriptor, TextureDimension, TextureFormat, TextureUsages, TextureView};
use progressive_common::error::RendererError;
use progressive_common::wgpu_state::WgpuState;

/// Full f32 running sum. 32-bit float targets cannot be blended, so the trace
/// pass reads the previous sum from one target and writes the new one into the other.
pub const ACCUM_FORMAT: TextureFormat = TextureFormat::Rgba32Float;
pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

struct Target {
    _texture: Texture,
    view: TextureView,
}

impl Target {
    fn new(device: &Device, size: (u32, u32), format: TextureFormat, usage: TextureUsages,
           label: &str) -> Self {
        let texture = device.create_texture(&TextureDescriptor {
            label: Some(label),
            size: Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { _texture: texture, view }
    }
}

/// The pair of accumulation targets with the trace depth buffer, plus the
/// depth buffer the present pass clears alongside the surface.
///
/// `front` holds the latest sum. Each trace pass reads `front`, writes the
/// other one, then the two swap.
pub struct AccumulationTargets {
    size: (u32, u32),
    sums: [Target; 2],
    front: usize,
    depth: Target,
    screen_depth: Target,
}

impl AccumulationTargets {
    pub fn new(wgpu_state: &WgpuState, size: (u32, u32)) -> Result<Self, RendererError> {
        wgpu_state.validate_target("accumulation color", ACCUM_FORMAT, true)?;
        wgpu_state.validate_target("accumulation depth", DEPTH_FORMAT, false)?;

        let device = wgpu_state.device();
        let sum_usage = TextureUsages::RENDER_ATTACHMENT | TextureUsages::TEXTURE_BINDING;
        let sums = [
            Target::new(device, size, ACCUM_FORMAT, sum_usage, "accumulation sum a"),
            Target::new(device, size, ACCUM_FORMAT, sum_usage, "accumulation sum b"),
        ];
        let depth = Target::new(device, size, DEPTH_FORMAT,
                                TextureUsages::RENDER_ATTACHMENT, "accumulation depth");
        let screen_depth = Target::new(device, size, DEPTH_FORMAT,
                                       TextureUsages::RENDER_ATTACHMENT, "screen depth");

        log::info!("allocated {}x{} accumulation targets ({:?} color x2, {:?} depth)",
            size.0, size.1, ACCUM_FORMAT, DEPTH_FORMAT);

        Ok(Self { size, sums, front: 0, depth, screen_depth })
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn sum_view(&self, idx: usize) -> &TextureView {
        &self.sums[idx].view
    }

    /// Index of the target holding the latest sum.
    pub fn front(&self) -> usize {
        self.front
    }

    pub fn back_view(&self) -> &TextureView {
        &self.sums[1 - self.front].view
    }

    pub fn swap(&mut self) {
        self.front = 1 - self.front;
    }

    pub fn depth_view(&self) -> &TextureView {
        &self.depth.view
    }

    pub fn screen_depth_view(&self) -> &TextureView {
        &self.screen_depth.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use progressive_common::parameters::{FrameMode, RenderProgress};

    #[test]
    fn sum_is_stored_as_f32() {
        assert_eq!(ACCUM_FORMAT.block_copy_size(None), Some(16));
        assert!(!ACCUM_FORMAT.is_srgb());
    }

    #[test]
    fn long_still_run_keeps_the_average() {
        // what the trace and present passes do per channel, at the target's precision
        let sample = 0.6f32;
        let mut progress = RenderProgress::new();
        let mut sum = 0.0f32;
        for _ in 0..20_000 {
            sum = match progress.advance(false) {
                FrameMode::Reset => sample,
                FrameMode::Accumulating => sum + sample,
            };
        }
        let presented = sum / progress.sample_count() as f32;
        assert_eq!(progress.sample_count(), 20_000);
        assert!((presented - sample).abs() < 1e-3, "average drifted to {presented}");
    }
}
