use bytemuck::Zeroable;
use glam::{Mat4, Vec2, Vec3};
use crate::shader_params::{LightField, MaterialField, Param, ParamValue, ParameterSink, PlaneField, SphereField};

// fixed array sizes of the uniform blocks in trace.wgsl, keep in sync
pub const MAX_SPHERES: usize = 16;
pub const MAX_PLANES: usize = 16;
pub const MAX_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GPUMaterial {
    attenuation: [f32; 4],
    // diffuse, metallic, padding
    flags: [u32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GPUSphere {
    center_radius: [f32; 4],
    mtl: GPUMaterial,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GPUPlane {
    normal_extent: [f32; 4],
    position: [f32; 4],
    mtl: GPUMaterial,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GPULight {
    position: [f32; 4],
    intensity: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GPUScene {
    // spheres, planes, lights, padding
    counts: [u32; 4],
    spheres: [GPUSphere; MAX_SPHERES],
    planes: [GPUPlane; MAX_PLANES],
    lights: [GPULight; MAX_LIGHTS],
}

impl GPUScene {
    pub fn counts(&self) -> (u32, u32, u32) {
        (self.counts[0], self.counts[1], self.counts[2])
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GPUView {
    proj: [[f32; 4]; 4],
    view_pixel_size: [f32; 2],
    size: [u32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GPUFrame {
    c2w: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    // two vec2s packed into one vec4
    random_vectors: [f32; 4],
    camera_is_moving: u32,
    _buffer: [u32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GPUPresent {
    c2w: [[f32; 4]; 4],
    count: u32,
    _buffer: [u32; 3],
}

impl GPUPresent {
    pub fn count(&self) -> u32 {
        self.count
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UniformBlock {
    View,
    Scene,
    Frame,
    Present,
}

impl UniformBlock {
    const ALL: [UniformBlock; 4] = [UniformBlock::View, UniformBlock::Scene,
        UniformBlock::Frame, UniformBlock::Present];

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// CPU mirror of every uniform block the shaders read. Named uploads land in
/// the matching block, which is then marked dirty until the next flush.
pub struct ShaderParameters {
    view: GPUView,
    scene: GPUScene,
    frame: GPUFrame,
    present: GPUPresent,
    dirty: u8,
}

impl Default for ShaderParameters {
    fn default() -> Self {
        Self {
            view: GPUView::zeroed(),
            scene: GPUScene::zeroed(),
            frame: GPUFrame::zeroed(),
            present: GPUPresent::zeroed(),
            dirty: 0,
        }
    }
}

impl ShaderParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> &GPUScene {
        &self.scene
    }

    pub fn present(&self) -> &GPUPresent {
        &self.present
    }

    pub fn bytes(&self, block: UniformBlock) -> &[u8] {
        match block {
            UniformBlock::View => bytemuck::bytes_of(&self.view),
            UniformBlock::Scene => bytemuck::bytes_of(&self.scene),
            UniformBlock::Frame => bytemuck::bytes_of(&self.frame),
            UniformBlock::Present => bytemuck::bytes_of(&self.present),
        }
    }

    pub fn is_dirty(&self, block: UniformBlock) -> bool {
        self.dirty & block.bit() != 0
    }

    /// Returns the blocks written since the last call and marks them clean.
    pub fn take_dirty(&mut self) -> Vec<UniformBlock> {
        let dirty = UniformBlock::ALL.into_iter().filter(|b| self.is_dirty(*b)).collect();
        self.dirty = 0;
        dirty
    }

    fn set_sphere(&mut self, idx: usize, field: SphereField, value: ParamValue) -> Option<()> {
        let sphere = self.scene.spheres.get_mut(idx)?;
        match (field, value) {
            (SphereField::Center, ParamValue::Vec3(v)) => write_xyz(&mut sphere.center_radius, v),
            (SphereField::Radius, ParamValue::F32(r)) => sphere.center_radius[3] = r,
            (SphereField::Material(field), value) => set_material(&mut sphere.mtl, field, value)?,
            _ => return None,
        }
        self.scene.counts[0] = self.scene.counts[0].max(idx as u32 + 1);
        Some(())
    }

    fn set_plane(&mut self, idx: usize, field: PlaneField, value: ParamValue) -> Option<()> {
        let plane = self.scene.planes.get_mut(idx)?;
        match (field, value) {
            (PlaneField::Normal, ParamValue::Vec3(v)) => write_xyz(&mut plane.normal_extent, v),
            (PlaneField::Extent, ParamValue::F32(e)) => plane.normal_extent[3] = e,
            (PlaneField::Position, ParamValue::Vec3(v)) => write_xyz(&mut plane.position, v),
            (PlaneField::Material(field), value) => set_material(&mut plane.mtl, field, value)?,
            _ => return None,
        }
        self.scene.counts[1] = self.scene.counts[1].max(idx as u32 + 1);
        Some(())
    }

    fn set_light(&mut self, idx: usize, field: LightField, value: ParamValue) -> Option<()> {
        let light = self.scene.lights.get_mut(idx)?;
        match (field, value) {
            (LightField::Position, ParamValue::Vec3(v)) => write_xyz(&mut light.position, v),
            (LightField::Intensity, ParamValue::Vec3(v)) => write_xyz(&mut light.intensity, v),
            _ => return None,
        }
        self.scene.counts[2] = self.scene.counts[2].max(idx as u32 + 1);
        Some(())
    }

    fn write(&mut self, param: Param, value: ParamValue) -> Option<UniformBlock> {
        use ParamValue as V;
        let block = match (param, value) {
            (Param::Proj, V::Mat4(m)) => {
                self.view.proj = m.to_cols_array_2d();
                UniformBlock::View
            }
            (Param::ViewPixelWidth, V::F32(w)) => {
                self.view.view_pixel_size[0] = w;
                UniformBlock::View
            }
            (Param::ViewPixelHeight, V::F32(h)) => {
                self.view.view_pixel_size[1] = h;
                UniformBlock::View
            }
            (Param::Width, V::U32(w)) => {
                self.view.size[0] = w;
                UniformBlock::View
            }
            (Param::Height, V::U32(h)) => {
                self.view.size[1] = h;
                UniformBlock::View
            }
            (Param::Sphere(idx, field), value) => {
                self.set_sphere(idx, field, value)?;
                UniformBlock::Scene
            }
            (Param::Plane(idx, field), value) => {
                self.set_plane(idx, field, value)?;
                UniformBlock::Scene
            }
            (Param::Light(idx, field), value) => {
                self.set_light(idx, field, value)?;
                UniformBlock::Scene
            }
            // c2w is read by both programs, so it lives in both blocks
            (Param::CameraToWorld, V::Mat4(m)) => {
                self.frame.c2w = m.to_cols_array_2d();
                self.present.c2w = m.to_cols_array_2d();
                self.dirty |= UniformBlock::Present.bit();
                UniformBlock::Frame
            }
            (Param::CameraPos, V::Vec3(v)) => {
                write_xyz(&mut self.frame.camera_pos, v);
                UniformBlock::Frame
            }
            (Param::RandomVector(i @ 0..=1), V::Vec2(v)) => {
                write_xy(&mut self.frame.random_vectors[2 * i..2 * i + 2], v);
                UniformBlock::Frame
            }
            (Param::CameraIsMoving, V::Bool(b)) => {
                self.frame.camera_is_moving = b as u32;
                UniformBlock::Frame
            }
            (Param::Count, V::U32(n)) => {
                self.present.count = n;
                UniformBlock::Present
            }
            _ => return None,
        };
        Some(block)
    }
}

impl ParameterSink for ShaderParameters {
    fn set(&mut self, param: Param, value: ParamValue) {
        match self.write(param, value) {
            Some(block) => self.dirty |= block.bit(),
            None => log::warn!("no uniform slot for {param} = {value:?}"),
        }
    }
}

fn set_material(mtl: &mut GPUMaterial, field: MaterialField, value: ParamValue) -> Option<()> {
    match (field, value) {
        (MaterialField::Diffuse, ParamValue::Bool(b)) => mtl.flags[0] = b as u32,
        (MaterialField::Metallic, ParamValue::Bool(b)) => mtl.flags[1] = b as u32,
        (MaterialField::Attenuation, ParamValue::Vec3(v)) => write_xyz(&mut mtl.attenuation, v),
        _ => return None,
    }
    Some(())
}

fn write_xyz(dst: &mut [f32; 4], v: Vec3) {
    dst[..3].copy_from_slice(&v.to_array());
}

fn write_xy(dst: &mut [f32], v: Vec2) {
    dst.copy_from_slice(&v.to_array());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;

    #[test]
    fn uniform_block_sizes_match_wgsl_layout() {
        assert_eq!(size_of::<GPUSphere>(), 48);
        assert_eq!(size_of::<GPUPlane>(), 64);
        assert_eq!(size_of::<GPULight>(), 32);
        assert_eq!(size_of::<GPUScene>(), 16 + 48 * MAX_SPHERES + 64 * MAX_PLANES + 32 * MAX_LIGHTS);
        assert_eq!(size_of::<GPUView>(), 80);
        assert_eq!(size_of::<GPUFrame>(), 112);
        assert_eq!(size_of::<GPUPresent>(), 80);
    }

    #[test]
    fn trace_shader_keeps_first_hit_on_ties() {
        let source = include_str!("../shaders/trace.wgsl");
        assert_eq!(source.matches("t < T_MIN || t >= t_max").count(), 2);
        assert!(!source.contains("t > t_max"));
    }

    #[test]
    fn scene_upload_fills_scene_block() {
        let scene = Scene::showcase();
        let mut params = ShaderParameters::new();
        scene.upload(&mut params);

        assert_eq!(params.scene().counts(), (7, 5, 1));
        assert_eq!(params.take_dirty(), vec![UniformBlock::Scene]);
        assert!(params.take_dirty().is_empty());

        let ground = &params.scene().planes[0];
        assert_eq!(ground.normal_extent, [0.0, 1.0, 0.0, 100.0]);
        assert_eq!(ground.mtl.flags[..2], [1, 0]);
        let mirror = &params.scene().planes[1];
        assert_eq!(mirror.mtl.flags[..2], [0, 1]);
        assert_eq!(params.scene().spheres[2].center_radius, [1.0, -1.5, 5.0, 0.5]);
    }

    #[test]
    fn camera_to_world_dirties_both_passes() {
        let mut params = ShaderParameters::new();
        params.set(Param::CameraToWorld, ParamValue::Mat4(Mat4::from_translation(Vec3::X)));
        assert_eq!(params.take_dirty(), vec![UniformBlock::Frame, UniformBlock::Present]);

        params.set(Param::Count, ParamValue::U32(9));
        assert_eq!(params.present().count(), 9);
        assert_eq!(params.take_dirty(), vec![UniformBlock::Present]);
    }

    #[test]
    fn mismatched_or_out_of_range_uploads_are_ignored() {
        let mut params = ShaderParameters::new();
        params.set(Param::Count, ParamValue::F32(1.0));
        params.set(Param::Sphere(MAX_SPHERES, SphereField::Radius), ParamValue::F32(1.0));
        params.set(Param::RandomVector(2), ParamValue::Vec2(Vec2::ONE));
        assert!(params.take_dirty().is_empty());
        assert_eq!(params.scene().counts(), (0, 0, 0));
    }

    #[test]
    fn random_vectors_pack_into_one_vec4() {
        let mut params = ShaderParameters::new();
        params.set(Param::RandomVector(0), ParamValue::Vec2(Vec2::new(0.1, 0.2)));
        params.set(Param::RandomVector(1), ParamValue::Vec2(Vec2::new(0.3, 0.4)));
        assert_eq!(params.frame.random_vectors, [0.1, 0.2, 0.3, 0.4]);
    }
}
