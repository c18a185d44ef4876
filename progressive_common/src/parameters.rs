use glam::{Mat4, Vec2, Vec3};
use rand::Rng;
use crate::camera_controller::CameraController;
use crate::shader_params::{Param, ParamValue, ParameterSink};
use crate::util_funcs::random_vec2;

pub const VIEWPORT_ENV: &str = "PT_VIEWPORT";

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderParameters {
    viewport_size: (u32, u32),
    vfov_rad: f32,
    z_near: f32,
    z_far: f32,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self::new((1280, 720), 45.0, 0.1, 100.0)
    }
}

impl RenderParameters {
    pub fn new(viewport_size: (u32, u32), vfov: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            viewport_size,
            vfov_rad: vfov.to_radians(),
            z_near,
            z_far,
        }
    }

    /// Defaults, with the viewport optionally overridden by `PT_VIEWPORT=WxH`.
    pub fn from_env() -> Self {
        let mut rp = Self::default();
        if let Ok(value) = std::env::var(VIEWPORT_ENV) {
            match parse_viewport(&value) {
                Some(size) => rp.set_viewport(size),
                None => log::warn!("ignoring {VIEWPORT_ENV}={value:?}, expected WIDTHxHEIGHT"),
            }
        }
        rp
    }

    pub fn viewport_size(&self) -> (u32, u32) {
        self.viewport_size
    }

    pub fn set_viewport(&mut self, size: (u32, u32)) {
        self.viewport_size = size;
    }

    pub fn aspect_ratio(&self) -> f32 {
        let (width, height) = self.viewport_size;
        width as f32 / height as f32
    }

    pub fn vfov_rad(&self) -> f32 {
        self.vfov_rad
    }

    pub fn get_clip_planes(&self) -> (f32, f32) {
        (self.z_near, self.z_far)
    }
}

fn parse_viewport(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.trim().split_once(['x', 'X'])?;
    let size = (w.trim().parse().ok()?, h.trim().parse().ok()?);
    (size.0 > 0 && size.1 > 0).then_some(size)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameMode {
    /// the trace pass overwrites the accumulation target
    Reset,
    /// the trace pass adds onto what is already there
    Accumulating,
}

/// Sample bookkeeping for the accumulation target.
///
/// `sample_count` is how many samples the target currently sums; zero only
/// before the first frame.
#[derive(Default, Debug)]
pub struct RenderProgress {
    sample_count: u32,
}

impl RenderProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, invalidated: bool) -> FrameMode {
        if invalidated || self.sample_count == 0 {
            self.sample_count = 1;
            FrameMode::Reset
        } else {
            self.sample_count = self.sample_count.saturating_add(1);
            FrameMode::Accumulating
        }
    }

    /// Makes the next frame a reset regardless of the camera, for when the
    /// targets themselves were replaced.
    pub fn restart(&mut self) {
        self.sample_count = 0;
    }

    /// Takes the camera's invalidation flag, advances the sample count and
    /// snapshots everything the two passes need for this frame.
    pub fn plan_frame<R: Rng>(&mut self, camera_controller: &mut CameraController, rng: &mut R)
        -> FramePlan {
        let invalidated = camera_controller.take_invalidated();
        let mode = self.advance(invalidated);
        log::trace!("frame {:?}, sample count {}", mode, self.sample_count);

        FramePlan {
            mode,
            sample_count: self.sample_count,
            camera_to_world: camera_controller.camera_to_world_matrix(),
            camera_position: camera_controller.position(),
            random_vectors: [random_vec2(rng), random_vec2(rng)],
        }
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FramePlan {
    pub mode: FrameMode,
    pub sample_count: u32,
    pub camera_to_world: Mat4,
    pub camera_position: Vec3,
    pub random_vectors: [Vec2; 2],
}

impl FramePlan {
    pub fn upload_trace(&self, sink: &mut dyn ParameterSink) {
        sink.set(Param::CameraToWorld, ParamValue::Mat4(self.camera_to_world));
        sink.set(Param::CameraPos, ParamValue::Vec3(self.camera_position));
        for (i, v) in self.random_vectors.iter().enumerate() {
            sink.set(Param::RandomVector(i), ParamValue::Vec2(*v));
        }
        sink.set(Param::CameraIsMoving, ParamValue::Bool(self.mode == FrameMode::Reset));
    }

    pub fn upload_present(&self, sink: &mut dyn ParameterSink) {
        sink.set(Param::CameraToWorld, ParamValue::Mat4(self.camera_to_world));
        sink.set(Param::Count, ParamValue::U32(self.sample_count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::camera::Camera;
    use crate::camera_controller::Direction;
    use crate::shader_params::tests::RecordingSink;

    fn controller() -> CameraController {
        CameraController::new(Camera::showcase_camera(), 7.0, 70.0, 0.1)
    }

    #[test]
    fn still_camera_counts_up_by_one() {
        let mut progress = RenderProgress::new();
        assert_eq!(progress.advance(false), FrameMode::Reset);
        for expected in 2..50 {
            assert_eq!(progress.advance(false), FrameMode::Accumulating);
            assert_eq!(progress.sample_count(), expected);
        }
    }

    #[test]
    fn count_saturates_instead_of_wrapping() {
        let mut progress = RenderProgress { sample_count: u32::MAX };
        assert_eq!(progress.advance(false), FrameMode::Accumulating);
        assert_eq!(progress.sample_count(), u32::MAX);
    }

    #[test]
    fn invalidation_resets_to_one() {
        let mut progress = RenderProgress::new();
        for _ in 0..10 {
            progress.advance(false);
        }
        assert_eq!(progress.advance(true), FrameMode::Reset);
        assert_eq!(progress.sample_count(), 1);
        assert_eq!(progress.advance(false), FrameMode::Accumulating);
        assert_eq!(progress.sample_count(), 2);
    }

    #[test]
    fn restart_forces_reset_without_camera_change() {
        let mut progress = RenderProgress::new();
        progress.advance(false);
        progress.advance(false);
        progress.restart();
        assert_eq!(progress.advance(false), FrameMode::Reset);
        assert_eq!(progress.sample_count(), 1);
    }

    #[test]
    fn plan_consumes_camera_flag_once() {
        let mut cc = controller();
        let mut rng = StdRng::seed_from_u64(1);
        let mut progress = RenderProgress::new();

        let first = progress.plan_frame(&mut cc, &mut rng);
        assert_eq!((first.mode, first.sample_count), (FrameMode::Reset, 1));
        let second = progress.plan_frame(&mut cc, &mut rng);
        assert_eq!((second.mode, second.sample_count), (FrameMode::Accumulating, 2));

        cc.move_camera(Direction::Forward, 0.016);
        let third = progress.plan_frame(&mut cc, &mut rng);
        assert_eq!((third.mode, third.sample_count), (FrameMode::Reset, 1));
        assert_eq!(third.camera_position, cc.position());
        assert!(!cc.is_invalidated());
    }

    #[test]
    fn present_divisor_matches_traced_count() {
        let mut cc = controller();
        let mut rng = StdRng::seed_from_u64(2);
        let mut progress = RenderProgress::new();

        for frame in 0..20 {
            if frame == 7 {
                cc.move_camera(Direction::Backward, 0.016);
            }
            let plan = progress.plan_frame(&mut cc, &mut rng);
            let mut trace = RecordingSink::default();
            let mut present = RecordingSink::default();
            plan.upload_trace(&mut trace);
            plan.upload_present(&mut present);

            assert_eq!(present.value_of(Param::Count), Some(ParamValue::U32(progress.sample_count())));
            assert_eq!(trace.value_of(Param::CameraIsMoving),
                       Some(ParamValue::Bool(progress.sample_count() == 1)));
            assert_eq!(trace.value_of(Param::CameraToWorld), present.value_of(Param::CameraToWorld));
        }
    }

    #[test]
    fn trace_upload_names() {
        let mut cc = controller();
        let mut rng = StdRng::seed_from_u64(3);
        let plan = RenderProgress::new().plan_frame(&mut cc, &mut rng);
        let mut sink = RecordingSink::default();
        plan.upload_trace(&mut sink);
        assert_eq!(sink.names(),
                   ["c2w", "cameraPos", "randomVector[0]", "randomVector[1]", "cameraIsMoving"]);
    }

    #[test]
    fn random_vectors_are_fresh_every_frame() {
        let mut cc = controller();
        let mut rng = StdRng::seed_from_u64(4);
        let mut progress = RenderProgress::new();
        let a = progress.plan_frame(&mut cc, &mut rng);
        let b = progress.plan_frame(&mut cc, &mut rng);
        assert_ne!(a.random_vectors[0], a.random_vectors[1]);
        assert_ne!(a.random_vectors, b.random_vectors);
    }

    #[test]
    fn viewport_parsing() {
        assert_eq!(parse_viewport("1920x1080"), Some((1920, 1080)));
        assert_eq!(parse_viewport(" 800 X 600 "), Some((800, 600)));
        assert_eq!(parse_viewport("0x600"), None);
        assert_eq!(parse_viewport("wide"), None);
        assert_eq!(parse_viewport("800x"), None);
    }

    #[test]
    fn default_parameters() {
        let rp = RenderParameters::default();
        assert_eq!(rp.viewport_size(), (1280, 720));
        assert!((rp.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
        assert_eq!(rp.get_clip_planes(), (0.1, 100.0));
    }
}
