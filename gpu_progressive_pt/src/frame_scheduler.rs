use std::time::{Duration, Instant};
use progressive_common::camera_controller::CameraController;
use progressive_common::error::RendererError;
use progressive_common::frames_per_second::FramesPerSecond;
use progressive_common::parameters::FrameMode;
use crate::input::InputState;

const STATS_LOG_INTERVAL: u64 = 120;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameStats {
    pub mode: FrameMode,
    pub sample_count: u32,
    /// false when the surface could not be acquired and only the trace pass ran
    pub presented: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Rendered(FrameStats),
    Exit,
}

/// Runs the accumulation protocol for one frame, reading the camera it is
/// handed. Implemented by the GPU path tracer.
pub trait FrameRenderer {
    fn render_frame(&mut self, camera_controller: &mut CameraController)
        -> Result<FrameStats, RendererError>;
}

/// Per-frame context: owns the camera and the pending input, and drives
/// poll, apply, time and render in that order.
pub struct FrameScheduler {
    camera_controller: CameraController,
    input: InputState,
    last_frame: Instant,
    dt: Duration,
    frames_per_second: FramesPerSecond,
}

impl FrameScheduler {
    pub fn new(camera_controller: CameraController) -> Self {
        Self {
            camera_controller,
            input: InputState::new(),
            last_frame: Instant::now(),
            dt: Duration::ZERO,
            frames_per_second: FramesPerSecond::new(),
        }
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Quit is answered even when no frame is coming, e.g. while minimized.
    pub fn quit_requested(&self) -> bool {
        self.input.quit_requested()
    }

    pub fn frames_per_second(&self) -> &FramesPerSecond {
        &self.frames_per_second
    }

    pub fn frame(&mut self, renderer: &mut impl FrameRenderer) -> Result<FrameOutcome, RendererError> {
        self.frame_at(Instant::now(), renderer)
    }

    pub fn frame_at(&mut self, now: Instant, renderer: &mut impl FrameRenderer)
        -> Result<FrameOutcome, RendererError> {
        let input = self.input.poll();
        if input.quit {
            return Ok(FrameOutcome::Exit);
        }
        // the only dt known at poll time is the previous frame's
        input.apply(&mut self.camera_controller, self.dt.as_secs_f32());

        self.dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frames_per_second.update(self.dt);

        let stats = renderer.render_frame(&mut self.camera_controller)?;

        if self.frames_per_second.frames() % STATS_LOG_INTERVAL == 0 {
            log::debug!("{} samples accumulated, {:.1} fps",
                stats.sample_count, self.frames_per_second.get_avg_fps());
        }
        Ok(FrameOutcome::Rendered(stats))
    }

    /// Restarts the clock after a stretch without frames, so the next
    /// movement is not scaled by the time spent paused.
    pub fn pause_at(&mut self, now: Instant) {
        self.last_frame = now;
        self.dt = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use progressive_common::camera::Camera;
    use progressive_common::camera_controller::{Direction, Turn};
    use progressive_common::parameters::RenderProgress;
    use crate::input::Action;

    struct MockRenderer {
        progress: RenderProgress,
        rng: StdRng,
        frames: Vec<FrameStats>,
    }

    impl MockRenderer {
        fn new() -> Self {
            Self {
                progress: RenderProgress::new(),
                rng: StdRng::seed_from_u64(7),
                frames: Vec::new(),
            }
        }
    }

    impl FrameRenderer for MockRenderer {
        fn render_frame(&mut self, camera_controller: &mut CameraController)
            -> Result<FrameStats, RendererError> {
            let plan = self.progress.plan_frame(camera_controller, &mut self.rng);
            let stats = FrameStats {
                mode: plan.mode,
                sample_count: plan.sample_count,
                presented: true,
            };
            self.frames.push(stats);
            Ok(stats)
        }
    }

    fn scheduler() -> FrameScheduler {
        FrameScheduler::new(CameraController::new(Camera::showcase_camera(), 7.0, 70.0, 0.1))
    }

    fn rendered(outcome: FrameOutcome) -> FrameStats {
        match outcome {
            FrameOutcome::Rendered(stats) => stats,
            FrameOutcome::Exit => panic!("unexpected exit"),
        }
    }

    #[test]
    fn reset_accumulate_reset_sequence() {
        let mut scheduler = scheduler();
        let mut renderer = MockRenderer::new();
        let start = Instant::now();
        let tick = Duration::from_millis(16);

        let first = rendered(scheduler.frame_at(start + tick, &mut renderer).unwrap());
        assert_eq!((first.mode, first.sample_count), (FrameMode::Reset, 1));

        let second = rendered(scheduler.frame_at(start + 2 * tick, &mut renderer).unwrap());
        assert_eq!((second.mode, second.sample_count), (FrameMode::Accumulating, 2));

        scheduler.input_mut().press(Action::Move(Direction::Forward));
        let third = rendered(scheduler.frame_at(start + 3 * tick, &mut renderer).unwrap());
        assert_eq!((third.mode, third.sample_count), (FrameMode::Reset, 1));
    }

    #[test]
    fn still_camera_keeps_accumulating() {
        let mut scheduler = scheduler();
        let mut renderer = MockRenderer::new();
        let start = Instant::now();
        for i in 1..=40u32 {
            let stats = rendered(scheduler.frame_at(start + Duration::from_millis(10) * i,
                                                    &mut renderer).unwrap());
            assert_eq!(stats.sample_count, i);
        }
    }

    #[test]
    fn movement_uses_previous_frame_dt() {
        let mut scheduler = scheduler();
        let mut renderer = MockRenderer::new();
        let start = Instant::now();
        scheduler.pause_at(start);
        let z0 = scheduler.camera_controller.position().z;

        // held from the first frame, but no dt has been measured yet
        scheduler.input_mut().press(Action::Move(Direction::Forward));
        scheduler.frame_at(start + Duration::from_millis(500), &mut renderer).unwrap();
        assert_eq!(scheduler.camera_controller.position().z, z0);

        scheduler.frame_at(start + Duration::from_millis(600), &mut renderer).unwrap();
        let moved = z0 - scheduler.camera_controller.position().z;
        assert!((moved - 7.0 * 0.5).abs() < 1e-4);
    }

    #[test]
    fn held_key_after_pause_keeps_accumulating() {
        let mut scheduler = scheduler();
        let mut renderer = MockRenderer::new();
        let start = Instant::now();
        scheduler.frame_at(start, &mut renderer).unwrap();
        scheduler.frame_at(start + Duration::from_millis(16), &mut renderer).unwrap();

        scheduler.input_mut().press(Action::Turn(Turn::Left));
        scheduler.pause_at(start + Duration::from_secs(5));
        let stats = rendered(scheduler.frame_at(start + Duration::from_secs(6), &mut renderer)
            .unwrap());
        assert_eq!((stats.mode, stats.sample_count), (FrameMode::Accumulating, 3));
    }

    #[test]
    fn quit_stops_before_rendering() {
        let mut scheduler = scheduler();
        let mut renderer = MockRenderer::new();
        scheduler.input_mut().request_quit();
        assert_eq!(scheduler.frame(&mut renderer).unwrap(), FrameOutcome::Exit);
        assert!(renderer.frames.is_empty());
    }

    #[test]
    fn quit_is_visible_while_paused() {
        let mut scheduler = scheduler();
        scheduler.pause_at(Instant::now());
        assert!(!scheduler.quit_requested());
        scheduler.input_mut().request_quit();
        scheduler.pause_at(Instant::now());
        assert!(scheduler.quit_requested());
    }

    #[test]
    fn renderer_errors_propagate() {
        struct Failing;
        impl FrameRenderer for Failing {
            fn render_frame(&mut self, _: &mut CameraController) -> Result<FrameStats, RendererError> {
                Err(RendererError::SurfaceOutOfMemory)
            }
        }
        let mut scheduler = scheduler();
        assert!(matches!(scheduler.frame(&mut Failing), Err(RendererError::SurfaceOutOfMemory)));
    }
}
