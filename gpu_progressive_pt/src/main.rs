mod app;
mod frame_scheduler;
mod input;
mod path_tracer;
mod present;
mod quad;
mod targets;
mod trace;

use anyhow::Context;
use winit::event_loop::{ControlFlow, EventLoop};
use progressive_common::camera::Camera;
use progressive_common::camera_controller::CameraController;
use progressive_common::error::RendererError;
use progressive_common::parameters::RenderParameters;
use progressive_common::scene::Scene;

use crate::app::App;
use crate::frame_scheduler::FrameScheduler;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let scene = Scene::showcase();
    let camera = Camera::showcase_camera();
    let camera_controller
        = CameraController::new(camera,
                                7.0,
                                70.0,
                                0.1);
    let render_parameters = RenderParameters::from_env();

    let event_loop = EventLoop::new().map_err(RendererError::from)?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(FrameScheduler::new(camera_controller), scene, render_parameters);
    event_loop.run_app(&mut app)
        .map_err(RendererError::from)
        .context("event loop terminated abnormally")?;

    match app.take_error() {
        Some(err) => Err(err).context("path tracer stopped"),
        None => Ok(()),
    }
}
