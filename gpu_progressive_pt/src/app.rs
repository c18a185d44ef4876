use crate::frame_scheduler::{FrameOutcome, FrameScheduler};
use crate::input::key_binding;
use crate::path_tracer::PathTracer;

use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};
use progressive_common::error::RendererError;
use progressive_common::parameters::RenderParameters;
use progressive_common::scene::Scene;

const TITLE: &str = "GPU progressive path tracer";
const TITLE_UPDATE_INTERVAL: u64 = 30;

pub struct App {
    window: Option<Arc<Window>>,
    path_tracer: Option<PathTracer>,
    scheduler: FrameScheduler,
    scene: Scene,
    render_parameters: RenderParameters,
    error: Option<RendererError>,
}

impl App {
    pub fn new(scheduler: FrameScheduler, scene: Scene, render_parameters: RenderParameters) -> Self {
        Self {
            window: None,
            path_tracer: None,
            scheduler,
            scene,
            render_parameters,
            error: None,
        }
    }

    /// The fatal error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<RendererError> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RendererError) {
        log::error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RendererError> {
        let size = self.render_parameters.viewport_size();
        let win_attr = Window::default_attributes()
            .with_inner_size(winit::dpi::PhysicalSize::new(size.0, size.1))
            .with_title(TITLE);
        let window = Arc::new(event_loop.create_window(win_attr)?);
        self.window = Some(window.clone());

        let path_tracer = PathTracer::new(window.clone(), &self.scene, &self.render_parameters)?;
        self.path_tracer = Some(path_tracer);
        window.request_redraw();
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(path_tracer)) = (self.window.as_ref(), self.path_tracer.as_mut()) else {
            return;
        };
        if path_tracer.is_paused() {
            self.scheduler.pause_at(Instant::now());
            return;
        }

        match self.scheduler.frame(path_tracer) {
            Ok(FrameOutcome::Exit) => event_loop.exit(),
            Ok(FrameOutcome::Rendered(stats)) => {
                let fps = self.scheduler.frames_per_second();
                if fps.frames() % TITLE_UPDATE_INTERVAL == 0 {
                    window.set_title(&format!("{TITLE} - {} spp, {:.1} fps",
                                              stats.sample_count, fps.get_avg_fps()));
                }
                window.request_redraw();
            }
            Err(err) => self.fail(event_loop, err),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                self.fail(event_loop, err);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop,
                    window_id: WindowId, event: WindowEvent) {
        match self.window.as_ref() {
            Some(window) if window.id() == window_id => {}
            _ => return,
        }

        let input = self.scheduler.input_mut();
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    state,
                    physical_key: PhysicalKey::Code(key),
                    ..
                },
                ..
            } => {
                if let Some(action) = key_binding(key) {
                    match state {
                        ElementState::Pressed => input.press(action),
                        ElementState::Released => input.release(action),
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => input.cursor_moved(position.x, position.y),

            WindowEvent::CursorLeft { .. } => input.cursor_left(),

            WindowEvent::Focused(false) => {
                input.release_all();
                input.cursor_left();
            }

            WindowEvent::CloseRequested => input.request_quit(),

            WindowEvent::Resized(new_size) => {
                if let Some(path_tracer) = self.path_tracer.as_mut() {
                    if let Err(err) = path_tracer.resize((new_size.width, new_size.height)) {
                        self.fail(event_loop, err);
                        return;
                    }
                }
                if let Some(window) = self.window.as_ref() {
                    window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }

        // a minimized window gets no redraws, so the frame loop would never see it
        if self.scheduler.quit_requested() {
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(path_tracer) = self.path_tracer.take() {
            log::info!("shutting down after {} accumulated samples", path_tracer.sample_count());
        }
    }
}
