use std::f32::consts::PI;
use glam::{Mat4, Vec3};
use crate::camera::Camera;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

/// Owns the camera pose and records whether it changed since the last frame
/// that was sampled. The accumulation pipeline takes the flag once per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraController {
    camera: Camera,
    speed: f32,
    turn_rate_rad: f32,
    sensitivity_rad: f32,
    last_cursor: Option<(f64, f64)>,
    invalidated: bool,
}

impl CameraController {
    const MAX_PITCH: f32 = 89.0 * PI / 180.0;

    /// `speed` is in world units per second, `turn_rate` in degrees per second
    /// and `sensitivity` in degrees per pixel of pointer travel.
    pub fn new(camera: Camera, speed: f32, turn_rate: f32, sensitivity: f32) -> Self {
        Self {
            camera,
            speed,
            turn_rate_rad: turn_rate.to_radians(),
            sensitivity_rad: sensitivity.to_radians(),
            last_cursor: None,
            // a freshly placed camera has nothing accumulated for its view
            invalidated: true,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn position(&self) -> Vec3 {
        self.camera.position
    }

    pub fn move_camera(&mut self, direction: Direction, dt: f32) {
        let distance = self.speed * dt;
        if distance == 0.0 {
            return;
        }
        let axis = match direction {
            Direction::Forward => self.camera.forward(),
            Direction::Backward => -self.camera.forward(),
            Direction::Right => self.camera.right(),
            Direction::Left => -self.camera.right(),
            // no roll, so up/down can move along world y directly
            Direction::Up => Vec3::Y,
            Direction::Down => Vec3::NEG_Y,
        };
        self.camera.position += axis * distance;
        self.invalidated = true;
    }

    pub fn turn(&mut self, turn: Turn, dt: f32) {
        let sign = match turn {
            Turn::Left => 1.0,
            Turn::Right => -1.0,
        };
        let angle = self.turn_rate_rad * dt;
        if angle == 0.0 {
            return;
        }
        self.camera.yaw += sign * angle;
        self.invalidated = true;
    }

    /// Looks around using absolute pointer coordinates. The first call after
    /// the pointer (re)activates only records where it is.
    pub fn rotate(&mut self, cursor_x: f64, cursor_y: f64) {
        let Some((last_x, last_y)) = self.last_cursor.replace((cursor_x, cursor_y)) else {
            return;
        };
        let dx = (cursor_x - last_x) as f32;
        let dy = (cursor_y - last_y) as f32;
        if dx == 0.0 && dy == 0.0 {
            return;
        }

        // screen y grows downwards, yaw grows towards the left
        self.camera.yaw -= dx * self.sensitivity_rad;
        self.camera.pitch = (self.camera.pitch - dy * self.sensitivity_rad)
            .clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
        self.invalidated = true;
    }

    pub fn deactivate_pointer(&mut self) {
        self.last_cursor = None;
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_transform()
    }

    pub fn camera_to_world_matrix(&self) -> Mat4 {
        self.view_matrix().inverse()
    }

    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    pub fn take_invalidated(&mut self) -> bool {
        std::mem::take(&mut self.invalidated)
    }
}
