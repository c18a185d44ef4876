use winit::keyboard::KeyCode;
use progressive_common::camera_controller::{CameraController, Direction, Turn};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    Turn(Turn),
    Quit,
}

pub fn key_binding(key: KeyCode) -> Option<Action> {
    let action = match key {
        KeyCode::KeyW => Action::Move(Direction::Forward),
        KeyCode::KeyS => Action::Move(Direction::Backward),
        KeyCode::KeyA => Action::Move(Direction::Left),
        KeyCode::KeyD => Action::Move(Direction::Right),
        KeyCode::KeyI => Action::Move(Direction::Up),
        KeyCode::KeyK => Action::Move(Direction::Down),
        KeyCode::KeyJ => Action::Turn(Turn::Left),
        KeyCode::KeyL => Action::Turn(Turn::Right),
        KeyCode::Escape => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Collects window events between frames. Keys are level triggered and stay
/// active while held; pointer motion and quit are consumed by `poll`.
#[derive(Default, Debug)]
pub struct InputState {
    held_moves: Vec<Direction>,
    held_turns: Vec<Turn>,
    cursor: Option<(f64, f64)>,
    pointer_released: bool,
    quit: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        match action {
            Action::Move(direction) if !self.held_moves.contains(&direction) => {
                self.held_moves.push(direction)
            }
            Action::Turn(turn) if !self.held_turns.contains(&turn) => self.held_turns.push(turn),
            Action::Quit => self.quit = true,
            _ => {}
        }
    }

    pub fn release(&mut self, action: Action) {
        match action {
            Action::Move(direction) => self.held_moves.retain(|d| *d != direction),
            Action::Turn(turn) => self.held_turns.retain(|t| *t != turn),
            Action::Quit => {}
        }
    }

    /// Drops every held key, e.g. when the window loses focus and the
    /// matching releases will never arrive.
    pub fn release_all(&mut self) {
        self.held_moves.clear();
        self.held_turns.clear();
    }

    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        self.cursor = Some((x, y));
    }

    pub fn cursor_left(&mut self) {
        self.cursor = None;
        self.pointer_released = true;
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn poll(&mut self) -> FrameInput {
        FrameInput {
            moves: self.held_moves.clone(),
            turns: self.held_turns.clone(),
            cursor: self.cursor.take(),
            pointer_released: std::mem::take(&mut self.pointer_released),
            quit: self.quit,
        }
    }
}

/// Everything the user asked for since the previous frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub moves: Vec<Direction>,
    pub turns: Vec<Turn>,
    pub cursor: Option<(f64, f64)>,
    pub pointer_released: bool,
    pub quit: bool,
}

impl FrameInput {
    pub fn apply(&self, camera_controller: &mut CameraController, dt: f32) {
        if self.pointer_released {
            camera_controller.deactivate_pointer();
        }
        for direction in &self.moves {
            camera_controller.move_camera(*direction, dt);
        }
        for turn in &self.turns {
            camera_controller.turn(*turn, dt);
        }
        if let Some((x, y)) = self.cursor {
            camera_controller.rotate(x, y);
        }
    }
}
