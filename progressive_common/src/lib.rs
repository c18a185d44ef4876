pub mod camera;
pub mod camera_controller;
pub mod error;
pub mod frames_per_second;
pub mod gpu_buffer;
pub mod gpu_structs;
pub mod light;
pub mod material;
pub mod parameters;
pub mod plane;
pub mod projection_matrix;
pub mod scene;
pub mod shader_params;
pub mod sphere;
pub mod util_funcs;
pub mod wgpu_state;
