//! Core types: math re-exports, first-person camera, frame timing.

pub use glam::{DVec2, Mat4, Vec3, vec3};

pub mod camera;
pub mod timing;

pub use camera::{CameraState, ControlSettings, FrameInput, FrameOutput, MovementKeys};
pub use timing::FrameTimer;
