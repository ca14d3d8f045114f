//! Platform layer: turns winit window events into camera input.
//!
//! Window and GL context creation stay with the caller; this crate only
//! interprets the events those produce.

pub mod input;

pub use input::InputState;
pub use winit;
