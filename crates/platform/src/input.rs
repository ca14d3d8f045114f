//! Collects winit window events into per-frame camera input.

use corelib::{DVec2, FrameInput, FrameOutput, MovementKeys};
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Pixels of trackpad scroll treated as one wheel line.
const PIXELS_PER_LINE: f64 = 20.0;

/// Event-fed input snapshot. Scroll accumulates until the next [`InputState::frame_input`].
#[derive(Clone, Copy, Debug)]
pub struct InputState {
    keys: MovementKeys,
    cursor: DVec2,
    scroll: f64,
    window_size: (u32, u32),
    exit_requested: bool,
}

impl InputState {
    /// Start with the cursor at the window centre, as the samples do before the loop.
    pub fn new(window_size: PhysicalSize<u32>) -> Self {
        let window_size = (window_size.width.max(1), window_size.height.max(1));
        Self {
            keys: MovementKeys::default(),
            cursor: DVec2::new(f64::from(window_size.0 / 2), f64::from(window_size.1 / 2)),
            scroll: 0.0,
            window_size,
            exit_requested: false,
        }
    }

    #[inline]
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    #[inline]
    pub fn keys(&self) -> MovementKeys {
        self.keys
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Feed one window event. Returns `true` if the event changed input state.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested.");
                self.exit_requested = true;
                true
            }
            WindowEvent::Resized(size) => {
                self.handle_resize(*size);
                true
            }
            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(code) => self.handle_key(code, event.state),
                PhysicalKey::Unidentified(_) => false,
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor(*position);
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.handle_scroll(*delta);
                true
            }
            _ => false,
        }
    }

    /// Returns `true` for keys the samples react to.
    pub fn handle_key(&mut self, code: KeyCode, state: ElementState) -> bool {
        let pressed = state.is_pressed();
        match code {
            KeyCode::ArrowUp | KeyCode::KeyW => self.keys.forward = pressed,
            KeyCode::ArrowDown | KeyCode::KeyS => self.keys.back = pressed,
            KeyCode::ArrowLeft | KeyCode::KeyA => self.keys.left = pressed,
            KeyCode::ArrowRight | KeyCode::KeyD => self.keys.right = pressed,
            KeyCode::Escape => {
                if pressed {
                    log::info!("Escape pressed.");
                    self.exit_requested = true;
                }
            }
            _ => return false,
        }
        true
    }

    pub fn handle_cursor(&mut self, position: PhysicalPosition<f64>) {
        self.cursor = DVec2::new(position.x, position.y);
    }

    pub fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_, y) => f64::from(y),
            MouseScrollDelta::PixelDelta(pos) => pos.y / PIXELS_PER_LINE,
        };
    }

    pub fn handle_resize(&mut self, size: PhysicalSize<u32>) {
        log::info!("Resized: {}x{}", size.width, size.height);
        self.window_size = (size.width.max(1), size.height.max(1));
    }

    /// Snapshot for this frame; drains the accumulated scroll.
    pub fn frame_input(&mut self, time: f64) -> FrameInput {
        let input = FrameInput {
            time,
            cursor: self.cursor,
            window_size: self.window_size,
            keys: self.keys,
            scroll: self.scroll,
        };
        self.scroll = 0.0;
        input
    }

    /// Record the cursor warp the camera asked for and return the position
    /// to hand to `Window::set_cursor_position`.
    pub fn apply_output(&mut self, output: &FrameOutput) -> PhysicalPosition<f64> {
        self.cursor = output.recenter_cursor;
        PhysicalPosition::new(output.recenter_cursor.x, output.recenter_cursor.y)
    }
}
