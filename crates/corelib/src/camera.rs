//! First-person camera driven by keyboard, mouse-look and scroll zoom.
//!
//! The state is a plain value: each frame the platform layer gathers a
//! [`FrameInput`], calls [`CameraState::update`], uploads the returned
//! matrices and warps the cursor back to [`FrameOutput::recenter_cursor`].

use std::f32::consts::{FRAC_PI_2, PI};

use crate::{DVec2, Mat4, Vec3, vec3};

/// Tunables for movement, look sensitivity and projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlSettings {
    /// Units per second.
    pub speed: f32,
    /// Radians per pixel of cursor offset from the window centre.
    pub mouse_speed: f32,
    /// Degrees of field of view removed per scroll line.
    pub zoom_step: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            speed: 3.0,
            mouse_speed: 0.005,
            zoom_step: 0.1,
            aspect: 4.0 / 3.0,
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}

/// Which movement keys are held this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementKeys {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

/// Input sampled once per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
    /// Seconds since an arbitrary epoch (monotonic).
    pub time: f64,
    pub cursor: DVec2,
    /// Window size in pixels.
    pub window_size: (u32, u32),
    pub keys: MovementKeys,
    /// Vertical scroll lines since the previous frame.
    pub scroll: f64,
}

impl FrameInput {
    /// Pixel position the cursor is reset to after every frame.
    pub fn window_center(&self) -> DVec2 {
        let (w, h) = self.window_size;
        DVec2::new(f64::from(w / 2), f64::from(h / 2))
    }
}

/// Matrices for the renderer plus the cursor warp request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameOutput {
    pub view: Mat4,
    pub projection: Mat4,
    pub recenter_cursor: DVec2,
}

impl FrameOutput {
    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    #[inline]
    pub fn mvp(&self, model: Mat4) -> Mat4 {
        self.projection * self.view * model
    }
}

/// Camera pose persisted across frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    /// Radians around +Y; `PI` looks toward -Z.
    pub horizontal_angle: f32,
    /// Radians above the horizon.
    pub vertical_angle: f32,
    pub fov_degrees: f32,
    /// Time of the previous update, `None` before the first frame.
    pub last_time: Option<f64>,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: vec3(0.0, 0.0, 5.0),
            horizontal_angle: PI,
            vertical_angle: 0.0,
            fov_degrees: 45.0,
            last_time: None,
        }
    }
}

impl CameraState {
    /// Unit view direction from the two angles.
    pub fn direction(&self) -> Vec3 {
        let (h, v) = (self.horizontal_angle, self.vertical_angle);
        vec3(v.cos() * h.sin(), v.sin(), v.cos() * h.cos())
    }

    /// Horizontal right vector; ignores pitch.
    pub fn right(&self) -> Vec3 {
        let h = self.horizontal_angle - FRAC_PI_2;
        vec3(h.sin(), 0.0, h.cos())
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.direction())
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.direction(), self.up())
    }

    /// OpenGL clip-space projection (z in [-1, 1]).
    pub fn projection(&self, settings: &ControlSettings) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov_degrees.to_radians(),
            settings.aspect.max(1e-6),
            settings.z_near,
            settings.z_far,
        )
    }

    /// Integrate one frame of input and return the next state with its matrices.
    pub fn update(&self, settings: &ControlSettings, input: &FrameInput) -> (Self, FrameOutput) {
        let mut next = *self;

        let last = self.last_time.unwrap_or(input.time);
        let dt = (input.time - last).max(0.0) as f32;
        next.last_time = Some(input.time);

        let center = input.window_center();
        let offset = center - input.cursor;
        next.horizontal_angle += settings.mouse_speed * offset.x as f32;
        next.vertical_angle += settings.mouse_speed * offset.y as f32;

        next.fov_degrees -= settings.zoom_step * input.scroll as f32;

        let direction = next.direction();
        let right = next.right();
        let step = dt * settings.speed;
        if input.keys.forward {
            next.position += direction * step;
        }
        if input.keys.back {
            next.position -= direction * step;
        }
        if input.keys.right {
            next.position += right * step;
        }
        if input.keys.left {
            next.position -= right * step;
        }

        let output = FrameOutput {
            view: next.view(),
            projection: next.projection(settings),
            recenter_cursor: center,
        };
        (next, output)
    }
}
