//! Frame-time counter reporting milliseconds per frame about once a second.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTimer {
    window_start: Option<f64>,
    frames: u32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one frame at `now` (seconds). Returns the average ms/frame once a
    /// full second has passed since the last report, then starts a new window.
    pub fn tick(&mut self, now: f64) -> Option<f64> {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;
        if now - start < 1.0 {
            return None;
        }
        let ms_per_frame = 1000.0 / f64::from(self.frames);
        self.frames = 0;
        self.window_start = Some(now);
        Some(ms_per_frame)
    }
}
