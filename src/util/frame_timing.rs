use web_time::{Duration, Instant};

/// Per-frame delta time and a smoothed FPS readout.
pub struct FrameTiming {
    /// Last frame timestamp
    last_frame: Instant,
    /// Seconds between the two most recent ticks
    delta: f32,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
    /// Frames since the last FPS log line
    frames_since_report: u32,
    last_report: Instant,
}

/// How often the smoothed FPS is written to the debug log.
const REPORT_INTERVAL: Duration = Duration::from_secs(5);

impl FrameTiming {
    /// Start timing from now.
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta: 0.0,
            smoothed_fps: 60.0,
            smoothing: 0.05,
            frames_since_report: 0,
            last_report: now,
        }
    }

    /// Call once at the start of each frame. Returns the seconds elapsed
    /// since the previous call (or since construction).
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.tick_at(now)
    }

    fn tick_at(&mut self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.delta = elapsed.as_secs_f32();

        if self.delta > 0.0 {
            let instant_fps = 1.0 / self.delta;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }

        self.frames_since_report += 1;
        if now.saturating_duration_since(self.last_report) >= REPORT_INTERVAL {
            log::debug!(
                "{:.1} fps ({} frames)",
                self.smoothed_fps,
                self.frames_since_report
            );
            self.frames_since_report = 0;
            self.last_report = now;
        }
        self.delta
    }

    /// Seconds between the two most recent ticks.
    #[must_use]
    pub const fn delta(&self) -> f32 {
        self.delta
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub const fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}
