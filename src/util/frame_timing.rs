use std::time::{Duration, Instant};

/// How often the smoothed frame rate is written to the log.
const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Frame timing with FPS calculation and optional frame limiting
pub struct FrameTiming {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Last frame timestamp
    last_frame: Instant,
    /// Last time the frame rate was logged
    last_report: Instant,
    /// Frames finished since the timer was created
    frames: u64,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl FrameTiming {
    /// Create a new frame timer with the given FPS target (0 = unlimited).
    pub fn new(target_fps: u32) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };

        let now = Instant::now();
        Self {
            target_fps,
            min_frame_duration,
            last_frame: now,
            last_report: now,
            frames: 0,
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Call at the start of each frame. Returns true if enough time has passed
    /// to render.
    pub fn should_render(&self) -> bool {
        if self.target_fps == 0 {
            return true;
        }
        self.last_frame.elapsed() >= self.min_frame_duration
    }

    /// Time left before the next frame may render.
    pub fn time_until_next(&self) -> Duration {
        self.min_frame_duration
            .saturating_sub(self.last_frame.elapsed())
    }

    /// Call after rendering to update timing.
    pub fn end_frame(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.frames += 1;

        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }

        if now.duration_since(self.last_report) >= REPORT_INTERVAL {
            self.last_report = now;
            log::debug!("{:.1} fps ({} frames)", self.smoothed_fps, self.frames);
        }
    }

    /// Get the current FPS (smoothed)
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Frames finished so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_always_renders() {
        let mut timing = FrameTiming::new(0);
        assert!(timing.should_render());
        timing.end_frame();
        assert!(timing.should_render());
        assert_eq!(timing.time_until_next(), Duration::ZERO);
    }

    #[test]
    fn limited_waits_after_a_frame() {
        let mut timing = FrameTiming::new(1);
        timing.end_frame();
        assert!(!timing.should_render());
        assert!(timing.time_until_next() > Duration::ZERO);
    }

    #[test]
    fn counts_frames_and_keeps_fps_positive() {
        let mut timing = FrameTiming::new(0);
        for _ in 0..10 {
            std::thread::sleep(Duration::from_millis(1));
            timing.end_frame();
        }
        assert_eq!(timing.frames(), 10);
        assert!(timing.fps() > 0.0);
    }
}
