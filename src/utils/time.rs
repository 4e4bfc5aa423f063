use std::time::{Duration, Instant};

/// Wall-clock frame timer. Drives [`GiftWidget::frame`](crate::gift::GiftWidget::frame).
#[derive(Debug, Clone)]
pub struct Timer {
    start_time: Instant,
    last_update: Instant,
    /// Time since last tick
    pub delta: Duration,
    /// Since creation, as of the last tick
    pub elapsed: Duration,
    /// Total number of ticks
    pub frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Creates a new timer starting from now.
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_update: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Marks the start of a new frame.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_update;
        self.elapsed = now - self.start_time;
        self.last_update = now;
        self.frame_count += 1;
    }

    /// Seconds since the previous tick.
    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_counts_frames_and_accumulates() {
        let mut timer = Timer::new();
        timer.tick();
        std::thread::sleep(Duration::from_millis(2));
        timer.tick();
        assert_eq!(timer.frame_count, 2);
        assert!(timer.dt_seconds() > 0.0);
        assert!(timer.elapsed >= timer.delta);
    }
}
