//! Frame timing utilities

use std::time::{Duration, Instant};

/// Tracks per-frame timing and wall time since the scheduler started.
///
/// Animation is driven by `elapsed_secs` rather than accumulated deltas so
/// that a dropped frame cannot slow playback down.
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
}

impl FrameClock {
    /// Create a new frame clock, starting the wall-time epoch now
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Call once per frame to update timing
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_frame;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get delta time in seconds
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Seconds of wall time since the clock was created
    pub fn elapsed_secs(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    /// Nanoseconds of wall time since the clock was created
    pub fn elapsed_nanos(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }

    /// Get total frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_advances_frame_count() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.frame_count(), 0);

        clock.tick();
        clock.tick();
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_elapsed_is_monotonic() {
        let mut clock = FrameClock::new();
        let before = clock.elapsed_secs();
        std::thread::sleep(Duration::from_millis(5));
        clock.tick();
        let after = clock.elapsed_secs();
        assert!(after >= before);
        assert!(clock.delta_secs() >= 0.0);
    }
}
