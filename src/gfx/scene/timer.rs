//! Animation timer
//!
//! A normalised phase in `[0, 1)` that advances by `speed * dt` while running and
//! wraps around. Drives the orbiting lights.

use std::time::Instant;

#[derive(Debug, Clone)]
pub struct AnimationTimer {
    value: f32,
    speed: f32,
    paused: bool,
}

impl AnimationTimer {
    pub fn new(speed: f32, paused: bool) -> Self {
        Self {
            value: 0.0,
            speed,
            paused,
        }
    }

    /// Advances by `dt` seconds unless paused, returns whether the phase moved
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.paused || dt <= 0.0 || self.speed == 0.0 {
            return false;
        }
        self.value = (self.value + self.speed * dt).rem_euclid(1.0);
        true
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }
}

/// Wall-clock frame delta and a smoothed frame rate for the overlay
#[derive(Debug)]
pub struct FrameClock {
    last_frame: Instant,
    fps_window_start: Instant,
    frames_in_window: u32,
    fps: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            fps_window_start: now,
            frames_in_window: 0,
            fps: 0.0,
        }
    }

    /// Seconds since the previous tick
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.frames_in_window += 1;
        let window = (now - self.fps_window_start).as_secs_f32();
        if window >= 1.0 {
            self.fps = self.frames_in_window as f32 / window;
            self.frames_in_window = 0;
            self.fps_window_start = now;
        }
        dt
    }

    pub fn fps(&self) -> f32 {
        self.fps
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
    fn test_paused_timer_does_not_move() {
        let mut timer = AnimationTimer::new(0.075, true);
        assert!(!timer.advance(1.0));
        assert_eq!(timer.value(), 0.0);
    }

    #[test]
    fn test_advance_and_wrap() {
        let mut timer = AnimationTimer::new(0.5, false);
        assert!(timer.advance(1.0));
        assert!((timer.value() - 0.5).abs() < 1e-6);

        timer.advance(1.5);
        assert!((timer.value() - 0.25).abs() < 1e-6);
        assert!(timer.value() < 1.0);
    }

    #[test]
    fn test_toggle() {
        let mut timer = AnimationTimer::new(1.0, true);
        assert!(!timer.toggle_pause());
        assert!(!timer.is_paused());
        assert!(timer.toggle_pause());
    }

    #[test]
    fn test_frame_clock_dt_is_non_negative() {
        let mut clock = FrameClock::new();
        assert!(clock.tick() >= 0.0);
        assert_eq!(clock.fps(), 0.0);
    }
}
