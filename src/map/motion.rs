//! Timed interpolation between two positions
//!
//! A `Motion` is sampled once per display frame with the frame timestamp. The
//! clock starts at the first sample. Once a sample reports `done` the motion
//! is spent and further samples return `None`; a new transition needs a new
//! `Motion`.

use glam::Vec2;

/// Easing curve mapping linear time t in [0, 1] to progress
pub type Easing = fn(f32) -> f32;

/// Ease-out cubic: fast start, slow finish
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

#[inline]
pub fn linear(t: f32) -> f32 {
    t
}

/// Linear interpolation between two points
#[inline]
pub fn lerp(start: Vec2, end: Vec2, t: f32) -> Vec2 {
    start + (end - start) * t
}

/// One frame's worth of motion output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub position: Vec2,
    /// Eased progress in [0, 1]
    pub progress: f32,
    /// True on the frame linear time reaches 1
    pub done: bool,
}

#[derive(Debug, Clone)]
pub struct Motion {
    start: Vec2,
    end: Vec2,
    /// Duration in milliseconds
    duration: f64,
    easing: Easing,
    started_at: Option<f64>,
    finished: bool,
}

impl Motion {
    pub fn new(start: Vec2, end: Vec2, duration: f64, easing: Easing) -> Self {
        Self {
            start,
            end,
            duration,
            easing,
            started_at: None,
            finished: false,
        }
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn end(&self) -> Vec2 {
        self.end
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Linear time fraction at `now`, clamped to [0, 1]
    fn linear_t(&self, now: f64) -> f32 {
        let Some(started) = self.started_at else {
            return 0.0;
        };
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - started) / self.duration).clamp(0.0, 1.0) as f32
    }

    /// Produce the sample for the frame at `now` (milliseconds)
    pub fn sample(&mut self, now: f64) -> Option<MotionSample> {
        if self.finished {
            return None;
        }
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }

        let t = self.linear_t(now);
        let eased = (self.easing)(t).clamp(0.0, 1.0);
        let done = t >= 1.0;
        if done {
            self.finished = true;
        }

        Some(MotionSample {
            position: if done { self.end } else { lerp(self.start, self.end, eased) },
            progress: if done { 1.0 } else { eased },
            done,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_out_cubic() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn test_motion_runs_to_completion_once() {
        let mut motion = Motion::new(Vec2::ZERO, Vec2::new(10.0, 20.0), 1000.0, linear);

        let first = motion.sample(5000.0).unwrap();
        assert_eq!(first.progress, 0.0);
        assert_eq!(first.position, Vec2::ZERO);
        assert!(!first.done);

        let mid = motion.sample(5500.0).unwrap();
        assert!((mid.progress - 0.5).abs() < 1e-6);
        assert!((mid.position - Vec2::new(5.0, 10.0)).length() < 1e-5);

        let last = motion.sample(6200.0).unwrap();
        assert!(last.done);
        assert_eq!(last.position, Vec2::new(10.0, 20.0));
        assert_eq!(last.progress, 1.0);

        assert!(motion.is_finished());
        assert!(motion.sample(7000.0).is_none());
    }

    #[test]
    fn test_eased_progress_is_monotonic() {
        let mut motion = Motion::new(Vec2::ZERO, Vec2::X, 2000.0, ease_out_cubic);
        let mut last = -1.0;
        let mut now = 0.0;
        while let Some(sample) = motion.sample(now) {
            assert!(sample.progress >= last);
            last = sample.progress;
            now += 16.0;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let mut motion = Motion::new(Vec2::ZERO, Vec2::ONE, 0.0, ease_out_cubic);
        let sample = motion.sample(0.0).unwrap();
        assert!(sample.done);
        assert_eq!(sample.position, Vec2::ONE);
    }

    #[test]
    fn test_clock_going_backwards_clamps() {
        let mut motion = Motion::new(Vec2::ZERO, Vec2::X, 100.0, linear);
        motion.sample(50.0);
        let sample = motion.sample(10.0).unwrap();
        assert_eq!(sample.progress, 0.0);
    }
}
