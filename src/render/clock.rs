//! Fixed-step clock
//!
//! Converts variable frame time into a whole number of simulation steps.
//! Time is accumulated in integer nanoseconds so the step count depends only
//! on the total elapsed time, not on how it was split across frames.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedStep {
    step: Duration,
    accumulator: Duration,
}

impl FixedStep {
    /// A clock ticking `rate_hz` times per second. Non-positive rates fall
    /// back to 60 Hz.
    pub fn new(rate_hz: f32) -> Self {
        let rate = if rate_hz > 0.0 { rate_hz as f64 } else { 60.0 };
        Self::from_step(Duration::from_secs_f64(1.0 / rate))
    }

    pub fn from_step(step: Duration) -> Self {
        Self {
            step: step.max(Duration::from_nanos(1)),
            accumulator: Duration::ZERO,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn step_seconds(&self) -> f32 {
        self.step.as_secs_f32()
    }

    /// Add a frame of `frame_dt` seconds; returns the steps to run now
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let nanos = (frame_dt.max(0.0) as f64 * 1e9).round() as u64;
        self.advance_duration(Duration::from_nanos(nanos))
    }

    pub fn advance_duration(&mut self, frame: Duration) -> u32 {
        self.accumulator += frame;
        let steps = self.accumulator.as_nanos() / self.step.as_nanos();
        self.accumulator -= self.step * steps as u32;
        steps as u32
    }

    /// Fraction of a step left over, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / self.step.as_secs_f32()
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(60.0)
    }
}
