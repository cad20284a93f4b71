//! Gain ramps for avoiding zipper noise when the host changes gains.
//!
//! Input gain and EQ band gains are set from the host thread at arbitrary
//! times. Jumping straight to the new value clicks, so each gain runs through
//! a [`GainRamp`] that moves linearly to its target over a fixed time.
//!
//! ```ignore
//! let mut ramp = GainRamp::new(20.0, 48000.0);
//! ramp.set_target_db(-6.0);
//! let gain = ramp.next(); // per sample
//! ```

use crate::util::db_to_linear;

/// Linear ramp of a linear gain factor.
#[derive(Debug, Clone)]
pub struct GainRamp {
    ramp_samples: u32,
    current: f32,
    target: f32,
    step: f32,
    remaining: u32,
}

impl GainRamp {
    /// Unity gain ramp that takes `ramp_ms` to reach each new target.
    pub fn new(ramp_ms: f32, sample_rate: f64) -> Self {
        let ramp_samples = (ramp_ms.max(0.0) as f64 * 0.001 * sample_rate) as u32;
        Self {
            ramp_samples: ramp_samples.max(1),
            current: 1.0,
            target: 1.0,
            step: 0.0,
            remaining: 0,
        }
    }

    pub fn set_target_db(&mut self, gain_db: f32) {
        self.set_target(db_to_linear(gain_db));
    }

    /// Start ramping toward `target` from wherever the ramp is now.
    pub fn set_target(&mut self, target: f32) {
        if target == self.target {
            return;
        }
        self.target = target;
        self.remaining = self.ramp_samples;
        self.step = (target - self.current) / self.ramp_samples as f32;
    }

    /// Jump to the target, dropping any ramp in progress.
    pub fn settle(&mut self) {
        self.current = self.target;
        self.remaining = 0;
    }

    #[inline]
    pub fn next(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.current = if self.remaining == 0 {
                self.target
            } else {
                self.current + self.step
            };
        }
        self.current
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn is_ramping(&self) -> bool {
        self.remaining > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_unity() {
        let mut ramp = GainRamp::new(20.0, 48000.0);
        assert_eq!(ramp.next(), 1.0);
        assert!(!ramp.is_ramping());
    }

    #[test]
    fn test_reaches_target_after_ramp_time() {
        let mut ramp = GainRamp::new(10.0, 1000.0); // 10 samples
        ramp.set_target(0.0);

        for _ in 0..5 {
            ramp.next();
        }
        assert!((ramp.current() - 0.5).abs() < 1e-5);

        for _ in 0..5 {
            ramp.next();
        }
        assert_eq!(ramp.current(), 0.0);
        assert!(!ramp.is_ramping());
    }

    #[test]
    fn test_retarget_mid_ramp_starts_from_current() {
        let mut ramp = GainRamp::new(10.0, 1000.0);
        ramp.set_target(0.0);
        for _ in 0..5 {
            ramp.next();
        }
        ramp.set_target(1.0);
        let first = ramp.next();
        assert!(first > 0.5 && first < 0.6, "{first}");
    }

    #[test]
    fn test_settle_and_db_target() {
        let mut ramp = GainRamp::new(20.0, 48000.0);
        ramp.set_target_db(-20.0);
        assert!(ramp.is_ramping());
        ramp.settle();
        assert!((ramp.current() - 0.1).abs() < 1e-6);
        assert!(!ramp.is_ramping());
    }

    #[test]
    fn test_zero_time_is_one_sample() {
        let mut ramp = GainRamp::new(0.0, 48000.0);
        ramp.set_target(0.25);
        assert_eq!(ramp.next(), 0.25);
    }
}
