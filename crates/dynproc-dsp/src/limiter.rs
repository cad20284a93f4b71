//! Output limiter.
//!
//! Each channel has its own gain envelope, but the level it reacts to is
//! supplied by the engine: the loudest channel of the channel's link group.
//! Linked channels therefore duck together and keep their balance.

use dynproc_core::LimiterConfig;

use crate::util::{db_to_linear, follow_gain, linear_to_db, time_to_coeff, DC_OFFSET};

/// Limiter for one channel.
#[derive(Debug, Clone)]
pub struct Limiter {
    config: LimiterConfig,
    sample_rate: f64,
    attack_coeff: f32,
    release_coeff: f32,
    post_gain: f32,
    gain_db: f32,
}

impl Limiter {
    pub fn new(config: LimiterConfig, sample_rate: f64) -> Self {
        let mut limiter = Self {
            config,
            sample_rate,
            attack_coeff: 1.0,
            release_coeff: 1.0,
            post_gain: 1.0,
            gain_db: DC_OFFSET,
        };
        limiter.set_config(config);
        limiter
    }

    pub fn config(&self) -> &LimiterConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: LimiterConfig) {
        self.attack_coeff = time_to_coeff(config.attack_time_ms, self.sample_rate);
        self.release_coeff = time_to_coeff(config.release_time_ms, self.sample_rate);
        self.post_gain = db_to_linear(config.post_gain_db);
        self.config = config;
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enable
    }

    pub fn link_group(&self) -> i32 {
        self.config.link_group
    }

    /// Process one sample given the detector level (linear, >= 0).
    #[inline]
    pub fn process(&mut self, input: f32, detector: f32) -> f32 {
        if !self.config.enable {
            return input;
        }
        let over = linear_to_db(detector + DC_OFFSET) - self.config.threshold_db;
        let target = if over > 0.0 {
            (1.0 / self.config.ratio.max(1.0) - 1.0) * over
        } else {
            0.0
        } + DC_OFFSET;
        self.gain_db = follow_gain(self.gain_db, target, self.attack_coeff, self.release_coeff);
        input * db_to_linear(self.gain_db - DC_OFFSET) * self.post_gain
    }

    pub fn reset(&mut self) {
        self.gain_db = DC_OFFSET;
    }
}
