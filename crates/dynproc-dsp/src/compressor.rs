//! Per-band dynamics: compressor above threshold, expander below the noise
//! gate.
//!
//! Processing steps per sample:
//! 1. Apply pre-gain
//! 2. Rectify and convert to dB
//! 3. Compute the static gain (soft-knee compression + downward expansion)
//! 4. Run attack/release on the gain in the dB domain
//! 5. Apply the gain and post-gain

use dynproc_core::MbcBandConfig;

use crate::util::{db_to_linear, follow_gain, linear_to_db, time_to_coeff, DC_OFFSET};

/// Static gain curve in dB for an input level in dB.
///
/// Returns a value <= 0 (attenuation only).
pub fn static_gain_db(level_db: f32, config: &MbcBandConfig) -> f32 {
    let threshold = config.threshold_db;
    let knee = config.knee_width_db.max(0.0);
    let slope = 1.0 / config.ratio.max(1.0) - 1.0;

    let over = level_db - threshold;
    let compression = if knee > 0.0 && over.abs() * 2.0 <= knee {
        // Quadratic interpolation inside the knee
        slope * (over + knee / 2.0).powi(2) / (2.0 * knee)
    } else if over > 0.0 {
        slope * over
    } else {
        0.0
    };

    let gate = config.noise_gate_threshold_db;
    let expansion = if level_db < gate {
        (level_db - gate) * (config.expander_ratio.max(1.0) - 1.0)
    } else {
        0.0
    };

    compression + expansion
}

/// Dynamics processor for one MBC band.
#[derive(Debug, Clone)]
pub struct BandCompressor {
    config: MbcBandConfig,
    sample_rate: f64,
    attack_coeff: f32,
    release_coeff: f32,
    pre_gain: f32,
    post_gain: f32,
    /// Smoothed gain in dB (with DC offset applied).
    gain_db: f32,
}

impl BandCompressor {
    pub fn new(config: MbcBandConfig, sample_rate: f64) -> Self {
        let mut compressor = Self {
            config,
            sample_rate,
            attack_coeff: 1.0,
            release_coeff: 1.0,
            pre_gain: 1.0,
            post_gain: 1.0,
            gain_db: DC_OFFSET,
        };
        compressor.set_config(config);
        compressor
    }

    pub fn config(&self) -> &MbcBandConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: MbcBandConfig) {
        self.attack_coeff = time_to_coeff(config.attack_time_ms, self.sample_rate);
        self.release_coeff = time_to_coeff(config.release_time_ms, self.sample_rate);
        self.pre_gain = db_to_linear(config.pre_gain_db);
        self.post_gain = db_to_linear(config.post_gain_db);
        self.config = config;
    }

    /// Current smoothed gain reduction in dB.
    pub fn gain_db(&self) -> f32 {
        self.gain_db - DC_OFFSET
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if !self.config.enable {
            return input;
        }
        let x = input * self.pre_gain;
        let level_db = linear_to_db(x.abs() + DC_OFFSET);
        let target = static_gain_db(level_db, &self.config) + DC_OFFSET;
        self.gain_db = follow_gain(self.gain_db, target, self.attack_coeff, self.release_coeff);
        x * db_to_linear(self.gain_db - DC_OFFSET) * self.post_gain
    }

    pub fn reset(&mut self) {
        self.gain_db = DC_OFFSET;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(ratio: f32, threshold_db: f32) -> MbcBandConfig {
        MbcBandConfig {
            ratio,
            threshold_db,
            attack_time_ms: 0.0,
            release_time_ms: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_static_curve_hard_knee() {
        let c = config(4.0, -20.0);
        assert_eq!(static_gain_db(-30.0, &c), 0.0);
        // 8 dB over at 4:1 -> 2 dB over, 6 dB of reduction
        assert!((static_gain_db(-12.0, &c) + 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_static_curve_soft_knee_is_continuous() {
        let c = MbcBandConfig {
            knee_width_db: 10.0,
            ..config(4.0, -20.0)
        };
        let below = static_gain_db(-25.001, &c);
        let above = static_gain_db(-14.999, &c);
        assert!(below.abs() < 1e-3);
        assert!((above - static_gain_db(-14.999, &config(4.0, -20.0))).abs() < 1e-2);
    }

    #[test]
    fn test_expander_below_gate() {
        let c = MbcBandConfig {
            noise_gate_threshold_db: -60.0,
            expander_ratio: 2.0,
            ..config(1.0, -20.0)
        };
        assert_eq!(static_gain_db(-50.0, &c), 0.0);
        assert!((static_gain_db(-70.0, &c) + 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_instant_compression_of_loud_signal() {
        let mut comp = BandCompressor::new(config(4.0, -20.0), 48000.0);
        let out = comp.process(1.0); // 0 dB in, 20 dB over -> 15 dB reduction
        assert!((linear_to_db(out) + 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_unity_ratio_is_transparent() {
        let mut comp = BandCompressor::new(MbcBandConfig::default(), 48000.0);
        let mut out = 0.0;
        for _ in 0..4800 {
            out = comp.process(0.5);
        }
        assert!((out - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_disabled_band_passes_through() {
        let mut comp = BandCompressor::new(
            MbcBandConfig {
                enable: false,
                pre_gain_db: 12.0,
                ..config(10.0, -40.0)
            },
            48000.0,
        );
        assert_eq!(comp.process(0.8), 0.8);
    }
}
