//! Band equalizer.
//!
//! The signal is split by a [`Crossover`] and each band is scaled by its
//! gain before the bands are summed again. A disabled band contributes at
//! unity gain.

use dynproc_core::{EqBandConfig, MAX_BANDS};

use crate::crossover::Crossover;
use crate::smoothing::GainRamp;

/// Gain ramp time for band gain changes.
const GAIN_SMOOTHING_MS: f32 = 20.0;

#[derive(Debug, Clone)]
struct EqBand {
    enabled: bool,
    gain_db: f32,
    gain: GainRamp,
}

/// N-band equalizer for one channel.
#[derive(Debug, Clone)]
pub struct BandEq {
    crossover: Crossover,
    bands: Vec<EqBand>,
}

impl BandEq {
    pub fn new(band_count: usize, sample_rate: f64, min_hz: f32, max_hz: f32) -> Self {
        let band_count = band_count.clamp(1, MAX_BANDS);
        let bands = (0..band_count)
            .map(|_| {
                EqBand {
                    enabled: true,
                    gain_db: 0.0,
                    gain: GainRamp::new(GAIN_SMOOTHING_MS, sample_rate),
                }
            })
            .collect();
        Self {
            crossover: Crossover::new(band_count, sample_rate, min_hz, max_hz),
            bands,
        }
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Apply one band's settings. Out-of-range bands are ignored.
    pub fn set_band(&mut self, config: &EqBandConfig) {
        let index = config.band.max(0) as usize;
        let Some(band) = self.bands.get_mut(index) else {
            return;
        };
        band.enabled = config.enable;
        band.gain_db = config.gain_db;
        band.gain
            .set_target_db(if config.enable { config.gain_db } else { 0.0 });
        self.crossover.set_cutoff(index, config.cutoff_frequency_hz);
    }

    /// Gain in dB currently targeted by `band` (0 when disabled).
    pub fn band_gain_db(&self, band: usize) -> Option<f32> {
        self.bands
            .get(band)
            .map(|b| if b.enabled { b.gain_db } else { 0.0 })
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut split = [0.0_f32; MAX_BANDS];
        self.crossover.split(input, &mut split);
        self.bands
            .iter_mut()
            .zip(split.iter())
            .map(|(band, sample)| sample * band.gain.next())
            .sum()
    }

    pub fn reset(&mut self) {
        self.crossover.reset();
        for band in &mut self.bands {
            band.gain.settle();
        }
    }
}
