//! Multi-band compressor.
//!
//! Bands come from a [`Crossover`]; each band runs its own
//! [`BandCompressor`] and the results are summed.

use dynproc_core::{MbcBandConfig, MAX_BANDS};

use crate::compressor::BandCompressor;
use crate::crossover::{default_cutoffs, Crossover};

/// Multi-band compressor for one channel.
#[derive(Debug, Clone)]
pub struct MultibandCompressor {
    crossover: Crossover,
    bands: Vec<BandCompressor>,
}

impl MultibandCompressor {
    pub fn new(band_count: usize, sample_rate: f64, min_hz: f32, max_hz: f32) -> Self {
        let band_count = band_count.clamp(1, MAX_BANDS);
        let bands = default_cutoffs(band_count, min_hz, max_hz)
            .into_iter()
            .enumerate()
            .map(|(band, cutoff_frequency_hz)| {
                let config = MbcBandConfig {
                    band: band as i32,
                    cutoff_frequency_hz,
                    ..Default::default()
                };
                BandCompressor::new(config, sample_rate)
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

    pub fn band(&self, band: usize) -> Option<&BandCompressor> {
        self.bands.get(band)
    }

    /// Apply one band's settings. Out-of-range bands are ignored.
    pub fn set_band(&mut self, config: &MbcBandConfig) {
        let index = config.band.max(0) as usize;
        let Some(band) = self.bands.get_mut(index) else {
            return;
        };
        band.set_config(*config);
        self.crossover.set_cutoff(index, config.cutoff_frequency_hz);
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut split = [0.0_f32; MAX_BANDS];
        self.crossover.split(input, &mut split);
        self.bands
            .iter_mut()
            .zip(split.iter())
            .map(|(band, sample)| band.process(*sample))
            .sum()
    }

    pub fn reset(&mut self) {
        self.crossover.reset();
        self.bands.iter_mut().for_each(BandCompressor::reset);
    }
}
