//! Linkwitz-Riley band splitter.
//!
//! Splits a signal into N bands with N-1 LR4 crossovers applied in series:
//!
//! ```text
//! x -> LP(f0) ----------------------------> band 0 -> AP(f1) -> AP(f2) ...
//!   -> HP(f0) -> LP(f1) -------------------> band 1 -> AP(f2) ...
//!             -> HP(f1) -> LP(f2) ---------> band 2 ...
//!                       -> HP(f2) ... ---> band N-1
//! ```
//!
//! Lower bands run through the all-pass of every later split, so all bands
//! share the same phase and their sum has a flat magnitude response.
//!
//! Band `i` ends at split frequency `i`; the last band extends to Nyquist.

use crate::biquad::{Biquad, BiquadCoefficients, BUTTERWORTH_Q};

/// Lowest split frequency in Hz.
const MIN_SPLIT_HZ: f64 = 10.0;

/// Highest split frequency as a fraction of the sample rate.
const MAX_SPLIT_RATIO: f64 = 0.49;

/// One LR4 split point.
#[derive(Debug, Clone)]
struct Split {
    low: [Biquad; 2],
    high: [Biquad; 2],
    /// All-pass sections compensating the bands below this split.
    compensation: Vec<Biquad>,
}

impl Split {
    fn new(index: usize) -> Self {
        Self {
            low: [Biquad::default(), Biquad::default()],
            high: [Biquad::default(), Biquad::default()],
            compensation: vec![Biquad::default(); index],
        }
    }

    fn set_frequency(&mut self, frequency: f64, sample_rate: f64) {
        let lp = BiquadCoefficients::low_pass(frequency, BUTTERWORTH_Q, sample_rate);
        let hp = BiquadCoefficients::high_pass(frequency, BUTTERWORTH_Q, sample_rate);
        let ap = BiquadCoefficients::all_pass(frequency, BUTTERWORTH_Q, sample_rate);
        for section in &mut self.low {
            section.set_coefficients(lp);
        }
        for section in &mut self.high {
            section.set_coefficients(hp);
        }
        for section in &mut self.compensation {
            section.set_coefficients(ap);
        }
    }

    fn reset(&mut self) {
        self.low.iter_mut().for_each(Biquad::reset);
        self.high.iter_mut().for_each(Biquad::reset);
        self.compensation.iter_mut().for_each(Biquad::reset);
    }
}

/// N-band crossover.
#[derive(Debug, Clone)]
pub struct Crossover {
    sample_rate: f64,
    splits: Vec<Split>,
    frequencies: Vec<f32>,
}

impl Crossover {
    /// Create a crossover with `band_count` bands and log-spaced splits
    /// between `min_hz` and `max_hz`.
    pub fn new(band_count: usize, sample_rate: f64, min_hz: f32, max_hz: f32) -> Self {
        let split_count = band_count.saturating_sub(1);
        let mut crossover = Self {
            sample_rate,
            splits: (0..split_count).map(Split::new).collect(),
            frequencies: vec![0.0; split_count],
        };
        for (index, frequency) in default_cutoffs(band_count, min_hz, max_hz)
            .into_iter()
            .take(split_count)
            .enumerate()
        {
            crossover.set_cutoff(index, frequency);
        }
        crossover
    }

    pub fn band_count(&self) -> usize {
        self.splits.len() + 1
    }

    /// Split frequency after clamping, if `band` has one.
    pub fn cutoff(&self, band: usize) -> Option<f32> {
        self.frequencies.get(band).copied()
    }

    /// Set the upper edge of `band`. Ignored for the last band.
    pub fn set_cutoff(&mut self, band: usize, frequency_hz: f32) {
        let max_hz = self.sample_rate * MAX_SPLIT_RATIO;
        let Some(split) = self.splits.get_mut(band) else {
            return;
        };
        let frequency = (frequency_hz as f64).clamp(MIN_SPLIT_HZ, max_hz.max(MIN_SPLIT_HZ));
        split.set_frequency(frequency, self.sample_rate);
        self.frequencies[band] = frequency as f32;
    }

    /// Split one sample into `bands[..band_count()]`.
    #[inline]
    pub fn split(&mut self, input: f32, bands: &mut [f32]) {
        let mut rest = input;
        for (index, split) in self.splits.iter_mut().enumerate() {
            let low = split.low[0].process(rest);
            let low = split.low[1].process(low);
            let high = split.high[0].process(rest);
            let high = split.high[1].process(high);
            for (band, section) in bands[..index].iter_mut().zip(&mut split.compensation) {
                *band = section.process(*band);
            }
            bands[index] = low;
            rest = high;
        }
        bands[self.splits.len()] = rest;
    }

    pub fn reset(&mut self) {
        self.splits.iter_mut().for_each(Split::reset);
    }
}

/// Log-spaced upper band edges between `min_hz` and `max_hz`.
///
/// The last entry is always `max_hz`.
pub fn default_cutoffs(band_count: usize, min_hz: f32, max_hz: f32) -> Vec<f32> {
    if band_count == 0 {
        return Vec::new();
    }
    let ratio = (max_hz / min_hz).max(1.0);
    (1..=band_count)
        .map(|i| {
            if i == band_count {
                max_hz
            } else {
                min_hz * ratio.powf(i as f32 / band_count as f32)
            }
        })
        .collect()
}
