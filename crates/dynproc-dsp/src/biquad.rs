//! Second-order IIR sections (direct form 1).
//!
//! Coefficients follow the RBJ cookbook. Low-pass, high-pass and all-pass
//! designs share the same bilinear pre-warping, so an LR4 low/high pair sums
//! exactly to the matching all-pass.

use std::f64::consts::PI;

/// Q of a Butterworth second-order section.
pub const BUTTERWORTH_Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Normalized coefficients (a0 = 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub b: [f64; 3],
    pub a: [f64; 2],
}

impl BiquadCoefficients {
    /// Pass-through section.
    pub const IDENTITY: Self = Self {
        b: [1.0, 0.0, 0.0],
        a: [0.0, 0.0],
    };

    fn prewarp(frequency: f64, q: f64, sample_rate: f64) -> (f64, f64) {
        let w0 = 2.0 * PI * frequency / sample_rate;
        let alpha = w0.sin() / (2.0 * q);
        (w0.cos(), alpha)
    }

    fn normalize(b: [f64; 3], a0: f64, a1: f64, a2: f64) -> Self {
        Self {
            b: [b[0] / a0, b[1] / a0, b[2] / a0],
            a: [a1 / a0, a2 / a0],
        }
    }

    pub fn low_pass(frequency: f64, q: f64, sample_rate: f64) -> Self {
        let (cos, alpha) = Self::prewarp(frequency, q, sample_rate);
        let b1 = 1.0 - cos;
        Self::normalize([b1 / 2.0, b1, b1 / 2.0], 1.0 + alpha, -2.0 * cos, 1.0 - alpha)
    }

    pub fn high_pass(frequency: f64, q: f64, sample_rate: f64) -> Self {
        let (cos, alpha) = Self::prewarp(frequency, q, sample_rate);
        let b0 = (1.0 + cos) / 2.0;
        Self::normalize([b0, -(1.0 + cos), b0], 1.0 + alpha, -2.0 * cos, 1.0 - alpha)
    }

    pub fn all_pass(frequency: f64, q: f64, sample_rate: f64) -> Self {
        let (cos, alpha) = Self::prewarp(frequency, q, sample_rate);
        Self::normalize(
            [1.0 - alpha, -2.0 * cos, 1.0 + alpha],
            1.0 + alpha,
            -2.0 * cos,
            1.0 - alpha,
        )
    }
}

/// One biquad section with its state.
#[derive(Debug, Clone)]
pub struct Biquad {
    coefficients: BiquadCoefficients,
    x: [f64; 2],
    y: [f64; 2],
}

impl Biquad {
    pub fn new(coefficients: BiquadCoefficients) -> Self {
        Self {
            coefficients,
            x: [0.0; 2],
            y: [0.0; 2],
        }
    }

    /// Replace the coefficients, keeping the state.
    pub fn set_coefficients(&mut self, coefficients: BiquadCoefficients) {
        self.coefficients = coefficients;
    }

    pub fn reset(&mut self) {
        self.x = [0.0; 2];
        self.y = [0.0; 2];
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &self.coefficients;
        let x0 = input as f64;
        let y0 = c.b[0] * x0 + c.b[1] * self.x[0] + c.b[2] * self.x[1]
            - c.a[0] * self.y[0]
            - c.a[1] * self.y[1];
        self.x = [x0, self.x[0]];
        self.y = [y0, self.y[0]];
        y0 as f32
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new(BiquadCoefficients::IDENTITY)
    }
}
