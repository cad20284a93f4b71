//! # dynproc-dsp
//!
//! Time-domain DSP for the dynproc effect.
//!
//! [`DpEngine`] implements [`dynproc_core::DynamicsEngine`] with one chain
//! per channel:
//!
//! ```text
//! input gain -> pre-EQ -> MBC -> post-EQ -> limiter
//! ```
//!
//! Band splitting uses Linkwitz-Riley crossovers with all-pass phase
//! compensation, so a chain with neutral settings sums back to the input.
//!
//! ## Building blocks
//!
//! - [`Crossover`] - N-band LR4 splitter
//! - [`BandEq`] - Per-band gain on top of a crossover
//! - [`BandCompressor`] / [`MultibandCompressor`] - Soft-knee compression with expander
//! - [`Limiter`] - Link-group aware output limiter
//! - [`GainRamp`] - Click-free gain changes

pub mod biquad;
pub mod channel;
pub mod compressor;
pub mod crossover;
pub mod engine;
pub mod eq;
pub mod limiter;
pub mod mbc;
pub mod smoothing;
pub mod util;

pub use biquad::{Biquad, BiquadCoefficients};
pub use channel::ChannelChain;
pub use compressor::{static_gain_db, BandCompressor};
pub use crossover::{default_cutoffs, Crossover};
pub use engine::DpEngine;
pub use eq::BandEq;
pub use limiter::Limiter;
pub use mbc::MultibandCompressor;
pub use smoothing::GainRamp;
pub use util::{db_to_linear, linear_to_db};
