//! The DSP engine seam.
//!
//! The binding layer never touches samples itself. It validates parameters,
//! keeps the authoritative copy of the configuration, and forwards every
//! accepted change to a [`DynamicsEngine`]. Processing is likewise a single
//! forwarded call.
//!
//! # Lifecycle
//!
//! ```text
//! new engine -> configure(setup) -> set_* ... -> process ... -> reset
//!                    ^                                            |
//!                    +---------- architecture / format change ----+
//! ```
//!
//! After `configure` the engine must hold default settings for every stage
//! the architecture enables; the context replays the configuration it holds
//! right after.
//!
//! # Real-Time Safety
//!
//! `process` runs on the audio thread. Implementations allocate in
//! `configure` only and accept any buffer length.

use crate::dynamics::{
    EngineArchitecture, EqBandConfig, EqStage, LimiterConfig, MbcBandConfig, Stage,
};

/// Everything an engine needs to (re)build its processing chain.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSetup {
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Number of interleaved channels.
    pub channel_count: usize,
    pub architecture: EngineArchitecture,
}

/// A multi-band dynamics processing engine.
///
/// Channel and band indices passed in are already validated against the
/// current setup.
pub trait DynamicsEngine: Send {
    /// Rebuild the processing chain.
    fn configure(&mut self, setup: &EngineSetup);

    /// Enable or disable a stage on one channel.
    fn set_stage_enabled(&mut self, stage: Stage, channel: usize, enabled: bool);

    /// Apply one EQ band.
    fn set_eq_band(&mut self, stage: EqStage, config: &EqBandConfig);

    /// Apply one MBC band.
    fn set_mbc_band(&mut self, config: &MbcBandConfig);

    /// Apply the limiter settings of one channel.
    fn set_limiter(&mut self, config: &LimiterConfig);

    /// Set the input gain of one channel.
    fn set_input_gain(&mut self, channel: usize, gain_db: f32);

    /// Clear all signal history (filters, envelopes, smoothing).
    fn reset(&mut self);

    /// Process interleaved samples.
    ///
    /// `input` and `output` hold the same number of samples. Returns the
    /// number of samples processed, which is the largest multiple of the
    /// channel count that fits.
    fn process(&mut self, input: &[f32], output: &mut [f32]) -> usize;
}
