//! Range validation for dynamics parameters.
//!
//! These checks depend only on the values themselves and on the advertised
//! [`DynamicsCapability`]. Checks that need instance state (channel count,
//! stage enablement, band count) live in the effect context.

use crate::dynamics::{
    DynamicsCapability, EngineArchitecture, EqBandConfig, InputGain, LimiterConfig, MbcBandConfig,
    StageEnablement,
};
use crate::error::{EffectError, EffectResult};
use crate::types::MAX_BANDS;

/// Lowest accepted threshold in dB.
pub const MIN_THRESHOLD_DB: f32 = -200.0;

/// Highest accepted threshold in dB.
pub const MAX_THRESHOLD_DB: f32 = 0.0;

/// Accepted gain range in dB (input gain, band gains, pre/post gains).
pub const MIN_GAIN_DB: f32 = -200.0;
pub const MAX_GAIN_DB: f32 = 200.0;

fn check(ok: bool, what: impl FnOnce() -> String) -> EffectResult<()> {
    if ok {
        Ok(())
    } else {
        Err(EffectError::IllegalArgument(what()))
    }
}

fn check_range(name: &str, value: f32, min: f32, max: f32) -> EffectResult<()> {
    check(value.is_finite() && value >= min && value <= max, || {
        format!("{name} {value} outside [{min}, {max}]")
    })
}

fn check_at_least(name: &str, value: f32, min: f32) -> EffectResult<()> {
    check(value.is_finite() && value >= min, || {
        format!("{name} {value} below {min}")
    })
}

fn check_stage(name: &str, stage: &StageEnablement) -> EffectResult<()> {
    check(
        stage.band_count >= 0 && stage.band_count as usize <= MAX_BANDS,
        || format!("{name} band count {} outside [0, {MAX_BANDS}]", stage.band_count),
    )?;
    check(!stage.in_use || stage.band_count > 0, || {
        format!("{name} in use with no bands")
    })
}

/// Validate an engine architecture.
pub fn validate_engine_architecture(arch: &EngineArchitecture) -> EffectResult<()> {
    check_at_least(
        "preferredProcessingDurationMs",
        arch.preferred_processing_duration_ms,
        0.0,
    )?;
    check_stage("preEqStage", &arch.pre_eq_stage)?;
    check_stage("postEqStage", &arch.post_eq_stage)?;
    check_stage("mbcStage", &arch.mbc_stage)
}

/// Check that cutoffs of bands belonging to the same channel increase with
/// the band index. Entries are `(channel, band, cutoff_hz)` in any order; a
/// band listed twice for one channel is rejected.
pub fn validate_cutoff_order(
    bands: impl IntoIterator<Item = (i32, i32, f32)>,
) -> EffectResult<()> {
    let mut bands: Vec<_> = bands.into_iter().collect();
    bands.sort_by_key(|&(channel, band, _)| (channel, band));
    for pair in bands.windows(2) {
        let (ch_a, band_a, cut_a) = pair[0];
        let (ch_b, band_b, cut_b) = pair[1];
        if ch_a == ch_b {
            check(band_a != band_b, || {
                format!("duplicated band {band_a} on channel {ch_a}")
            })?;
            check(cut_b > cut_a, || {
                format!(
                    "channel {ch_a} cutoff of band {band_b} ({cut_b} Hz) \
                     not above band {band_a} ({cut_a} Hz)"
                )
            })?;
        }
    }
    Ok(())
}

fn check_cutoff(cap: &DynamicsCapability, value: f32) -> EffectResult<()> {
    check_range(
        "cutoffFrequencyHz",
        value,
        cap.min_cutoff_freq,
        cap.max_cutoff_freq,
    )
}

/// Validate EQ band settings.
pub fn validate_eq_bands(
    bands: &[EqBandConfig],
    cap: &DynamicsCapability,
) -> EffectResult<()> {
    for band in bands {
        check(band.band >= 0, || format!("negative band index {}", band.band))?;
        check_cutoff(cap, band.cutoff_frequency_hz)?;
        check_range("gainDb", band.gain_db, MIN_GAIN_DB, MAX_GAIN_DB)?;
    }
    validate_cutoff_order(
        bands
            .iter()
            .map(|b| (b.channel, b.band, b.cutoff_frequency_hz)),
    )
}

/// Validate MBC band settings.
pub fn validate_mbc_bands(
    bands: &[MbcBandConfig],
    cap: &DynamicsCapability,
) -> EffectResult<()> {
    for band in bands {
        check(band.band >= 0, || format!("negative band index {}", band.band))?;
        check_cutoff(cap, band.cutoff_frequency_hz)?;
        check_at_least("attackTimeMs", band.attack_time_ms, 0.0)?;
        check_at_least("releaseTimeMs", band.release_time_ms, 0.0)?;
        check_at_least("ratio", band.ratio, 1.0)?;
        check_range(
            "thresholdDb",
            band.threshold_db,
            MIN_THRESHOLD_DB,
            MAX_THRESHOLD_DB,
        )?;
        check_at_least("kneeWidthDb", band.knee_width_db, 0.0)?;
        check_range(
            "noiseGateThresholdDb",
            band.noise_gate_threshold_db,
            MIN_THRESHOLD_DB,
            MAX_THRESHOLD_DB,
        )?;
        check_at_least("expanderRatio", band.expander_ratio, 1.0)?;
        check_range("preGainDb", band.pre_gain_db, MIN_GAIN_DB, MAX_GAIN_DB)?;
        check_range("postGainDb", band.post_gain_db, MIN_GAIN_DB, MAX_GAIN_DB)?;
    }
    validate_cutoff_order(
        bands
            .iter()
            .map(|b| (b.channel, b.band, b.cutoff_frequency_hz)),
    )
}

/// Validate limiter settings.
pub fn validate_limiters(limiters: &[LimiterConfig]) -> EffectResult<()> {
    for limiter in limiters {
        check_at_least("attackTimeMs", limiter.attack_time_ms, 0.0)?;
        check_at_least("releaseTimeMs", limiter.release_time_ms, 0.0)?;
        check_at_least("ratio", limiter.ratio, 1.0)?;
        check_range(
            "thresholdDb",
            limiter.threshold_db,
            MIN_THRESHOLD_DB,
            MAX_THRESHOLD_DB,
        )?;
        check_range("postGainDb", limiter.post_gain_db, MIN_GAIN_DB, MAX_GAIN_DB)?;
    }
    Ok(())
}

/// Validate input gains.
pub fn validate_input_gains(gains: &[InputGain]) -> EffectResult<()> {
    for gain in gains {
        check_range("gainDb", gain.gain_db, MIN_GAIN_DB, MAX_GAIN_DB)?;
    }
    Ok(())
}
