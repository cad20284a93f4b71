//! Level conversion and envelope helpers.

/// Floor used when converting silence to dB.
pub const SILENCE_DB: f32 = -200.0;

/// DC offset to prevent denormals in envelope followers.
pub const DC_OFFSET: f32 = 1e-25;

/// Convert linear amplitude to dB with floor.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        SILENCE_DB
    } else {
        (20.0 * linear.log10()).max(SILENCE_DB)
    }
}

/// Convert dB to linear amplitude.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert time in milliseconds to one-pole filter coefficient.
///
/// After `time_ms` the follower reaches ~63% of a step.
#[inline]
pub fn time_to_coeff(time_ms: f32, sample_rate: f64) -> f32 {
    if time_ms <= 0.0 || sample_rate <= 0.0 {
        1.0
    } else {
        (1.0 - (-1.0 / (time_ms as f64 * 0.001 * sample_rate)).exp()) as f32
    }
}

/// One step of an attack/release follower.
///
/// Uses `attack_coeff` while `target` is below `current` (gain falling,
/// i.e. more reduction), `release_coeff` otherwise.
#[inline]
pub fn follow_gain(current: f32, target: f32, attack_coeff: f32, release_coeff: f32) -> f32 {
    let coeff = if target < current {
        attack_coeff
    } else {
        release_coeff
    };
    current + coeff * (target - current)
}
