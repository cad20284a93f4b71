//! Dynamics processing parameter types.
//!
//! The effect is configured through one tagged union, [`DynamicsProcessing`].
//! Each variant carries one aspect of the configuration: the engine
//! architecture, stage enablement per channel, per-band settings, the
//! limiter, or the input gain. Getting a value is addressed by a
//! [`DynamicsTag`] wrapped in a [`DynamicsId`].
//!
//! # Signal flow
//!
//! ```text
//! input gain -> pre-EQ -> MBC -> post-EQ -> limiter
//! ```
//!
//! Which stages exist, and how many bands each has, is fixed by the
//! [`EngineArchitecture`]. Changing the architecture rebuilds the engine.

use serde::{Deserialize, Serialize};

// =============================================================================
// Engine Architecture
// =============================================================================

/// Preferred trade-off of the processing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResolutionPreference {
    #[default]
    FavorFrequencyResolution,
    FavorTimeResolution,
}

/// Whether a stage exists and how many bands it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StageEnablement {
    pub in_use: bool,
    pub band_count: i32,
}

impl StageEnablement {
    /// A stage in use with `band_count` bands.
    pub const fn with_bands(band_count: i32) -> Self {
        Self {
            in_use: true,
            band_count,
        }
    }

    /// Band count when in use, 0 otherwise.
    pub fn active_bands(&self) -> usize {
        if self.in_use {
            self.band_count.max(0) as usize
        } else {
            0
        }
    }
}

/// Structure of the processing chain.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineArchitecture {
    pub resolution_preference: ResolutionPreference,
    /// Preferred block duration in milliseconds; 0 lets the engine choose.
    pub preferred_processing_duration_ms: f32,
    pub pre_eq_stage: StageEnablement,
    pub post_eq_stage: StageEnablement,
    pub mbc_stage: StageEnablement,
    pub limiter_in_use: bool,
}

impl EngineArchitecture {
    /// Enablement of the given stage.
    pub fn stage(&self, stage: Stage) -> StageEnablement {
        match stage {
            Stage::PreEq => self.pre_eq_stage,
            Stage::PostEq => self.post_eq_stage,
            Stage::Mbc => self.mbc_stage,
            Stage::Limiter => StageEnablement {
                in_use: self.limiter_in_use,
                band_count: 0,
            },
        }
    }
}

/// Processing stages with per-channel enablement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    PreEq,
    Mbc,
    PostEq,
    Limiter,
}

impl Stage {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PreEq => "preEq",
            Self::Mbc => "mbc",
            Self::PostEq => "postEq",
            Self::Limiter => "limiter",
        }
    }
}

/// The two EQ stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EqStage {
    Pre,
    Post,
}

impl EqStage {
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Pre => Stage::PreEq,
            Self::Post => Stage::PostEq,
        }
    }
}

// =============================================================================
// Stage Configuration Records
// =============================================================================

/// Per-channel enable switch for a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub channel: i32,
    pub enable: bool,
}

/// One band of the pre- or post-EQ.
///
/// `cutoff_frequency_hz` is the upper edge of the band. The last band of a
/// channel always extends to Nyquist.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EqBandConfig {
    pub channel: i32,
    pub band: i32,
    pub enable: bool,
    pub cutoff_frequency_hz: f32,
    pub gain_db: f32,
}

/// One band of the multi-band compressor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MbcBandConfig {
    pub channel: i32,
    pub band: i32,
    pub enable: bool,
    pub cutoff_frequency_hz: f32,
    pub attack_time_ms: f32,
    pub release_time_ms: f32,
    pub ratio: f32,
    pub threshold_db: f32,
    pub knee_width_db: f32,
    pub noise_gate_threshold_db: f32,
    pub expander_ratio: f32,
    pub pre_gain_db: f32,
    pub post_gain_db: f32,
}

impl Default for MbcBandConfig {
    fn default() -> Self {
        Self {
            channel: 0,
            band: 0,
            enable: true,
            cutoff_frequency_hz: 0.0,
            attack_time_ms: 3.0,
            release_time_ms: 80.0,
            ratio: 1.0,
            threshold_db: -45.0,
            knee_width_db: 0.0,
            noise_gate_threshold_db: -90.0,
            expander_ratio: 1.0,
            pre_gain_db: 0.0,
            post_gain_db: 0.0,
        }
    }
}

/// Limiter settings for one channel.
///
/// Channels sharing a `link_group` share one level detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimiterConfig {
    pub channel: i32,
    pub enable: bool,
    pub link_group: i32,
    pub attack_time_ms: f32,
    pub release_time_ms: f32,
    pub ratio: f32,
    pub threshold_db: f32,
    pub post_gain_db: f32,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            channel: 0,
            enable: true,
            link_group: 0,
            attack_time_ms: 1.0,
            release_time_ms: 60.0,
            ratio: 10.0,
            threshold_db: -2.0,
            post_gain_db: 0.0,
        }
    }
}

/// Input gain for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InputGain {
    pub channel: i32,
    pub gain_db: f32,
}

/// Opaque vendor payload. Always rejected by this implementation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VendorExtension {
    pub data: Vec<u8>,
}

/// Capability advertised in the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicsCapability {
    pub min_cutoff_freq: f32,
    pub max_cutoff_freq: f32,
}

// =============================================================================
// Tagged Union
// =============================================================================

/// Dynamics processing parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DynamicsProcessing {
    VendorExtension(VendorExtension),
    EngineArchitecture(EngineArchitecture),
    PreEq(Vec<ChannelConfig>),
    PostEq(Vec<ChannelConfig>),
    PreEqBand(Vec<EqBandConfig>),
    PostEqBand(Vec<EqBandConfig>),
    Mbc(Vec<ChannelConfig>),
    MbcBand(Vec<MbcBandConfig>),
    Limiter(Vec<LimiterConfig>),
    InputGain(Vec<InputGain>),
}

/// Discriminant of [`DynamicsProcessing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DynamicsTag {
    VendorExtension,
    EngineArchitecture,
    PreEq,
    PostEq,
    PreEqBand,
    PostEqBand,
    Mbc,
    MbcBand,
    Limiter,
    InputGain,
}

impl DynamicsTag {
    /// Every tag, in declaration order.
    pub const ALL: [DynamicsTag; 10] = [
        Self::VendorExtension,
        Self::EngineArchitecture,
        Self::PreEq,
        Self::PostEq,
        Self::PreEqBand,
        Self::PostEqBand,
        Self::Mbc,
        Self::MbcBand,
        Self::Limiter,
        Self::InputGain,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::VendorExtension => "vendorExtension",
            Self::EngineArchitecture => "engineArchitecture",
            Self::PreEq => "preEq",
            Self::PostEq => "postEq",
            Self::PreEqBand => "preEqBand",
            Self::PostEqBand => "postEqBand",
            Self::Mbc => "mbc",
            Self::MbcBand => "mbcBand",
            Self::Limiter => "limiter",
            Self::InputGain => "inputGain",
        }
    }
}

impl std::fmt::Display for DynamicsTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl DynamicsProcessing {
    /// The tag of this value.
    pub fn tag(&self) -> DynamicsTag {
        match self {
            Self::VendorExtension(_) => DynamicsTag::VendorExtension,
            Self::EngineArchitecture(_) => DynamicsTag::EngineArchitecture,
            Self::PreEq(_) => DynamicsTag::PreEq,
            Self::PostEq(_) => DynamicsTag::PostEq,
            Self::PreEqBand(_) => DynamicsTag::PreEqBand,
            Self::PostEqBand(_) => DynamicsTag::PostEqBand,
            Self::Mbc(_) => DynamicsTag::Mbc,
            Self::MbcBand(_) => DynamicsTag::MbcBand,
            Self::Limiter(_) => DynamicsTag::Limiter,
            Self::InputGain(_) => DynamicsTag::InputGain,
        }
    }
}

/// Identifier used to get a dynamics parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DynamicsId {
    VendorExtensionTag(VendorExtension),
    CommonTag(DynamicsTag),
}

impl DynamicsId {
    pub const fn common(tag: DynamicsTag) -> Self {
        Self::CommonTag(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_matches_variant() {
        let arch = DynamicsProcessing::EngineArchitecture(EngineArchitecture::default());
        assert_eq!(arch.tag(), DynamicsTag::EngineArchitecture);

        let gains = DynamicsProcessing::InputGain(vec![InputGain {
            channel: 0,
            gain_db: -3.0,
        }]);
        assert_eq!(gains.tag(), DynamicsTag::InputGain);
        assert_eq!(gains.tag().to_string(), "inputGain");
    }

    #[test]
    fn test_default_architecture_has_no_stages() {
        let arch = EngineArchitecture::default();
        assert_eq!(
            arch.resolution_preference,
            ResolutionPreference::FavorFrequencyResolution
        );
        assert_eq!(arch.preferred_processing_duration_ms, 0.0);
        assert!(!arch.pre_eq_stage.in_use);
        assert!(!arch.mbc_stage.in_use);
        assert!(!arch.limiter_in_use);
        assert_eq!(arch.stage(Stage::Mbc).active_bands(), 0);
    }

    #[test]
    fn test_active_bands_ignores_unused_stage() {
        let stage = StageEnablement {
            in_use: false,
            band_count: 4,
        };
        assert_eq!(stage.active_bands(), 0);
        assert_eq!(StageEnablement::with_bands(4).active_bands(), 4);
    }

    #[test]
    fn test_serde_keeps_variant() {
        let value = DynamicsProcessing::Limiter(vec![LimiterConfig::default()]);
        let json = serde_json::to_string(&value).unwrap();
        let back: DynamicsProcessing = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
