//! Common types shared by the engine and the binding layer.

use serde::{Deserialize, Serialize};

use crate::error::ExceptionCode;

// =============================================================================
// Limits
// =============================================================================

/// Maximum number of audio channels an effect instance accepts.
///
/// Matches the widest layouts the host can hand us (22.2, 9.1.6) with room
/// to spare. Wider configurations are rejected when the context is created.
pub const MAX_CHANNELS: usize = 32;

/// Maximum number of bands in any EQ or MBC stage.
pub const MAX_BANDS: usize = 32;

/// UUID type used for effect type and implementation identifiers.
pub type AudioUuid = uuid::Uuid;

// =============================================================================
// Audio Format
// =============================================================================

/// PCM sample encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PcmType {
    Uint8Bit,
    Int16Bit,
    Int32Bit,
    FixedQ824Bit,
    #[default]
    Float32Bit,
    Int24Bit,
}

/// Channel layout of an audio stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelLayout {
    /// Positional layout bit mask (front left, front right, ...).
    LayoutMask(u32),
    /// Index mask, one bit per channel with no positional meaning.
    IndexMask(u32),
}

impl ChannelLayout {
    /// Mono layout (front left).
    pub const MONO: Self = Self::LayoutMask(0x1);
    /// Stereo layout (front left + front right).
    pub const STEREO: Self = Self::LayoutMask(0x3);

    /// Number of channels described by the mask.
    pub const fn channel_count(&self) -> usize {
        match self {
            Self::LayoutMask(mask) | Self::IndexMask(mask) => mask.count_ones() as usize,
        }
    }
}

impl Default for ChannelLayout {
    fn default() -> Self {
        Self::STEREO
    }
}

/// Configuration of one direction (input or output) of the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz.
    pub sample_rate: i32,
    pub channel_layout: ChannelLayout,
    pub pcm: PcmType,
    /// Frames per buffer the host intends to exchange.
    pub frame_count: i64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            channel_layout: ChannelLayout::STEREO,
            pcm: PcmType::Float32Bit,
            frame_count: 960,
        }
    }
}

impl AudioConfig {
    /// Stereo float configuration at the given rate.
    pub fn stereo_float(sample_rate: i32, frame_count: i64) -> Self {
        Self {
            sample_rate,
            channel_layout: ChannelLayout::STEREO,
            pcm: PcmType::Float32Bit,
            frame_count,
        }
    }
}

/// Common parameters of an effect instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Common {
    pub session: i32,
    pub io_handle: i32,
    pub input: AudioConfig,
    pub output: AudioConfig,
}

impl Common {
    /// Common parameters with identical input and output configuration.
    pub fn symmetric(config: AudioConfig) -> Self {
        Self {
            session: 0,
            io_handle: 0,
            input: config.clone(),
            output: config,
        }
    }
}

/// Stereo volume applied by the host to effects with volume control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeStereo {
    pub left: f32,
    pub right: f32,
}

impl Default for VolumeStereo {
    fn default() -> Self {
        Self { left: 1.0, right: 1.0 }
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Lifecycle state of an effect instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum State {
    /// Created, not opened. No context exists.
    #[default]
    Init,
    /// Opened, not processing.
    Idle,
    /// Processing audio.
    Processing,
}

/// Commands the host sends to an opened effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandId {
    Start,
    Stop,
    Reset,
    /// Vendor-extendable command range.
    Vendor(i32),
}

impl CommandId {
    /// Decode a raw command value (0 = start, 1 = stop, 2 = reset).
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::Start,
            1 => Self::Stop,
            2 => Self::Reset,
            other => Self::Vendor(other),
        }
    }
}

/// Result of one process call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EffectStatus {
    pub status: ExceptionCode,
    /// Input samples consumed.
    pub consumed: usize,
    /// Output samples produced.
    pub produced: usize,
}

impl EffectStatus {
    /// A failed status with nothing consumed or produced.
    pub const fn error(status: ExceptionCode) -> Self {
        Self {
            status,
            consumed: 0,
            produced: 0,
        }
    }

    /// A successful status for `samples` samples in and out.
    pub const fn ok(samples: usize) -> Self {
        Self {
            status: ExceptionCode::None,
            consumed: samples,
            produced: samples,
        }
    }
}
