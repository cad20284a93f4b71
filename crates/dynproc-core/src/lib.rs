//! # dynproc-core
//!
//! Core abstractions for the dynproc multi-band dynamics processing effect.
//!
//! This crate is format-agnostic: it defines the parameter unions the host
//! exchanges with the effect, the descriptor, the error model, and the
//! [`DynamicsEngine`] trait behind which sample processing happens.
//!
//! ## Main Traits
//!
//! - [`DynamicsEngine`] - The DSP engine seam
//!
//! ## Types
//!
//! - [`DynamicsProcessing`] - Tagged union of all dynamics parameters
//! - [`Parameter`] / [`ParameterId`] - Host-facing parameter union and id
//! - [`Descriptor`] - Effect identity and capability
//! - [`EffectConfig`] - Static metadata the descriptor is built from
//! - [`Common`] - Stream configuration
//! - [`EffectError`] - Error types

pub mod config;
pub mod descriptor;
pub mod dynamics;
pub mod engine;
pub mod error;
pub mod parameter;
pub mod ranges;
pub mod types;

// Re-exports for convenience
pub use config::EffectConfig;
pub use descriptor::{
    Capability, Descriptor, DescriptorCommon, EffectId, FlagType, Flags, Insert, Volume,
};
pub use dynamics::{
    ChannelConfig, DynamicsCapability, DynamicsId, DynamicsProcessing, DynamicsTag,
    EngineArchitecture, EqBandConfig, EqStage, InputGain, LimiterConfig, MbcBandConfig,
    ResolutionPreference, Stage, StageEnablement, VendorExtension,
};
pub use engine::{DynamicsEngine, EngineSetup};
pub use error::{EffectError, EffectResult, ExceptionCode};
pub use parameter::{CommonTag, Parameter, ParameterId, Specific};
pub use types::{
    AudioConfig, AudioUuid, ChannelLayout, CommandId, Common, EffectStatus, PcmType, State,
    VolumeStereo, MAX_BANDS, MAX_CHANNELS,
};
