//! # dynproc
//!
//! Multi-band dynamics processing effect for Rust.
//!
//! dynproc exposes an input-gain, EQ, multi-band compressor and limiter
//! chain to a host audio framework, either as a Rust [`Effect`](prelude::Effect)
//! or through a C ABI.
//!
//! ## Architecture
//!
//! ```text
//! Host (Rust caller or C loader)
//!        ↓
//! DynamicsProcessingImpl (lifecycle, parameter dispatch)
//!        ↓
//! DynamicsProcessingContext (validation, cached settings)
//!        ↓
//! DynamicsEngine (DpEngine: time-domain DSP)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dynproc::prelude::*;
//!
//! let effect = create_effect(Some(&DYNAMICS_PROCESSING_IMPL_UUID))?;
//! effect.open(&Common::symmetric(AudioConfig::stereo_float(48000, 960)), None)?;
//!
//! let arch = EngineArchitecture {
//!     mbc_stage: StageEnablement::with_bands(3),
//!     limiter_in_use: true,
//!     ..Default::default()
//! };
//! effect.set_parameter(&Parameter::Specific(Specific::DynamicsProcessing(
//!     DynamicsProcessing::EngineArchitecture(arch),
//! )))?;
//!
//! effect.command(CommandId::Start)?;
//! let status = effect.process(&input, &mut output);
//! ```

// Re-export sub-crates
pub use dynproc_core as core;
pub use dynproc_dsp as dsp;
pub use dynproc_effect as effect;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use dynproc::prelude::*;
/// ```
pub mod prelude {
    pub use dynproc_core::{
        // Stream configuration
        AudioConfig, ChannelLayout, Common, PcmType, VolumeStereo,
        // Lifecycle
        CommandId, EffectStatus, State,
        // Parameter unions
        DynamicsId, DynamicsProcessing, DynamicsTag, Parameter, ParameterId, Specific,
        // Dynamics records
        ChannelConfig, EngineArchitecture, EqBandConfig, InputGain, LimiterConfig,
        MbcBandConfig, ResolutionPreference, StageEnablement,
        // Descriptor
        Descriptor, DynamicsCapability,
        // Engine seam
        DynamicsEngine, EngineSetup,
        // Error types
        EffectError, EffectResult, ExceptionCode,
    };

    pub use dynproc_dsp::DpEngine;

    pub use dynproc_effect::{
        create_effect, query_effect, DynamicsProcessingImpl, Effect,
        DYNAMICS_PROCESSING_IMPL_UUID, DYNAMICS_PROCESSING_TYPE_UUID,
    };
}
