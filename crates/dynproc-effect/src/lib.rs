//! # dynproc-effect
//!
//! Binding layer that exposes the dynamics processing effect to a host.
//!
//! The host finds the effect by UUID through the [`factory`], drives each
//! instance through the [`Effect`] interface (or the C ABI in [`ffi`]), and
//! configures it with the tagged [`DynamicsProcessing`](dynproc_core::DynamicsProcessing)
//! union. Sample processing is forwarded to a
//! [`DynamicsEngine`](dynproc_core::DynamicsEngine).
//!
//! ```ignore
//! use dynproc_effect::{create_effect, DYNAMICS_PROCESSING_IMPL_UUID};
//!
//! let effect = create_effect(Some(&DYNAMICS_PROCESSING_IMPL_UUID))?;
//! effect.open(&common, None)?;
//! effect.command(CommandId::Start)?;
//! let status = effect.process(&input, &mut output);
//! ```

pub mod context;
pub mod descriptor;
pub mod effect;
pub mod factory;
pub mod ffi;
pub mod lifecycle;

pub use context::{native_engine, DynamicsProcessingContext, DynamicsSettings, EngineFactory};
pub use descriptor::{
    descriptor, CAPABILITY, CONFIG, DYNAMICS_PROCESSING_IMPL_UUID, DYNAMICS_PROCESSING_TYPE_UUID,
    EFFECT_NAME,
};
pub use effect::{DynamicsProcessingImpl, Effect};
pub use factory::{create_effect, create_effect_with_engine, query_effect};
pub use lifecycle::Lifecycle;
