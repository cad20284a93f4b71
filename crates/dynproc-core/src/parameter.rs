//! Top-level parameter union exchanged with the host.
//!
//! The host sets [`Parameter`] values and gets them back by [`ParameterId`].
//! Common parameters are handled by every effect; [`Specific`] carries the
//! payload of one particular effect type.

use serde::{Deserialize, Serialize};

use crate::dynamics::{DynamicsId, DynamicsProcessing, VendorExtension};
use crate::types::{Common, VolumeStereo};

/// Effect-specific parameter payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Specific {
    DynamicsProcessing(DynamicsProcessing),
    /// Payload of a vendor effect type.
    VendorEffect(VendorExtension),
}

impl Specific {
    /// Name of the variant, used in log and error messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DynamicsProcessing(_) => "dynamicsProcessing",
            Self::VendorEffect(_) => "vendorEffect",
        }
    }
}

/// A settable parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Parameter {
    Common(Common),
    VolumeStereo(VolumeStereo),
    Specific(Specific),
}

/// Tags of the common parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommonTag {
    Common,
    VolumeStereo,
}

/// Identifier used to get a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterId {
    CommonTag(CommonTag),
    VendorEffectTag(VendorExtension),
    DynamicsProcessingTag(DynamicsId),
}

impl ParameterId {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CommonTag(_) => "commonTag",
            Self::VendorEffectTag(_) => "vendorEffectTag",
            Self::DynamicsProcessingTag(_) => "dynamicsProcessingTag",
        }
    }
}
