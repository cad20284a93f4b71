//! Effect descriptor returned to the host.

use serde::{Deserialize, Serialize};

use crate::dynamics::DynamicsCapability;
use crate::types::AudioUuid;

/// Where the effect can be placed in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlagType {
    #[default]
    Insert,
    Auxiliary,
    Replace,
    Preprocessing,
    Postprocessing,
}

/// Position preference within an insert chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Insert {
    #[default]
    Any,
    First,
    Last,
    Exclusive,
}

/// How the effect interacts with volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Volume {
    #[default]
    None,
    /// Effect receives stereo volume through the common parameters.
    Ctrl,
    Ind,
    Monitor,
}

/// Descriptor flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Flags {
    pub kind: FlagType,
    pub insert: Insert,
    pub volume: Volume,
}

/// Identity of an effect implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectId {
    /// The effect type (shared by all dynamics processing implementations).
    pub type_uuid: AudioUuid,
    /// This implementation.
    pub uuid: AudioUuid,
    /// Proxy implementation, if any.
    pub proxy: Option<AudioUuid>,
}

/// Descriptor fields common to every effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorCommon {
    pub id: EffectId,
    pub flags: Flags,
    pub name: String,
    pub implementor: String,
}

/// Effect-specific capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Capability {
    DynamicsProcessing(DynamicsCapability),
}

/// Full effect descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub common: DescriptorCommon,
    pub capability: Capability,
}

impl Descriptor {
    /// Dynamics capability carried by this descriptor.
    pub fn dynamics_capability(&self) -> &DynamicsCapability {
        match &self.capability {
            Capability::DynamicsProcessing(cap) => cap,
        }
    }
}
