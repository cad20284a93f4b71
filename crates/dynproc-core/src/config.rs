//! Static effect configuration.
//!
//! [`EffectConfig`] holds the metadata an implementation registers with the
//! host: identity, placement flags, display strings and the cutoff range it
//! supports. The binding layer turns it into a [`Descriptor`] on demand.
//!
//! # Example
//!
//! ```ignore
//! use dynproc_core::EffectConfig;
//!
//! pub static CONFIG: EffectConfig = EffectConfig::new("DynamicsProcessing", TYPE_UUID, IMPL_UUID)
//!     .with_implementor("My Company")
//!     .with_cutoff_range(220.0, 20000.0);
//! ```

use crate::descriptor::{
    Capability, Descriptor, DescriptorCommon, EffectId, FlagType, Flags, Insert, Volume,
};
use crate::dynamics::DynamicsCapability;
use crate::types::AudioUuid;

/// Static effect configuration.
#[derive(Debug, Clone)]
pub struct EffectConfig {
    /// Effect name reported in the descriptor.
    pub name: &'static str,

    /// Implementor string reported in the descriptor.
    pub implementor: &'static str,

    /// Effect type UUID.
    pub type_uuid: AudioUuid,

    /// Implementation UUID the factory answers to.
    pub impl_uuid: AudioUuid,

    /// Placement and volume flags.
    pub flags: Flags,

    /// Lowest supported band cutoff in Hz.
    pub min_cutoff_freq: f32,

    /// Highest supported band cutoff in Hz.
    pub max_cutoff_freq: f32,
}

impl EffectConfig {
    /// Create a configuration with default flags and cutoff range.
    pub const fn new(name: &'static str, type_uuid: AudioUuid, impl_uuid: AudioUuid) -> Self {
        Self {
            name,
            implementor: "Unknown Implementor",
            type_uuid,
            impl_uuid,
            flags: Flags {
                kind: FlagType::Insert,
                insert: Insert::Any,
                volume: Volume::None,
            },
            min_cutoff_freq: 20.0,
            max_cutoff_freq: 20000.0,
        }
    }

    /// Set the implementor string.
    pub const fn with_implementor(mut self, implementor: &'static str) -> Self {
        self.implementor = implementor;
        self
    }

    /// Set the descriptor flags.
    pub const fn with_flags(mut self, kind: FlagType, insert: Insert, volume: Volume) -> Self {
        self.flags = Flags {
            kind,
            insert,
            volume,
        };
        self
    }

    /// Set the supported cutoff range.
    pub const fn with_cutoff_range(mut self, min_hz: f32, max_hz: f32) -> Self {
        self.min_cutoff_freq = min_hz;
        self.max_cutoff_freq = max_hz;
        self
    }

    /// Capability advertised to the host.
    pub const fn capability(&self) -> DynamicsCapability {
        DynamicsCapability {
            min_cutoff_freq: self.min_cutoff_freq,
            max_cutoff_freq: self.max_cutoff_freq,
        }
    }

    /// Build the descriptor.
    pub fn descriptor(&self) -> Descriptor {
        Descriptor {
            common: DescriptorCommon {
                id: EffectId {
                    type_uuid: self.type_uuid,
                    uuid: self.impl_uuid,
                    proxy: None,
                },
                flags: self.flags,
                name: self.name.to_string(),
                implementor: self.implementor.to_string(),
            },
            capability: Capability::DynamicsProcessing(self.capability()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TYPE: AudioUuid = AudioUuid::from_u128(0x1111_2222_3333_4444_5555_6666_7777_8888);
    const IMPL: AudioUuid = AudioUuid::from_u128(0x8888_7777_6666_5555_4444_3333_2222_1111);

    #[test]
    fn test_descriptor_from_config() {
        static CONFIG: EffectConfig = EffectConfig::new("Test", TYPE, IMPL)
            .with_implementor("Tester")
            .with_flags(FlagType::Insert, Insert::Last, Volume::Ctrl)
            .with_cutoff_range(220.0, 20000.0);

        let desc = CONFIG.descriptor();
        assert_eq!(desc.common.id.type_uuid, TYPE);
        assert_eq!(desc.common.id.uuid, IMPL);
        assert_eq!(desc.common.id.proxy, None);
        assert_eq!(desc.common.name, "Test");
        assert_eq!(desc.common.implementor, "Tester");
        assert_eq!(desc.common.flags.insert, Insert::Last);
        assert_eq!(desc.common.flags.volume, Volume::Ctrl);
        assert_eq!(desc.dynamics_capability().min_cutoff_freq, 220.0);
        assert_eq!(desc.dynamics_capability().max_cutoff_freq, 20000.0);
    }
}
