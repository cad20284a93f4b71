//! Identity of the dynamics processing implementation.

use dynproc_core::{
    AudioUuid, Descriptor, DynamicsCapability, EffectConfig, FlagType, Insert, Volume,
};

/// Effect type UUID shared by every dynamics processing implementation.
pub const DYNAMICS_PROCESSING_TYPE_UUID: AudioUuid =
    AudioUuid::from_u128(0x7261676f_6d75_7369_6364_28e2fd3ac39e);

/// UUID of this implementation.
pub const DYNAMICS_PROCESSING_IMPL_UUID: AudioUuid =
    AudioUuid::from_u128(0xe0e6539b_1781_7261_676f_6d7573696340);

pub const EFFECT_NAME: &str = "DynamicsProcessing";

/// Capability advertised to the host.
pub const CAPABILITY: DynamicsCapability = DynamicsCapability {
    min_cutoff_freq: 220.0,
    max_cutoff_freq: 20000.0,
};

/// Static configuration the descriptor is built from.
pub static CONFIG: EffectConfig = EffectConfig::new(
    EFFECT_NAME,
    DYNAMICS_PROCESSING_TYPE_UUID,
    DYNAMICS_PROCESSING_IMPL_UUID,
)
.with_implementor("The Android Open Source Project")
.with_flags(FlagType::Insert, Insert::Last, Volume::Ctrl)
.with_cutoff_range(CAPABILITY.min_cutoff_freq, CAPABILITY.max_cutoff_freq);

/// The descriptor returned by `query_effect` and `get_descriptor`.
pub fn descriptor() -> Descriptor {
    CONFIG.descriptor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_identity() {
        let d = descriptor();
        assert_eq!(d.common.name, "DynamicsProcessing");
        assert_eq!(
            d.common.id.type_uuid.to_string(),
            "7261676f-6d75-7369-6364-28e2fd3ac39e"
        );
        assert_eq!(
            d.common.id.uuid.to_string(),
            "e0e6539b-1781-7261-676f-6d7573696340"
        );
        assert_eq!(d.common.id.proxy, None);
        assert_eq!(d.common.flags.insert, Insert::Last);
        assert_eq!(d.common.flags.volume, Volume::Ctrl);
    }

    #[test]
    fn test_capability_range() {
        let cap = *descriptor().dynamics_capability();
        assert_eq!(cap.min_cutoff_freq, 220.0);
        assert_eq!(cap.max_cutoff_freq, 20000.0);
        assert_eq!(CAPABILITY, cap);
    }
}
