//! UUID-based effect factory.
//!
//! The host loads the library and asks for effects by implementation UUID.
//! Only [`DYNAMICS_PROCESSING_IMPL_UUID`] is served.

use dynproc_core::{AudioUuid, Descriptor, EffectError, EffectResult};

use crate::context::{native_engine, EngineFactory};
use crate::descriptor::{self, DYNAMICS_PROCESSING_IMPL_UUID};
use crate::effect::{DynamicsProcessingImpl, Effect};

fn check_uuid(op: &str, uuid: Option<&AudioUuid>) -> EffectResult<()> {
    match uuid {
        Some(uuid) if *uuid == DYNAMICS_PROCESSING_IMPL_UUID => Ok(()),
        other => {
            log::error!("{op}: uuid {other:?} not supported");
            Err(EffectError::illegal_argument("uuid not supported"))
        }
    }
}

/// Create an effect instance driving the native engine.
pub fn create_effect(uuid: Option<&AudioUuid>) -> EffectResult<Box<dyn Effect>> {
    create_effect_with_engine(uuid, native_engine)
}

/// Create an effect instance driving engines built by `engine_factory`.
pub fn create_effect_with_engine(
    uuid: Option<&AudioUuid>,
    engine_factory: EngineFactory,
) -> EffectResult<Box<dyn Effect>> {
    check_uuid("create_effect", uuid)?;
    let effect = Box::new(DynamicsProcessingImpl::with_engine(engine_factory));
    log::debug!("create_effect: instance {:p} created", effect);
    Ok(effect)
}

/// Descriptor of the implementation identified by `uuid`.
pub fn query_effect(uuid: Option<&AudioUuid>) -> EffectResult<Descriptor> {
    check_uuid("query_effect", uuid)?;
    Ok(descriptor::descriptor())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::DYNAMICS_PROCESSING_TYPE_UUID;
    use dynproc_core::State;

    #[test]
    fn test_create_known_uuid() {
        let effect = create_effect(Some(&DYNAMICS_PROCESSING_IMPL_UUID)).unwrap();
        assert_eq!(effect.get_state(), State::Init);
        assert_eq!(effect.get_descriptor().common.name, "DynamicsProcessing");
    }

    #[test]
    fn test_unknown_or_missing_uuid() {
        let expected = EffectError::illegal_argument("uuid not supported");
        assert_eq!(create_effect(None).err(), Some(expected.clone()));
        // The type UUID is not an implementation UUID
        assert_eq!(
            create_effect(Some(&DYNAMICS_PROCESSING_TYPE_UUID)).err(),
            Some(expected.clone())
        );
        assert_eq!(query_effect(Some(&AudioUuid::nil())).err(), Some(expected));
    }

    #[test]
    fn test_query_matches_instance_descriptor() {
        let queried = query_effect(Some(&DYNAMICS_PROCESSING_IMPL_UUID)).unwrap();
        let effect = create_effect(Some(&DYNAMICS_PROCESSING_IMPL_UUID)).unwrap();
        assert_eq!(queried, effect.get_descriptor());
    }
}
