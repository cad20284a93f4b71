//! Exported `extern "C"` functions.

#![allow(non_snake_case)]

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use dynproc_core::{AudioUuid, CommandId, EffectResult, Parameter, ParameterId, Specific, State};

use super::panic_guard::{ffi_guard, ffi_guard_status};
use super::types::{DpCommon, DpDescriptor, DpEffect, DpException, DpState, DpStatus, DpUuid};
use crate::factory;

fn exception(result: EffectResult<()>) -> DpException {
    match result {
        Ok(()) => DpException::None,
        Err(e) => DpException::from(&e),
    }
}

/// Borrow a NUL-terminated UTF-8 string.
///
/// # Safety
///
/// `ptr` must be null or point to a valid NUL-terminated string.
unsafe fn borrow_str<'a>(ptr: *const c_char) -> Result<&'a str, DpException> {
    if ptr.is_null() {
        return Err(DpException::NullPointer);
    }
    // Safety: non-null, and the caller guarantees NUL termination.
    let text = unsafe { CStr::from_ptr(ptr) };
    text.to_str().map_err(|_| DpException::IllegalArgument)
}

/// Borrow the effect behind a handle.
///
/// # Safety
///
/// `effect` must be null or a live handle from `createEffect`.
unsafe fn borrow_effect<'a>(effect: *const DpEffect) -> Result<&'a DpEffect, DpException> {
    // Safety: the caller guarantees the pointer is null or valid.
    unsafe { effect.as_ref() }.ok_or(DpException::NullPointer)
}

// ─── Loader entry points ─────────────────────────────────────────────

/// Creates an effect instance for `uuid`.
///
/// Returns `IllegalArgument` if `uuid` is null or unknown, or if
/// `effect_out` is null. On success the caller owns `*effect_out` and must
/// release it with [`destroyEffect()`].
#[unsafe(no_mangle)]
pub extern "C" fn createEffect(uuid: *const DpUuid, effect_out: *mut *mut DpEffect) -> DpException {
    ffi_guard! {
        // Safety: the caller guarantees the pointer is null or valid.
        let uuid = unsafe { uuid.as_ref() }.map(|u| AudioUuid::from(*u));
        let inner = match factory::create_effect(uuid.as_ref()) {
            Ok(inner) => inner,
            Err(e) => return DpException::from(&e),
        };
        if effect_out.is_null() {
            log::error!("createEffect: invalid input parameter");
            return DpException::IllegalArgument;
        }
        let handle = Box::into_raw(Box::new(DpEffect { inner }));
        // Safety: checked non-null above.
        unsafe { ptr::write(effect_out, handle) };
        DpException::None
    }
}

/// Writes the descriptor of `uuid` to `descriptor_out`.
#[unsafe(no_mangle)]
pub extern "C" fn queryEffect(
    uuid: *const DpUuid,
    descriptor_out: *mut DpDescriptor,
) -> DpException {
    ffi_guard! {
        // Safety: the caller guarantees the pointer is null or valid.
        let uuid = unsafe { uuid.as_ref() }.map(|u| AudioUuid::from(*u));
        let descriptor = match factory::query_effect(uuid.as_ref()) {
            Ok(descriptor) => descriptor,
            Err(e) => return DpException::from(&e),
        };
        if descriptor_out.is_null() {
            return DpException::NullPointer;
        }
        // Safety: checked non-null above.
        unsafe { ptr::write(descriptor_out, DpDescriptor::from(&descriptor)) };
        DpException::None
    }
}

/// Destroys an effect instance.
///
/// Only closed instances can be destroyed; an open instance is left alive
/// and `IllegalState` is returned. Passing `NULL` is a no-op.
#[unsafe(no_mangle)]
pub extern "C" fn destroyEffect(effect: *mut DpEffect) -> DpException {
    ffi_guard! {
        if effect.is_null() {
            return DpException::None;
        }
        // Safety: non-null handles come from createEffect.
        let state = unsafe { &*effect }.inner.get_state();
        if state != State::Init {
            log::error!("destroyEffect: instance in state {state:?}");
            return DpException::IllegalState;
        }
        // Safety: created via Box::into_raw in createEffect; the caller
        // guarantees single ownership.
        drop(unsafe { Box::from_raw(effect) });
        DpException::None
    }
}

// ─── Lifecycle ───────────────────────────────────────────────────────

/// Opens the instance.
///
/// `specific_json` may be null; otherwise it holds a JSON `Specific`.
#[unsafe(no_mangle)]
pub extern "C" fn dynproc_open(
    effect: *const DpEffect,
    common: *const DpCommon,
    specific_json: *const c_char,
) -> DpException {
    ffi_guard! {
        // Safety: the caller guarantees the pointers are null or valid.
        let effect = match unsafe { borrow_effect(effect) } {
            Ok(effect) => effect,
            Err(e) => return e,
        };
        // Safety: as above.
        let Some(common) = (unsafe { common.as_ref() }) else {
            return DpException::NullPointer;
        };
        let specific = if specific_json.is_null() {
            None
        } else {
            // Safety: as above.
            let json = match unsafe { borrow_str(specific_json) } {
                Ok(json) => json,
                Err(e) => return e,
            };
            match serde_json::from_str::<Specific>(json) {
                Ok(specific) => Some(specific),
                Err(e) => {
                    log::error!("dynproc_open: bad specific parameter: {e}");
                    return DpException::IllegalArgument;
                }
            }
        };
        exception(effect.inner.open(&common.to_rust(), specific.as_ref()))
    }
}

/// Closes the instance.
#[unsafe(no_mangle)]
pub extern "C" fn dynproc_close(effect: *const DpEffect) -> DpException {
    ffi_guard! {
        // Safety: the caller guarantees the pointer is null or valid.
        match unsafe { borrow_effect(effect) } {
            Ok(effect) => exception(effect.inner.close()),
            Err(e) => e,
        }
    }
}

/// Sends a command (0 = start, 1 = stop, 2 = reset).
#[unsafe(no_mangle)]
pub extern "C" fn dynproc_command(effect: *const DpEffect, command: i32) -> DpException {
    ffi_guard! {
        // Safety: the caller guarantees the pointer is null or valid.
        match unsafe { borrow_effect(effect) } {
            Ok(effect) => exception(effect.inner.command(CommandId::from_raw(command))),
            Err(e) => e,
        }
    }
}

/// Writes the lifecycle state to `state_out`.
#[unsafe(no_mangle)]
pub extern "C" fn dynproc_get_state(
    effect: *const DpEffect,
    state_out: *mut DpState,
) -> DpException {
    ffi_guard! {
        // Safety: the caller guarantees the pointer is null or valid.
        let effect = match unsafe { borrow_effect(effect) } {
            Ok(effect) => effect,
            Err(e) => return e,
        };
        if state_out.is_null() {
            return DpException::NullPointer;
        }
        // Safety: checked non-null above.
        unsafe { ptr::write(state_out, effect.inner.get_state().into()) };
        DpException::None
    }
}

// ─── Processing ──────────────────────────────────────────────────────

/// Processes `samples` interleaved floats from `input` into `output`.
///
/// The buffers must not overlap.
#[unsafe(no_mangle)]
pub extern "C" fn dynproc_process(
    effect: *const DpEffect,
    input: *const f32,
    output: *mut f32,
    samples: i32,
) -> DpStatus {
    ffi_guard_status! {
        // Safety: the caller guarantees the pointer is null or valid.
        let effect = match unsafe { borrow_effect(effect) } {
            Ok(effect) => effect,
            Err(e) => return DpStatus::failed(e),
        };
        if input.is_null() || output.is_null() {
            return DpStatus::failed(DpException::NullPointer);
        }
        let Ok(samples) = usize::try_from(samples) else {
            return DpStatus::failed(DpException::IllegalArgument);
        };
        if ptr::eq(input, output) {
            return DpStatus::failed(DpException::IllegalArgument);
        }
        // Safety: the caller guarantees both buffers hold `samples` floats
        // and do not overlap.
        let (input, output) = unsafe {
            (
                std::slice::from_raw_parts(input, samples),
                std::slice::from_raw_parts_mut(output, samples),
            )
        };
        effect.inner.process(input, output).into()
    }
}

// ─── Parameters ──────────────────────────────────────────────────────

/// Sets a parameter given as JSON.
#[unsafe(no_mangle)]
pub extern "C" fn dynproc_set_parameter_json(
    effect: *const DpEffect,
    parameter_json: *const c_char,
) -> DpException {
    ffi_guard! {
        // Safety: the caller guarantees the pointers are null or valid.
        let (effect, json) = match unsafe { (borrow_effect(effect), borrow_str(parameter_json)) } {
            (Ok(effect), Ok(json)) => (effect, json),
            (Err(e), _) | (_, Err(e)) => return e,
        };
        match serde_json::from_str::<Parameter>(json) {
            Ok(param) => exception(effect.inner.set_parameter(&param)),
            Err(e) => {
                log::error!("dynproc_set_parameter_json: {e}");
                DpException::IllegalArgument
            }
        }
    }
}

/// Gets the parameter identified by the JSON id.
///
/// On success `*parameter_out` receives a JSON string the caller must
/// release with [`dynproc_free_string()`].
#[unsafe(no_mangle)]
pub extern "C" fn dynproc_get_parameter_json(
    effect: *const DpEffect,
    id_json: *const c_char,
    parameter_out: *mut *mut c_char,
) -> DpException {
    ffi_guard! {
        // Safety: the caller guarantees the pointers are null or valid.
        let (effect, json) = match unsafe { (borrow_effect(effect), borrow_str(id_json)) } {
            (Ok(effect), Ok(json)) => (effect, json),
            (Err(e), _) | (_, Err(e)) => return e,
        };
        if parameter_out.is_null() {
            return DpException::NullPointer;
        }
        let id = match serde_json::from_str::<ParameterId>(json) {
            Ok(id) => id,
            Err(e) => {
                log::error!("dynproc_get_parameter_json: {e}");
                return DpException::IllegalArgument;
            }
        };
        let param = match effect.inner.get_parameter(&id) {
            Ok(param) => param,
            Err(e) => return DpException::from(&e),
        };
        let text = match serde_json::to_string(&param).map(CString::new) {
            Ok(Ok(text)) => text,
            _ => return DpException::IllegalState,
        };
        // Safety: checked non-null above.
        unsafe { ptr::write(parameter_out, text.into_raw()) };
        DpException::None
    }
}

/// Frees a string returned by this library. Passing `NULL` is a no-op.
#[unsafe(no_mangle)]
pub extern "C" fn dynproc_free_string(text: *mut c_char) {
    if !text.is_null() {
        // Safety: the string was created with CString::into_raw.
        drop(unsafe { CString::from_raw(text) });
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DYNAMICS_PROCESSING_IMPL_UUID, DYNAMICS_PROCESSING_TYPE_UUID};
    use crate::ffi::types::{DpAudioConfig, DpChannelLayoutKind, DpPcmType};

    fn stereo() -> DpCommon {
        let config = DpAudioConfig {
            sample_rate: 48000,
            layout_kind: DpChannelLayoutKind::LayoutMask,
            channel_mask: 0x3,
            pcm: DpPcmType::Float32Bit,
            frame_count: 960,
        };
        DpCommon {
            session: 1,
            io_handle: 2,
            input: config,
            output: config,
        }
    }

    fn create() -> *mut DpEffect {
        let uuid = DpUuid::from(DYNAMICS_PROCESSING_IMPL_UUID);
        let mut effect = ptr::null_mut();
        assert_eq!(createEffect(&uuid, &mut effect), DpException::None);
        assert!(!effect.is_null());
        effect
    }

    #[test]
    fn create_and_destroy() {
        let effect = create();
        assert_eq!(destroyEffect(effect), DpException::None);
    }

    #[test]
    fn destroy_null_is_safe() {
        assert_eq!(destroyEffect(ptr::null_mut()), DpException::None);
    }

    #[test]
    fn create_rejects_bad_input() {
        let mut effect = ptr::null_mut();
        assert_eq!(createEffect(ptr::null(), &mut effect), DpException::IllegalArgument);

        let wrong = DpUuid::from(DYNAMICS_PROCESSING_TYPE_UUID);
        assert_eq!(createEffect(&wrong, &mut effect), DpException::IllegalArgument);
        assert!(effect.is_null());

        let uuid = DpUuid::from(DYNAMICS_PROCESSING_IMPL_UUID);
        assert_eq!(createEffect(&uuid, ptr::null_mut()), DpException::IllegalArgument);
    }

    #[test]
    fn query_writes_descriptor() {
        let uuid = DpUuid::from(DYNAMICS_PROCESSING_IMPL_UUID);
        let mut descriptor = std::mem::MaybeUninit::<DpDescriptor>::uninit();
        assert_eq!(queryEffect(&uuid, descriptor.as_mut_ptr()), DpException::None);
        // Safety: queryEffect succeeded and wrote the descriptor.
        let descriptor = unsafe { descriptor.assume_init() };
        assert_eq!(descriptor.uuid, uuid);
        assert_eq!(descriptor.max_cutoff_freq, 20000.0);
    }

    #[test]
    fn open_instance_cannot_be_destroyed() {
        let effect = create();
        assert_eq!(dynproc_open(effect, &stereo(), ptr::null()), DpException::None);
        assert_eq!(dynproc_command(effect, 0), DpException::None);

        let mut state = DpState::Init;
        assert_eq!(dynproc_get_state(effect, &mut state), DpException::None);
        assert_eq!(state, DpState::Processing);

        assert_eq!(destroyEffect(effect), DpException::IllegalState);
        assert_eq!(dynproc_close(effect), DpException::IllegalState);
        assert_eq!(dynproc_command(effect, 1), DpException::None);
        assert_eq!(dynproc_close(effect), DpException::None);
        assert_eq!(destroyEffect(effect), DpException::None);
    }

    #[test]
    fn process_through_handle() {
        let effect = create();
        let input = [0.25_f32; 8];
        let mut output = [0.0_f32; 8];

        let status = dynproc_process(effect, input.as_ptr(), output.as_mut_ptr(), 8);
        assert_eq!(status.status, DpException::NullPointer as i32);

        dynproc_open(effect, &stereo(), ptr::null());
        let status = dynproc_process(effect, input.as_ptr(), output.as_mut_ptr(), 8);
        assert_eq!(status.status, 0);
        assert_eq!(status.fmq_consumed, 8);
        assert_eq!(output, input);

        let status = dynproc_process(effect, input.as_ptr(), output.as_mut_ptr(), -1);
        assert_eq!(status.status, DpException::IllegalArgument as i32);

        dynproc_close(effect);
        destroyEffect(effect);
    }

    #[test]
    fn json_parameters() {
        let effect = create();
        dynproc_open(effect, &stereo(), ptr::null());

        let set = cr#"{"Specific":{"DynamicsProcessing":{"InputGain":[
            {"channel":1,"gain_db":-3.0}]}}}"#;
        assert_eq!(dynproc_set_parameter_json(effect, set.as_ptr()), DpException::None);

        let id = c"{\"DynamicsProcessingTag\":{\"CommonTag\":\"InputGain\"}}";
        let mut out = ptr::null_mut();
        assert_eq!(dynproc_get_parameter_json(effect, id.as_ptr(), &mut out), DpException::None);
        // Safety: the call succeeded and returned a NUL-terminated string.
        let text = unsafe { CStr::from_ptr(out) }.to_str().unwrap().to_owned();
        dynproc_free_string(out);
        assert!(text.contains("\"gain_db\":-3.0"));

        let bad = c"{\"Specific\":";
        assert_eq!(dynproc_set_parameter_json(effect, bad.as_ptr()), DpException::IllegalArgument);
        assert_eq!(dynproc_set_parameter_json(effect, ptr::null()), DpException::NullPointer);

        dynproc_close(effect);
        destroyEffect(effect);
    }

    #[test]
    fn free_null_string_is_safe() {
        dynproc_free_string(ptr::null_mut());
    }
}
