//! C-compatible type definitions.
//!
//! All types here are `#[repr(C)]` or `#[repr(i32)]` and safe to pass
//! across the FFI boundary.

use std::ffi::c_char;

use crate::effect::Effect;

// ---------------------------------------------------------------------------
// Status codes
// ---------------------------------------------------------------------------

/// Exception codes returned by C API functions.
///
/// `0` = success, negative = error. Values match the host's binder
/// exception codes.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpException {
    None = 0,
    IllegalArgument = -3,
    NullPointer = -4,
    IllegalState = -5,
    UnsupportedOperation = -7,
    /// Internal error (panic caught at the FFI boundary).
    TransactionFailed = -129,
}

/// Result of one process call.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpStatus {
    /// A [`DpException`] value.
    pub status: i32,
    /// Input samples consumed.
    pub fmq_consumed: i32,
    /// Output samples produced.
    pub fmq_produced: i32,
}

impl DpStatus {
    pub(crate) const fn failed(status: DpException) -> Self {
        Self {
            status: status as i32,
            fmq_consumed: 0,
            fmq_produced: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// UUID in RFC 4122 field layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DpUuid {
    pub time_low: u32,
    pub time_mid: u16,
    pub time_hi_and_version: u16,
    pub clock_seq: u16,
    pub node: [u8; 6],
}

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpFlagType {
    Insert = 0,
    Auxiliary = 1,
    Replace = 2,
    Preprocessing = 3,
    Postprocessing = 4,
}

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpInsert {
    Any = 0,
    First = 1,
    Last = 2,
    Exclusive = 3,
}

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpVolume {
    None = 0,
    Ctrl = 1,
    Ind = 2,
    Monitor = 3,
}

/// Maximum length of descriptor strings, including the terminating NUL.
pub const DP_STRING_LEN: usize = 64;

/// Flat effect descriptor.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DpDescriptor {
    pub type_uuid: DpUuid,
    pub uuid: DpUuid,
    pub has_proxy: bool,
    pub proxy: DpUuid,
    pub flag_type: DpFlagType,
    pub flag_insert: DpInsert,
    pub flag_volume: DpVolume,
    /// NUL-terminated, truncated to fit.
    pub name: [c_char; DP_STRING_LEN],
    /// NUL-terminated, truncated to fit.
    pub implementor: [c_char; DP_STRING_LEN],
    pub min_cutoff_freq: f32,
    pub max_cutoff_freq: f32,
}

// ---------------------------------------------------------------------------
// Stream configuration
// ---------------------------------------------------------------------------

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpPcmType {
    Uint8Bit = 0,
    Int16Bit = 1,
    Int32Bit = 2,
    FixedQ824Bit = 3,
    Float32Bit = 4,
    Int24Bit = 5,
}

/// How `channel_mask` is interpreted.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpChannelLayoutKind {
    LayoutMask = 0,
    IndexMask = 1,
}

/// One direction of the stream.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DpAudioConfig {
    pub sample_rate: i32,
    pub layout_kind: DpChannelLayoutKind,
    pub channel_mask: u32,
    pub pcm: DpPcmType,
    pub frame_count: i64,
}

/// Common parameters passed to `dynproc_open`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DpCommon {
    pub session: i32,
    pub io_handle: i32,
    pub input: DpAudioConfig,
    pub output: DpAudioConfig,
}

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpState {
    Init = 0,
    Idle = 1,
    Processing = 2,
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Opaque effect handle.
///
/// Created by `createEffect`, freed by `destroyEffect`.
pub struct DpEffect {
    pub(crate) inner: Box<dyn Effect>,
}
