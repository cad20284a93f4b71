//! Conversions between C API types and Rust types.

use std::ffi::c_char;

use dynproc_core::{
    AudioConfig, AudioUuid, ChannelLayout, Common, Descriptor, EffectError, EffectStatus,
    ExceptionCode, FlagType, Insert, PcmType, State, Volume,
};

use super::types::{
    DpAudioConfig, DpChannelLayoutKind, DpCommon, DpDescriptor, DpException, DpFlagType,
    DpInsert, DpPcmType, DpState, DpStatus, DpUuid, DpVolume, DP_STRING_LEN,
};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

impl From<ExceptionCode> for DpException {
    fn from(code: ExceptionCode) -> Self {
        match code {
            ExceptionCode::None => Self::None,
            ExceptionCode::IllegalArgument => Self::IllegalArgument,
            ExceptionCode::NullPointer => Self::NullPointer,
            ExceptionCode::IllegalState => Self::IllegalState,
            ExceptionCode::UnsupportedOperation => Self::UnsupportedOperation,
        }
    }
}

impl From<&EffectError> for DpException {
    fn from(error: &EffectError) -> Self {
        error.exception_code().into()
    }
}

impl From<EffectStatus> for DpStatus {
    fn from(status: EffectStatus) -> Self {
        let clamp = |n: usize| i32::try_from(n).unwrap_or(i32::MAX);
        Self {
            status: DpException::from(status.status) as i32,
            fmq_consumed: clamp(status.consumed),
            fmq_produced: clamp(status.produced),
        }
    }
}

impl From<State> for DpState {
    fn from(state: State) -> Self {
        match state {
            State::Init => Self::Init,
            State::Idle => Self::Idle,
            State::Processing => Self::Processing,
        }
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

impl From<DpUuid> for AudioUuid {
    fn from(uuid: DpUuid) -> Self {
        let clock = uuid.clock_seq.to_be_bytes();
        let n = uuid.node;
        AudioUuid::from_fields(
            uuid.time_low,
            uuid.time_mid,
            uuid.time_hi_and_version,
            &[clock[0], clock[1], n[0], n[1], n[2], n[3], n[4], n[5]],
        )
    }
}

impl From<AudioUuid> for DpUuid {
    fn from(uuid: AudioUuid) -> Self {
        let (time_low, time_mid, time_hi_and_version, tail) = uuid.as_fields();
        Self {
            time_low,
            time_mid,
            time_hi_and_version,
            clock_seq: u16::from_be_bytes([tail[0], tail[1]]),
            node: [tail[2], tail[3], tail[4], tail[5], tail[6], tail[7]],
        }
    }
}

/// Copy `text` into a fixed C buffer, truncating and NUL-terminating.
fn fixed_string(text: &str) -> [c_char; DP_STRING_LEN] {
    let mut out = [0 as c_char; DP_STRING_LEN];
    for (slot, byte) in out.iter_mut().zip(text.bytes().take(DP_STRING_LEN - 1)) {
        *slot = byte as c_char;
    }
    out
}

impl From<&Descriptor> for DpDescriptor {
    fn from(descriptor: &Descriptor) -> Self {
        let common = &descriptor.common;
        let capability = descriptor.dynamics_capability();
        Self {
            type_uuid: common.id.type_uuid.into(),
            uuid: common.id.uuid.into(),
            has_proxy: common.id.proxy.is_some(),
            proxy: common.id.proxy.map(DpUuid::from).unwrap_or_default(),
            flag_type: match common.flags.kind {
                FlagType::Insert => DpFlagType::Insert,
                FlagType::Auxiliary => DpFlagType::Auxiliary,
                FlagType::Replace => DpFlagType::Replace,
                FlagType::Preprocessing => DpFlagType::Preprocessing,
                FlagType::Postprocessing => DpFlagType::Postprocessing,
            },
            flag_insert: match common.flags.insert {
                Insert::Any => DpInsert::Any,
                Insert::First => DpInsert::First,
                Insert::Last => DpInsert::Last,
                Insert::Exclusive => DpInsert::Exclusive,
            },
            flag_volume: match common.flags.volume {
                Volume::None => DpVolume::None,
                Volume::Ctrl => DpVolume::Ctrl,
                Volume::Ind => DpVolume::Ind,
                Volume::Monitor => DpVolume::Monitor,
            },
            name: fixed_string(&common.name),
            implementor: fixed_string(&common.implementor),
            min_cutoff_freq: capability.min_cutoff_freq,
            max_cutoff_freq: capability.max_cutoff_freq,
        }
    }
}

// ---------------------------------------------------------------------------
// Stream configuration
// ---------------------------------------------------------------------------

impl DpPcmType {
    pub(crate) fn to_rust(self) -> PcmType {
        match self {
            Self::Uint8Bit => PcmType::Uint8Bit,
            Self::Int16Bit => PcmType::Int16Bit,
            Self::Int32Bit => PcmType::Int32Bit,
            Self::FixedQ824Bit => PcmType::FixedQ824Bit,
            Self::Float32Bit => PcmType::Float32Bit,
            Self::Int24Bit => PcmType::Int24Bit,
        }
    }
}

impl DpAudioConfig {
    pub(crate) fn to_rust(self) -> AudioConfig {
        AudioConfig {
            sample_rate: self.sample_rate,
            channel_layout: match self.layout_kind {
                DpChannelLayoutKind::LayoutMask => ChannelLayout::LayoutMask(self.channel_mask),
                DpChannelLayoutKind::IndexMask => ChannelLayout::IndexMask(self.channel_mask),
            },
            pcm: self.pcm.to_rust(),
            frame_count: self.frame_count,
        }
    }
}

impl DpCommon {
    pub(crate) fn to_rust(self) -> Common {
        Common {
            session: self.session,
            io_handle: self.io_handle,
            input: self.input.to_rust(),
            output: self.output.to_rust(),
        }
    }
}
