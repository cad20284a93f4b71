//! The effect instance the host drives.
//!
//! [`Effect`] is the host-facing interface. [`DynamicsProcessingImpl`]
//! implements it on top of a [`Lifecycle`] and, once opened, a
//! [`DynamicsProcessingContext`].
//!
//! # Thread Safety
//!
//! The host may call into one instance from several threads (control calls
//! on one, `process` on another). All mutable state sits behind a single
//! `parking_lot::Mutex`, so every method takes `&self`.

use dynproc_core::{
    CommandId, Common, CommonTag, Descriptor, DynamicsId, DynamicsProcessing, DynamicsTag,
    EffectError, EffectResult, EffectStatus, ExceptionCode, Parameter, ParameterId, PcmType,
    Specific, State,
};
use parking_lot::Mutex;

use crate::context::{native_engine, DynamicsProcessingContext, EngineFactory};
use crate::descriptor::{self, CAPABILITY};
use crate::lifecycle::Lifecycle;

/// An effect instance as seen by the host.
pub trait Effect: Send + Sync {
    /// Open the instance with its stream configuration and optional initial
    /// specific parameter.
    fn open(&self, common: &Common, specific: Option<&Specific>) -> EffectResult<()>;

    /// Close the instance and release its context.
    fn close(&self) -> EffectResult<()>;

    fn get_descriptor(&self) -> Descriptor;

    fn command(&self, command: CommandId) -> EffectResult<()>;

    fn get_state(&self) -> State;

    fn set_parameter(&self, param: &Parameter) -> EffectResult<()>;

    fn get_parameter(&self, id: &ParameterId) -> EffectResult<Parameter>;

    /// Process interleaved float samples.
    fn process(&self, input: &[f32], output: &mut [f32]) -> EffectStatus;

    /// Serialize the current dynamics configuration.
    fn save_state(&self) -> EffectResult<Vec<u8>>;

    /// Restore a configuration produced by `save_state`.
    fn load_state(&self, data: &[u8]) -> EffectResult<()>;
}

#[derive(Debug)]
struct Inner {
    lifecycle: Lifecycle,
    context: Option<DynamicsProcessingContext>,
}

/// Dynamics processing effect.
pub struct DynamicsProcessingImpl {
    engine_factory: EngineFactory,
    inner: Mutex<Inner>,
}

impl Default for DynamicsProcessingImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DynamicsProcessingImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicsProcessingImpl")
            .field("inner", &*self.inner.lock())
            .finish_non_exhaustive()
    }
}

impl DynamicsProcessingImpl {
    /// An instance driving the native engine.
    pub fn new() -> Self {
        Self::with_engine(native_engine)
    }

    /// An instance driving engines built by `engine_factory`.
    pub fn with_engine(engine_factory: EngineFactory) -> Self {
        Self {
            engine_factory,
            inner: Mutex::new(Inner {
                lifecycle: Lifecycle::new(),
                context: None,
            }),
        }
    }
}

// =============================================================================
// Context management
// =============================================================================

impl Inner {
    fn context(&mut self) -> EffectResult<&mut DynamicsProcessingContext> {
        self.context
            .as_mut()
            .ok_or_else(|| EffectError::null_pointer("nullContext"))
    }

    fn context_ref(&self) -> EffectResult<&DynamicsProcessingContext> {
        self.context
            .as_ref()
            .ok_or_else(|| EffectError::null_pointer("nullContext"))
    }

    /// Existing context, or a new one for `common`.
    fn create_context(
        &mut self,
        common: &Common,
        engine_factory: EngineFactory,
    ) -> EffectResult<&mut DynamicsProcessingContext> {
        if self.context.is_some() {
            log::debug!("create_context: context already exists");
        } else {
            let context = DynamicsProcessingContext::new(common, CAPABILITY, engine_factory)
                .map_err(|e| {
                    log::error!("create_context: {e}");
                    EffectError::null_pointer("createContextFailed")
                })?;
            self.context = Some(context);
        }
        self.context()
    }

    fn release_context(&mut self) {
        if let Some(mut context) = self.context.take() {
            context.disable();
            context.reset_buffer();
        }
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    fn command_impl(&mut self, command: CommandId) -> EffectResult<()> {
        let context = self.context()?;
        match command {
            CommandId::Start => context.enable(),
            CommandId::Stop => context.disable(),
            CommandId::Reset => {
                context.disable();
                context.reset_buffer();
            }
            CommandId::Vendor(id) => {
                log::error!("command_impl: commandId {id} not supported");
                return Err(EffectError::illegal_argument("commandIdNotSupported"));
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Parameters
    // -------------------------------------------------------------------------

    fn set_parameter_common(&mut self, param: &Parameter) -> EffectResult<()> {
        match param {
            Parameter::Common(common) => self.context()?.set_common(common),
            Parameter::VolumeStereo(volume) => {
                self.context()?.set_volume_stereo(*volume);
                Ok(())
            }
            Parameter::Specific(specific) => self.set_parameter_specific(specific),
        }
    }

    fn set_parameter_specific(&mut self, specific: &Specific) -> EffectResult<()> {
        let Specific::DynamicsProcessing(param) = specific else {
            log::error!("set_parameter_specific: {} not supported", specific.name());
            return Err(EffectError::illegal_argument("EffectNotSupported"));
        };
        let context = self.context()?;

        let tag = param.tag();
        let result = match param {
            DynamicsProcessing::EngineArchitecture(arch) => context.set_engine_architecture(arch),
            DynamicsProcessing::PreEq(configs) => context.set_pre_eq(configs),
            DynamicsProcessing::PostEq(configs) => context.set_post_eq(configs),
            DynamicsProcessing::PreEqBand(bands) => context.set_pre_eq_band(bands),
            DynamicsProcessing::PostEqBand(bands) => context.set_post_eq_band(bands),
            DynamicsProcessing::Mbc(configs) => context.set_mbc(configs),
            DynamicsProcessing::MbcBand(bands) => context.set_mbc_band(bands),
            DynamicsProcessing::Limiter(limiters) => context.set_limiter(limiters),
            DynamicsProcessing::InputGain(gains) => context.set_input_gain(gains),
            DynamicsProcessing::VendorExtension(_) => {
                log::error!("set_parameter_specific: unsupported tag {tag}");
                return Err(EffectError::illegal_argument(
                    "DPVendorExtensionTagNotSupported",
                ));
            }
        };
        result.map_err(|e| {
            log::error!("set_parameter_specific: {tag}: {e}");
            EffectError::illegal_argument(set_failed_message(tag))
        })
    }

    fn get_parameter(&self, id: &ParameterId) -> EffectResult<Parameter> {
        match id {
            ParameterId::CommonTag(CommonTag::Common) => {
                Ok(Parameter::Common(self.context_ref()?.common().clone()))
            }
            ParameterId::CommonTag(CommonTag::VolumeStereo) => {
                Ok(Parameter::VolumeStereo(self.context_ref()?.volume_stereo()))
            }
            _ => self.get_parameter_specific(id).map(Parameter::Specific),
        }
    }

    fn get_parameter_specific(&self, id: &ParameterId) -> EffectResult<Specific> {
        let ParameterId::DynamicsProcessingTag(dp_id) = id else {
            log::error!("get_parameter_specific: wrong id tag {}", id.name());
            return Err(EffectError::illegal_argument("wrongIdTag"));
        };
        match dp_id {
            DynamicsId::CommonTag(tag) => self.get_parameter_dynamics_processing(*tag),
            DynamicsId::VendorExtensionTag(_) => {
                log::error!("get_parameter_specific: unsupported vendor extension id");
                Err(EffectError::illegal_argument("DPVendorExtensionIdNotSupported"))
            }
        }
    }

    fn get_parameter_dynamics_processing(&self, tag: DynamicsTag) -> EffectResult<Specific> {
        let context = self.context_ref()?;
        let value = match tag {
            DynamicsTag::EngineArchitecture => {
                DynamicsProcessing::EngineArchitecture(context.engine_architecture())
            }
            DynamicsTag::PreEq => DynamicsProcessing::PreEq(context.pre_eq()),
            DynamicsTag::PostEq => DynamicsProcessing::PostEq(context.post_eq()),
            DynamicsTag::PreEqBand => DynamicsProcessing::PreEqBand(context.pre_eq_band()),
            DynamicsTag::PostEqBand => DynamicsProcessing::PostEqBand(context.post_eq_band()),
            DynamicsTag::Mbc => DynamicsProcessing::Mbc(context.mbc()),
            DynamicsTag::MbcBand => DynamicsProcessing::MbcBand(context.mbc_band()),
            DynamicsTag::Limiter => DynamicsProcessing::Limiter(context.limiter()),
            DynamicsTag::InputGain => DynamicsProcessing::InputGain(context.input_gain()),
            DynamicsTag::VendorExtension => {
                log::error!("get_parameter_dynamics_processing: vendor tag in common id");
                return Err(EffectError::illegal_argument("DPVendorExtensionTagInWrongId"));
            }
        };
        Ok(Specific::DynamicsProcessing(value))
    }
}

/// `set<Tag>Failed`, e.g. `setPreEqBandFailed`.
fn set_failed_message(tag: DynamicsTag) -> String {
    let name = tag.name();
    let mut chars = name.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("set{capitalized}Failed")
}

// =============================================================================
// Effect
// =============================================================================

impl Effect for DynamicsProcessingImpl {
    fn open(&self, common: &Common, specific: Option<&Specific>) -> EffectResult<()> {
        log::debug!("open: {:?}", common);
        if common.input.pcm != common.output.pcm || common.input.pcm != PcmType::Float32Bit {
            log::error!(
                "open: pcm {:?}/{:?} not supported",
                common.input.pcm,
                common.output.pcm
            );
            return Err(EffectError::illegal_argument("dataMustBe32BitsFloat"));
        }

        let mut inner = self.inner.lock();
        if inner.lifecycle.is_open() {
            return Ok(());
        }

        inner.create_context(common, self.engine_factory)?;
        let configured = inner
            .set_parameter_common(&Parameter::Common(common.clone()))
            .and_then(|()| match specific {
                Some(specific) => inner.set_parameter_specific(specific),
                None => {
                    let arch = inner.context()?.engine_architecture();
                    inner.set_parameter_specific(&Specific::DynamicsProcessing(
                        DynamicsProcessing::EngineArchitecture(arch),
                    ))
                }
            });
        if let Err(e) = configured {
            log::error!("open: {e}");
            inner.release_context();
            return Err(e);
        }

        inner.lifecycle.open();
        Ok(())
    }

    fn close(&self) -> EffectResult<()> {
        let mut inner = self.inner.lock();
        if inner.lifecycle.close()? {
            inner.release_context();
            log::debug!("close: context released");
        }
        Ok(())
    }

    fn get_descriptor(&self) -> Descriptor {
        descriptor::descriptor()
    }

    fn command(&self, command: CommandId) -> EffectResult<()> {
        let mut inner = self.inner.lock();
        inner.lifecycle.ensure_open()?;
        inner.command_impl(command)?;
        inner.lifecycle.apply_command(command)?;
        Ok(())
    }

    fn get_state(&self) -> State {
        self.inner.lock().lifecycle.state()
    }

    fn set_parameter(&self, param: &Parameter) -> EffectResult<()> {
        self.inner.lock().set_parameter_common(param)
    }

    fn get_parameter(&self, id: &ParameterId) -> EffectResult<Parameter> {
        self.inner.lock().get_parameter(id)
    }

    fn process(&self, input: &[f32], output: &mut [f32]) -> EffectStatus {
        let mut inner = self.inner.lock();
        match inner.context.as_mut() {
            Some(context) => context.process(input, output),
            None => {
                log::error!("process: nullContext");
                EffectStatus::error(ExceptionCode::NullPointer)
            }
        }
    }

    fn save_state(&self) -> EffectResult<Vec<u8>> {
        self.inner.lock().context_ref()?.snapshot()
    }

    fn load_state(&self, data: &[u8]) -> EffectResult<()> {
        self.inner.lock().context()?.restore(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynproc_core::{
        AudioConfig, EngineArchitecture, InputGain, StageEnablement, VendorExtension,
    };

    fn common() -> Common {
        Common::symmetric(AudioConfig::stereo_float(48000, 960))
    }

    fn opened() -> DynamicsProcessingImpl {
        let effect = DynamicsProcessingImpl::new();
        effect.open(&common(), None).unwrap();
        effect
    }

    fn dp(param: DynamicsProcessing) -> Parameter {
        Parameter::Specific(Specific::DynamicsProcessing(param))
    }

    fn dp_id(tag: DynamicsTag) -> ParameterId {
        ParameterId::DynamicsProcessingTag(DynamicsId::common(tag))
    }

    #[test]
    fn test_set_failed_message() {
        assert_eq!(set_failed_message(DynamicsTag::PreEqBand), "setPreEqBandFailed");
        assert_eq!(
            set_failed_message(DynamicsTag::EngineArchitecture),
            "setEngineArchitectureFailed"
        );
    }

    #[test]
    fn test_open_requires_float() {
        let effect = DynamicsProcessingImpl::new();
        let mut c = common();
        c.output.pcm = PcmType::Int16Bit;
        let err = effect.open(&c, None).unwrap_err();
        assert_eq!(err, EffectError::illegal_argument("dataMustBe32BitsFloat"));
        assert_eq!(effect.get_state(), State::Init);
    }

    #[test]
    fn test_open_with_specific() {
        let effect = DynamicsProcessingImpl::new();
        let arch = EngineArchitecture {
            mbc_stage: StageEnablement::with_bands(4),
            ..Default::default()
        };
        let specific = Specific::DynamicsProcessing(DynamicsProcessing::EngineArchitecture(arch));
        effect.open(&common(), Some(&specific)).unwrap();
        assert_eq!(effect.get_state(), State::Idle);
        assert_eq!(
            effect.get_parameter(&dp_id(DynamicsTag::EngineArchitecture)).unwrap(),
            dp(DynamicsProcessing::EngineArchitecture(arch))
        );
    }

    #[test]
    fn test_failed_open_stays_init() {
        let effect = DynamicsProcessingImpl::new();
        let specific = Specific::VendorEffect(VendorExtension::default());
        let err = effect.open(&common(), Some(&specific)).unwrap_err();
        assert_eq!(err, EffectError::illegal_argument("EffectNotSupported"));
        assert_eq!(effect.get_state(), State::Init);
        assert_eq!(
            effect.get_parameter(&dp_id(DynamicsTag::Limiter)).unwrap_err(),
            EffectError::null_pointer("nullContext")
        );
    }

    #[test]
    fn test_parameter_errors() {
        let effect = opened();
        let err = effect
            .set_parameter(&dp(DynamicsProcessing::VendorExtension(VendorExtension::default())))
            .unwrap_err();
        assert_eq!(err.message(), "DPVendorExtensionTagNotSupported");

        let err = effect
            .set_parameter(&dp(DynamicsProcessing::InputGain(vec![InputGain {
                channel: 5,
                gain_db: 0.0,
            }])))
            .unwrap_err();
        assert_eq!(err, EffectError::illegal_argument("setInputGainFailed"));

        let err = effect
            .get_parameter(&ParameterId::VendorEffectTag(VendorExtension::default()))
            .unwrap_err();
        assert_eq!(err.message(), "wrongIdTag");

        let err = effect
            .get_parameter(&ParameterId::DynamicsProcessingTag(
                DynamicsId::VendorExtensionTag(VendorExtension::default()),
            ))
            .unwrap_err();
        assert_eq!(err.message(), "DPVendorExtensionIdNotSupported");

        let err = effect
            .get_parameter(&dp_id(DynamicsTag::VendorExtension))
            .unwrap_err();
        assert_eq!(err.message(), "DPVendorExtensionTagInWrongId");
    }

    #[test]
    fn test_every_common_tag_answers() {
        let effect = opened();
        for tag in DynamicsTag::ALL {
            if tag == DynamicsTag::VendorExtension {
                continue;
            }
            let Parameter::Specific(Specific::DynamicsProcessing(value)) =
                effect.get_parameter(&dp_id(tag)).unwrap()
            else {
                panic!("{tag} returned a non-dynamics parameter");
            };
            assert_eq!(value.tag(), tag);
        }
    }

    #[test]
    fn test_vendor_command_rejected() {
        let effect = opened();
        let err = effect.command(CommandId::Vendor(0x100)).unwrap_err();
        assert_eq!(err.message(), "commandIdNotSupported");
        assert_eq!(effect.get_state(), State::Idle);
    }

    #[test]
    fn test_process_without_context() {
        let effect = DynamicsProcessingImpl::new();
        let mut out = [0.0; 4];
        let status = effect.process(&[0.0; 4], &mut out);
        assert_eq!(status, EffectStatus::error(ExceptionCode::NullPointer));
    }

    #[test]
    fn test_common_parameters() {
        let effect = opened();
        let volume = dynproc_core::VolumeStereo {
            left: 0.5,
            right: 0.25,
        };
        effect.set_parameter(&Parameter::VolumeStereo(volume)).unwrap();
        assert_eq!(
            effect
                .get_parameter(&ParameterId::CommonTag(CommonTag::VolumeStereo))
                .unwrap(),
            Parameter::VolumeStereo(volume)
        );
        assert_eq!(
            effect
                .get_parameter(&ParameterId::CommonTag(CommonTag::Common))
                .unwrap(),
            Parameter::Common(common())
        );
    }
}
