//! End-to-end lifecycle tests through the public effect interface.

use std::sync::atomic::{AtomicUsize, Ordering};

use dynproc_core::{
    AudioConfig, CommandId, Common, DynamicsCapability, DynamicsEngine, DynamicsId,
    DynamicsProcessing, DynamicsTag, EffectError, EngineArchitecture, EngineSetup, EqBandConfig,
    EqStage, InputGain, LimiterConfig, MbcBandConfig, Parameter, ParameterId, Specific, Stage,
    StageEnablement, State,
};
use dynproc_effect::{
    create_effect, create_effect_with_engine, Effect, DYNAMICS_PROCESSING_IMPL_UUID,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn stereo() -> Common {
    Common::symmetric(AudioConfig::stereo_float(48000, 480))
}

fn dp(param: DynamicsProcessing) -> Parameter {
    Parameter::Specific(Specific::DynamicsProcessing(param))
}

fn get(effect: &dyn Effect, tag: DynamicsTag) -> DynamicsProcessing {
    match effect
        .get_parameter(&ParameterId::DynamicsProcessingTag(DynamicsId::common(tag)))
        .unwrap()
    {
        Parameter::Specific(Specific::DynamicsProcessing(value)) => value,
        other => panic!("unexpected parameter {other:?}"),
    }
}

fn limiter_architecture() -> EngineArchitecture {
    EngineArchitecture {
        limiter_in_use: true,
        ..Default::default()
    }
}

#[test]
fn test_open_process_close() {
    init_logger();
    let effect = create_effect(Some(&DYNAMICS_PROCESSING_IMPL_UUID)).unwrap();
    assert_eq!(effect.get_state(), State::Init);
    assert!(matches!(
        effect.command(CommandId::Start),
        Err(EffectError::IllegalState(_))
    ));

    effect.open(&stereo(), None).unwrap();
    assert_eq!(effect.get_state(), State::Idle);
    // Second open is a no-op
    effect.open(&stereo(), None).unwrap();

    effect.command(CommandId::Start).unwrap();
    assert_eq!(effect.get_state(), State::Processing);

    let input = vec![0.1_f32; 960];
    let mut output = vec![0.0_f32; 960];
    let status = effect.process(&input, &mut output);
    assert!(status.status.is_ok());
    assert_eq!(status.consumed, 960);
    assert_eq!(status.produced, 960);
    assert!((output[959] - 0.1).abs() < 1e-4);

    assert!(effect.close().is_err());
    effect.command(CommandId::Reset).unwrap();
    assert_eq!(effect.get_state(), State::Idle);
    effect.close().unwrap();
    assert_eq!(effect.get_state(), State::Init);

    let status = effect.process(&input, &mut output);
    assert_eq!(status.consumed, 0);
    assert!(!status.status.is_ok());
}

#[test]
fn test_limiter_reduces_loud_signal() {
    init_logger();
    let effect = create_effect(Some(&DYNAMICS_PROCESSING_IMPL_UUID)).unwrap();
    let arch = Specific::DynamicsProcessing(DynamicsProcessing::EngineArchitecture(
        limiter_architecture(),
    ));
    effect.open(&stereo(), Some(&arch)).unwrap();

    let limiters: Vec<_> = (0..2)
        .map(|channel| LimiterConfig {
            channel,
            link_group: 0,
            attack_time_ms: 0.0,
            release_time_ms: 50.0,
            ratio: 100.0,
            threshold_db: -12.0,
            post_gain_db: 0.0,
            enable: true,
        })
        .collect();
    effect
        .set_parameter(&dp(DynamicsProcessing::Limiter(limiters.clone())))
        .unwrap();
    assert_eq!(get(&*effect, DynamicsTag::Limiter), DynamicsProcessing::Limiter(limiters));

    effect.command(CommandId::Start).unwrap();
    let input = vec![0.9_f32; 4800];
    let mut output = vec![0.0_f32; 4800];
    effect.process(&input, &mut output);
    let peak = output[4000..].iter().fold(0.0_f32, |m, x| m.max(x.abs()));
    // -12 dB is about 0.25
    assert!(peak < 0.27, "peak {peak}");
}

#[test]
fn test_architecture_change_resets_bands() {
    init_logger();
    let effect = create_effect(Some(&DYNAMICS_PROCESSING_IMPL_UUID)).unwrap();
    effect.open(&stereo(), None).unwrap();

    let arch = EngineArchitecture {
        pre_eq_stage: StageEnablement::with_bands(2),
        mbc_stage: StageEnablement::with_bands(2),
        ..Default::default()
    };
    effect
        .set_parameter(&dp(DynamicsProcessing::EngineArchitecture(arch)))
        .unwrap();

    let band = EqBandConfig {
        channel: 0,
        band: 1,
        enable: true,
        cutoff_frequency_hz: 20000.0,
        gain_db: 6.0,
    };
    effect
        .set_parameter(&dp(DynamicsProcessing::PreEqBand(vec![band])))
        .unwrap();
    let DynamicsProcessing::PreEqBand(bands) = get(&*effect, DynamicsTag::PreEqBand) else {
        panic!("wrong variant");
    };
    assert_eq!(bands[1], band);

    let mut bigger = arch;
    bigger.pre_eq_stage.band_count = 4;
    effect
        .set_parameter(&dp(DynamicsProcessing::EngineArchitecture(bigger)))
        .unwrap();
    let DynamicsProcessing::PreEqBand(bands) = get(&*effect, DynamicsTag::PreEqBand) else {
        panic!("wrong variant");
    };
    assert_eq!(bands.len(), 8);
    assert!(bands.iter().all(|b| b.gain_db == 0.0));

    let err = effect
        .set_parameter(&dp(DynamicsProcessing::MbcBand(vec![MbcBandConfig {
            channel: 0,
            band: 0,
            cutoff_frequency_hz: 100.0,
            ..Default::default()
        }])))
        .unwrap_err();
    assert_eq!(err, EffectError::illegal_argument("setMbcBandFailed"));
}

#[test]
fn test_save_and_load_state() {
    init_logger();
    let source = create_effect(Some(&DYNAMICS_PROCESSING_IMPL_UUID)).unwrap();
    source.open(&stereo(), None).unwrap();
    source
        .set_parameter(&dp(DynamicsProcessing::EngineArchitecture(limiter_architecture())))
        .unwrap();
    source
        .set_parameter(&dp(DynamicsProcessing::InputGain(vec![InputGain {
            channel: 1,
            gain_db: -9.0,
        }])))
        .unwrap();
    let state = source.save_state().unwrap();

    let target = create_effect(Some(&DYNAMICS_PROCESSING_IMPL_UUID)).unwrap();
    assert!(target.load_state(&state).is_err());
    target.open(&stereo(), None).unwrap();
    target.load_state(&state).unwrap();
    assert_eq!(
        get(&*target, DynamicsTag::InputGain),
        get(&*source, DynamicsTag::InputGain)
    );
    assert_eq!(
        get(&*target, DynamicsTag::EngineArchitecture),
        DynamicsProcessing::EngineArchitecture(limiter_architecture())
    );
}

#[test]
fn test_state_round_trips_after_band_moves() {
    init_logger();
    let effect = create_effect(Some(&DYNAMICS_PROCESSING_IMPL_UUID)).unwrap();
    effect.open(&stereo(), None).unwrap();
    let arch = EngineArchitecture {
        pre_eq_stage: StageEnablement::with_bands(2),
        ..Default::default()
    };
    effect
        .set_parameter(&dp(DynamicsProcessing::EngineArchitecture(arch)))
        .unwrap();

    let band = |band: i32, cutoff_frequency_hz: f32| EqBandConfig {
        channel: 0,
        band,
        enable: true,
        cutoff_frequency_hz,
        gain_db: 0.0,
    };
    // Moving band 1 below band 0 is refused
    let err = effect
        .set_parameter(&dp(DynamicsProcessing::PreEqBand(vec![band(1, 300.0)])))
        .unwrap_err();
    assert_eq!(err, EffectError::illegal_argument("setPreEqBandFailed"));

    effect
        .set_parameter(&dp(DynamicsProcessing::PreEqBand(vec![band(0, 250.0)])))
        .unwrap();
    effect
        .set_parameter(&dp(DynamicsProcessing::PreEqBand(vec![band(1, 300.0)])))
        .unwrap();

    let state = effect.save_state().unwrap();
    effect.load_state(&state).unwrap();
    let DynamicsProcessing::PreEqBand(bands) = get(&*effect, DynamicsTag::PreEqBand) else {
        panic!("wrong variant");
    };
    assert_eq!(bands[0], band(0, 250.0));
    assert_eq!(bands[1], band(1, 300.0));
}

// -----------------------------------------------------------------------------
// Engine forwarding
// -----------------------------------------------------------------------------

static CONFIGURES: AtomicUsize = AtomicUsize::new(0);
static INPUT_GAINS: AtomicUsize = AtomicUsize::new(0);

/// Engine that counts the calls it receives and copies samples through.
struct CountingEngine;

impl DynamicsEngine for CountingEngine {
    fn configure(&mut self, _setup: &EngineSetup) {
        CONFIGURES.fetch_add(1, Ordering::SeqCst);
    }
    fn set_stage_enabled(&mut self, _stage: Stage, _channel: usize, _enabled: bool) {}
    fn set_eq_band(&mut self, _stage: EqStage, _config: &EqBandConfig) {}
    fn set_mbc_band(&mut self, _config: &MbcBandConfig) {}
    fn set_limiter(&mut self, _config: &LimiterConfig) {}
    fn set_input_gain(&mut self, _channel: usize, _gain_db: f32) {
        INPUT_GAINS.fetch_add(1, Ordering::SeqCst);
    }
    fn reset(&mut self) {}
    fn process(&mut self, input: &[f32], output: &mut [f32]) -> usize {
        output.copy_from_slice(input);
        input.len()
    }
}

fn counting_engine(_capability: DynamicsCapability) -> Box<dyn DynamicsEngine> {
    Box::new(CountingEngine)
}

#[test]
fn test_engine_receives_replay_and_changes() {
    init_logger();
    let effect =
        create_effect_with_engine(Some(&DYNAMICS_PROCESSING_IMPL_UUID), counting_engine).unwrap();
    effect.open(&stereo(), None).unwrap();
    // One configure on creation, with one input gain per channel replayed
    assert_eq!(CONFIGURES.load(Ordering::SeqCst), 1);
    assert_eq!(INPUT_GAINS.load(Ordering::SeqCst), 2);

    effect
        .set_parameter(&dp(DynamicsProcessing::InputGain(vec![InputGain {
            channel: 0,
            gain_db: 3.0,
        }])))
        .unwrap();
    assert_eq!(INPUT_GAINS.load(Ordering::SeqCst), 3);

    // Rejected requests never reach the engine
    let _ = effect.set_parameter(&dp(DynamicsProcessing::InputGain(vec![
        InputGain {
            channel: 0,
            gain_db: 1.0,
        },
        InputGain {
            channel: 9,
            gain_db: 1.0,
        },
    ])));
    assert_eq!(INPUT_GAINS.load(Ordering::SeqCst), 3);

    effect
        .set_parameter(&dp(DynamicsProcessing::EngineArchitecture(limiter_architecture())))
        .unwrap();
    assert_eq!(CONFIGURES.load(Ordering::SeqCst), 2);
}
