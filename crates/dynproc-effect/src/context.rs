//! Per-instance effect context.
//!
//! The context owns the DSP engine and the authoritative copy of every
//! dynamics setting. Getters answer from the cached settings, never from
//! the engine. Every accepted change is written to the cache and forwarded
//! to the engine; when the engine has to be rebuilt (new architecture, new
//! sample rate or channel count) the whole cache is replayed into it.
//!
//! Requests are validated in full before anything is applied, so a rejected
//! request leaves both cache and engine untouched.

use dynproc_core::ranges;
use dynproc_core::{
    ChannelConfig, Common, DynamicsCapability, DynamicsEngine, EffectError, EffectResult,
    EffectStatus, EngineArchitecture, EngineSetup, EqBandConfig, EqStage, InputGain,
    LimiterConfig, MbcBandConfig, Stage, VolumeStereo, MAX_CHANNELS,
};
use dynproc_dsp::{default_cutoffs, DpEngine};
use serde::{Deserialize, Serialize};

/// Builds the engine a context drives.
pub type EngineFactory = fn(DynamicsCapability) -> Box<dyn DynamicsEngine>;

/// The native time-domain engine.
pub fn native_engine(capability: DynamicsCapability) -> Box<dyn DynamicsEngine> {
    Box::new(DpEngine::new(capability))
}

// =============================================================================
// Cached Settings
// =============================================================================

/// Complete dynamics configuration of one instance.
///
/// Per-channel lists hold one entry per channel; band lists are laid out
/// channel-major (`channel * band_count + band`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicsSettings {
    pub architecture: EngineArchitecture,
    pub pre_eq: Vec<ChannelConfig>,
    pub post_eq: Vec<ChannelConfig>,
    pub mbc: Vec<ChannelConfig>,
    pub pre_eq_bands: Vec<EqBandConfig>,
    pub post_eq_bands: Vec<EqBandConfig>,
    pub mbc_bands: Vec<MbcBandConfig>,
    pub limiters: Vec<LimiterConfig>,
    pub input_gains: Vec<InputGain>,
}

impl DynamicsSettings {
    /// Default settings for an architecture and channel count.
    pub fn defaults(
        architecture: EngineArchitecture,
        channel_count: usize,
        capability: &DynamicsCapability,
    ) -> Self {
        let channels = 0..channel_count as i32;
        let channel_configs = |stage: Stage| -> Vec<ChannelConfig> {
            let enable = architecture.stage(stage).in_use;
            channels.clone().map(|channel| ChannelConfig { channel, enable }).collect()
        };
        let cutoffs = |stage: Stage| {
            default_cutoffs(
                architecture.stage(stage).active_bands(),
                capability.min_cutoff_freq,
                capability.max_cutoff_freq,
            )
        };
        let eq_bands = |stage: Stage| -> Vec<EqBandConfig> {
            let cutoffs = cutoffs(stage);
            channels
                .clone()
                .flat_map(|channel| {
                    cutoffs.iter().enumerate().map(move |(band, &cutoff)| EqBandConfig {
                        channel,
                        band: band as i32,
                        enable: true,
                        cutoff_frequency_hz: cutoff,
                        gain_db: 0.0,
                    })
                })
                .collect()
        };
        let mbc_cutoffs = cutoffs(Stage::Mbc);

        Self {
            architecture,
            pre_eq: channel_configs(Stage::PreEq),
            post_eq: channel_configs(Stage::PostEq),
            mbc: channel_configs(Stage::Mbc),
            pre_eq_bands: eq_bands(Stage::PreEq),
            post_eq_bands: eq_bands(Stage::PostEq),
            mbc_bands: channels
                .clone()
                .flat_map(|channel| {
                    mbc_cutoffs.iter().enumerate().map(move |(band, &cutoff)| MbcBandConfig {
                        channel,
                        band: band as i32,
                        cutoff_frequency_hz: cutoff,
                        ..Default::default()
                    })
                })
                .collect(),
            limiters: channels
                .clone()
                .map(|channel| LimiterConfig {
                    channel,
                    ..Default::default()
                })
                .collect(),
            input_gains: channels
                .map(|channel| InputGain {
                    channel,
                    gain_db: 0.0,
                })
                .collect(),
        }
    }

    pub fn channel_count(&self) -> usize {
        self.input_gains.len()
    }

    /// The limiter has no per-channel stage switch of its own.
    fn channel_configs_mut(&mut self, stage: Stage) -> Option<&mut Vec<ChannelConfig>> {
        match stage {
            Stage::PreEq => Some(&mut self.pre_eq),
            Stage::PostEq => Some(&mut self.post_eq),
            Stage::Mbc => Some(&mut self.mbc),
            Stage::Limiter => None,
        }
    }

    fn eq_bands(&self, stage: EqStage) -> &[EqBandConfig] {
        match stage {
            EqStage::Pre => &self.pre_eq_bands,
            EqStage::Post => &self.post_eq_bands,
        }
    }

    fn eq_bands_mut(&mut self, stage: EqStage) -> &mut Vec<EqBandConfig> {
        match stage {
            EqStage::Pre => &mut self.pre_eq_bands,
            EqStage::Post => &mut self.post_eq_bands,
        }
    }

    fn band_slot(&self, stage: Stage, channel: i32, band: i32) -> usize {
        channel as usize * self.architecture.stage(stage).active_bands() + band as usize
    }

    // The setters below expect validated entries.

    fn set_channel_config(&mut self, stage: Stage, config: ChannelConfig) {
        if let Some(slot) = self
            .channel_configs_mut(stage)
            .and_then(|configs| configs.get_mut(config.channel as usize))
        {
            *slot = config;
        }
    }

    fn set_eq_band(&mut self, stage: EqStage, config: EqBandConfig) {
        let index = self.band_slot(stage.stage(), config.channel, config.band);
        if let Some(slot) = self.eq_bands_mut(stage).get_mut(index) {
            *slot = config;
        }
    }

    fn set_mbc_band(&mut self, config: MbcBandConfig) {
        let index = self.band_slot(Stage::Mbc, config.channel, config.band);
        if let Some(slot) = self.mbc_bands.get_mut(index) {
            *slot = config;
        }
    }

    fn set_limiter(&mut self, config: LimiterConfig) {
        if let Some(slot) = self.limiters.get_mut(config.channel as usize) {
            *slot = config;
        }
    }

    fn set_input_gain(&mut self, gain: InputGain) {
        if let Some(slot) = self.input_gains.get_mut(gain.channel as usize) {
            *slot = gain;
        }
    }

    /// Band cutoffs must increase with the band index on every channel.
    fn check_cutoff_order(&self) -> EffectResult<()> {
        let eq = |bands: &[EqBandConfig]| {
            ranges::validate_cutoff_order(
                bands
                    .iter()
                    .map(|b| (b.channel, b.band, b.cutoff_frequency_hz)),
            )
        };
        eq(&self.pre_eq_bands)?;
        eq(&self.post_eq_bands)?;
        ranges::validate_cutoff_order(
            self.mbc_bands
                .iter()
                .map(|b| (b.channel, b.band, b.cutoff_frequency_hz)),
        )
    }

    /// Copy every entry of `other` that fits into `self`.
    fn merge(&mut self, other: &DynamicsSettings) {
        let fits = |channel: i32| channel >= 0 && (channel as usize) < self.channel_count();
        let bands_fit = |stage: Stage, band: i32| {
            band >= 0 && (band as usize) < self.architecture.stage(stage).active_bands()
        };

        let mut updates = Vec::new();
        for (stage, list) in [
            (Stage::PreEq, &other.pre_eq),
            (Stage::PostEq, &other.post_eq),
            (Stage::Mbc, &other.mbc),
        ] {
            updates.extend(list.iter().filter(|c| fits(c.channel)).map(|c| (stage, *c)));
        }
        let eq: Vec<_> = [EqStage::Pre, EqStage::Post]
            .into_iter()
            .flat_map(|stage| {
                other
                    .eq_bands(stage)
                    .iter()
                    .filter(move |b| fits(b.channel) && bands_fit(stage.stage(), b.band))
                    .map(move |b| (stage, *b))
            })
            .collect();
        let mbc: Vec<_> = other
            .mbc_bands
            .iter()
            .filter(|b| fits(b.channel) && bands_fit(Stage::Mbc, b.band))
            .copied()
            .collect();
        let limiters: Vec<_> = other
            .limiters
            .iter()
            .filter(|l| fits(l.channel))
            .copied()
            .collect();
        let gains: Vec<_> = other
            .input_gains
            .iter()
            .filter(|g| fits(g.channel))
            .copied()
            .collect();

        for (stage, config) in updates {
            self.set_channel_config(stage, config);
        }
        for (stage, band) in eq {
            self.set_eq_band(stage, band);
        }
        mbc.into_iter().for_each(|band| self.set_mbc_band(band));
        limiters.into_iter().for_each(|limiter| self.set_limiter(limiter));
        gains.into_iter().for_each(|gain| self.set_input_gain(gain));
    }
}

// =============================================================================
// Validation
// =============================================================================

fn check_channel(channel: i32, channel_count: usize) -> EffectResult<()> {
    if channel >= 0 && (channel as usize) < channel_count {
        Ok(())
    } else {
        Err(EffectError::illegal_argument(format!(
            "channel {channel} outside [0, {channel_count})"
        )))
    }
}

fn check_channels(
    channels: impl IntoIterator<Item = i32>,
    channel_count: usize,
) -> EffectResult<()> {
    let mut seen = [false; MAX_CHANNELS];
    for channel in channels {
        check_channel(channel, channel_count)?;
        let slot = &mut seen[channel as usize];
        if *slot {
            return Err(EffectError::illegal_argument(format!(
                "duplicated channel {channel}"
            )));
        }
        *slot = true;
    }
    Ok(())
}

fn check_stage_in_use(architecture: &EngineArchitecture, stage: Stage) -> EffectResult<()> {
    if architecture.stage(stage).in_use {
        Ok(())
    } else {
        Err(EffectError::illegal_argument(format!(
            "{} not in use",
            stage.name()
        )))
    }
}

fn check_band(architecture: &EngineArchitecture, stage: Stage, band: i32) -> EffectResult<()> {
    let band_count = architecture.stage(stage).active_bands();
    if band >= 0 && (band as usize) < band_count {
        Ok(())
    } else {
        Err(EffectError::illegal_argument(format!(
            "{} band {band} outside [0, {band_count})",
            stage.name()
        )))
    }
}

/// Channel count of a stream configuration.
fn check_common(common: &Common) -> EffectResult<usize> {
    let input = common.input.channel_layout.channel_count();
    let output = common.output.channel_layout.channel_count();
    if input == 0 || input > MAX_CHANNELS {
        return Err(EffectError::illegal_argument(format!(
            "channel count {input} outside [1, {MAX_CHANNELS}]"
        )));
    }
    if input != output {
        return Err(EffectError::illegal_argument(format!(
            "input channels {input} differ from output channels {output}"
        )));
    }
    if common.input.sample_rate <= 0 {
        return Err(EffectError::illegal_argument(format!(
            "sample rate {}",
            common.input.sample_rate
        )));
    }
    Ok(input)
}

/// Requests checked against an architecture and channel count.
struct Validator<'a> {
    architecture: &'a EngineArchitecture,
    channel_count: usize,
    capability: &'a DynamicsCapability,
}

impl Validator<'_> {
    fn channel_configs(&self, stage: Stage, configs: &[ChannelConfig]) -> EffectResult<()> {
        check_stage_in_use(self.architecture, stage)?;
        check_channels(configs.iter().map(|c| c.channel), self.channel_count)
    }

    fn eq_bands(&self, stage: EqStage, bands: &[EqBandConfig]) -> EffectResult<()> {
        check_stage_in_use(self.architecture, stage.stage())?;
        ranges::validate_eq_bands(bands, self.capability)?;
        for band in bands {
            check_channel(band.channel, self.channel_count)?;
            check_band(self.architecture, stage.stage(), band.band)?;
        }
        Ok(())
    }

    fn mbc_bands(&self, bands: &[MbcBandConfig]) -> EffectResult<()> {
        check_stage_in_use(self.architecture, Stage::Mbc)?;
        ranges::validate_mbc_bands(bands, self.capability)?;
        for band in bands {
            check_channel(band.channel, self.channel_count)?;
            check_band(self.architecture, Stage::Mbc, band.band)?;
        }
        Ok(())
    }

    fn limiters(&self, limiters: &[LimiterConfig]) -> EffectResult<()> {
        check_stage_in_use(self.architecture, Stage::Limiter)?;
        ranges::validate_limiters(limiters)?;
        check_channels(limiters.iter().map(|l| l.channel), self.channel_count)
    }

    fn input_gains(&self, gains: &[InputGain]) -> EffectResult<()> {
        ranges::validate_input_gains(gains)?;
        check_channels(gains.iter().map(|g| g.channel), self.channel_count)
    }

    /// A complete settings snapshot.
    fn settings(&self, settings: &DynamicsSettings) -> EffectResult<()> {
        let arch = self.architecture;
        if arch.pre_eq_stage.in_use {
            self.channel_configs(Stage::PreEq, &settings.pre_eq)?;
            self.eq_bands(EqStage::Pre, &settings.pre_eq_bands)?;
        }
        if arch.post_eq_stage.in_use {
            self.channel_configs(Stage::PostEq, &settings.post_eq)?;
            self.eq_bands(EqStage::Post, &settings.post_eq_bands)?;
        }
        if arch.mbc_stage.in_use {
            self.channel_configs(Stage::Mbc, &settings.mbc)?;
            self.mbc_bands(&settings.mbc_bands)?;
        }
        if arch.limiter_in_use {
            self.limiters(&settings.limiters)?;
        }
        self.input_gains(&settings.input_gains)
    }
}

// =============================================================================
// Context
// =============================================================================

/// Dynamics processing state of one opened effect instance.
pub struct DynamicsProcessingContext {
    capability: DynamicsCapability,
    engine: Box<dyn DynamicsEngine>,
    common: Common,
    volume: VolumeStereo,
    enabled: bool,
    settings: DynamicsSettings,
}

impl std::fmt::Debug for DynamicsProcessingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicsProcessingContext")
            .field("common", &self.common)
            .field("enabled", &self.enabled)
            .field("architecture", &self.settings.architecture)
            .finish_non_exhaustive()
    }
}

impl DynamicsProcessingContext {
    /// Create a context with default settings and a configured engine.
    pub fn new(
        common: &Common,
        capability: DynamicsCapability,
        engine_factory: EngineFactory,
    ) -> EffectResult<Self> {
        let channel_count = check_common(common)?;
        let mut context = Self {
            capability,
            engine: engine_factory(capability),
            common: common.clone(),
            volume: VolumeStereo::default(),
            enabled: false,
            settings: DynamicsSettings::defaults(
                EngineArchitecture::default(),
                channel_count,
                &capability,
            ),
        };
        context.rebuild();
        log::debug!("context created: {:?}", context);
        Ok(context)
    }

    fn validator(&self) -> Validator<'_> {
        Validator {
            architecture: &self.settings.architecture,
            channel_count: self.channel_count(),
            capability: &self.capability,
        }
    }

    fn setup(&self) -> EngineSetup {
        EngineSetup {
            sample_rate: self.common.input.sample_rate as f64,
            channel_count: self.channel_count(),
            architecture: self.settings.architecture,
        }
    }

    /// Reconfigure the engine and replay the cached settings into it.
    fn rebuild(&mut self) {
        let setup = self.setup();
        self.engine.configure(&setup);
        let s = &self.settings;
        for (stage, configs) in [
            (Stage::PreEq, &s.pre_eq),
            (Stage::PostEq, &s.post_eq),
            (Stage::Mbc, &s.mbc),
        ] {
            for config in configs {
                self.engine
                    .set_stage_enabled(stage, config.channel as usize, config.enable);
            }
        }
        for channel in 0..s.channel_count() {
            self.engine
                .set_stage_enabled(Stage::Limiter, channel, s.architecture.limiter_in_use);
        }
        for band in &s.pre_eq_bands {
            self.engine.set_eq_band(EqStage::Pre, band);
        }
        for band in &s.post_eq_bands {
            self.engine.set_eq_band(EqStage::Post, band);
        }
        for band in &s.mbc_bands {
            self.engine.set_mbc_band(band);
        }
        for limiter in &s.limiters {
            self.engine.set_limiter(limiter);
        }
        for gain in &s.input_gains {
            self.engine.set_input_gain(gain.channel as usize, gain.gain_db);
        }
    }

    // -------------------------------------------------------------------------
    // Enable / buffers
    // -------------------------------------------------------------------------

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Clear the engine's signal history.
    pub fn reset_buffer(&mut self) {
        self.engine.reset();
    }

    // -------------------------------------------------------------------------
    // Common parameters
    // -------------------------------------------------------------------------

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn channel_count(&self) -> usize {
        self.settings.channel_count()
    }

    pub fn sample_rate(&self) -> i32 {
        self.common.input.sample_rate
    }

    /// Apply a new stream configuration. The engine is rebuilt when the
    /// sample rate or the channel count changes; settings of surviving
    /// channels are kept.
    pub fn set_common(&mut self, common: &Common) -> EffectResult<()> {
        let channel_count = check_common(common)?;
        let rebuild = channel_count != self.channel_count()
            || common.input.sample_rate != self.common.input.sample_rate;
        self.common = common.clone();
        if rebuild {
            let mut settings = DynamicsSettings::defaults(
                self.settings.architecture,
                channel_count,
                &self.capability,
            );
            settings.merge(&self.settings);
            self.settings = settings;
            self.rebuild();
            log::debug!("set_common: rebuilt for {:?}", self.setup());
        }
        Ok(())
    }

    pub fn volume_stereo(&self) -> VolumeStereo {
        self.volume
    }

    pub fn set_volume_stereo(&mut self, volume: VolumeStereo) {
        self.volume = volume;
    }

    // -------------------------------------------------------------------------
    // Engine architecture
    // -------------------------------------------------------------------------

    pub fn engine_architecture(&self) -> EngineArchitecture {
        self.settings.architecture
    }

    /// Change the processing chain. A different architecture resets every
    /// stage setting to its default; the same architecture is a no-op.
    pub fn set_engine_architecture(
        &mut self,
        architecture: &EngineArchitecture,
    ) -> EffectResult<()> {
        ranges::validate_engine_architecture(architecture)?;
        if *architecture == self.settings.architecture {
            return Ok(());
        }
        self.settings =
            DynamicsSettings::defaults(*architecture, self.channel_count(), &self.capability);
        self.rebuild();
        log::debug!("set_engine_architecture: {:?}", architecture);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Stage enablement
    // -------------------------------------------------------------------------

    fn set_channel_configs(
        &mut self,
        stage: Stage,
        configs: &[ChannelConfig],
    ) -> EffectResult<()> {
        self.validator().channel_configs(stage, configs)?;
        for config in configs {
            self.settings.set_channel_config(stage, *config);
            self.engine
                .set_stage_enabled(stage, config.channel as usize, config.enable);
        }
        Ok(())
    }

    pub fn set_pre_eq(&mut self, configs: &[ChannelConfig]) -> EffectResult<()> {
        self.set_channel_configs(Stage::PreEq, configs)
    }

    pub fn pre_eq(&self) -> Vec<ChannelConfig> {
        self.settings.pre_eq.clone()
    }

    pub fn set_post_eq(&mut self, configs: &[ChannelConfig]) -> EffectResult<()> {
        self.set_channel_configs(Stage::PostEq, configs)
    }

    pub fn post_eq(&self) -> Vec<ChannelConfig> {
        self.settings.post_eq.clone()
    }

    pub fn set_mbc(&mut self, configs: &[ChannelConfig]) -> EffectResult<()> {
        self.set_channel_configs(Stage::Mbc, configs)
    }

    pub fn mbc(&self) -> Vec<ChannelConfig> {
        self.settings.mbc.clone()
    }

    // -------------------------------------------------------------------------
    // Bands
    // -------------------------------------------------------------------------

    /// Band requests are checked against the bands already in place, so the
    /// cutoffs stay ordered per channel after the request is merged.
    fn set_eq_bands(&mut self, stage: EqStage, bands: &[EqBandConfig]) -> EffectResult<()> {
        self.validator().eq_bands(stage, bands)?;
        let mut staged = self.settings.clone();
        for band in bands {
            staged.set_eq_band(stage, *band);
        }
        staged.check_cutoff_order()?;

        self.settings = staged;
        for band in bands {
            self.engine.set_eq_band(stage, band);
        }
        Ok(())
    }

    pub fn set_pre_eq_band(&mut self, bands: &[EqBandConfig]) -> EffectResult<()> {
        self.set_eq_bands(EqStage::Pre, bands)
    }

    pub fn pre_eq_band(&self) -> Vec<EqBandConfig> {
        self.settings.pre_eq_bands.clone()
    }

    pub fn set_post_eq_band(&mut self, bands: &[EqBandConfig]) -> EffectResult<()> {
        self.set_eq_bands(EqStage::Post, bands)
    }

    pub fn post_eq_band(&self) -> Vec<EqBandConfig> {
        self.settings.post_eq_bands.clone()
    }

    pub fn set_mbc_band(&mut self, bands: &[MbcBandConfig]) -> EffectResult<()> {
        self.validator().mbc_bands(bands)?;
        let mut staged = self.settings.clone();
        for band in bands {
            staged.set_mbc_band(*band);
        }
        staged.check_cutoff_order()?;

        self.settings = staged;
        for band in bands {
            self.engine.set_mbc_band(band);
        }
        Ok(())
    }

    pub fn mbc_band(&self) -> Vec<MbcBandConfig> {
        self.settings.mbc_bands.clone()
    }

    // -------------------------------------------------------------------------
    // Limiter / input gain
    // -------------------------------------------------------------------------

    pub fn set_limiter(&mut self, limiters: &[LimiterConfig]) -> EffectResult<()> {
        self.validator().limiters(limiters)?;
        for limiter in limiters {
            self.settings.set_limiter(*limiter);
            self.engine.set_limiter(limiter);
        }
        Ok(())
    }

    pub fn limiter(&self) -> Vec<LimiterConfig> {
        self.settings.limiters.clone()
    }

    pub fn set_input_gain(&mut self, gains: &[InputGain]) -> EffectResult<()> {
        self.validator().input_gains(gains)?;
        for gain in gains {
            self.settings.set_input_gain(*gain);
            self.engine.set_input_gain(gain.channel as usize, gain.gain_db);
        }
        Ok(())
    }

    pub fn input_gain(&self) -> Vec<InputGain> {
        self.settings.input_gains.clone()
    }

    // -------------------------------------------------------------------------
    // Processing
    // -------------------------------------------------------------------------

    /// Process interleaved samples. Only whole frames are consumed. A
    /// disabled context copies input to output.
    pub fn process(&mut self, input: &[f32], output: &mut [f32]) -> EffectStatus {
        let channel_count = self.channel_count().max(1);
        let samples = input.len().min(output.len()) / channel_count * channel_count;
        if !self.enabled {
            output[..samples].copy_from_slice(&input[..samples]);
            return EffectStatus::ok(samples);
        }
        let processed = self.engine.process(&input[..samples], &mut output[..samples]);
        EffectStatus::ok(processed)
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    pub fn settings(&self) -> &DynamicsSettings {
        &self.settings
    }

    /// Serialize the dynamics settings.
    pub fn snapshot(&self) -> EffectResult<Vec<u8>> {
        serde_json::to_vec(&self.settings)
            .map_err(|e| EffectError::illegal_argument(format!("snapshot: {e}")))
    }

    /// Restore settings produced by [`snapshot`](Self::snapshot).
    ///
    /// The snapshot is validated against its own architecture and the
    /// current channel count before anything changes.
    pub fn restore(&mut self, data: &[u8]) -> EffectResult<()> {
        let snapshot: DynamicsSettings = serde_json::from_slice(data)
            .map_err(|e| EffectError::illegal_argument(format!("restore: {e}")))?;
        ranges::validate_engine_architecture(&snapshot.architecture)?;
        Validator {
            architecture: &snapshot.architecture,
            channel_count: self.channel_count(),
            capability: &self.capability,
        }
        .settings(&snapshot)?;

        let mut settings = DynamicsSettings::defaults(
            snapshot.architecture,
            self.channel_count(),
            &self.capability,
        );
        settings.merge(&snapshot);
        settings.check_cutoff_order()?;
        self.settings = settings;
        self.rebuild();
        log::debug!("restore: {:?}", self.settings.architecture);
        Ok(())
    }
}
