//! Native time-domain engine.
//!
//! [`DpEngine`] owns one [`ChannelChain`] per channel and processes
//! interleaved audio frame by frame. Limiters in the same link group share
//! one detector level: the loudest of their pre-limiter samples.

use dynproc_core::{
    DynamicsCapability, DynamicsEngine, EngineSetup, EqBandConfig, EqStage, LimiterConfig,
    MbcBandConfig, Stage, MAX_CHANNELS,
};

use crate::channel::ChannelChain;

/// Time-domain implementation of [`DynamicsEngine`].
#[derive(Debug, Clone)]
pub struct DpEngine {
    capability: DynamicsCapability,
    setup: Option<EngineSetup>,
    channels: Vec<ChannelChain>,
}

impl DpEngine {
    /// Create an unconfigured engine. Default band edges are spread over
    /// the capability's cutoff range.
    pub fn new(capability: DynamicsCapability) -> Self {
        Self {
            capability,
            setup: None,
            channels: Vec::new(),
        }
    }

    pub fn setup(&self) -> Option<&EngineSetup> {
        self.setup.as_ref()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, channel: usize) -> Option<&ChannelChain> {
        self.channels.get(channel)
    }

    fn channel_mut(&mut self, channel: i32) -> Option<&mut ChannelChain> {
        usize::try_from(channel)
            .ok()
            .and_then(|index| self.channels.get_mut(index))
    }
}

impl DynamicsEngine for DpEngine {
    fn configure(&mut self, setup: &EngineSetup) {
        let channel_count = setup.channel_count.min(MAX_CHANNELS);
        let DynamicsCapability {
            min_cutoff_freq,
            max_cutoff_freq,
        } = self.capability;

        self.channels = (0..channel_count)
            .map(|_| {
                ChannelChain::new(
                    &setup.architecture,
                    setup.sample_rate,
                    min_cutoff_freq,
                    max_cutoff_freq,
                )
            })
            .collect();

        log::debug!(
            "engine configured: {} Hz, {} channels, {:?}",
            setup.sample_rate,
            channel_count,
            setup.architecture
        );
        self.setup = Some(setup.clone());
    }

    fn set_stage_enabled(&mut self, stage: Stage, channel: usize, enabled: bool) {
        if let Some(chain) = self.channels.get_mut(channel) {
            chain.set_stage_enabled(stage, enabled);
        }
    }

    fn set_eq_band(&mut self, stage: EqStage, config: &EqBandConfig) {
        if let Some(eq) = self.channel_mut(config.channel).and_then(|c| c.eq_mut(stage)) {
            eq.set_band(config);
        }
    }

    fn set_mbc_band(&mut self, config: &MbcBandConfig) {
        if let Some(mbc) = self.channel_mut(config.channel).and_then(ChannelChain::mbc_mut) {
            mbc.set_band(config);
        }
    }

    fn set_limiter(&mut self, config: &LimiterConfig) {
        if let Some(limiter) = self
            .channel_mut(config.channel)
            .and_then(ChannelChain::limiter_mut)
        {
            limiter.set_config(*config);
        }
    }

    fn set_input_gain(&mut self, channel: usize, gain_db: f32) {
        if let Some(chain) = self.channels.get_mut(channel) {
            chain.set_input_gain(gain_db);
        }
    }

    fn reset(&mut self) {
        self.channels.iter_mut().for_each(ChannelChain::reset);
    }

    fn process(&mut self, input: &[f32], output: &mut [f32]) -> usize {
        let channel_count = self.channels.len();
        if channel_count == 0 {
            return 0;
        }
        let frames = input.len().min(output.len()) / channel_count;
        let samples = frames * channel_count;

        let mut staged = [0.0_f32; MAX_CHANNELS];
        let mut groups = [None::<i32>; MAX_CHANNELS];
        for (frame_in, frame_out) in input[..samples]
            .chunks_exact(channel_count)
            .zip(output[..samples].chunks_exact_mut(channel_count))
        {
            for (ch, chain) in self.channels.iter_mut().enumerate() {
                staged[ch] = chain.process_stages(frame_in[ch]);
                groups[ch] = chain.active_link_group();
            }

            for (ch, chain) in self.channels.iter_mut().enumerate() {
                let detector = match groups[ch] {
                    Some(group) => staged[..channel_count]
                        .iter()
                        .zip(&groups[..channel_count])
                        .filter(|(_, g)| **g == Some(group))
                        .fold(0.0_f32, |peak, (x, _)| peak.max(x.abs())),
                    None => staged[ch].abs(),
                };
                frame_out[ch] = chain.process_limiter(staged[ch], detector);
            }
        }
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynproc_core::{EngineArchitecture, StageEnablement};

    fn capability() -> DynamicsCapability {
        DynamicsCapability {
            min_cutoff_freq: 220.0,
            max_cutoff_freq: 20000.0,
        }
    }

    fn configured(architecture: EngineArchitecture, channel_count: usize) -> DpEngine {
        let mut engine = DpEngine::new(capability());
        engine.configure(&EngineSetup {
            sample_rate: 48000.0,
            channel_count,
            architecture,
        });
        engine
    }

    fn full_architecture() -> EngineArchitecture {
        EngineArchitecture {
            pre_eq_stage: StageEnablement::with_bands(3),
            post_eq_stage: StageEnablement::with_bands(3),
            mbc_stage: StageEnablement::with_bands(3),
            limiter_in_use: true,
            ..Default::default()
        }
    }

    fn instant_limiter(channel: i32, link_group: i32) -> LimiterConfig {
        LimiterConfig {
            channel,
            link_group,
            attack_time_ms: 0.0,
            release_time_ms: 0.0,
            ratio: 1000.0,
            threshold_db: -20.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_unconfigured_engine_processes_nothing() {
        let mut engine = DpEngine::new(capability());
        let mut out = [0.0; 4];
        assert_eq!(engine.process(&[0.1; 4], &mut out), 0);
    }

    #[test]
    fn test_partial_frame_is_dropped() {
        let mut engine = configured(EngineArchitecture::default(), 2);
        let mut out = [9.0; 5];
        assert_eq!(engine.process(&[0.25; 5], &mut out), 4);
        assert_eq!(&out[..4], &[0.25; 4]);
        assert_eq!(out[4], 9.0);
    }

    #[test]
    fn test_default_chain_is_transparent() {
        let mut engine = configured(full_architecture(), 2);
        let input = vec![0.05_f32; 2 * 48000];
        let mut output = vec![0.0; input.len()];
        assert_eq!(engine.process(&input, &mut output), input.len());
        let last = &output[output.len() - 2..];
        assert!((last[0] - 0.05).abs() < 1e-3);
        assert!((last[1] - 0.05).abs() < 1e-3);
    }

    #[test]
    fn test_linked_limiters_share_detector() {
        let architecture = EngineArchitecture {
            limiter_in_use: true,
            ..Default::default()
        };

        let mut linked = configured(architecture, 2);
        linked.set_limiter(&instant_limiter(0, 1));
        linked.set_limiter(&instant_limiter(1, 1));
        let mut out = [0.0; 2];
        linked.process(&[1.0, 0.05], &mut out);
        // Quiet channel is pulled down with the loud one
        assert!(out[1] < 0.01);

        let mut unlinked = configured(architecture, 2);
        unlinked.set_limiter(&instant_limiter(0, 1));
        unlinked.set_limiter(&instant_limiter(1, 2));
        unlinked.process(&[1.0, 0.05], &mut out);
        assert!((out[1] - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_stage_toggle_and_reset() {
        let mut engine = configured(full_architecture(), 1);
        engine.set_stage_enabled(Stage::Mbc, 0, false);
        assert!(!engine.channel(0).unwrap().is_stage_enabled(Stage::Mbc));
        engine.set_stage_enabled(Stage::Mbc, 5, false);
        engine.set_input_gain(0, -6.0);
        engine.reset();
        assert_eq!(engine.channel_count(), 1);
        assert_eq!(engine.setup().unwrap().channel_count, 1);
    }
}
