//! Per-channel processing chain.
//!
//! ```text
//! input gain -> pre-EQ -> MBC -> post-EQ -> limiter
//! ```
//!
//! A stage exists only when the architecture puts it in use; a stage that
//! exists can still be switched off per channel. The limiter is driven
//! separately because its detector level depends on the other channels of
//! its link group.

use dynproc_core::{EngineArchitecture, EqStage, LimiterConfig, Stage};

use crate::eq::BandEq;
use crate::limiter::Limiter;
use crate::mbc::MultibandCompressor;
use crate::smoothing::GainRamp;

const INPUT_GAIN_SMOOTHING_MS: f32 = 20.0;

/// A stage that can be toggled without losing its state.
#[derive(Debug, Clone)]
struct Slot<T> {
    enabled: bool,
    inner: T,
}

impl<T> Slot<T> {
    fn new(inner: T) -> Self {
        Self {
            enabled: true,
            inner,
        }
    }
}

/// Processing chain for one channel.
#[derive(Debug, Clone)]
pub struct ChannelChain {
    input_gain: GainRamp,
    pre_eq: Option<Slot<BandEq>>,
    mbc: Option<Slot<MultibandCompressor>>,
    post_eq: Option<Slot<BandEq>>,
    limiter: Option<Slot<Limiter>>,
}

impl ChannelChain {
    pub fn new(
        architecture: &EngineArchitecture,
        sample_rate: f64,
        min_hz: f32,
        max_hz: f32,
    ) -> Self {
        let eq = |stage: Stage| {
            let enablement = architecture.stage(stage);
            enablement.in_use.then(|| {
                let bands = enablement.active_bands();
                Slot::new(BandEq::new(bands, sample_rate, min_hz, max_hz))
            })
        };

        let mbc = architecture.mbc_stage.in_use.then(|| {
            Slot::new(MultibandCompressor::new(
                architecture.mbc_stage.active_bands(),
                sample_rate,
                min_hz,
                max_hz,
            ))
        });

        let limiter = architecture
            .limiter_in_use
            .then(|| Slot::new(Limiter::new(LimiterConfig::default(), sample_rate)));

        Self {
            input_gain: GainRamp::new(INPUT_GAIN_SMOOTHING_MS, sample_rate),
            pre_eq: eq(Stage::PreEq),
            mbc,
            post_eq: eq(Stage::PostEq),
            limiter,
        }
    }

    /// Switch a stage on or off. Stages not in use are left alone.
    pub fn set_stage_enabled(&mut self, stage: Stage, enabled: bool) {
        let slot = match stage {
            Stage::PreEq => self.pre_eq.as_mut().map(|s| &mut s.enabled),
            Stage::PostEq => self.post_eq.as_mut().map(|s| &mut s.enabled),
            Stage::Mbc => self.mbc.as_mut().map(|s| &mut s.enabled),
            Stage::Limiter => self.limiter.as_mut().map(|s| &mut s.enabled),
        };
        if let Some(flag) = slot {
            *flag = enabled;
        }
    }

    pub fn is_stage_enabled(&self, stage: Stage) -> bool {
        match stage {
            Stage::PreEq => self.pre_eq.as_ref().is_some_and(|s| s.enabled),
            Stage::PostEq => self.post_eq.as_ref().is_some_and(|s| s.enabled),
            Stage::Mbc => self.mbc.as_ref().is_some_and(|s| s.enabled),
            Stage::Limiter => self.limiter.as_ref().is_some_and(|s| s.enabled),
        }
    }

    pub fn eq_mut(&mut self, stage: EqStage) -> Option<&mut BandEq> {
        let slot = match stage {
            EqStage::Pre => self.pre_eq.as_mut(),
            EqStage::Post => self.post_eq.as_mut(),
        };
        slot.map(|s| &mut s.inner)
    }

    pub fn mbc_mut(&mut self) -> Option<&mut MultibandCompressor> {
        self.mbc.as_mut().map(|s| &mut s.inner)
    }

    pub fn limiter(&self) -> Option<&Limiter> {
        self.limiter.as_ref().map(|s| &s.inner)
    }

    pub fn limiter_mut(&mut self) -> Option<&mut Limiter> {
        self.limiter.as_mut().map(|s| &mut s.inner)
    }

    /// Link group of an active limiter, `None` when the limiter is off.
    pub fn active_link_group(&self) -> Option<i32> {
        self.limiter
            .as_ref()
            .filter(|s| s.enabled && s.inner.is_enabled())
            .map(|s| s.inner.link_group())
    }

    pub fn set_input_gain(&mut self, gain_db: f32) {
        self.input_gain.set_target_db(gain_db);
    }

    /// Run every stage before the limiter.
    #[inline]
    pub fn process_stages(&mut self, input: f32) -> f32 {
        let mut x = input * self.input_gain.next();
        if let Some(slot) = self.pre_eq.as_mut().filter(|s| s.enabled) {
            x = slot.inner.process(x);
        }
        if let Some(slot) = self.mbc.as_mut().filter(|s| s.enabled) {
            x = slot.inner.process(x);
        }
        if let Some(slot) = self.post_eq.as_mut().filter(|s| s.enabled) {
            x = slot.inner.process(x);
        }
        x
    }

    /// Run the limiter with the given detector level.
    #[inline]
    pub fn process_limiter(&mut self, input: f32, detector: f32) -> f32 {
        match self.limiter.as_mut().filter(|s| s.enabled) {
            Some(slot) => slot.inner.process(input, detector),
            None => input,
        }
    }

    pub fn reset(&mut self) {
        self.input_gain.settle();
        if let Some(slot) = self.pre_eq.as_mut() {
            slot.inner.reset();
        }
        if let Some(slot) = self.mbc.as_mut() {
            slot.inner.reset();
        }
        if let Some(slot) = self.post_eq.as_mut() {
            slot.inner.reset();
        }
        if let Some(slot) = self.limiter.as_mut() {
            slot.inner.reset();
        }
    }
}
