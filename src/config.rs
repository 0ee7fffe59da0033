//! Engine configuration.
//!
//! Everything here is fixed when a [`FreezeEffect`](crate::freeze::FreezeEffect)
//! is built. Parameters that change while running live in
//! [`EffectConfig`] and are staged through
//! [`StagedParameters`](crate::freeze::parameters::StagedParameters).

use crate::error::{Error, Result};
use crate::freeze::parameters::EffectConfig;
use crate::freeze::playback::{CrossFadeCurve, Interpolation};
use crate::modulation::LfoShape;
use crate::DEFAULT_SAMPLE_RATE;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FreezeConfig {
    /// Sample rate in Hz, used to advance the modulation oscillators.
    pub sample_rate: f32,

    pub interpolation: Interpolation,

    /// Length of the loop seam cross-fade, in samples. Limited to half the
    /// loop at runtime.
    pub cross_fade_samples: usize,
    pub cross_fade_curve: CrossFadeCurve,

    /// Waveform of both wow and flutter oscillators.
    pub lfo_shape: LfoShape,

    /// Seed for the oscillators' frequency draws.
    pub seed: u32,

    /// Parameters in effect before the first staged change.
    pub initial: EffectConfig,
}

impl Default for FreezeConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            interpolation: Interpolation::Cubic,
            cross_fade_samples: 64,
            cross_fade_curve: CrossFadeCurve::Linear,
            lfo_shape: LfoShape::Sine,
            seed: 0x21,
            initial: EffectConfig::default(),
        }
    }
}

impl FreezeConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(Error::InvalidSampleRate(self.sample_rate));
        }

        for range in [self.initial.wow_range, self.initial.flutter_range] {
            if !range.is_valid() {
                return Err(Error::InvalidFrequencyRange {
                    min: range.min,
                    max: range.max,
                });
            }
        }

        Ok(())
    }
}
