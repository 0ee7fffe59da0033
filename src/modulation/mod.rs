//! Pitch/time modulation sources.
//!
//! The playback path is modulated by two [`random_lfo::RandomLfo`] instances:
//! a slow one ("wow") and a fast one ("flutter").

pub mod random_lfo;
pub mod sine_table;

#[allow(unused_imports)]
use num_traits::float::Float;

/// Waveform drawn over each half-cycle of a [`random_lfo::RandomLfo`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LfoShape {
    #[default]
    Sine,
    Triangle,
}

impl LfoShape {
    /// Unipolar half-cycle value for `phase` in `[0, 1]`. Zero at both ends,
    /// one at the midpoint.
    #[inline]
    pub fn half_cycle(self, phase: f32) -> f32 {
        match self {
            LfoShape::Sine => sine_table::half_sine(phase),
            LfoShape::Triangle => {
                let p = phase.clamp(0.0, 1.0);
                1.0 - (2.0 * p - 1.0).abs()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_cycle_endpoints() {
        for shape in [LfoShape::Sine, LfoShape::Triangle] {
            assert!(shape.half_cycle(0.0).abs() < 1e-6);
            assert!(shape.half_cycle(1.0).abs() < 1e-6);
            assert!((shape.half_cycle(0.5) - 1.0).abs() < 1e-4);
        }
    }
}
