//! Random LFO for wow and flutter.
//!
//! A bipolar oscillator whose frequency is redrawn at every zero crossing. Each
//! segment is one half-cycle of the configured [`LfoShape`] at the current
//! frequency, with the polarity alternating between segments, so the output is
//! continuous while the rate wanders pseudo-randomly inside
//! `[min_frequency, max_frequency]`.

use super::LfoShape;
use crate::utils::random::Random;

/// Lowest frequency an oscillator will ever run at, in Hz.
pub const MIN_LFO_FREQUENCY: f32 = 0.01;

#[derive(Debug, Clone)]
pub struct RandomLfo {
    min_frequency: f32,
    max_frequency: f32,

    /// Frequency drawn for the segment in flight.
    frequency: f32,
    /// Full period `1 / frequency`, in seconds.
    current_period: f32,
    elapsed_time: f32,
    previous_output: f32,
    cycle_count: u32,

    polarity: f32,
    shape: LfoShape,
    random: Random,
}

impl RandomLfo {
    pub fn new(min_frequency: f32, max_frequency: f32, shape: LfoShape, seed: u32) -> Self {
        let mut lfo = Self {
            min_frequency: MIN_LFO_FREQUENCY,
            max_frequency: MIN_LFO_FREQUENCY,
            frequency: MIN_LFO_FREQUENCY,
            current_period: 1.0 / MIN_LFO_FREQUENCY,
            elapsed_time: 0.0,
            previous_output: 0.0,
            cycle_count: 0,
            polarity: 1.0,
            shape,
            random: Random::new(seed),
        };
        lfo.set_frequency_range(min_frequency, max_frequency);
        lfo.draw_frequency();
        lfo
    }

    /// Restarts the oscillator at a zero crossing with a freshly drawn frequency.
    pub fn reset(&mut self) {
        self.elapsed_time = 0.0;
        self.previous_output = 0.0;
        self.polarity = 1.0;
        self.draw_frequency();
    }

    /// Sets the range for subsequent draws. The segment in flight keeps its
    /// frequency. Bounds are ordered and floored at [`MIN_LFO_FREQUENCY`].
    pub fn set_frequency_range(&mut self, min_frequency: f32, max_frequency: f32) {
        let a = sanitize_frequency(min_frequency);
        let b = sanitize_frequency(max_frequency);
        self.min_frequency = a.min(b);
        self.max_frequency = a.max(b);
    }

    pub fn set_shape(&mut self, shape: LfoShape) {
        self.shape = shape;
    }

    #[inline]
    pub fn min_frequency(&self) -> f32 {
        self.min_frequency
    }

    #[inline]
    pub fn max_frequency(&self) -> f32 {
        self.max_frequency
    }

    #[inline]
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    #[inline]
    pub fn current_period(&self) -> f32 {
        self.current_period
    }

    /// Number of half-cycles completed since construction.
    #[inline]
    pub fn cycle_count(&self) -> u32 {
        self.cycle_count
    }

    /// Last output of [`next`](Self::next).
    #[inline]
    pub fn value(&self) -> f32 {
        self.previous_output
    }

    /// Advances by `time_increment` seconds and returns the output in `[-1, 1]`.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self, time_increment: f32) -> f32 {
        if time_increment > 0.0 {
            self.elapsed_time += time_increment;
        }

        let half_period = self.current_period * 0.5;
        if self.elapsed_time >= half_period {
            let overshoot = self.elapsed_time - half_period;
            self.polarity = -self.polarity;
            self.cycle_count = self.cycle_count.wrapping_add(1);
            self.draw_frequency();

            // Carry the remainder into the new segment, at most one segment.
            let new_half_period = self.current_period * 0.5;
            self.elapsed_time = if overshoot < new_half_period {
                overshoot
            } else {
                0.0
            };
        }

        let phase = self.elapsed_time / (self.current_period * 0.5);
        self.previous_output = self.polarity * self.shape.half_cycle(phase);
        self.previous_output
    }

    fn draw_frequency(&mut self) {
        self.frequency = self
            .random
            .get_ranged(self.min_frequency, self.max_frequency)
            .clamp(self.min_frequency, self.max_frequency);
        self.current_period = 1.0 / self.frequency;
    }
}

#[inline]
fn sanitize_frequency(frequency: f32) -> f32 {
    if frequency.is_finite() {
        frequency.max(MIN_LFO_FREQUENCY)
    } else {
        MIN_LFO_FREQUENCY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 48_000.0;

    #[test]
    fn output_is_bipolar_and_bounded() {
        let mut lfo = RandomLfo::new(5.0, 15.0, LfoShape::Sine, 3);
        let mut min = 0.0f32;
        let mut max = 0.0f32;
        for _ in 0..48_000 {
            let value = lfo.next(DT);
            assert!((-1.0..=1.0).contains(&value));
            min = min.min(value);
            max = max.max(value);
        }
        assert!(min < -0.9);
        assert!(max > 0.9);
    }

    #[test]
    fn frequency_only_changes_at_segment_end() {
        let mut lfo = RandomLfo::new(2.0, 20.0, LfoShape::Triangle, 11);
        let mut frequency = lfo.frequency();
        let mut cycles = lfo.cycle_count();
        let mut segment_time = 0.0f32;

        for _ in 0..96_000 {
            lfo.next(DT);
            segment_time += DT;
            if lfo.frequency() != frequency || lfo.cycle_count() != cycles {
                assert_eq!(lfo.cycle_count(), cycles.wrapping_add(1));
                let half_period = 0.5 / frequency;
                assert!(segment_time + 2.0 * DT >= half_period);
                assert!((2.0..=20.0).contains(&lfo.frequency()));
                frequency = lfo.frequency();
                cycles = lfo.cycle_count();
                segment_time = 0.0;
            }
        }
        assert!(cycles > 4);
    }

    #[test]
    fn range_change_applies_to_next_draw() {
        let mut lfo = RandomLfo::new(1.0, 1.0, LfoShape::Sine, 5);
        assert_eq!(lfo.frequency(), 1.0);
        lfo.set_frequency_range(10.0, 12.0);
        assert_eq!(lfo.frequency(), 1.0);

        // Just over half a second finishes the 1 Hz half-cycle.
        for _ in 0..24_100 {
            lfo.next(DT);
        }
        assert_eq!(lfo.cycle_count(), 1);
        assert!((10.0..=12.0).contains(&lfo.frequency()));
    }

    #[test]
    fn reversed_range_is_ordered() {
        let lfo = RandomLfo::new(8.0, 2.0, LfoShape::Sine, 1);
        assert_eq!(lfo.min_frequency(), 2.0);
        assert_eq!(lfo.max_frequency(), 8.0);
    }

    #[test]
    fn zero_increment_holds_output() {
        let mut lfo = RandomLfo::new(3.0, 3.0, LfoShape::Sine, 1);
        let a = lfo.next(0.01);
        let b = lfo.next(0.0);
        assert_eq!(a, b);
    }
}
