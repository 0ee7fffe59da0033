//! Half-sine lookup table.

#[allow(unused_imports)]
use num_traits::float::Float;
use spin::Once;

use crate::utils::interpolate;

pub const HALF_SINE_TABLE_SIZE: usize = 256;

static HALF_SINE: Once<[f32; HALF_SINE_TABLE_SIZE + 1]> = Once::new();

/// Table of `sin(pi * i / HALF_SINE_TABLE_SIZE)`, built on first use.
pub fn table() -> &'static [f32; HALF_SINE_TABLE_SIZE + 1] {
    HALF_SINE.call_once(|| {
        core::array::from_fn(|i| {
            (core::f32::consts::PI * i as f32 / HALF_SINE_TABLE_SIZE as f32).sin()
        })
    })
}

/// `sin(pi * phase)` for `phase` in `[0, 1]`.
#[inline]
pub fn half_sine(phase: f32) -> f32 {
    interpolate(table(), phase, HALF_SINE_TABLE_SIZE as f32)
}
