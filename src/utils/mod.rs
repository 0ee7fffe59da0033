//! Scalar utilities.
//!
//! Small numeric helpers shared by the capture, playback and modulation code.

pub mod random;

#[allow(unused_imports)]
use num_traits::float::Float;

/// Clamps `value` into `[min, max]`. NaN maps to `min`.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Blend of `a` and `b` where `fade` is the weight of `b`.
#[inline]
pub fn crossfade(a: f32, b: f32, fade: f32) -> f32 {
    a + (b - a) * fade
}

/// Cubic (Hermite) interpolation between `x0` and `x1`, using `xm1` and `x2` as
/// the outer neighbours.
#[inline]
pub fn interpolate_hermite(xm1: f32, x0: f32, x1: f32, x2: f32, f: f32) -> f32 {
    let c = (x1 - xm1) * 0.5;
    let v = x0 - x1;
    let w = c + v;
    let a = w + v + (x2 - x0) * 0.5;
    let b_neg = w + a;

    (((a * f) - b_neg) * f + c) * f + x0
}

/// Linear table lookup with `index` in `[0, 1]` over `size` intervals.
/// The table must hold `size + 1` entries.
#[inline]
pub fn interpolate(table: &[f32], mut index: f32, size: f32) -> f32 {
    index = clamp(index, 0.0, 1.0);
    index *= size;
    let index_integral = index as usize;
    let index_fractional = index - (index_integral as f32);
    let a = table[index_integral];
    let b = table[(index_integral + 1).min(table.len() - 1)];

    a + (b - a) * index_fractional
}

/// Smoothstep ramp over `[0, 1]`.
#[inline]
pub fn s_curve(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn round_to_int(value: f32) -> i64 {
    value.round() as i64
}

/// Rounds and saturates a float sample to the 16-bit range.
#[inline]
pub fn clip_16(value: f32) -> i16 {
    round_to_int(value).clamp(i16::MIN as i64, i16::MAX as i64) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_handles_nan() {
        assert_eq!(clamp(f32::NAN, 0.0, 1.0), 0.0);
        assert_eq!(clamp(2.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-2.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn hermite_passes_through_knots() {
        assert!((interpolate_hermite(1.0, 2.0, 3.0, 4.0, 0.0) - 2.0).abs() < 1e-6);
        assert!((interpolate_hermite(1.0, 2.0, 3.0, 4.0, 1.0) - 3.0).abs() < 1e-6);
        // A straight line stays straight.
        assert!((interpolate_hermite(1.0, 2.0, 3.0, 4.0, 0.5) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn clip_16_saturates() {
        assert_eq!(clip_16(40000.0), i16::MAX);
        assert_eq!(clip_16(-40000.0), i16::MIN);
        assert_eq!(clip_16(12.4), 12);
        assert_eq!(clip_16(-12.6), -13);
    }

    #[test]
    fn s_curve_is_symmetric() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((s_curve(t) + s_curve(1.0 - t) - 1.0).abs() < 1e-6);
        }
    }
}
