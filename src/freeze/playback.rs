//! Fractional playback through the loop window.
//!
//! Reads between stored samples are interpolated. Near the loop seam the read
//! can be cross-faded with the audio one window length away, so the jump from
//! `end` back to `start` (or the reverse) does not click.

#[allow(unused_imports)]
use num_traits::float::Float;

use super::buffer::FreezeBuffer;
use super::loop_window::LoopWindow;
use crate::utils::{crossfade, interpolate_hermite, lerp, s_curve};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolation {
    Linear,
    /// Four-point Hermite, smoother for speeds far from 1.
    #[default]
    Cubic,
}

/// Gain law across the cross-fade region. Both curves keep the two weights
/// summing to one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossFadeCurve {
    #[default]
    Linear,
    SCurve,
}

impl CrossFadeCurve {
    /// Returns `(outgoing, incoming)` weights for progress `t` in `[0, 1]`.
    #[inline]
    pub fn weights(self, t: f32) -> (f32, f32) {
        let t = t.clamp(0.0, 1.0);
        let incoming = match self {
            CrossFadeCurve::Linear => t,
            CrossFadeCurve::SCurve => s_curve(t),
        };
        (1.0 - incoming, incoming)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Playhead {
    /// Fractional read position, inside the loop window while frozen.
    pub position: f32,
    /// Magnitude of the per-sample increment.
    pub speed: f32,
    pub reverse: bool,
}

impl Playhead {
    #[inline]
    pub fn signed_speed(&self) -> f32 {
        if self.reverse {
            -self.speed
        } else {
            self.speed
        }
    }
}

/// Fixed-length fade region at the loop seam.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CrossFade {
    length: usize,
    curve: CrossFadeCurve,
}

impl CrossFade {
    pub fn new(length: usize, curve: CrossFadeCurve) -> Self {
        Self { length, curve }
    }

    #[inline]
    pub fn curve(&self) -> CrossFadeCurve {
        self.curve
    }

    /// Region length for `window`, at most half the window.
    #[inline]
    pub fn region_length(&self, window: &LoopWindow) -> usize {
        self.length.min(window.len() / 2)
    }

    #[inline]
    pub fn in_cross_fade(&self, window: &LoopWindow, position: f32, reverse: bool) -> bool {
        self.progress(window, position, reverse).is_some()
    }

    /// How far into the region `position` lies, in `[0, 1]`. The region sits
    /// before `end` when playing forward and after `start` in reverse.
    pub fn progress(&self, window: &LoopWindow, position: f32, reverse: bool) -> Option<f32> {
        let region = self.region_length(window);
        if region == 0 || !window.contains(position) {
            return None;
        }
        let region = region as f32;

        if reverse {
            let boundary = window.start() as f32 + region;
            (position < boundary).then(|| (boundary - position) / region)
        } else {
            let boundary = window.end() as f32 - region;
            (position >= boundary).then(|| (position - boundary) / region)
        }
    }
}

/// Interpolated read at `position`, addressing neighbours through `wrap`.
#[inline]
fn read_with<const CAPACITY: usize>(
    buffer: &FreezeBuffer<CAPACITY>,
    position: f32,
    interpolation: Interpolation,
    wrap: impl Fn(i64) -> usize,
) -> f32 {
    let integral = position.floor();
    let fractional = position - integral;
    let index = integral as i64;
    let sample = |offset: i64| buffer.read_sample(wrap(index + offset)) as f32;

    match interpolation {
        Interpolation::Linear => lerp(sample(0), sample(1), fractional),
        Interpolation::Cubic => {
            interpolate_hermite(sample(-1), sample(0), sample(1), sample(2), fractional)
        }
    }
}

/// Interpolated read confined to the loop window.
#[inline]
pub fn read_looped<const CAPACITY: usize>(
    buffer: &FreezeBuffer<CAPACITY>,
    window: &LoopWindow,
    position: f32,
    interpolation: Interpolation,
) -> f32 {
    read_with(buffer, window.wrap_position(position), interpolation, |index| {
        window.wrap_index_to_loop_section(index)
    })
}

/// Interpolated read over the whole buffer, ignoring the loop window.
#[inline]
pub fn read_through<const CAPACITY: usize>(
    buffer: &FreezeBuffer<CAPACITY>,
    position: f32,
    interpolation: Interpolation,
) -> f32 {
    let size = buffer.size_in_samples().max(1) as i64;
    read_with(buffer, position, interpolation, |index| {
        index.rem_euclid(size) as usize
    })
}

/// Output for the playhead's current position.
pub fn resolve<const CAPACITY: usize>(
    buffer: &FreezeBuffer<CAPACITY>,
    window: &LoopWindow,
    playhead: &Playhead,
    cross_fade: Option<&CrossFade>,
    interpolation: Interpolation,
) -> f32 {
    let position = playhead.position;
    let progress =
        cross_fade.and_then(|fade| Some((fade, fade.progress(window, position, playhead.reverse)?)));

    match progress {
        None => read_looped(buffer, window, position, interpolation),
        Some((fade, t)) => {
            let (_, incoming) = fade.curve().weights(t);
            let shift = if playhead.reverse {
                window.len() as f32
            } else {
                -(window.len() as f32)
            };
            let continuing = read_through(buffer, position, interpolation);
            let wrapped = read_through(buffer, position + shift, interpolation);
            crossfade(continuing, wrapped, incoming)
        }
    }
}
