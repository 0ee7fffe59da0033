//! Loop window addressing.
//!
//! While frozen, playback is confined to `[start, end)` of the buffer. All
//! wrapping is done over the window length rather than the buffer length and is
//! total for any input, including negative indices produced by reverse play.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::utils::{clamp, round_to_int};

/// Shortest loop, in samples.
pub const MIN_LOOP_SAMPLES: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopWindow {
    start: usize,
    end: usize,
}

impl Default for LoopWindow {
    fn default() -> Self {
        Self {
            start: 0,
            end: MIN_LOOP_SAMPLES,
        }
    }
}

impl LoopWindow {
    /// Window over `[start, end)`. A degenerate range is widened to
    /// [`MIN_LOOP_SAMPLES`].
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start + MIN_LOOP_SAMPLES),
        }
    }

    /// Derives the window from normalized `length` and `centre` over a buffer
    /// of `buffer_size` samples. Keeps `end < buffer_size` whenever the buffer
    /// holds at least two samples.
    pub fn from_parameters(length: f32, centre: f32, buffer_size: usize) -> Self {
        let max_len = buffer_size.saturating_sub(1).max(MIN_LOOP_SAMPLES);
        let length = clamp(length, 0.0, 1.0);
        let centre = clamp(centre, 0.0, 1.0);

        let len = (round_to_int(length * buffer_size as f32).max(0) as usize)
            .clamp(MIN_LOOP_SAMPLES, max_len);
        let centre_sample = round_to_int(centre * buffer_size as f32).max(0) as usize;
        let latest_start = buffer_size.saturating_sub(1).saturating_sub(len);
        let start = centre_sample.saturating_sub(len / 2).min(latest_start);

        Self::new(start, start + len)
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// `start + ((index - start) mod len)` with a non-negative modulo.
    #[inline]
    pub fn wrap_index_to_loop_section(&self, index: i64) -> usize {
        let len = self.len() as i64;
        let start = self.start as i64;
        (start + (index - start).rem_euclid(len)) as usize
    }

    /// Fractional counterpart of
    /// [`wrap_index_to_loop_section`](Self::wrap_index_to_loop_section).
    /// Result lies in `[start, end)`.
    #[inline]
    pub fn wrap_position(&self, position: f32) -> f32 {
        let len = self.len() as f32;
        let offset = position - self.start as f32;
        let mut wrapped = offset - len * (offset / len).floor();
        if !(0.0..len).contains(&wrapped) {
            // Rounding at the upper edge or a non-finite input.
            wrapped = 0.0;
        }
        self.start as f32 + wrapped
    }

    #[inline]
    pub fn contains(&self, position: f32) -> bool {
        position >= self.start as f32 && position < self.end as f32
    }
}
