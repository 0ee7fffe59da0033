//! Construction-time errors.
//!
//! Processing itself never fails; only building an engine from a
//! [`FreezeConfig`](crate::config::FreezeConfig) is checked.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Buffer capacity of {capacity} bytes is too small, need at least {required}")]
    CapacityTooSmall { capacity: usize, required: usize },

    #[error("Invalid sample rate: {0}. Must be finite and positive")]
    InvalidSampleRate(f32),

    #[error("Invalid oscillator frequency range: min={min}, max={max}")]
    InvalidFrequencyRange { min: f32, max: f32 },
}

pub type Result<T> = core::result::Result<T, Error>;
