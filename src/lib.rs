#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod freeze;
pub mod modulation;
pub mod stream;
pub mod utils;

pub use config::FreezeConfig;
pub use error::{Error, Result};
pub use freeze::buffer::BitDepth;
pub use freeze::parameters::{EffectConfig, StagedParameters};
pub use freeze::FreezeEffect;
pub use stream::AudioStream;

/// Default audio sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;

/// Samples per audio block delivered by the host.
pub const BLOCK_SIZE: usize = 128;

/// One block of 16-bit PCM samples.
pub type AudioBlock = [i16; BLOCK_SIZE];

/// Number of blocks of 16-bit audio the default buffer holds.
pub const FREEZE_QUEUE_SIZE: usize = 185;

/// Default freeze buffer capacity in bytes.
pub const FREEZE_BUFFER_BYTES: usize = FREEZE_QUEUE_SIZE * BLOCK_SIZE * 2;
