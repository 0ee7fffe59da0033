//! Freeze effect engine.
//!
//! While not frozen the engine records its input into a circular buffer and
//! passes it through. While frozen it loops a window of that buffer at a
//! controllable speed and direction, modulated by wow and flutter oscillators
//! and optionally cross-faded at the loop seam.
//!
//! Parameters are never applied mid-block: each call to
//! [`process_block`](FreezeEffect::process_block) first commits whatever the
//! control context has staged, then renders the whole block with that snapshot.

pub mod buffer;
pub mod loop_window;
pub mod parameters;
pub mod playback;

use buffer::FreezeBuffer;
use loop_window::LoopWindow;
use parameters::{EffectConfig, Pending, StagedParameters};
use playback::{CrossFade, Interpolation, Playhead};

use crate::config::FreezeConfig;
use crate::error::{Error, Result};
use crate::modulation::random_lfo::RandomLfo;
use crate::stream::AudioStream;
use crate::utils::{clip_16, lerp};

/// Smallest buffer the engine accepts, in bytes. Two 16-bit samples.
pub const MIN_CAPACITY_BYTES: usize = 4;

#[derive(Debug)]
pub struct FreezeEffect<'a, const CAPACITY: usize> {
    buffer: FreezeBuffer<CAPACITY>,
    window: LoopWindow,
    playhead: Playhead,
    write_head: usize,

    config: EffectConfig,
    staged: &'a StagedParameters,

    wow: RandomLfo,
    flutter: RandomLfo,
    time_increment: f32,

    interpolation: Interpolation,
    cross_fade: CrossFade,
}

impl<'a, const CAPACITY: usize> FreezeEffect<'a, CAPACITY> {
    /// Builds the engine. `staged` is reset to `config.initial` and is the
    /// handle the control context uses to change parameters afterwards.
    pub fn new(config: &FreezeConfig, staged: &'a StagedParameters) -> Result<Self> {
        if CAPACITY < MIN_CAPACITY_BYTES {
            return Err(Error::CapacityTooSmall {
                capacity: CAPACITY,
                required: MIN_CAPACITY_BYTES,
            });
        }
        config.validate()?;

        let initial = config.initial.sanitized();
        staged.reset(&initial);

        let buffer = FreezeBuffer::new(initial.bit_depth);
        let window =
            LoopWindow::from_parameters(initial.length, initial.centre, buffer.size_in_samples());
        let wow = RandomLfo::new(
            initial.wow_range.min,
            initial.wow_range.max,
            config.lfo_shape,
            config.seed,
        );
        let flutter = RandomLfo::new(
            initial.flutter_range.min,
            initial.flutter_range.max,
            config.lfo_shape,
            config.seed.rotate_left(16) ^ 0x5bd1_e995,
        );

        log::debug!(
            "freeze buffer: {} bytes, {} samples at {} bits, loop {}..{}",
            CAPACITY,
            buffer.size_in_samples(),
            initial.bit_depth.bits(),
            window.start(),
            window.end()
        );

        let mut effect = Self {
            buffer,
            window,
            playhead: Playhead {
                position: window.start() as f32,
                speed: initial.speed,
                reverse: initial.reverse,
            },
            write_head: 0,
            config: initial,
            staged,
            wow,
            flutter,
            time_increment: 1.0 / config.sample_rate,
            interpolation: config.interpolation,
            cross_fade: CrossFade::new(config.cross_fade_samples, config.cross_fade_curve),
        };
        if initial.freeze_active {
            effect.snap_playhead();
        }

        Ok(effect)
    }

    /// Handle for the control context.
    pub fn parameters(&self) -> &'a StagedParameters {
        self.staged
    }

    /// Parameters used by the most recent block.
    pub fn effect_config(&self) -> &EffectConfig {
        &self.config
    }

    pub fn is_freeze_active(&self) -> bool {
        self.config.freeze_active
    }

    pub fn loop_window(&self) -> LoopWindow {
        self.window
    }

    pub fn playhead(&self) -> Playhead {
        self.playhead
    }

    pub fn write_head(&self) -> usize {
        self.write_head
    }

    pub fn buffer(&self) -> &FreezeBuffer<CAPACITY> {
        &self.buffer
    }

    pub fn buffer_size_in_samples(&self) -> usize {
        self.buffer.size_in_samples()
    }

    pub fn wow(&self) -> &RandomLfo {
        &self.wow
    }

    pub fn flutter(&self) -> &RandomLfo {
        &self.flutter
    }

    /// Renders one block. Samples missing from `input` count as silence.
    pub fn process_block(&mut self, input: Option<&[i16]>, output: &mut [i16]) {
        self.commit_staged();

        if self.config.freeze_active {
            self.play(input, output);
        } else {
            self.capture(input, output);
        }
    }

    fn commit_staged(&mut self) {
        let previous = self.config;
        let pending = self.staged.commit(&mut self.config);
        if pending.is_empty() {
            return;
        }

        if self.config.bit_depth != previous.bit_depth {
            self.buffer.set_bit_depth(self.config.bit_depth);
            if self.write_head >= self.buffer.size_in_samples() {
                self.write_head = 0;
            }
            log::debug!(
                "bit depth {} -> {}, {} samples",
                previous.bit_depth.bits(),
                self.config.bit_depth.bits(),
                self.buffer.size_in_samples()
            );
        }

        if pending.intersects(Pending::WOW_RANGE) {
            let range = self.config.wow_range;
            self.wow.set_frequency_range(range.min, range.max);
        }
        if pending.intersects(Pending::FLUTTER_RANGE) {
            let range = self.config.flutter_range;
            self.flutter.set_frequency_range(range.min, range.max);
        }

        let freeze_changed = self.config.freeze_active != previous.freeze_active;
        let geometry = Pending::LENGTH | Pending::CENTRE | Pending::BIT_DEPTH;
        if freeze_changed || pending.intersects(geometry) {
            let window = LoopWindow::from_parameters(
                self.config.length,
                self.config.centre,
                self.buffer.size_in_samples(),
            );
            if window != self.window {
                log::debug!("loop window {}..{}", window.start(), window.end());
            }
            self.window = window;
        }

        self.playhead.speed = self.config.speed;
        self.playhead.reverse = self.config.reverse;

        if freeze_changed {
            if self.config.freeze_active {
                log::debug!("freeze on");
                self.snap_playhead();
            } else {
                log::debug!("freeze off");
                self.write_head = 0;
            }
        } else if self.config.freeze_active && !self.window.contains(self.playhead.position) {
            self.playhead.position = self.window.wrap_position(self.playhead.position);
        }
    }

    /// Moves the playhead to the start of the window, or its end when reversed.
    fn snap_playhead(&mut self) {
        self.playhead.position = if self.playhead.reverse {
            self.window.end() as f32
        } else {
            self.window.start() as f32
        };
    }

    fn capture(&mut self, input: Option<&[i16]>, output: &mut [i16]) {
        let size = self.buffer.size_in_samples();

        for (index, out) in output.iter_mut().enumerate() {
            let sample = input_sample(input, index);
            self.buffer.write_sample(sample, self.write_head);
            self.write_head += 1;
            if self.write_head >= size {
                self.write_head = 0;
            }
            *out = sample;
        }
    }

    fn play(&mut self, input: Option<&[i16]>, output: &mut [i16]) {
        let cross_fade = self.config.cross_fade.then_some(&self.cross_fade);

        for (index, out) in output.iter_mut().enumerate() {
            let wow = self.wow.next(self.time_increment) * self.config.wow_amount;
            let flutter = self.flutter.next(self.time_increment) * self.config.flutter_amount;
            let effective_speed = self.playhead.signed_speed() + wow + flutter;

            self.playhead.position = self
                .window
                .wrap_position(self.playhead.position + effective_speed);

            let wet = playback::resolve(
                &self.buffer,
                &self.window,
                &self.playhead,
                cross_fade,
                self.interpolation,
            );
            let dry = input_sample(input, index) as f32;
            *out = clip_16(lerp(dry, wet, self.config.mix));
        }
    }
}

impl<const CAPACITY: usize> AudioStream for FreezeEffect<'_, CAPACITY> {
    fn update(&mut self, input: Option<&[i16]>, output: &mut [i16]) {
        self.process_block(input, output);
    }
}

#[inline]
fn input_sample(input: Option<&[i16]>, index: usize) -> i16 {
    input.and_then(|block| block.get(index)).copied().unwrap_or(0)
}
