//! Renders a freeze performance to a WAV file.
//!
//! A plucked arpeggio is recorded into the buffer, then frozen while the loop
//! window, speed and direction are changed from a control thread.
//!
//! Usage: `cargo run --example offline_freeze [output.wav]`

use std::sync::atomic::{AtomicUsize, Ordering};

use hound::{SampleFormat, WavSpec, WavWriter};
use simple_logger::SimpleLogger;

use freeze_dsp::{
    AudioBlock, AudioStream, FreezeConfig, FreezeEffect, StagedParameters, BLOCK_SIZE,
    DEFAULT_SAMPLE_RATE, FREEZE_BUFFER_BYTES,
};

const NOTES: [f32; 4] = [220.0, 277.18, 329.63, 440.0];
const NOTE_BLOCKS: usize = 40;
const TOTAL_BLOCKS: usize = 3000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init()?;

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("offline_freeze.wav"));

    let staged = StagedParameters::default();
    let mut fx = FreezeEffect::<FREEZE_BUFFER_BYTES>::new(&FreezeConfig::default(), &staged)?;
    let capture_blocks = fx.buffer_size_in_samples() / BLOCK_SIZE;
    let block_counter = AtomicUsize::new(0);

    let spec = WavSpec {
        channels: 1,
        sample_rate: DEFAULT_SAMPLE_RATE as u32,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec)?;

    std::thread::scope(|scope| {
        scope.spawn(|| control(&staged, &block_counter, capture_blocks));

        let result = render(&mut fx, &mut writer, &block_counter);
        block_counter.store(usize::MAX, Ordering::Release);
        result
    })?;

    writer.finalize()?;
    log::info!("wrote {path}");

    Ok(())
}

/// Plays a decaying arpeggio through the effect and appends the output to
/// `writer`.
fn render<W: std::io::Write + std::io::Seek>(
    fx: &mut FreezeEffect<'_, FREEZE_BUFFER_BYTES>,
    writer: &mut WavWriter<W>,
    block_counter: &AtomicUsize,
) -> Result<(), hound::Error> {
    let mut phase = 0.0f32;
    let mut input: AudioBlock = [0; BLOCK_SIZE];
    let mut output: AudioBlock = [0; BLOCK_SIZE];

    for n in 0..TOTAL_BLOCKS {
        let note = NOTES[(n / NOTE_BLOCKS) % NOTES.len()];
        let envelope = 1.0 - (n % NOTE_BLOCKS) as f32 / NOTE_BLOCKS as f32;
        for sample in input.iter_mut() {
            let value = (phase * core::f32::consts::TAU).sin() * envelope * 0.5;
            *sample = (value * i16::MAX as f32) as i16;
            phase = (phase + note / DEFAULT_SAMPLE_RATE).fract();
        }

        fx.update(Some(&input), &mut output);
        for sample in output {
            writer.write_sample(sample)?;
        }
        block_counter.store(n + 1, Ordering::Release);
    }

    Ok(())
}

/// Drives the parameters from its own thread, keyed on the audio block count.
fn control(staged: &StagedParameters, block_counter: &AtomicUsize, capture_blocks: usize) {
    let mut step = 0;
    loop {
        let block = block_counter.load(Ordering::Acquire);
        if block == usize::MAX {
            break;
        }

        let due = match step {
            0 => block >= capture_blocks,
            1 => block >= capture_blocks + 400,
            2 => block >= capture_blocks + 800,
            3 => block >= capture_blocks + 1200,
            _ => false,
        };
        if due {
            match step {
                0 => {
                    log::info!("freeze");
                    staged.set_length(0.2);
                    staged.set_freeze(true);
                }
                1 => {
                    log::info!("half speed, reverse");
                    staged.set_speed(0.5);
                    staged.set_reverse(true);
                }
                2 => {
                    log::info!("short loop with wow and flutter");
                    staged.set_reverse(false);
                    staged.set_speed(1.0);
                    staged.set_length(0.02);
                    staged.set_wow_amount(0.03);
                    staged.set_flutter_amount(0.01);
                }
                _ => {
                    log::info!("release");
                    staged.set_freeze(false);
                }
            }
            step += 1;
        }

        std::thread::yield_now();
    }
}
