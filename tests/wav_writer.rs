//! Writer for WAV files

use std::path::Path;

use hound::*;

use freeze_dsp::DEFAULT_SAMPLE_RATE;

/// Writes sample data as mono WAV file in 16-bit integer format.
pub fn write(
    filename: impl AsRef<std::path::Path> + core::fmt::Display,
    samples: &[i16],
) -> std::io::Result<()> {
    let path = format!("out/{filename}");
    let path = Path::new(path.as_str());

    // Create parent directories to the path if they don't exist.
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate: DEFAULT_SAMPLE_RATE as u32,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).map_err(to_io_error)?;

    for sample in samples {
        writer.write_sample(*sample).map_err(to_io_error)?;
    }

    writer.finalize().map_err(to_io_error)
}

fn to_io_error(error: hound::Error) -> std::io::Error {
    match error {
        hound::Error::IoError(error) => error,
        other => std::io::Error::other(other.to_string()),
    }
}
