// WAV Export - Write rendered mixes to disk or memory

use hound::{SampleFormat, WavSpec, WavWriter};
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use crate::audio::AudioBuffer;

use super::engine::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Int16,
    Float32,
}

/// Write a buffer to a WAV file
pub fn write_wav(path: &Path, buffer: &AudioBuffer, format: ExportFormat) -> Result<(), RenderError> {
    let writer = WavWriter::create(path, spec(buffer, format))?;
    write_samples(writer, buffer, format)?;
    log::info!("Wrote {:.2}s of audio to {}", buffer.duration_secs(), path.display());
    Ok(())
}

/// Convert a buffer to WAV file bytes
pub fn to_wav_bytes(buffer: &AudioBuffer, format: ExportFormat) -> Result<Vec<u8>, RenderError> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let writer = WavWriter::new(&mut cursor, spec(buffer, format))?;
        write_samples(writer, buffer, format)?;
    }
    Ok(cursor.into_inner())
}

fn spec(buffer: &AudioBuffer, format: ExportFormat) -> WavSpec {
    let (bits_per_sample, sample_format) = match format {
        ExportFormat::Int16 => (16, SampleFormat::Int),
        ExportFormat::Float32 => (32, SampleFormat::Float),
    };

    WavSpec {
        channels: buffer.channels,
        sample_rate: buffer.sample_rate,
        bits_per_sample,
        sample_format,
    }
}

fn write_samples<W: Write + Seek>(
    mut writer: WavWriter<W>,
    buffer: &AudioBuffer,
    format: ExportFormat,
) -> Result<(), RenderError> {
    match format {
        ExportFormat::Int16 => {
            for &sample in &buffer.samples {
                writer.write_sample((sample.clamp(-1.0, 1.0) * 32767.0) as i16)?;
            }
        }
        ExportFormat::Float32 => {
            for &sample in &buffer.samples {
                writer.write_sample(sample)?;
            }
        }
    }
    writer.finalize()?;
    Ok(())
}
