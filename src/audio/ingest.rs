// Audio ingestion module
// Decodes WAV sound samples into normalized f32 buffers

use hound::{SampleFormat, WavReader};
use std::io::{Cursor, Read};
use std::path::Path;
use thiserror::Error;

use super::buffer::AudioBuffer;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Failed to read WAV file: {0}")]
    WavReadError(#[from] hound::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid audio data")]
    InvalidData,
}

/// Decode a WAV file from raw bytes
pub fn ingest_wav(data: &[u8]) -> Result<AudioBuffer, AudioError> {
    decode(WavReader::new(Cursor::new(data))?)
}

/// Decode a WAV file from disk
pub fn load_wav(path: &Path) -> Result<AudioBuffer, AudioError> {
    let bytes = std::fs::read(path)?;
    ingest_wav(&bytes)
}

fn decode<R: Read>(mut reader: WavReader<R>) -> Result<AudioBuffer, AudioError> {
    let spec = reader.spec();
    if spec.channels == 0 || spec.sample_rate == 0 {
        return Err(AudioError::InvalidData);
    }

    // Normalize to f32 [-1.0, 1.0]
    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 8) => reader
            .samples::<i8>()
            .map(|s| s.map(|v| v as f32 / 128.0))
            .collect::<Result<_, _>>()?,
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect::<Result<_, _>>()?,
        (SampleFormat::Int, bits @ (24 | 32)) => {
            let scale = (1i64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
        (SampleFormat::Float, 32) => reader.samples::<f32>().collect::<Result<_, _>>()?,
        (format, bits) => {
            return Err(AudioError::UnsupportedFormat(format!(
                "{:?} {}-bit audio",
                format, bits
            )));
        }
    };

    if samples.len() % spec.channels as usize != 0 {
        return Err(AudioError::InvalidData);
    }

    Ok(AudioBuffer::new(samples, spec.sample_rate, spec.channels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};

    fn wav_bytes(spec: WavSpec, write: impl FnOnce(&mut WavWriter<&mut Cursor<Vec<u8>>>)) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            write(&mut writer);
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_ingest_16_bit_stereo() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 48_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let bytes = wav_bytes(spec, |w| {
            for s in [16384i16, -16384, 0, 32767] {
                w.write_sample(s).unwrap();
            }
        });

        let buffer = ingest_wav(&bytes).unwrap();

        assert_eq!(buffer.channels, 2);
        assert_eq!(buffer.sample_rate, 48_000);
        assert_eq!(buffer.frame_count(), 2);
        assert!((buffer.samples[0] - 0.5).abs() < 1e-4);
        assert!((buffer.samples[1] + 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_ingest_float_mono() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44_100,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let bytes = wav_bytes(spec, |w| {
            for s in [0.25f32, -0.75, 1.0] {
                w.write_sample(s).unwrap();
            }
        });

        let buffer = ingest_wav(&bytes).unwrap();

        assert_eq!(buffer.samples, vec![0.25, -0.75, 1.0]);
    }

    #[test]
    fn test_ingest_garbage_fails() {
        assert!(matches!(
            ingest_wav(b"definitely not a wav file"),
            Err(AudioError::WavReadError(_))
        ));
    }
}
