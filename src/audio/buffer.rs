// Audio Buffers - Decoded, interleaved f32 audio
// Used both for sound samples and for the rendered mix

use serde::{Deserialize, Serialize};

/// Sample rate of every rendered mix
pub const RENDER_SAMPLE_RATE: u32 = 44_100;

/// Channel count of every rendered mix
pub const RENDER_CHANNELS: u16 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioBuffer {
    /// Interleaved samples, nominally in [-1.0, 1.0]
    pub samples: Vec<f32>,

    /// Sample rate in Hz (e.g., 44100, 48000)
    pub sample_rate: u32,

    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        AudioBuffer {
            samples,
            sample_rate,
            channels: channels.max(1),
        }
    }

    /// Silent buffer of `frames` frames
    pub fn silent(frames: usize, sample_rate: u32, channels: u16) -> Self {
        let channels = channels.max(1);
        AudioBuffer {
            samples: vec![0.0; frames * channels as usize],
            sample_rate,
            channels,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at `frame` for output channel `channel`.
    ///
    /// Mono sources feed every output channel; sources with fewer channels
    /// than requested reuse their last channel.
    pub fn sample(&self, frame: usize, channel: usize) -> f32 {
        let channels = self.channels as usize;
        let ch = channel.min(channels - 1);
        self.samples.get(frame * channels + ch).copied().unwrap_or(0.0)
    }

    /// Linearly interpolated sample at a fractional frame position
    pub fn sample_at(&self, position: f64, channel: usize) -> f32 {
        let base = position.floor();
        let frac = (position - base) as f32;
        let idx = base as usize;
        let a = self.sample(idx, channel);
        if frac == 0.0 {
            return a;
        }
        let b = self.sample(idx + 1, channel);
        a + (b - a) * frac
    }

    /// Largest absolute sample value
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |max, &s| max.max(s.abs()))
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_and_duration() {
        let buffer = AudioBuffer::silent(44_100, 44_100, 2);
        assert_eq!(buffer.frame_count(), 44_100);
        assert_eq!(buffer.samples.len(), 88_200);
        assert!((buffer.duration_secs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_mono_feeds_both_channels() {
        let buffer = AudioBuffer::new(vec![0.1, 0.2, 0.3], 44_100, 1);
        assert_eq!(buffer.sample(1, 0), 0.2);
        assert_eq!(buffer.sample(1, 1), 0.2);
        assert_eq!(buffer.sample(10, 0), 0.0);
    }

    #[test]
    fn test_interpolated_sample() {
        let buffer = AudioBuffer::new(vec![0.0, 1.0], 44_100, 1);
        assert!((buffer.sample_at(0.5, 0) - 0.5).abs() < 1e-6);
        assert_eq!(buffer.sample_at(1.0, 0), 1.0);
    }

    #[test]
    fn test_peak() {
        let buffer = AudioBuffer::new(vec![0.2, -0.9, 0.5], 44_100, 1);
        assert_eq!(buffer.peak(), 0.9);
    }
}
