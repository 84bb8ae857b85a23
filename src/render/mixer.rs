// Final Mix and Audio Rendering
// Sums every scheduled voice into one interleaved buffer

use serde::{Deserialize, Serialize};

use crate::audio::AudioBuffer;

use super::engine::RenderError;
use super::schedule::{RenderJob, ScheduledVoice};

/// How often (in voices) the mixdown checks for cancellation
const CANCEL_CHECK_INTERVAL: usize = 16;

/// Mixer settings for final audio rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixerSettings {
    pub master_volume: f32,

    /// Soft limiting threshold; `None` leaves the mix untouched
    pub limiter_threshold: Option<f32>,
}

impl Default for MixerSettings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            limiter_threshold: Some(0.95),
        }
    }
}

impl MixerSettings {
    /// Create mixer settings with custom values
    pub fn new(master_volume: f32, limiter_threshold: Option<f32>) -> Self {
        Self {
            master_volume: master_volume.clamp(0.0, 1.0),
            limiter_threshold: limiter_threshold.map(|t| t.clamp(0.1, 1.0)),
        }
    }
}

/// Render a job into a buffer.
///
/// `is_cancelled` is polled between voices; when it reports true the mix is
/// abandoned and no partial buffer is returned.
pub fn mixdown(job: &RenderJob, is_cancelled: impl Fn() -> bool) -> Result<AudioBuffer, RenderError> {
    if !(job.length_secs > 0.0) {
        return Err(RenderError::EmptyTimeline {
            length_secs: job.length_secs,
        });
    }
    if job.sample_rate == 0 || job.channels == 0 {
        return Err(RenderError::EngineFailure(format!(
            "invalid output format: {} ch @ {} Hz",
            job.channels, job.sample_rate
        )));
    }

    let mut output = AudioBuffer::silent(job.frame_count(), job.sample_rate, job.channels);

    for (i, voice) in job.voices.iter().enumerate() {
        if i % CANCEL_CHECK_INTERVAL == 0 && is_cancelled() {
            return Err(RenderError::Cancelled);
        }
        mix_voice(&mut output, voice);
    }
    if is_cancelled() {
        return Err(RenderError::Cancelled);
    }

    let master = job.mixer.master_volume;
    for sample in output.samples.iter_mut() {
        let mut s = *sample * master;
        if let Some(threshold) = job.mixer.limiter_threshold {
            s = soft_limit(s, threshold);
        }
        *sample = s;
    }

    log::info!(
        "Rendered {} voices: {:.2}s @ {} Hz, peak {:.3}",
        job.voices.len(),
        output.duration_secs(),
        output.sample_rate,
        output.peak()
    );

    Ok(output)
}

/// Add one voice into the output, resampling to the output rate.
///
/// Anything past the end of the output is dropped.
pub fn mix_voice(output: &mut AudioBuffer, voice: &ScheduledVoice) {
    let source = &voice.buffer;
    if source.is_empty() || source.sample_rate == 0 || voice.volume == 0.0 {
        return;
    }

    let out_rate = output.sample_rate as f64;
    let out_channels = output.channels as usize;
    let out_frames = output.frame_count();

    let start_frame = (voice.start_secs.max(0.0) * out_rate).round() as usize;
    if start_frame >= out_frames {
        return;
    }

    let step = source.sample_rate as f64 / out_rate;
    let source_frames = (source.frame_count() as f64 / step).floor() as usize;
    let play_frames = ((voice.duration_secs.max(0.0) * out_rate).round() as usize)
        .min(source_frames)
        .min(out_frames - start_frame);

    for j in 0..play_frames {
        let position = j as f64 * step;
        let base = (start_frame + j) * out_channels;
        for ch in 0..out_channels {
            output.samples[base + ch] += source.sample_at(position, ch) * voice.volume;
        }
    }
}

/// Helper function to apply soft limiting to prevent clipping
pub fn soft_limit(sample: f32, threshold: f32) -> f32 {
    if sample.abs() <= threshold {
        sample
    } else {
        let sign = sample.signum();
        sign * (threshold + (sample.abs() - threshold).tanh() * (1.0 - threshold))
    }
}
