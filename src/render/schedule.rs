// Scheduling - Turn lanes into timed voices against decoded sounds
// All voices are fixed before a render starts

use std::sync::Arc;

use crate::arranger::Lane;
use crate::audio::{AudioBuffer, RENDER_CHANNELS, RENDER_SAMPLE_RATE};

use super::engine::RenderError;
use super::mixer::MixerSettings;

/// One sound playback: (buffer, start time, duration, volume)
#[derive(Debug, Clone)]
pub struct ScheduledVoice {
    pub buffer: Arc<AudioBuffer>,
    pub start_secs: f64,
    pub duration_secs: f64,
    pub volume: f32,
}

/// Everything an engine needs to produce one mix
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub voices: Vec<ScheduledVoice>,
    pub length_secs: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub mixer: MixerSettings,
}

impl RenderJob {
    /// A 44.1 kHz stereo job
    pub fn new(length_secs: f64, mixer: MixerSettings) -> Self {
        RenderJob {
            voices: Vec::new(),
            length_secs,
            sample_rate: RENDER_SAMPLE_RATE,
            channels: RENDER_CHANNELS,
            mixer,
        }
    }

    pub fn add_voices(&mut self, voices: impl IntoIterator<Item = ScheduledVoice>) {
        self.voices.extend(voices);
    }

    /// Output length in frames
    pub fn frame_count(&self) -> usize {
        (self.length_secs * self.sample_rate as f64).round().max(0.0) as usize
    }
}

/// Seconds per beat at a tempo
pub fn seconds_per_beat(bpm: f64) -> f64 {
    60.0 / bpm
}

/// Schedule every hit of a lane.
///
/// `buffers` is indexed by hit type. Ringout voices last as long as their
/// sound; others are cut to their rhythmic slot.
pub fn schedule_lane(
    lane: &Lane,
    buffers: &[Option<Arc<AudioBuffer>>],
    seconds_per_beat: f64,
) -> Result<Vec<ScheduledVoice>, RenderError> {
    lane.hits()
        .map(|event| {
            let buffer = buffers
                .get(event.hit_type)
                .and_then(Option::as_ref)
                .ok_or_else(|| RenderError::MissingSoundBuffer {
                    instrument: lane.instrument_id.clone(),
                    hit_type: event.hit_type,
                })?;

            let duration_secs = if lane.ringout {
                buffer.duration_secs()
            } else {
                event.duration.as_secs(seconds_per_beat)
            };

            Ok(ScheduledVoice {
                buffer: Arc::clone(buffer),
                start_secs: event.start.as_secs(seconds_per_beat),
                duration_secs,
                volume: event.volume,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arranger::LaneEvent;
    use crate::groove::{BeatEvent, Ticks};

    fn lane(ringout: bool) -> Lane {
        let mut lane = Lane::new("kick", ringout);
        lane.add_event(LaneEvent::new(Ticks::ZERO, &BeatEvent::hit(Ticks(480), 0.9), 0));
        lane.add_event(LaneEvent::new(Ticks(480), &BeatEvent::rest(Ticks(480)), 1));
        lane.add_event(LaneEvent::new(Ticks(960), &BeatEvent::hit(Ticks(960), 0.7), 1));
        lane
    }

    fn buffers() -> Vec<Option<Arc<AudioBuffer>>> {
        vec![
            Some(Arc::new(AudioBuffer::silent(4410, 44_100, 1))),
            Some(Arc::new(AudioBuffer::silent(88_200, 44_100, 1))),
        ]
    }

    #[test]
    fn test_seconds_per_beat() {
        assert!((seconds_per_beat(120.0) - 0.5).abs() < 1e-12);
        assert!((seconds_per_beat(60.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_schedule_cuts_to_slot() {
        let voices = schedule_lane(&lane(false), &buffers(), 0.5).unwrap();

        assert_eq!(voices.len(), 2);
        assert_eq!(voices[0].start_secs, 0.0);
        assert!((voices[0].duration_secs - 0.25).abs() < 1e-9);
        assert!((voices[1].start_secs - 0.5).abs() < 1e-9);
        assert!((voices[1].duration_secs - 0.5).abs() < 1e-9);
        assert_eq!(voices[1].volume, 0.7);
    }

    #[test]
    fn test_schedule_ringout_uses_sound_length() {
        let voices = schedule_lane(&lane(true), &buffers(), 0.5).unwrap();

        assert!((voices[0].duration_secs - 0.1).abs() < 1e-9);
        assert!((voices[1].duration_secs - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_buffer_for_hit_is_error() {
        let err = schedule_lane(&lane(false), &buffers()[..1], 0.5).unwrap_err();

        match err {
            RenderError::MissingSoundBuffer { instrument, hit_type } => {
                assert_eq!(instrument, "kick");
                assert_eq!(hit_type, 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_buffer_on_rest_is_ignored() {
        let mut lane = Lane::new("snare", false);
        lane.add_event(LaneEvent::new(Ticks::ZERO, &BeatEvent::rest(Ticks(480)), 5));

        assert!(schedule_lane(&lane, &[], 0.5).unwrap().is_empty());
    }

    #[test]
    fn test_job_frame_count() {
        let job = RenderJob::new(2.0, MixerSettings::default());
        assert_eq!(job.frame_count(), 88_200);
        assert_eq!(job.channels, 2);
    }
}
