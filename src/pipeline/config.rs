// Generator Configuration - Tempo, beat counts, lengths and instruments
// Loaded from JSON; validated before any generation starts

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::arranger::Instrument;
use crate::groove::{NoteLength, PoolError, Ticks, VolumeRange};
use crate::render::{seconds_per_beat, MixerSettings};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    NoteLength(#[from] PoolError),
}

/// Longest song or groove, in beats
pub const MAX_BEATS: u64 = 4096;

/// Longest render, in seconds
pub const MAX_LENGTH_SECS: f64 = 1800.0;

/// A length expressed as bars of beats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatCount {
    pub bars: u32,
    pub beats: u32,
}

impl BeatCount {
    pub fn new(bars: u32, beats: u32) -> Self {
        BeatCount { bars, beats }
    }

    pub fn total_beats(&self) -> u64 {
        self.bars as u64 * self.beats as u64
    }

    pub fn ticks(&self) -> Ticks {
        Ticks::from_beats(self.total_beats())
    }
}

/// Song length and the repeating groove unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beats {
    pub total: BeatCount,
    pub groove: BeatCount,
}

impl Default for Beats {
    fn default() -> Self {
        Beats {
            total: BeatCount::new(8, 4),
            groove: BeatCount::new(1, 7),
        }
    }
}

/// Generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Tempo in beats per minute
    pub bpm: f64,

    /// Probability [0.0, 1.0] that a drawn note is sounded
    pub hit_chance: f64,

    pub allowed_lengths: Vec<NoteLength>,

    #[serde(default)]
    pub beats: Beats,

    #[serde(default)]
    pub volume: VolumeRange,

    #[serde(default)]
    pub mixer: MixerSettings,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            bpm: 120.0,
            hit_chance: 0.78,
            allowed_lengths: vec![
                NoteLength::new("1", 1, false),
                NoteLength::new("2", 1, false),
                NoteLength::new("4", 1, false),
            ],
            beats: Beats::default(),
            volume: VolumeRange::default(),
            mixer: MixerSettings::default(),
        }
    }
}

impl GeneratorConfig {
    /// Check tempo, probability, volume, beat counts and note-length ids.
    ///
    /// An all-zero weight list passes here; it is reported as its own error
    /// when the pool is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bpm.is_finite() || self.bpm <= 0.0 {
            return Err(ConfigError::Invalid(format!("bpm must be positive, got {}", self.bpm)));
        }
        if !(0.0..=1.0).contains(&self.hit_chance) {
            return Err(ConfigError::Invalid(format!(
                "hit chance must be within [0, 1], got {}",
                self.hit_chance
            )));
        }
        let volume = &self.volume;
        if !(0.0..=1.0).contains(&volume.min) || !(0.0..=1.0).contains(&volume.max) || volume.min > volume.max {
            return Err(ConfigError::Invalid(format!(
                "volume range {}..{} must be ordered within [0, 1]",
                volume.min, volume.max
            )));
        }
        for (name, count) in [("total", &self.beats.total), ("groove", &self.beats.groove)] {
            if count.total_beats() > MAX_BEATS {
                return Err(ConfigError::Invalid(format!(
                    "{} length of {} beats exceeds {}",
                    name,
                    count.total_beats(),
                    MAX_BEATS
                )));
            }
        }
        if self.length_secs() > MAX_LENGTH_SECS {
            return Err(ConfigError::Invalid(format!(
                "song lasts {:.0}s, longer than {}s",
                self.length_secs(),
                MAX_LENGTH_SECS
            )));
        }
        for length in self.allowed_lengths.iter().filter(|l| l.amount > 0) {
            length.duration()?;
        }
        Ok(())
    }

    pub fn seconds_per_beat(&self) -> f64 {
        seconds_per_beat(self.bpm)
    }

    /// Full song length in seconds
    pub fn length_secs(&self) -> f64 {
        self.beats.total.total_beats() as f64 * self.seconds_per_beat()
    }
}

/// Complete settings document: generator parameters plus instruments
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GrooveSettings {
    pub config: GeneratorConfig,

    #[serde(default)]
    pub instruments: Vec<Instrument>,
}

impl GrooveSettings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the generator config and every predefined sequence.
    ///
    /// Predefined events need a positive duration no longer than the longest
    /// song and a finite volume within [0, 1].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.config.validate()?;

        for instrument in &self.instruments {
            let Some(sequence) = &instrument.predefined_sequence else {
                continue;
            };
            for (position, event) in sequence.iter().enumerate() {
                if event.duration.is_zero() || event.duration > Ticks::from_beats(MAX_BEATS) {
                    return Err(ConfigError::Invalid(format!(
                        "instrument '{}': event {} lasts {} ticks",
                        instrument.id, position, event.duration.0
                    )));
                }
                if !event.volume.is_finite() || !(0.0..=1.0).contains(&event.volume) {
                    return Err(ConfigError::Invalid(format!(
                        "instrument '{}': event {} volume {} is outside [0, 1]",
                        instrument.id, position, event.volume
                    )));
                }
            }
        }
        Ok(())
    }

    /// Load and validate a settings file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&contents)?;
        settings.validate()?;
        Ok(settings)
    }
}
