// Generation Pipeline - Settings to scheduled render job
// Pool, main beat, instrument parts and voice scheduling, in that order

use chrono::{DateTime, Utc};
use rand::Rng;
use thiserror::Error;
use uuid::Uuid;

use crate::arranger::{arrange_part, resolve_sequences, InstrumentPart};
use crate::audio::{active_buffers, AudioBuffer, SoundProvider};
use crate::groove::{generate_sequence, hit_count, NoteLengthPool, PoolError};
use crate::render::{schedule_lane, RenderError, RenderJob};

use super::config::{ConfigError, GrooveSettings};
use super::snapshot::GenerationState;

/// Errors that reject a generation request
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("No allowed note lengths: every weight is zero")]
    EmptyAllowedLengths,

    #[error("Invalid note length '{id}': {reason}")]
    InvalidNoteLength { id: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No instrument has both events and an enabled sound")]
    NoAudibleInstrument,

    #[error("No sound buffer for hit type {hit_type} of instrument '{instrument}'")]
    MissingSoundBuffer { instrument: String, hit_type: usize },

    #[error("Timeline length must be positive, got {length_secs}s")]
    EmptyTimeline { length_secs: f64 },

    #[error("Render engine failed: {0}")]
    RenderEngineFailure(String),
}

impl From<PoolError> for GenerationError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::Empty => GenerationError::EmptyAllowedLengths,
            PoolError::InvalidLength { id, reason } => GenerationError::InvalidNoteLength { id, reason },
        }
    }
}

impl From<ConfigError> for GenerationError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoteLength(pool) => pool.into(),
            other => GenerationError::InvalidConfig(other.to_string()),
        }
    }
}

impl From<RenderError> for GenerationError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::MissingSoundBuffer { instrument, hit_type } => {
                GenerationError::MissingSoundBuffer { instrument, hit_type }
            }
            RenderError::EmptyTimeline { length_secs } => GenerationError::EmptyTimeline { length_secs },
            other => GenerationError::RenderEngineFailure(other.to_string()),
        }
    }
}

/// Everything decided before the render starts
#[derive(Debug, Clone)]
pub struct PreparedGeneration {
    pub state: GenerationState,
    pub parts: Vec<InstrumentPart>,
    pub job: RenderJob,
}

/// Build every instrument part and schedule its voices.
///
/// Nothing is rendered here. Errors are raised before any render could
/// start: the pool is checked first, then the settings bounds, then the
/// timeline length, then audibility, then sound buffers.
pub fn prepare_generation(
    settings: &GrooveSettings,
    sounds: &dyn SoundProvider,
    rng: &mut impl Rng,
) -> Result<PreparedGeneration, GenerationError> {
    let config = &settings.config;

    let pool = NoteLengthPool::from_lengths(&config.allowed_lengths)?;
    settings.validate()?;

    let total = config.beats.total.ticks();
    let length_secs = config.length_secs();
    if total.is_zero() || !(length_secs > 0.0) {
        return Err(GenerationError::EmptyTimeline { length_secs });
    }

    let main_beat = generate_sequence(
        config.beats.groove.ticks(),
        &pool,
        config.hit_chance,
        &config.volume,
        rng,
    );
    log::info!(
        "Generated main beat: {} events ({} hits) over {} beats",
        main_beat.len(),
        hit_count(&main_beat),
        config.beats.groove.total_beats()
    );

    let groove_ticks = config.beats.groove.ticks();
    let resolved = resolve_sequences(&settings.instruments, &main_beat, |instrument| {
        let own = generate_sequence(groove_ticks, &pool, config.hit_chance, &config.volume, rng);
        log::debug!("Generated own groove for '{}': {} events", instrument.id, own.len());
        own
    });
    let parts: Vec<InstrumentPart> = settings
        .instruments
        .iter()
        .zip(resolved)
        .map(|(instrument, resolved)| arrange_part(instrument, resolved, total, rng))
        .collect();

    for part in parts.iter().filter(|p| !p.is_audible()) {
        log::warn!("Instrument '{}' is silent", part.instrument_id);
    }
    if !parts.iter().any(InstrumentPart::is_audible) {
        return Err(GenerationError::NoAudibleInstrument);
    }

    let seconds_per_beat = config.seconds_per_beat();
    let mut job = RenderJob::new(length_secs, config.mixer);

    for (instrument, part) in settings.instruments.iter().zip(&parts) {
        if !part.is_audible() {
            continue;
        }
        let lane = part.lane(instrument.ringout);
        let buffers = active_buffers(sounds, instrument);
        let voices = schedule_lane(&lane, &buffers, seconds_per_beat)?;
        log::debug!("Scheduled {} voices for '{}'", voices.len(), instrument.id);
        job.add_voices(voices);
    }

    Ok(PreparedGeneration {
        state: GenerationState::capture(settings),
        parts,
        job,
    })
}

/// A completed generation
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,

    /// Inputs this output was built from
    pub state: GenerationState,

    pub parts: Vec<InstrumentPart>,

    /// Stereo mix at the render sample rate
    pub buffer: AudioBuffer,
}

impl GenerationOutput {
    pub fn new(state: GenerationState, parts: Vec<InstrumentPart>, buffer: AudioBuffer) -> Self {
        GenerationOutput {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            state,
            parts,
            buffer,
        }
    }

    pub fn part(&self, instrument_id: &str) -> Option<&InstrumentPart> {
        self.parts.iter().find(|p| p.instrument_id == instrument_id)
    }

    /// Resolved hit types of one instrument, tiled to the song length
    pub fn hit_types(&self, instrument_id: &str) -> Option<&[usize]> {
        self.part(instrument_id).map(|p| p.hit_types.as_slice())
    }

    /// Resolved hit types of every instrument in settings order
    pub fn all_hit_types(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.parts
            .iter()
            .map(|p| (p.instrument_id.as_str(), p.hit_types.as_slice()))
    }
}
