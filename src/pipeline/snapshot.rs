// Generation State - Snapshot of the inputs a generation was built from
// Compared against live settings to tell whether a result is stale

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::arranger::{GrooveSource, SoundVariant};
use crate::groove::NoteLength;

use super::config::{Beats, GrooveSettings};

/// Sound-enable state and groove source of one instrument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentSounds {
    pub id: String,
    pub sounds: Vec<SoundVariant>,

    #[serde(default)]
    pub groove: GrooveSource,
}

/// Inputs that shape a generation
///
/// Volume range and mixer settings are left out: changing them does not
/// invalidate the rhythm that was generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationState {
    pub bpm: f64,
    pub beats: Beats,
    pub allowed_lengths: Vec<NoteLength>,
    pub hit_chance: f64,
    pub instruments: Vec<InstrumentSounds>,
}

impl GenerationState {
    /// Snapshot the relevant parts of `settings`
    pub fn capture(settings: &GrooveSettings) -> Self {
        let config = &settings.config;
        GenerationState {
            bpm: config.bpm,
            beats: config.beats,
            allowed_lengths: config.allowed_lengths.clone(),
            hit_chance: config.hit_chance,
            instruments: settings
                .instruments
                .iter()
                .map(|instrument| InstrumentSounds {
                    id: instrument.id.clone(),
                    sounds: instrument.sounds.clone(),
                    groove: instrument.groove,
                })
                .collect(),
        }
    }

    /// True when `live` would produce a different generation
    pub fn is_stale(&self, live: &GrooveSettings) -> bool {
        *self != Self::capture(live)
    }

    /// SHA-256 hex digest identifying this state
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();

        hasher.update(self.bpm.to_le_bytes());
        hasher.update(self.hit_chance.to_le_bytes());
        for count in [self.beats.total, self.beats.groove] {
            hasher.update(count.bars.to_le_bytes());
            hasher.update(count.beats.to_le_bytes());
        }

        // Every list is length-prefixed so items cannot shift between lists
        hash_len(&mut hasher, self.allowed_lengths.len());
        for length in &self.allowed_lengths {
            hash_str(&mut hasher, &length.id);
            hasher.update(length.amount.to_le_bytes());
            hasher.update([length.is_triplet as u8]);
        }

        hash_len(&mut hasher, self.instruments.len());
        for instrument in &self.instruments {
            hash_str(&mut hasher, &instrument.id);
            hasher.update([instrument.groove as u8]);
            hash_len(&mut hasher, instrument.sounds.len());
            for sound in &instrument.sounds {
                hash_str(&mut hasher, &sound.id);
                hasher.update([sound.enabled as u8]);
            }
        }

        hex::encode(hasher.finalize())
    }
}

fn hash_len(hasher: &mut Sha256, len: usize) {
    hasher.update((len as u64).to_le_bytes());
}

// Length-prefixed so adjacent strings cannot run together
fn hash_str(hasher: &mut Sha256, value: &str) {
    hash_len(hasher, value.len());
    hasher.update(value.as_bytes());
}
