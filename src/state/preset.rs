// Preset models - Locked-in grooves that replay a generation
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline::{GenerationOutput, GrooveSettings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,

    /// Fingerprint of the generation state the preset was locked from
    pub state_fingerprint: String,

    pub settings: GrooveSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetSummary {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub state_fingerprint: String,
}

impl From<&Preset> for PresetSummary {
    fn from(preset: &Preset) -> Self {
        PresetSummary {
            id: preset.id,
            name: preset.name.clone(),
            created_at: preset.created_at,
            state_fingerprint: preset.state_fingerprint.clone(),
        }
    }
}

impl Preset {
    /// Lock a generation's choices into a copy of `settings`.
    ///
    /// Each instrument gets the hit types assigned to its groove unit as
    /// predefined hit types. With `lock_sequences` its groove is stored as well, so
    /// generating from the preset plays back the same groove.
    pub fn lock_in(
        name: impl Into<String>,
        settings: &GrooveSettings,
        output: &GenerationOutput,
        lock_sequences: bool,
    ) -> Self {
        let mut settings = settings.clone();

        for instrument in &mut settings.instruments {
            let Some(part) = output.part(&instrument.id) else {
                log::warn!("No generated part for '{}', leaving it unlocked", instrument.id);
                continue;
            };
            if part.groove_hit_types.is_empty() {
                continue;
            }

            instrument.predefined_hit_types = Some(part.groove_hit_types.clone());
            if lock_sequences {
                instrument.predefined_sequence = Some(part.groove.clone());
            }
        }

        Preset {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
            state_fingerprint: output.state.fingerprint(),
            settings,
        }
    }

    pub fn summary(&self) -> PresetSummary {
        PresetSummary::from(self)
    }
}
