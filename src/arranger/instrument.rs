// Instruments - Sound variants and per-instrument overrides
// Enabled variants form the candidate pool for hit type assignment

use serde::{Deserialize, Serialize};

use crate::groove::Sequence;

/// Indices into an instrument's enabled-variant pool, one per sequence position
pub type HitTypes = Vec<usize>;

/// One selectable sound of an instrument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundVariant {
    pub id: String,
    pub enabled: bool,
}

impl SoundVariant {
    pub fn new(id: impl Into<String>, enabled: bool) -> Self {
        SoundVariant {
            id: id.into(),
            enabled,
        }
    }
}

/// Timeline an instrument plays when it has no predefined sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrooveSource {
    /// Follow the shared main beat
    #[default]
    MainBeat,

    /// Draw an independent timeline from the same length pool
    Own,
}

/// An instrument part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: String,

    pub sounds: Vec<SoundVariant>,

    /// Fixed timeline used instead of the shared main beat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predefined_sequence: Option<Sequence>,

    /// Fixed hit types used instead of random assignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predefined_hit_types: Option<HitTypes>,

    #[serde(default)]
    pub groove: GrooveSource,

    /// Let sounds play to their natural length instead of the rhythmic slot
    #[serde(default)]
    pub ringout: bool,
}

impl Instrument {
    pub fn new(id: impl Into<String>) -> Self {
        Instrument {
            id: id.into(),
            sounds: Vec::new(),
            predefined_sequence: None,
            predefined_hit_types: None,
            groove: GrooveSource::MainBeat,
            ringout: false,
        }
    }

    pub fn with_sound(mut self, id: impl Into<String>, enabled: bool) -> Self {
        self.sounds.push(SoundVariant::new(id, enabled));
        self
    }

    pub fn with_ringout(mut self, ringout: bool) -> Self {
        self.ringout = ringout;
        self
    }

    pub fn with_groove_source(mut self, groove: GrooveSource) -> Self {
        self.groove = groove;
        self
    }

    pub fn with_predefined_sequence(mut self, sequence: Sequence) -> Self {
        self.predefined_sequence = Some(sequence);
        self
    }

    pub fn with_predefined_hit_types(mut self, hit_types: HitTypes) -> Self {
        self.predefined_hit_types = Some(hit_types);
        self
    }

    /// Enabled variants in list order; a hit type indexes this list
    pub fn active_sounds(&self) -> Vec<&SoundVariant> {
        self.sounds.iter().filter(|s| s.enabled).collect()
    }

    /// Predefined hit types, if present and non-empty
    pub fn locked_hit_types(&self) -> Option<&[usize]> {
        self.predefined_hit_types
            .as_deref()
            .filter(|hits| !hits.is_empty())
    }
}
