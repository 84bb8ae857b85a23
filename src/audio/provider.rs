// Sound Provider - Decoded sound lookup by instrument and variant
// The pipeline only ever asks for ready buffers; decoding happens here or upstream

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::arranger::Instrument;

use super::buffer::AudioBuffer;
use super::ingest::{load_wav, AudioError};

/// Source of decoded sound buffers
pub trait SoundProvider {
    /// Buffer for one sound variant of an instrument, if available
    fn sound(&self, instrument_id: &str, variant_id: &str) -> Option<Arc<AudioBuffer>>;
}

/// In-memory sound bank
#[derive(Debug, Clone, Default)]
pub struct SoundBank {
    sounds: HashMap<(String, String), Arc<AudioBuffer>>,
}

impl SoundBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        instrument_id: impl Into<String>,
        variant_id: impl Into<String>,
        buffer: AudioBuffer,
    ) {
        self.sounds
            .insert((instrument_id.into(), variant_id.into()), Arc::new(buffer));
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Load `<dir>/<instrument>/<variant>.wav` for every enabled variant.
    ///
    /// Missing files are logged and skipped; the pipeline reports them only
    /// if a hit actually needs them. Unreadable files are errors.
    pub fn load_dir(dir: &Path, instruments: &[Instrument]) -> Result<Self, AudioError> {
        let mut bank = SoundBank::new();

        for instrument in instruments {
            for variant in instrument.active_sounds() {
                let path = dir
                    .join(&instrument.id)
                    .join(format!("{}.wav", variant.id));

                if !path.is_file() {
                    log::warn!("Sound file not found: {}", path.display());
                    continue;
                }

                let buffer = load_wav(&path)?;
                log::debug!(
                    "Loaded {}/{}: {:.3}s, {} ch @ {} Hz",
                    instrument.id,
                    variant.id,
                    buffer.duration_secs(),
                    buffer.channels,
                    buffer.sample_rate
                );
                bank.insert(&instrument.id, &variant.id, buffer);
            }
        }

        log::info!("Loaded {} sounds from {}", bank.len(), dir.display());
        Ok(bank)
    }
}

impl SoundProvider for SoundBank {
    fn sound(&self, instrument_id: &str, variant_id: &str) -> Option<Arc<AudioBuffer>> {
        self.sounds
            .get(&(instrument_id.to_string(), variant_id.to_string()))
            .cloned()
    }
}

/// Buffers for an instrument's enabled variants, indexed by hit type
pub fn active_buffers(provider: &dyn SoundProvider, instrument: &Instrument) -> Vec<Option<Arc<AudioBuffer>>> {
    instrument
        .active_sounds()
        .iter()
        .map(|variant| provider.sound(&instrument.id, &variant.id))
        .collect()
}
