// Audio module
// Decoded audio buffers, WAV ingestion and sound lookup

pub mod buffer;
pub mod ingest;
pub mod provider;

pub use buffer::{AudioBuffer, RENDER_CHANNELS, RENDER_SAMPLE_RATE};
pub use ingest::{ingest_wav, load_wav, AudioError};
pub use provider::{active_buffers, SoundBank, SoundProvider};
