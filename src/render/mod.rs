// Render Engine - Offline multi-instrument mixdown
// Schedules lane hits against decoded sounds and renders one mixed buffer

pub mod engine;
pub mod export;
pub mod mixer;
pub mod schedule;

// Re-export main types
pub use engine::{OfflineMixer, RenderContext, RenderEngine, RenderError, RenderOutcome, RenderSession};
pub use export::{to_wav_bytes, write_wav, ExportFormat};
pub use mixer::{mix_voice, mixdown, soft_limit, MixerSettings};
pub use schedule::{schedule_lane, seconds_per_beat, RenderJob, ScheduledVoice};
