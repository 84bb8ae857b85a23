// Generation pipeline
// Orchestrates config -> groove -> instrument parts -> render

pub mod config;
pub mod generate;
pub mod session;
pub mod snapshot;

pub use config::{BeatCount, Beats, ConfigError, GeneratorConfig, GrooveSettings};
pub use generate::{prepare_generation, GenerationError, GenerationOutput, PreparedGeneration};
pub use session::{GenerationOutcome, GrooveSession};
pub use snapshot::{GenerationState, InstrumentSounds};
