// Beatloom - Procedural Groove Generator
// Module declarations

pub mod arranger;
pub mod audio;
pub mod groove;
pub mod pipeline;
pub mod render;
pub mod state;

pub use pipeline::{
    prepare_generation, GenerationError, GenerationOutcome, GenerationOutput, GenerationState,
    GeneratorConfig, GrooveSession, GrooveSettings,
};
