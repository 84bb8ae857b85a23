// Arranger - Instrument parts built from the generated groove
// Resolves sequences, assigns hit types and folds everything into lanes

pub mod hit_types;
pub mod instrument;
pub mod lanes;
pub mod resolve;

// Re-export main types
pub use hit_types::assign_hit_types;
pub use instrument::{GrooveSource, HitTypes, Instrument, SoundVariant};
pub use lanes::{arrange_part, InstrumentPart, Lane, LaneEvent};
pub use resolve::{resolve_sequence, resolve_sequences, ResolvedSequence, SequenceSource};
