// Groove Engine - Note lengths, sequence generation, time maps and tiling
// Produces the rhythmic timelines every instrument part is built from

pub mod lengths;
pub mod sequence;
pub mod tiling;
pub mod time;
pub mod timemap;

pub use lengths::{NoteLength, NoteLengthPool, PoolEntry, PoolError};
pub use sequence::{generate_sequence, hit_count, total_duration, BeatEvent, Sequence, VolumeRange};
pub use tiling::{loop_sequence, repeat};
pub use time::{Ticks, TICKS_PER_BEAT};
pub use timemap::TimeMap;
