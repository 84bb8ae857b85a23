// Hit Types - Choose which enabled sound variant plays at each position
// Every position gets a draw (rests included) to stay aligned with the sequence

use rand::Rng;

use crate::groove::BeatEvent;

use super::instrument::{HitTypes, Instrument};

/// Assign hit types for an instrument's resolved sequence.
///
/// Non-empty predefined hit types are returned unchanged, whatever their
/// length; tiling reconciles them with the sequence later. Otherwise each
/// position draws uniformly from the enabled variants. An instrument with
/// no enabled variants gets an empty list and stays silent.
pub fn assign_hit_types(instrument: &Instrument, sequence: &[BeatEvent], rng: &mut impl Rng) -> HitTypes {
    if let Some(locked) = instrument.locked_hit_types() {
        return locked.to_vec();
    }

    let active = instrument.active_sounds().len();
    if active == 0 {
        log::debug!("Instrument '{}' has no enabled sounds", instrument.id);
        return Vec::new();
    }

    sequence
        .iter()
        .map(|_| rng.random_range(0..active))
        .collect()
}
