// Lanes - Per-instrument parts tiled to song length
// A lane folds sequence, time map and hit types into one record per event

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::groove::{loop_sequence, repeat, BeatEvent, Sequence, Ticks, TimeMap};

use super::hit_types::assign_hit_types;
use super::instrument::{HitTypes, Instrument};
use super::resolve::{ResolvedSequence, SequenceSource};

/// A fully resolved instrument part
///
/// `sequence`, `time_map` and `hit_types` are positionally aligned; when
/// the instrument is silent `hit_types` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentPart {
    pub instrument_id: String,
    pub source: SequenceSource,

    /// The repeating unit before tiling
    pub groove: Sequence,

    /// Groove looped to the full song length
    pub sequence: Sequence,

    pub time_map: TimeMap,

    /// Hit types as assigned to the groove unit, before tiling
    pub groove_hit_types: HitTypes,

    pub hit_types: HitTypes,
}

impl InstrumentPart {
    /// An instrument is audible when it has something to play and a sound to play it with
    pub fn is_audible(&self) -> bool {
        !self.sequence.is_empty() && !self.hit_types.is_empty()
    }

    /// Fold the aligned lists into lane events
    pub fn lane(&self, ringout: bool) -> Lane {
        let mut lane = Lane::new(self.instrument_id.clone(), ringout);
        if self.hit_types.is_empty() {
            return lane;
        }

        debug_assert_eq!(self.sequence.len(), self.time_map.len());
        debug_assert_eq!(self.sequence.len(), self.hit_types.len());

        for ((event, start), &hit_type) in self
            .sequence
            .iter()
            .zip(self.time_map.iter())
            .zip(self.hit_types.iter())
        {
            lane.add_event(LaneEvent::new(start, event, hit_type));
        }
        lane
    }
}

/// Build an instrument's part from its resolved groove.
///
/// Hit types are drawn on the groove unit and then repeated, so every
/// repetition of the groove plays the same sounds.
pub fn arrange_part(
    instrument: &Instrument,
    resolved: ResolvedSequence,
    total: Ticks,
    rng: &mut impl Rng,
) -> InstrumentPart {
    let groove_hits = assign_hit_types(instrument, &resolved.sequence, rng);

    let sequence = loop_sequence(&resolved.sequence, total);
    let hit_types = repeat(&groove_hits, sequence.len());
    let time_map = TimeMap::build(&sequence);

    log::debug!(
        "Arranged '{}': {} groove events -> {} events, {} hit types",
        instrument.id,
        resolved.sequence.len(),
        sequence.len(),
        hit_types.len()
    );

    InstrumentPart {
        instrument_id: resolved.instrument_id,
        source: resolved.source,
        groove: resolved.sequence,
        sequence,
        time_map,
        groove_hit_types: groove_hits,
        hit_types,
    }
}

/// One scheduled slot of a lane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneEvent {
    /// Start offset from the top of the song
    pub start: Ticks,

    pub duration: Ticks,

    pub is_hit: bool,

    pub volume: f32,

    /// Index into the instrument's enabled-variant pool
    pub hit_type: usize,
}

impl LaneEvent {
    pub fn new(start: Ticks, event: &BeatEvent, hit_type: usize) -> Self {
        LaneEvent {
            start,
            duration: event.duration,
            is_hit: event.is_hit,
            volume: event.volume,
            hit_type,
        }
    }
}

/// An instrument lane ready for scheduling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub instrument_id: String,

    pub ringout: bool,

    pub events: Vec<LaneEvent>,
}

impl Lane {
    pub fn new(instrument_id: impl Into<String>, ringout: bool) -> Self {
        Lane {
            instrument_id: instrument_id.into(),
            ringout,
            events: Vec::new(),
        }
    }

    pub fn add_event(&mut self, event: LaneEvent) {
        self.events.push(event);
    }

    /// Sounded events only
    pub fn hits(&self) -> impl Iterator<Item = &LaneEvent> {
        self.events.iter().filter(|e| e.is_hit)
    }

    pub fn is_silent(&self) -> bool {
        self.hits().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arranger::resolve::resolve_sequence;
    use crate::groove::total_duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn groove() -> Sequence {
        vec![
            BeatEvent::hit(Ticks::from_beats(1), 1.0),
            BeatEvent::rest(Ticks::from_beats(1)),
            BeatEvent::hit(Ticks::from_beats(1), 0.9),
        ]
    }

    #[test]
    fn test_arrange_part_tiles_everything() {
        let guitar = Instrument::new("guitar")
            .with_sound("a", true)
            .with_sound("b", true)
            .with_sound("c", true);
        let mut rng = StdRng::seed_from_u64(21);

        let resolved = resolve_sequence(&guitar, &groove(), Vec::new);
        let part = arrange_part(&guitar, resolved, Ticks::from_beats(8), &mut rng);

        assert_eq!(total_duration(&part.sequence), Ticks::from_beats(8));
        assert_eq!(part.sequence.len(), 8);
        assert_eq!(part.time_map.len(), 8);
        assert_eq!(part.hit_types.len(), 8);
        assert_eq!(part.groove, groove());
        assert_eq!(part.groove_hit_types.len(), 3);

        // Hit types repeat with the groove
        for i in 3..8 {
            assert_eq!(part.hit_types[i], part.hit_types[i % 3]);
        }
    }

    #[test]
    fn test_short_predefined_hit_types_are_stretched() {
        let snare = Instrument::new("snare")
            .with_sound("snare", true)
            .with_sound("rim", true)
            .with_predefined_hit_types(vec![1, 0]);
        let mut rng = StdRng::seed_from_u64(0);

        let resolved = resolve_sequence(&snare, &groove(), Vec::new);
        let part = arrange_part(&snare, resolved, Ticks::from_beats(6), &mut rng);

        assert_eq!(part.hit_types, vec![1, 0, 1, 0, 1, 0]);
        assert_eq!(part.groove_hit_types, vec![1, 0]);
    }

    #[test]
    fn test_lane_folds_aligned_lists() {
        let kick = Instrument::new("kick").with_sound("kick", true);
        let mut rng = StdRng::seed_from_u64(2);

        let resolved = resolve_sequence(&kick, &groove(), Vec::new);
        let part = arrange_part(&kick, resolved, Ticks::from_beats(3), &mut rng);
        let lane = part.lane(true);

        assert!(lane.ringout);
        assert_eq!(lane.events.len(), 3);
        assert_eq!(lane.events[1].start, Ticks::from_beats(1));
        assert!(!lane.events[1].is_hit);
        assert_eq!(lane.hits().count(), 2);
        assert!(!lane.is_silent());
    }

    #[test]
    fn test_silent_instrument_has_empty_lane() {
        let drone = Instrument::new("drone").with_sound("low", false);
        let mut rng = StdRng::seed_from_u64(2);

        let resolved = resolve_sequence(&drone, &groove(), Vec::new);
        let part = arrange_part(&drone, resolved, Ticks::from_beats(4), &mut rng);

        assert!(!part.is_audible());
        assert!(part.lane(false).is_silent());
        assert_eq!(part.sequence.len(), 4);
    }
}
