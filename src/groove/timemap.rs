// Time Map - Cumulative start offsets for a sequence
// Rests occupy time like hits; they are simply never sounded

use serde::{Deserialize, Serialize};

use super::sequence::BeatEvent;
use super::time::Ticks;

/// Start offset of every event in a sequence, positionally aligned with it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeMap(Vec<Ticks>);

impl TimeMap {
    /// Prefix sum over the sequence's durations
    pub fn build(sequence: &[BeatEvent]) -> Self {
        let mut offsets = Vec::with_capacity(sequence.len());
        let mut cursor = Ticks::ZERO;

        for event in sequence {
            offsets.push(cursor);
            cursor += event.duration;
        }

        TimeMap(offsets)
    }

    pub fn offsets(&self) -> &[Ticks] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<Ticks> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Ticks> + '_ {
        self.0.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_sums_include_rests() {
        let seq = vec![
            BeatEvent::hit(Ticks(480), 1.0),
            BeatEvent::rest(Ticks(960)),
            BeatEvent::hit(Ticks(240), 0.8),
            BeatEvent::hit(Ticks(240), 0.8),
        ];

        let map = TimeMap::build(&seq);

        assert_eq!(map.offsets(), &[Ticks(0), Ticks(480), Ticks(1440), Ticks(1680)]);
        assert_eq!(map.len(), seq.len());
    }

    #[test]
    fn test_differences_match_durations() {
        let seq: Vec<BeatEvent> = [320u64, 640, 15, 960, 120]
            .iter()
            .map(|&d| BeatEvent::hit(Ticks(d), 1.0))
            .collect();
        let map = TimeMap::build(&seq);

        assert_eq!(map.get(0), Some(Ticks::ZERO));
        for i in 0..seq.len() - 1 {
            assert_eq!(map.offsets()[i + 1] - map.offsets()[i], seq[i].duration);
        }
        assert!(map.offsets().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_empty_sequence() {
        let map = TimeMap::build(&[]);
        assert!(map.is_empty());
        assert_eq!(map.get(0), None);
    }
}
