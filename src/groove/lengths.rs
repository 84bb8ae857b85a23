// Note Lengths - Weighted pool of allowed note durations
// A length with amount 3 is drawn three times as often as one with amount 1

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::time::{Ticks, TICKS_PER_BEAT};

/// Errors raised while building a note length pool
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("No allowed note lengths: every weight is zero")]
    Empty,

    #[error("Invalid note length '{id}': {reason}")]
    InvalidLength { id: String, reason: String },
}

/// One allowed note-duration class and how strongly it is favored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteLength {
    /// Note division: "1" lasts one beat, "2" half a beat, "4" a quarter beat
    pub id: String,

    /// Relative draw weight; zero removes the length from the pool
    pub amount: u32,

    /// Triplet lengths last two thirds of the straight length
    #[serde(default)]
    pub is_triplet: bool,
}

impl NoteLength {
    pub fn new(id: impl Into<String>, amount: u32, is_triplet: bool) -> Self {
        NoteLength {
            id: id.into(),
            amount,
            is_triplet,
        }
    }

    /// Nominal duration of this length class in ticks
    pub fn duration(&self) -> Result<Ticks, PoolError> {
        let invalid = |reason: &str| PoolError::InvalidLength {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        let division: u64 = self
            .id
            .trim()
            .parse()
            .map_err(|_| invalid("id is not a note division"))?;

        if division == 0 {
            return Err(invalid("division must be positive"));
        }
        if TICKS_PER_BEAT % division != 0 {
            return Err(invalid("division does not fit the tick grid"));
        }

        let straight = TICKS_PER_BEAT / division;
        if !self.is_triplet {
            return Ok(Ticks(straight));
        }

        if (straight * 2) % 3 != 0 {
            return Err(invalid("triplet does not fit the tick grid"));
        }
        Ok(Ticks(straight * 2 / 3))
    }
}

/// A single drawable pool entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolEntry {
    pub id: String,
    pub is_triplet: bool,
    pub duration: Ticks,

    /// Relative draw weight, always positive
    pub weight: u32,
}

/// Weighted, randomly sampleable set of the allowed lengths
///
/// Drawing is equivalent to a flat list where every length appears `weight`
/// times, without materialising that list.
#[derive(Debug, Clone, Default)]
pub struct NoteLengthPool {
    entries: Vec<PoolEntry>,
    index: Option<WeightedIndex<u64>>,
}

impl NoteLengthPool {
    /// Build the pool from weighted lengths.
    ///
    /// Zero-weight lengths are skipped without validation since they can
    /// never be drawn. Fails with [`PoolError::Empty`] when nothing remains.
    pub fn from_lengths(lengths: &[NoteLength]) -> Result<Self, PoolError> {
        let mut entries = Vec::new();

        for length in lengths.iter().filter(|l| l.amount > 0) {
            entries.push(PoolEntry {
                id: length.id.clone(),
                is_triplet: length.is_triplet,
                duration: length.duration()?,
                weight: length.amount,
            });
        }

        if entries.is_empty() {
            return Err(PoolError::Empty);
        }

        let index = WeightedIndex::new(entries.iter().map(|e| e.weight as u64))
            .map_err(|_| PoolError::Empty)?;

        Ok(NoteLengthPool {
            entries,
            index: Some(index),
        })
    }

    /// Distinct lengths in the pool
    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all weights (size of the equivalent flat pool)
    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(|e| e.weight as u64).sum()
    }

    /// Draw one entry with probability proportional to its weight
    pub fn draw(&self, rng: &mut impl Rng) -> Option<&PoolEntry> {
        let index = self.index.as_ref()?;
        self.entries.get(index.sample(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_duration_straight_divisions() {
        assert_eq!(NoteLength::new("1", 1, false).duration(), Ok(Ticks(960)));
        assert_eq!(NoteLength::new("2", 1, false).duration(), Ok(Ticks(480)));
        assert_eq!(NoteLength::new("16", 1, false).duration(), Ok(Ticks(60)));
        assert_eq!(NoteLength::new("64", 1, false).duration(), Ok(Ticks(15)));
    }

    #[test]
    fn test_duration_triplets() {
        assert_eq!(NoteLength::new("1", 1, true).duration(), Ok(Ticks(640)));
        assert_eq!(NoteLength::new("2", 1, true).duration(), Ok(Ticks(320)));
        assert_eq!(NoteLength::new("64", 1, true).duration(), Ok(Ticks(10)));
    }

    #[test]
    fn test_duration_rejects_bad_ids() {
        assert!(NoteLength::new("quarter", 1, false).duration().is_err());
        assert!(NoteLength::new("0", 1, false).duration().is_err());
        assert!(NoteLength::new("7", 1, false).duration().is_err());
        // 960 / 3 = 320, whose two thirds is not whole
        assert!(NoteLength::new("3", 1, true).duration().is_err());
    }

    #[test]
    fn test_pool_keeps_distinct_weighted_entries() {
        let pool = NoteLengthPool::from_lengths(&[
            NoteLength::new("1", 3, false),
            NoteLength::new("2", 1, true),
        ])
        .unwrap();

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.total_weight(), 4);
        assert_eq!(pool.entries()[0].weight, 3);
        assert!(pool.entries()[1].is_triplet);
    }

    #[test]
    fn test_draws_follow_weights() {
        let pool = NoteLengthPool::from_lengths(&[
            NoteLength::new("1", 3, false),
            NoteLength::new("4", 1, false),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(17);

        let beats = (0..4000)
            .filter(|_| pool.draw(&mut rng).unwrap().id == "1")
            .count();

        // Expect about 3000 of 4000
        assert!(beats > 2800 && beats < 3200, "got {}", beats);
    }

    #[test]
    fn test_huge_weight_does_not_allocate_per_weight() {
        let pool = NoteLengthPool::from_lengths(&[
            NoteLength::new("4", u32::MAX, false),
            NoteLength::new("2", u32::MAX, true),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.total_weight(), 2 * u32::MAX as u64);
        for _ in 0..10 {
            assert!(pool.draw(&mut rng).is_some());
        }
    }

    #[test]
    fn test_pool_empty_when_all_weights_zero() {
        let err = NoteLengthPool::from_lengths(&[
            NoteLength::new("1", 0, false),
            NoteLength::new("2", 0, false),
        ])
        .unwrap_err();
        assert_eq!(err, PoolError::Empty);

        assert_eq!(NoteLengthPool::from_lengths(&[]).unwrap_err(), PoolError::Empty);
    }

    #[test]
    fn test_pool_skips_invalid_zero_weight_lengths() {
        let pool = NoteLengthPool::from_lengths(&[
            NoteLength::new("garbage", 0, false),
            NoteLength::new("4", 2, false),
        ])
        .unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.total_weight(), 2);
    }

    #[test]
    fn test_draw_stays_in_pool() {
        let pool = NoteLengthPool::from_lengths(&[
            NoteLength::new("1", 1, false),
            NoteLength::new("8", 1, false),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let entry = pool.draw(&mut rng).unwrap();
            assert!(entry.duration == Ticks(960) || entry.duration == Ticks(120));
        }
        assert!(NoteLengthPool::default().draw(&mut rng).is_none());
    }
}
