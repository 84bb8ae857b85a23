// Sequence Generation - Random rhythmic timelines from a note length pool
// Fills a target duration with hits and rests drawn from weighted lengths

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::lengths::NoteLengthPool;
use super::time::Ticks;

/// One slot in a timeline: an audible hit or a silent rest of the same length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeatEvent {
    /// Duration in ticks (always positive in generated sequences)
    pub duration: Ticks,

    /// Whether this slot is sounded
    pub is_hit: bool,

    /// Playback volume [0.0, 1.0]; rests carry 0.0
    pub volume: f32,
}

impl BeatEvent {
    pub fn hit(duration: Ticks, volume: f32) -> Self {
        BeatEvent {
            duration,
            is_hit: true,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    pub fn rest(duration: Ticks) -> Self {
        BeatEvent {
            duration,
            is_hit: false,
            volume: 0.0,
        }
    }

    /// Same event with a different duration
    pub fn with_duration(self, duration: Ticks) -> Self {
        BeatEvent { duration, ..self }
    }
}

/// Ordered timeline of beat events
pub type Sequence = Vec<BeatEvent>;

/// Range hit volumes are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeRange {
    pub min: f32,
    pub max: f32,
}

impl Default for VolumeRange {
    fn default() -> Self {
        VolumeRange { min: 0.75, max: 1.0 }
    }
}

impl VolumeRange {
    pub fn new(min: f32, max: f32) -> Self {
        VolumeRange {
            min: min.clamp(0.0, 1.0),
            max: max.clamp(0.0, 1.0),
        }
    }

    /// Draw a volume uniformly from the range
    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }
}

/// Generate a timeline covering exactly `total` ticks.
///
/// Each step draws a length from the pool, clamps it to the remaining space,
/// and rolls against `hit_chance` to decide hit or rest. A zero total or an
/// empty pool yields an empty sequence.
pub fn generate_sequence(
    total: Ticks,
    pool: &NoteLengthPool,
    hit_chance: f64,
    volume: &VolumeRange,
    rng: &mut impl Rng,
) -> Sequence {
    let mut sequence = Vec::new();
    let mut cursor = Ticks::ZERO;

    while cursor < total {
        let Some(entry) = pool.draw(rng) else {
            break;
        };
        // Zero-length entries cannot come out of a validated pool; guard anyway
        // so the loop always makes progress.
        if entry.duration.is_zero() {
            break;
        }

        let duration = entry.duration.min(total - cursor);
        let event = if rng.random::<f64>() < hit_chance {
            BeatEvent::hit(duration, volume.sample(rng))
        } else {
            BeatEvent::rest(duration)
        };

        sequence.push(event);
        cursor += duration;
    }

    if cursor < total && !sequence.is_empty() {
        log::warn!("Sequence generation stopped early at {:?} of {:?}", cursor, total);
    }

    sequence
}

/// Summed duration of a sequence, rests included
pub fn total_duration(sequence: &[BeatEvent]) -> Ticks {
    sequence.iter().map(|e| e.duration).sum()
}

/// Number of sounded events
pub fn hit_count(sequence: &[BeatEvent]) -> usize {
    sequence.iter().filter(|e| e.is_hit).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groove::lengths::NoteLength;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool(lengths: &[(&str, u32, bool)]) -> NoteLengthPool {
        let lengths: Vec<NoteLength> = lengths
            .iter()
            .map(|(id, amount, triplet)| NoteLength::new(*id, *amount, *triplet))
            .collect();
        NoteLengthPool::from_lengths(&lengths).unwrap()
    }

    #[test]
    fn test_sequence_sums_to_total() {
        let pool = pool(&[("1", 2, false), ("2", 1, true), ("4", 1, false), ("8", 3, true)]);

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for beats in [1, 3, 7, 16] {
                let total = Ticks::from_beats(beats);
                let seq = generate_sequence(total, &pool, 0.5, &VolumeRange::default(), &mut rng);
                assert_eq!(total_duration(&seq), total, "seed {} beats {}", seed, beats);
                assert!(seq.iter().all(|e| !e.duration.is_zero()));
            }
        }
    }

    #[test]
    fn test_whole_and_half_all_hits() {
        let pool = pool(&[("1", 1, false), ("2", 1, false)]);
        let mut rng = StdRng::seed_from_u64(42);

        let seq = generate_sequence(Ticks::from_beats(4), &pool, 1.0, &VolumeRange::default(), &mut rng);

        assert_eq!(total_duration(&seq), Ticks::from_beats(4));
        assert!(!seq.is_empty());
        assert!(seq.iter().all(|e| e.is_hit));
        assert_eq!(hit_count(&seq), seq.len());
    }

    #[test]
    fn test_zero_hit_chance_gives_silent_rests() {
        let pool = pool(&[("2", 1, false)]);
        let mut rng = StdRng::seed_from_u64(1);

        let seq = generate_sequence(Ticks::from_beats(2), &pool, 0.0, &VolumeRange::default(), &mut rng);

        assert_eq!(seq.len(), 4);
        assert!(seq.iter().all(|e| !e.is_hit && e.volume == 0.0));
    }

    #[test]
    fn test_final_event_is_clamped() {
        // Triplet beats (640 ticks) never divide 1 beat evenly
        let pool = pool(&[("1", 1, true)]);
        let mut rng = StdRng::seed_from_u64(3);

        let seq = generate_sequence(Ticks::from_beats(1), &pool, 1.0, &VolumeRange::default(), &mut rng);

        assert_eq!(seq.len(), 2);
        assert_eq!(seq[0].duration, Ticks(640));
        assert_eq!(seq[1].duration, Ticks(320));
    }

    #[test]
    fn test_hit_volumes_within_range() {
        let pool = pool(&[("4", 1, false)]);
        let range = VolumeRange::new(0.4, 0.6);
        let mut rng = StdRng::seed_from_u64(9);

        let seq = generate_sequence(Ticks::from_beats(8), &pool, 1.0, &range, &mut rng);

        assert!(seq.iter().all(|e| e.volume >= 0.4 && e.volume <= 0.6));
    }

    #[test]
    fn test_zero_total_or_empty_pool_is_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        let full = pool(&[("1", 1, false)]);

        assert!(generate_sequence(Ticks::ZERO, &full, 1.0, &VolumeRange::default(), &mut rng).is_empty());
        assert!(generate_sequence(
            Ticks::from_beats(4),
            &NoteLengthPool::default(),
            1.0,
            &VolumeRange::default(),
            &mut rng
        )
        .is_empty());
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let pool = pool(&[("1", 1, false), ("2", 1, false), ("4", 1, true)]);
        let mut a = StdRng::seed_from_u64(1234);
        let mut b = StdRng::seed_from_u64(1234);

        let total = Ticks::from_beats(8);
        let seq_a = generate_sequence(total, &pool, 0.7, &VolumeRange::default(), &mut a);
        let seq_b = generate_sequence(total, &pool, 0.7, &VolumeRange::default(), &mut b);
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_volume_range_degenerate() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(VolumeRange::new(0.5, 0.5).sample(&mut rng), 0.5);
        assert_eq!(VolumeRange::new(0.9, 0.2).sample(&mut rng), 0.9);
    }
}
