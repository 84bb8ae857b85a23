// Tiling - Stretch or truncate patterns by cyclic repetition
// Used to grow the groove unit to the full song length

use super::sequence::{BeatEvent, Sequence};
use super::time::Ticks;

/// Stretch or truncate `items` to exactly `target_len` elements.
///
/// Shorter targets take the prefix; longer targets repeat the list
/// cyclically, so `result[i] == items[i % items.len()]`. An empty input
/// cannot be cycled and yields an empty result.
pub fn repeat<T: Clone>(items: &[T], target_len: usize) -> Vec<T> {
    if items.is_empty() {
        return Vec::new();
    }
    if target_len <= items.len() {
        return items[..target_len].to_vec();
    }

    items.iter().cycle().take(target_len).cloned().collect()
}

/// Loop a sequence until it lasts exactly `total` ticks.
///
/// Events are cycled in order; the final event is shortened if it would
/// overshoot. A sequence with no duration cannot fill anything and yields
/// an empty result.
pub fn loop_sequence(sequence: &[BeatEvent], total: Ticks) -> Sequence {
    let unit: Ticks = sequence.iter().map(|e| e.duration).sum();
    if unit.is_zero() || total.is_zero() {
        return Vec::new();
    }

    let mut looped = Vec::new();
    let mut cursor = Ticks::ZERO;

    for event in sequence.iter().cycle() {
        if cursor >= total {
            break;
        }
        let duration = event.duration.min(total - cursor);
        looped.push(event.with_duration(duration));
        cursor += duration;
    }

    looped
}
