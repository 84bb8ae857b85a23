// Musical Time - Exact beat durations
// Durations are integer ticks so sequence sums never drift

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

/// Tick resolution per beat.
///
/// 960 = 64 * 15, so every power-of-two division down to 1/64 and its
/// triplet are whole tick counts.
pub const TICKS_PER_BEAT: u64 = 960;

/// An exact duration or offset measured in ticks
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Ticks(pub u64);

impl Ticks {
    pub const ZERO: Ticks = Ticks(0);

    /// Ticks for a whole number of beats, saturating at `u64::MAX`
    pub fn from_beats(beats: u64) -> Self {
        Ticks(beats.saturating_mul(TICKS_PER_BEAT))
    }

    /// Duration in (possibly fractional) beats
    pub fn as_beats(self) -> f64 {
        self.0 as f64 / TICKS_PER_BEAT as f64
    }

    /// Duration in seconds for a given seconds-per-beat multiplier
    pub fn as_secs(self, seconds_per_beat: f64) -> f64 {
        self.as_beats() * seconds_per_beat
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn saturating_sub(self, other: Ticks) -> Ticks {
        Ticks(self.0.saturating_sub(other.0))
    }
}

impl Add for Ticks {
    type Output = Ticks;

    fn add(self, rhs: Ticks) -> Ticks {
        Ticks(self.0 + rhs.0)
    }
}

impl AddAssign for Ticks {
    fn add_assign(&mut self, rhs: Ticks) {
        self.0 += rhs.0;
    }
}

impl Sub for Ticks {
    type Output = Ticks;

    fn sub(self, rhs: Ticks) -> Ticks {
        Ticks(self.0 - rhs.0)
    }
}

impl Sum for Ticks {
    fn sum<I: Iterator<Item = Ticks>>(iter: I) -> Ticks {
        iter.fold(Ticks::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Ticks> for Ticks {
    fn sum<I: Iterator<Item = &'a Ticks>>(iter: I) -> Ticks {
        iter.copied().sum()
    }
}
