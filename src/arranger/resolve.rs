// Sequence Resolution - Pick each instrument's working timeline
// Predefined sequences win; the rest follow the main beat or draw their own

use crate::groove::{BeatEvent, Sequence};

use super::instrument::{GrooveSource, Instrument};

/// Where an instrument's sequence came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceSource {
    /// The instrument's own predefined sequence
    Predefined,

    /// A copy of the generated main beat
    MainBeat,

    /// An independent timeline drawn for this instrument
    Own,
}

/// An instrument's resolved working sequence
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSequence {
    pub instrument_id: String,
    pub source: SequenceSource,
    pub sequence: Sequence,
}

/// Resolve one instrument's sequence.
///
/// The result is always an owned copy, so tiling or reassignment downstream
/// never touches the predefined pattern or the shared main beat.
/// `own_timeline` is only called for instruments asking for their own groove.
pub fn resolve_sequence(
    instrument: &Instrument,
    main_beat: &[BeatEvent],
    own_timeline: impl FnOnce() -> Sequence,
) -> ResolvedSequence {
    let (source, sequence) = match (&instrument.predefined_sequence, instrument.groove) {
        (Some(predefined), _) => (SequenceSource::Predefined, predefined.clone()),
        (None, GrooveSource::MainBeat) => (SequenceSource::MainBeat, main_beat.to_vec()),
        (None, GrooveSource::Own) => (SequenceSource::Own, own_timeline()),
    };

    ResolvedSequence {
        instrument_id: instrument.id.clone(),
        source,
        sequence,
    }
}

/// Resolve every instrument against the same main beat.
///
/// Instruments following the main beat (for example a kick and a guitar
/// layer playing one groove) each get their own copy of it. Instruments
/// with their own groove get a fresh timeline from `own_timeline`, called
/// in instrument order.
pub fn resolve_sequences(
    instruments: &[Instrument],
    main_beat: &[BeatEvent],
    mut own_timeline: impl FnMut(&Instrument) -> Sequence,
) -> Vec<ResolvedSequence> {
    instruments
        .iter()
        .map(|instrument| resolve_sequence(instrument, main_beat, || own_timeline(instrument)))
        .collect()
}
