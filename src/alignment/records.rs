//! Per-read alignment records cached for one loaded region.

use super::pairs::AlignedPair;
use crate::signal::Strand;

/// One read's base-level alignment to the loaded region.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceAlignmentRecord {
    /// The read's base sequence; immutable once loaded.
    pub sequence: Vec<u8>,
    /// Reference position → position in `sequence`, sorted by reference
    /// position.
    pub aligned_bases: Vec<AlignedPair>,
}

/// One read's signal-event-level alignment to the loaded region.
///
/// `stride` and `rc` are independent orientation bits set by upstream
/// alignment: `rc` says which reference strand the read aligned to, while
/// `stride` says whether the event index rises or falls with increasing
/// reference position. Traversal in reference order must honor both.
#[derive(Debug, Clone, PartialEq)]
pub struct EventAlignmentRecord {
    /// Key into the cache's signal-read map; the record does not own the
    /// signal data.
    pub read_id: String,
    /// True when the read aligns to the reverse-complement strand.
    pub rc: bool,
    /// Sequencing channel the events come from.
    pub strand: Strand,
    /// +1 or -1: direction of the event index along the reference.
    pub stride: i8,
    /// Reference position → event index, sorted by reference position.
    pub aligned_events: Vec<AlignedPair>,
}
