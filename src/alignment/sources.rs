//! Collaborator interfaces the alignment cache consumes, and the variant
//! types returned by consensus calling.

use super::db::EventSubsequence;
use super::records::{EventAlignmentRecord, SequenceAlignmentRecord};
use crate::signal::SignalRead;
use crate::utils::{GenomicRegion, Result};
use std::path::{Path, PathBuf};

/// Supplies reference-genome text for inclusive intervals.
pub trait ReferenceProvider {
    fn substring(&self, contig: &str, start: i64, stop: i64) -> Result<Vec<u8>>;
}

/// Supplies base-level alignments overlapping a region, already decoded
/// into ordered aligned pairs.
pub trait SequenceAlignmentSource {
    fn records_in_region(&mut self, region: &GenomicRegion) -> Result<Vec<SequenceAlignmentRecord>>;
}

/// Supplies event-level alignments overlapping a region.
pub trait EventAlignmentSource {
    fn records_in_region(&mut self, region: &GenomicRegion) -> Result<Vec<EventAlignmentRecord>>;
}

/// Maps a read id to the raw-signal file that holds its events.
pub trait SignalLocator {
    fn resolve(&self, read_id: &str) -> Result<PathBuf>;
}

/// Opens a raw-signal file into a decoded [`SignalRead`].
pub trait SignalReadOpener {
    fn open(&self, read_id: &str, path: &Path) -> Result<SignalRead>;
}

/// A candidate genome edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub contig: String,
    pub position: i64,
    pub ref_seq: String,
    pub alt_seq: String,
}

/// A candidate variant with the number of reads supporting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantCall {
    pub variant: Variant,
    pub support: usize,
}

/// External profile-HMM/consensus evaluator. Receives the reference text
/// of the queried interval and one event-subsequence descriptor per
/// overlapping read; returns candidate variants with support counts.
pub trait ConsensusCaller {
    fn call(
        &self,
        reference: &[u8],
        region: &GenomicRegion,
        data: &[EventSubsequence],
    ) -> Result<Vec<VariantCall>>;
}
