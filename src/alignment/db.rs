//! Region-scoped alignment cache: loads one genomic interval at a time
//! and serves coordinate-translated views over it.

use super::pairs::{find_range_by_ref, translate_by_ref};
use super::records::{EventAlignmentRecord, SequenceAlignmentRecord};
use super::sources::{
    ConsensusCaller, EventAlignmentSource, ReferenceProvider, SequenceAlignmentSource,
    SignalLocator, SignalReadOpener, Variant,
};
use crate::model::PoreModel;
use crate::signal::{SignalRead, Strand};
use crate::utils::{GenomicRegion, Result};
use itertools::{Either, Itertools};
use std::collections::HashMap;

/// A window into one read's event stream, aligned to a reference interval.
/// Borrowed from the cache; invalidated by the next `load_region`.
#[derive(Clone, Copy)]
pub struct EventSubsequence<'a> {
    pub read: &'a SignalRead,
    pub strand: Strand,
    /// True when the read aligns to the reverse-complement strand.
    pub rc: bool,
    /// +1 or -1: direction of the event index along the reference.
    pub stride: i8,
    /// Event index aligned to the interval start (in reference order; for
    /// stride -1 this is the larger index).
    pub event_start: i64,
    /// Event index aligned to the interval end.
    pub event_stop: i64,
    /// Model overriding the read's default for this traversal, if one was
    /// set on the cache.
    pub model: Option<&'a PoreModel>,
}

impl<'a> EventSubsequence<'a> {
    pub fn num_events(&self) -> usize {
        (self.event_start - self.event_stop).unsigned_abs() as usize + 1
    }

    /// Event indices in reference-position order: ascending for stride
    /// +1, descending for stride -1.
    pub fn event_indices(&self) -> impl Iterator<Item = i64> {
        if self.stride >= 0 {
            Either::Left(self.event_start..=self.event_stop)
        } else {
            Either::Right((self.event_stop..=self.event_start).rev())
        }
    }
}

struct LoadedRegion {
    region: GenomicRegion,
    ref_sequence: Vec<u8>,
    sequence_records: Vec<SequenceAlignmentRecord>,
    event_records: Vec<EventAlignmentRecord>,
    signal_reads: HashMap<String, SignalRead>,
}

/// Cache of everything aligned to one genomic interval: the reference
/// text, per-read base alignments, per-read event alignments, and the
/// signal reads behind them.
///
/// `load_region` replaces the whole cache; queries are read-only against
/// the loaded interval. Intended parallelism is one cache per worker over
/// disjoint regions, not one cache shared across threads.
pub struct AlignmentDb<'m> {
    reference: Box<dyn ReferenceProvider>,
    sequence_source: Box<dyn SequenceAlignmentSource>,
    event_source: Box<dyn EventAlignmentSource>,
    locator: Box<dyn SignalLocator>,
    opener: Box<dyn SignalReadOpener>,
    alt_model: Option<&'m PoreModel>,
    region: Option<LoadedRegion>,
}

impl<'m> AlignmentDb<'m> {
    pub fn new(
        reference: Box<dyn ReferenceProvider>,
        sequence_source: Box<dyn SequenceAlignmentSource>,
        event_source: Box<dyn EventAlignmentSource>,
        locator: Box<dyn SignalLocator>,
        opener: Box<dyn SignalReadOpener>,
    ) -> Self {
        AlignmentDb {
            reference,
            sequence_source,
            event_source,
            locator,
            opener,
            alt_model: None,
            region: None,
        }
    }

    /// Overrides the default per-read model attached to descriptors from
    /// subsequent event queries.
    pub fn set_alternative_model(&mut self, model: &'m PoreModel) {
        self.alt_model = Some(model);
    }

    pub fn is_loaded(&self) -> bool {
        self.region.is_some()
    }

    /// Loads `[start, stop]` on `contig`, discarding any prior region
    /// first. On any collaborator failure the cache is left empty and the
    /// error is propagated; there is no partial load.
    pub fn load_region(&mut self, contig: &str, start: i64, stop: i64) -> Result<()> {
        self.region = None;

        let region = GenomicRegion::new(contig, start, stop)?;
        let ref_sequence = self.reference.substring(contig, start, stop)?;
        let sequence_records = self.sequence_source.records_in_region(&region)?;
        let event_records = self.event_source.records_in_region(&region)?;

        // one open per distinct read id per loaded region
        let mut signal_reads = HashMap::new();
        for record in &event_records {
            if !signal_reads.contains_key(&record.read_id) {
                let path = self.locator.resolve(&record.read_id)?;
                let read = self.opener.open(&record.read_id, &path)?;
                signal_reads.insert(record.read_id.clone(), read);
            }
        }

        log::debug!(
            "{}: cached {} base and {} event alignments over {} signal reads",
            region,
            sequence_records.len(),
            event_records.len(),
            signal_reads.len()
        );

        self.region = Some(LoadedRegion {
            region,
            ref_sequence,
            sequence_records,
            event_records,
            signal_reads,
        });
        Ok(())
    }

    fn loaded(&self) -> &LoadedRegion {
        self.region
            .as_ref()
            .expect("query against an empty alignment cache")
    }

    pub fn region(&self) -> &GenomicRegion {
        &self.loaded().region
    }

    pub fn get_region_start(&self) -> i64 {
        self.loaded().region.start
    }

    pub fn get_region_end(&self) -> i64 {
        self.loaded().region.end
    }

    /// The cached reference text for the whole loaded interval.
    pub fn get_reference(&self) -> &[u8] {
        &self.loaded().ref_sequence
    }

    /// Reference text restricted to `[start, stop]`; the request must be a
    /// subset of the loaded region.
    pub fn get_reference_substring(&self, contig: &str, start: i64, stop: i64) -> &[u8] {
        let loaded = self.loaded();
        assert!(
            loaded.region.contains(contig, start, stop),
            "substring {}:{}-{} outside loaded region {}",
            contig,
            start,
            stop,
            loaded.region
        );
        let offset = (start - loaded.region.start) as usize;
        let len = (stop - start + 1) as usize;
        &loaded.ref_sequence[offset..offset + len]
    }

    /// For every cached read overlapping `[start, stop]`, the read bases
    /// aligned to that interval. Reads without overlap are omitted.
    pub fn get_read_substrings(&self, contig: &str, start: i64, stop: i64) -> Vec<Vec<u8>> {
        let loaded = self.loaded();
        assert_eq!(contig, loaded.region.contig, "query on a different contig");
        loaded
            .sequence_records
            .iter()
            .filter_map(|record| {
                let (read_start, read_stop) =
                    translate_by_ref(&record.aligned_bases, start, stop)?;
                Some(record.sequence[read_start as usize..=read_stop as usize].to_vec())
            })
            .collect_vec()
    }

    /// For every cached read overlapping `[start, stop]`, a descriptor of
    /// the event range aligned to that interval, carrying the orientation
    /// bits a consumer needs to traverse it in reference order.
    pub fn get_event_subsequences(
        &self,
        contig: &str,
        start: i64,
        stop: i64,
    ) -> Vec<EventSubsequence<'_>> {
        let loaded = self.loaded();
        assert_eq!(contig, loaded.region.contig, "query on a different contig");
        loaded
            .event_records
            .iter()
            .filter_map(|record| {
                let (event_start, event_stop) =
                    translate_by_ref(&record.aligned_events, start, stop)?;
                Some(self.descriptor(loaded, record, event_start, event_stop))
            })
            .collect_vec()
    }

    /// Events aligned to exactly one reference position. Multiple events
    /// on the position (signal insertions) widen the descriptor; a read
    /// with no event there (deletion) contributes nothing.
    pub fn get_events_aligned_to(&self, contig: &str, position: i64) -> Vec<EventSubsequence<'_>> {
        let loaded = self.loaded();
        assert_eq!(contig, loaded.region.contig, "query on a different contig");
        loaded
            .event_records
            .iter()
            .filter_map(|record| {
                let (first, last) = find_range_by_ref(&record.aligned_events, position, position)?;
                let event_start = record.aligned_events[first].local_pos;
                let event_stop = record.aligned_events[last].local_pos;
                Some(self.descriptor(loaded, record, event_start, event_stop))
            })
            .collect_vec()
    }

    /// Aggregates the interval's event evidence, delegates to the
    /// consensus evaluator, and keeps a candidate only when at least
    /// `min_depth` reads support it and the supporting fraction is at
    /// least `min_frequency`.
    pub fn get_variants_in_region(
        &self,
        caller: &dyn ConsensusCaller,
        contig: &str,
        start: i64,
        stop: i64,
        min_frequency: f64,
        min_depth: usize,
    ) -> Result<Vec<Variant>> {
        let reference = self.get_reference_substring(contig, start, stop);
        let data = self.get_event_subsequences(contig, start, stop);
        let depth = data.len();
        if depth == 0 {
            return Ok(Vec::new());
        }
        let region = GenomicRegion::new(contig, start, stop)?;
        let calls = caller.call(reference, &region, &data)?;
        Ok(calls
            .into_iter()
            .filter(|call| {
                call.support >= min_depth
                    && call.support as f64 / depth as f64 >= min_frequency
            })
            .map(|call| call.variant)
            .collect_vec())
    }

    fn descriptor<'a>(
        &'a self,
        loaded: &'a LoadedRegion,
        record: &EventAlignmentRecord,
        event_start: i64,
        event_stop: i64,
    ) -> EventSubsequence<'a> {
        EventSubsequence {
            read: &loaded.signal_reads[&record.read_id],
            strand: record.strand,
            rc: record.rc,
            stride: record.stride,
            event_start,
            event_stop,
            model: self.alt_model,
        }
    }
}
