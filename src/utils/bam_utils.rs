//! htslib-backed implementations of the reference and base-level
//! alignment collaborators.

use crate::alignment::{
    AlignedPair, ReferenceProvider, SequenceAlignmentRecord, SequenceAlignmentSource,
};
use crate::utils::{GenomicRegion, Result};
use rust_htslib::bam::{self, ext::BamRecordExtensions, Read};
use rust_htslib::faidx;
use std::path::Path;

/// Reference-sequence provider backed by a faidx-indexed FASTA file.
pub struct FaidxReference {
    reader: faidx::Reader,
}

impl FaidxReference {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| format!("Invalid reference file name: {}", path.display()))?;
        let fai_path = path.with_extension(extension.to_owned() + ".fai");
        if !fai_path.exists() {
            return Err(format!(
                "Reference index file not found: {}. Create it using 'samtools faidx {}'",
                fai_path.display(),
                path.display()
            ));
        }
        let reader = faidx::Reader::from_path(path).map_err(|e| e.to_string())?;
        Ok(FaidxReference { reader })
    }
}

impl ReferenceProvider for FaidxReference {
    fn substring(&self, contig: &str, start: i64, stop: i64) -> Result<Vec<u8>> {
        if start < 0 || start > stop {
            return Err(format!(
                "Invalid reference interval {}:{}-{}",
                contig, start, stop
            ));
        }
        // faidx fetch takes an inclusive stop, matching our coordinates
        let seq = self
            .reader
            .fetch_seq(contig, start as usize, stop as usize)
            .map_err(|e| format!("Failed to fetch {}:{}-{}: {}", contig, start, stop, e))?;
        if seq.len() != (stop - start + 1) as usize {
            return Err(format!(
                "Reference interval {}:{}-{} is out of range",
                contig, start, stop
            ));
        }
        Ok(seq.to_ascii_uppercase())
    }
}

/// Base-level alignment source reading an indexed BAM; aligned pairs come
/// straight from each record's CIGAR.
pub struct BamSequenceAlignments {
    reader: bam::IndexedReader,
}

impl BamSequenceAlignments {
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = bam::IndexedReader::from_path(path)
            .map_err(|e| format!("Failed to create bam reader: {}", e))?;
        Ok(BamSequenceAlignments { reader })
    }
}

impl SequenceAlignmentSource for BamSequenceAlignments {
    fn records_in_region(&mut self, region: &GenomicRegion) -> Result<Vec<SequenceAlignmentRecord>> {
        // htslib fetch takes an exclusive stop
        self.reader
            .fetch((region.contig.as_str(), region.start, region.end + 1))
            .map_err(|e| format!("Failed to fetch {}: {}", region, e))?;

        let mut records = Vec::new();
        for rec in self.reader.records() {
            let rec = rec.map_err(|e| format!("Failed to read BAM record: {}", e))?;
            if let Some(record) = record_to_alignment(&rec) {
                records.push(record);
            }
        }
        Ok(records)
    }
}

/// Converts one BAM record into a cacheable alignment record, or None for
/// records that carry no usable alignment: unmapped, secondary,
/// supplementary, or without sequence data (a SEQ of `*` is legal in BAM
/// and would leave the aligned pairs pointing into an empty sequence).
fn record_to_alignment(rec: &bam::Record) -> Option<SequenceAlignmentRecord> {
    if rec.is_unmapped() || rec.is_secondary() || rec.is_supplementary() {
        return None;
    }
    if rec.seq().len() == 0 {
        log::warn!(
            "{}: record without sequence data skipped",
            String::from_utf8_lossy(rec.qname())
        );
        return None;
    }
    let aligned_bases = rec
        .aligned_pairs()
        .map(|[read_pos, ref_pos]| AlignedPair {
            ref_pos,
            local_pos: read_pos,
        })
        .collect();
    Some(SequenceAlignmentRecord {
        sequence: rec.seq().as_bytes(),
        aligned_bases,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_htslib::bam::record::{Cigar, CigarString};

    fn mapped_record(qname: &[u8], seq: &[u8], pos: i64) -> bam::Record {
        let mut rec = bam::Record::new();
        let cigar = CigarString(vec![Cigar::Match(seq.len().max(1) as u32)]);
        let quals = vec![30u8; seq.len()];
        rec.set(qname, Some(&cigar), seq, &quals);
        rec.set_pos(pos);
        rec
    }

    #[test]
    fn record_with_sequence_converted() {
        let rec = mapped_record(b"read1", b"ACGT", 100);
        let record = record_to_alignment(&rec).unwrap();
        assert_eq!(record.sequence, b"ACGT");
        assert_eq!(record.aligned_bases.len(), 4);
        assert_eq!(record.aligned_bases[0].ref_pos, 100);
        assert_eq!(record.aligned_bases[0].local_pos, 0);
    }

    #[test]
    fn record_without_sequence_skipped() {
        let rec = mapped_record(b"read2", b"", 100);
        assert!(record_to_alignment(&rec).is_none());
    }

    #[test]
    fn unmapped_record_skipped() {
        let mut rec = mapped_record(b"read3", b"ACGT", 100);
        rec.set_unmapped();
        assert!(record_to_alignment(&rec).is_none());
    }
}
