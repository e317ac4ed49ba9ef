//! porealign bridges three coordinate spaces describing one molecule:
//! reference-genome bases, sequenced-read bases, and raw nanopore signal
//! events. [`alignment::AlignmentDb`] caches everything aligned to one
//! genomic interval and serves coordinate-translated views over it;
//! [`model::PoreModel`] holds the per-kmer signal distributions and their
//! per-read scaled form consumed by likelihood evaluation.

pub mod alignment;
pub mod model;
pub mod signal;
pub mod utils;

pub use alignment::{AlignedPair, AlignmentDb, EventSubsequence, Variant};
pub use model::{ModelRegistry, PoreModel, ScaledModel};
pub use signal::{ScalingParams, SignalRead, Strand};
