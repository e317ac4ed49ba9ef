mod db;
mod pairs;
mod records;
mod sources;

pub use db::{AlignmentDb, EventSubsequence};
pub use pairs::{find_range_by_ref, translate_by_ref, AlignedPair};
pub use records::{EventAlignmentRecord, SequenceAlignmentRecord};
pub use sources::{
    ConsensusCaller, EventAlignmentSource, ReferenceProvider, SequenceAlignmentSource,
    SignalLocator, SignalReadOpener, Variant, VariantCall,
};
