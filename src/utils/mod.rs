pub mod bam_utils;
mod readers;
mod region;
mod util;

pub use bam_utils::{BamSequenceAlignments, FaidxReference};
pub use readers::open_text_reader;
pub use region::GenomicRegion;
pub use util::Result;
