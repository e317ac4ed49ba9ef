use crate::utils::Result;

/// A genomic interval with inclusive start and end coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomicRegion {
    pub contig: String,
    pub start: i64,
    pub end: i64,
}

impl GenomicRegion {
    pub fn new(contig: impl Into<String>, start: i64, end: i64) -> Result<Self> {
        if start > end {
            return Err(format!("Invalid region: start {} > end {}", start, end));
        }
        if start < 0 {
            return Err(format!("Invalid region: negative start {}", start));
        }

        Ok(Self {
            contig: contig.into(),
            start,
            end,
        })
    }

    pub fn from_string(encoding: &str) -> Result<Self> {
        let error_msg = || format!("Invalid region encoding: {}", encoding);
        let elements: Vec<&str> = encoding.split(&[':', '-']).collect();

        if elements.len() != 3 {
            return Err(error_msg());
        }

        let start: i64 = elements[1].parse().map_err(|_| error_msg())?;
        let end: i64 = elements[2].parse().map_err(|_| error_msg())?;

        Self::new(elements[0].to_string(), start, end)
    }

    pub fn intersect_position(&self, contig: &str, position: i64) -> bool {
        contig == self.contig && position >= self.start && position <= self.end
    }

    /// True when [start, end] on contig lies fully inside this region.
    pub fn contains(&self, contig: &str, start: i64, end: i64) -> bool {
        contig == self.contig && start >= self.start && end <= self.end && start <= end
    }

    /// Number of reference bases covered; never zero since both ends are
    /// inclusive.
    pub fn len(&self) -> usize {
        (self.end - self.start + 1) as usize
    }
}

impl std::fmt::Display for GenomicRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.contig, self.start, self.end)
    }
}
