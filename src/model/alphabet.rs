//! Kmer rank encoding over the DNA alphabet. Ranks order the per-kmer
//! state tables and fix the row order of model files.

use once_cell::sync::Lazy;

pub const ALPHABET: &[u8; 4] = b"ACGT";

static BASE_RANK: Lazy<[u8; 256]> = Lazy::new(|| {
    let mut table = [255u8; 256];
    for (rank, &base) in ALPHABET.iter().enumerate() {
        table[base as usize] = rank as u8;
        table[base.to_ascii_lowercase() as usize] = rank as u8;
    }
    table
});

/// Rank of a single base, or None for a non-ACGT byte.
pub fn base_rank(base: u8) -> Option<u32> {
    match BASE_RANK[base as usize] {
        255 => None,
        rank => Some(rank as u32),
    }
}

/// Lexicographic rank of a kmer among all kmers of its length.
pub fn kmer_rank(kmer: &[u8]) -> Option<u32> {
    let mut rank = 0u32;
    for &base in kmer {
        rank = rank * ALPHABET.len() as u32 + base_rank(base)?;
    }
    Some(rank)
}

/// Inverse of [`kmer_rank`] for kmers of length `k`.
pub fn kmer_for_rank(mut rank: u32, k: u32) -> String {
    let mut kmer = vec![0u8; k as usize];
    for slot in kmer.iter_mut().rev() {
        *slot = ALPHABET[(rank % ALPHABET.len() as u32) as usize];
        rank /= ALPHABET.len() as u32;
    }
    String::from_utf8(kmer).unwrap()
}

/// Number of distinct kmers of length `k`.
pub fn num_kmers(k: u32) -> usize {
    ALPHABET.len().pow(k)
}
