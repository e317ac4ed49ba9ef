//! Aligned coordinate pairs and the reference-bound searches used by
//! every region query.

/// One reference position paired with a position in read or event space.
/// Sequences of pairs are sorted by `ref_pos` ascending; `local_pos` may
/// ascend or descend depending on the record's stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedPair {
    pub ref_pos: i64,
    pub local_pos: i64,
}

/// Finds the indices of the first pair with `ref_pos >= ref_start` and the
/// last pair with `ref_pos <= ref_stop`. Returns None when no pair lies in
/// the interval; that is "no overlap", not an error.
pub fn find_range_by_ref(
    pairs: &[AlignedPair],
    ref_start: i64,
    ref_stop: i64,
) -> Option<(usize, usize)> {
    if ref_start > ref_stop || pairs.is_empty() {
        return None;
    }
    let first = pairs.partition_point(|pair| pair.ref_pos < ref_start);
    let last = pairs.partition_point(|pair| pair.ref_pos <= ref_stop);
    if first >= last {
        return None;
    }
    Some((first, last - 1))
}

/// Translates both ends of a reference interval into local positions.
///
/// Ends are clamped to the reference span the pairs cover. An end that
/// falls between two anchors is translated by linear interpolation between
/// the bracketing anchors, rounded to nearest; an exact anchor hit returns
/// that anchor's local position, resolving a run of pairs on one reference
/// position to its first pair at the start end and its last at the stop
/// end. Returns None when the interval does not overlap the covered span.
pub fn translate_by_ref(
    pairs: &[AlignedPair],
    ref_start: i64,
    ref_stop: i64,
) -> Option<(i64, i64)> {
    if ref_start > ref_stop || pairs.is_empty() {
        return None;
    }
    let covered_start = pairs.first().unwrap().ref_pos;
    let covered_stop = pairs.last().unwrap().ref_pos;
    if ref_stop < covered_start || ref_start > covered_stop {
        return None;
    }
    let local_start = interpolate(pairs, ref_start.max(covered_start), false);
    let local_stop = interpolate(pairs, ref_stop.min(covered_stop), true);
    Some((local_start, local_stop))
}

/// `pos` must lie within the covered reference span. When several pairs
/// share `pos` (signal insertions), an exact hit resolves to the first
/// duplicate for the start end and the last for the stop end, matching
/// the bound semantics of `find_range_by_ref`.
fn interpolate(pairs: &[AlignedPair], pos: i64, stop_end: bool) -> i64 {
    let idx = pairs.partition_point(|pair| pair.ref_pos < pos);
    let upper = pairs[idx];
    if upper.ref_pos == pos {
        if stop_end {
            let last = pairs.partition_point(|pair| pair.ref_pos <= pos) - 1;
            return pairs[last].local_pos;
        }
        return upper.local_pos;
    }
    let lower = pairs[idx - 1];
    let slope =
        (upper.local_pos - lower.local_pos) as f64 / (upper.ref_pos - lower.ref_pos) as f64;
    (lower.local_pos as f64 + (pos - lower.ref_pos) as f64 * slope).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(anchors: &[(i64, i64)]) -> Vec<AlignedPair> {
        anchors
            .iter()
            .map(|&(ref_pos, local_pos)| AlignedPair { ref_pos, local_pos })
            .collect()
    }

    #[test]
    fn range_bounds_are_lower_and_upper() {
        let pairs = pairs(&[(100, 10), (150, 60), (200, 110)]);
        // smallest ref_pos >= 120 is 150, largest <= 160 is 150
        assert_eq!(find_range_by_ref(&pairs, 120, 160), Some((1, 1)));
        assert_eq!(find_range_by_ref(&pairs, 100, 200), Some((0, 2)));
        assert_eq!(find_range_by_ref(&pairs, 150, 150), Some((1, 1)));
    }

    #[test]
    fn range_fails_without_overlap() {
        let pairs = pairs(&[(100, 10), (150, 60), (200, 110)]);
        assert_eq!(find_range_by_ref(&pairs, 160, 120), None);
        assert_eq!(find_range_by_ref(&pairs, 101, 149), None);
        assert_eq!(find_range_by_ref(&pairs, 0, 99), None);
        assert_eq!(find_range_by_ref(&pairs, 201, 300), None);
        assert_eq!(find_range_by_ref(&[], 0, 100), None);
    }

    #[test]
    fn range_over_duplicate_ref_positions() {
        // two events aligned to base 150
        let pairs = pairs(&[(100, 10), (150, 60), (150, 61), (200, 110)]);
        assert_eq!(find_range_by_ref(&pairs, 150, 150), Some((1, 2)));
    }

    #[test]
    fn translate_interpolates_between_anchors() {
        let pairs = pairs(&[(100, 10), (150, 60), (200, 110)]);
        assert_eq!(translate_by_ref(&pairs, 120, 160), Some((30, 70)));
    }

    #[test]
    fn translate_exact_anchor_hits() {
        let pairs = pairs(&[(100, 10), (150, 60), (200, 110)]);
        assert_eq!(translate_by_ref(&pairs, 100, 200), Some((10, 110)));
        assert_eq!(translate_by_ref(&pairs, 150, 150), Some((60, 60)));
    }

    #[test]
    fn translate_clamps_to_covered_span() {
        let pairs = pairs(&[(100, 10), (150, 60), (200, 110)]);
        assert_eq!(translate_by_ref(&pairs, 50, 250), Some((10, 110)));
        assert_eq!(translate_by_ref(&pairs, 50, 120), Some((10, 30)));
    }

    #[test]
    fn translate_fails_without_overlap() {
        let pairs = pairs(&[(100, 10), (150, 60), (200, 110)]);
        assert_eq!(translate_by_ref(&pairs, 160, 120), None);
        assert_eq!(translate_by_ref(&pairs, 0, 99), None);
        assert_eq!(translate_by_ref(&pairs, 201, 300), None);
    }

    #[test]
    fn translate_resolves_duplicate_anchors_at_bounds() {
        // two events on base 100, three on base 150
        let pairs = pairs(&[
            (100, 10),
            (100, 11),
            (150, 60),
            (150, 61),
            (150, 62),
            (200, 110),
        ]);
        // stop end takes the last duplicate, start end the first
        assert_eq!(translate_by_ref(&pairs, 100, 150), Some((10, 62)));
        assert_eq!(translate_by_ref(&pairs, 150, 200), Some((60, 110)));
        assert_eq!(translate_by_ref(&pairs, 150, 150), Some((60, 62)));
        // consistent with the bound-index variant
        assert_eq!(find_range_by_ref(&pairs, 100, 150), Some((0, 4)));
    }

    #[test]
    fn translate_with_descending_local_positions() {
        // stride -1: event index decreases as reference position increases
        let pairs = pairs(&[(100, 110), (150, 60), (200, 10)]);
        let (start, stop) = translate_by_ref(&pairs, 120, 160).unwrap();
        assert_eq!((start, stop), (90, 50));
        assert!(start > stop);
    }

    #[test]
    fn translate_uneven_anchor_spacing() {
        let pairs = pairs(&[(100, 0), (104, 2)]);
        // halfway in reference is interpolated and rounded
        assert_eq!(translate_by_ref(&pairs, 101, 103), Some((1, 2)));
    }
}
