/// Gap character of aligned tracks
pub const GAP: u8 = b'-';

/// Indices moved into gapped coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shifted {
    /// Valid indices, in input order
    pub indices: Vec<usize>,
    /// Number of indices that fell at or beyond the gapped length
    pub dropped: usize,
}

/// Maps 0-based indices of an ungapped sequence onto its gapped track.
///
/// Every gap at position `p` pushes each index greater than `p`, in the
/// numbering adjusted so far, one column to the right.
///
/// ```
/// use ppit::libs::gap::shift;
/// let shifted = shift(b"--A-B--CDE-", &[1, 2, 3, 4, 5]);
/// assert_eq!(shifted.indices, vec![3, 5, 8, 9, 10]);
/// assert_eq!(shifted.dropped, 0);
/// ```
pub fn shift(gapped: &[u8], indices: &[usize]) -> Shifted {
    let mut adjusted = indices.to_vec();
    for (pos, &c) in gapped.iter().enumerate() {
        if c == GAP {
            for idx in adjusted.iter_mut() {
                if *idx > pos {
                    *idx += 1;
                }
            }
        }
    }

    let before = adjusted.len();
    adjusted.retain(|&i| i < gapped.len());

    Shifted {
        dropped: before - adjusted.len(),
        indices: adjusted,
    }
}

/// [`shift`], reporting dropped indices against `protein`.
pub fn shift_for(protein: &str, gapped: &[u8], indices: &[usize]) -> Vec<usize> {
    let shifted = shift(gapped, indices);
    if shifted.dropped > 0 {
        tracing::warn!(
            "Invalid residue indices for {}, using a valid subset instead ({} dropped)",
            protein,
            shifted.dropped
        );
    }
    shifted.indices
}

/// Characters at `indices`, in index order. Out-of-range indices are skipped.
///
/// ```
/// use ppit::libs::gap::extract;
/// assert_eq!(extract(b"ACDEFG", &[4, 0, 2, 99]), b"FAD".to_vec());
/// ```
pub fn extract(sequence: &[u8], indices: &[usize]) -> Vec<u8> {
    indices
        .iter()
        .filter_map(|&i| sequence.get(i).copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_without_gaps_is_identity() {
        let shifted = shift(b"ACDEF", &[4, 0, 2]);
        assert_eq!(shifted.indices, vec![4, 0, 2]);
    }

    #[test]
    fn shift_drops_trailing_indices() {
        let shifted = shift(b"A-CD", &[1, 2, 3]);
        assert_eq!(shifted.indices, vec![1, 3]);
        assert_eq!(shifted.dropped, 1);

        let kept = shift_for("P12345", b"A-CD", &[1, 2, 3]);
        assert_eq!(kept, vec![1, 3]);
    }

    #[test]
    fn shift_counts_gaps_left_of_each_index() {
        // a gap only moves indices strictly greater than its own column
        let gapped = b"M--KV-LA";
        let shifted = shift(gapped, &[0, 1, 2, 3, 4]);
        assert_eq!(shifted.indices, vec![0, 1, 4, 5, 7]);
        assert_eq!(extract(gapped, &shifted.indices), b"M-V-A".to_vec());
    }
}
