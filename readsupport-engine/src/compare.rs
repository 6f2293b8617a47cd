use crate::extract::{Anchor, ReadWindow};

const UNKNOWN_BASE: u8 = b'N';

/// Mismatch fraction of `candidate` laid on `sequence` at `offset`. `N` never matches.
fn mismatch_fraction(sequence: &[u8], offset: usize, candidate: &[u8]) -> f64 {
    let mismatches = sequence[offset..offset + candidate.len()]
        .iter()
        .zip(candidate)
        .filter(|&(&base, &expected)| base == UNKNOWN_BASE || base != expected)
        .count();
    mismatches as f64 / candidate.len() as f64
}

/// Offset at which `len` bases starting at `origin` lie inside a read of `read_len` bases.
fn placement(origin: i64, len: usize, read_len: usize) -> Option<usize> {
    let offset = usize::try_from(origin).ok()?;
    (offset + len <= read_len).then_some(offset)
}

///
/// Difference score between a covered read window and one expected sequence: the smallest
/// mismatch fraction over every alignment of the candidate to the window.
///
/// The candidate is laid against each located boundary of the window (its start for a left
/// anchor, its end for a right anchor, both when both were located) and slid by up to
/// `max_shift` bases either way. Sliding lets an indel-length discrepancy inside the window
/// be absorbed. Bases past the extracted window, including bases outside the aligned
/// portion of the read, are compared as they are; placements that leave the read are not.
///
/// Returns `None` when the read ends before the candidate does at a located boundary: the
/// read is too short to say anything about this candidate. Otherwise a value in `[0, 1]`,
/// 0 being an exact match.
///
pub fn difference_score(window: &ReadWindow, candidate: &[u8], max_shift: usize) -> Option<f64> {
    if candidate.is_empty() {
        return Some(if window.is_empty() { 0.0 } else { 1.0 });
    }

    let read_len = window.sequence.len();
    let start = window.start as i64;
    let right = window.end as i64 - candidate.len() as i64;
    let origins: &[i64] = match window.anchor {
        Anchor::Both => &[start, right],
        Anchor::Left => &[start],
        Anchor::Right => &[right],
    };
    if origins
        .iter()
        .any(|&origin| placement(origin, candidate.len(), read_len).is_none())
    {
        return None;
    }

    let shift = max_shift as i64;
    let best = origins
        .iter()
        .flat_map(|&origin| (-shift..=shift).map(move |s| origin + s))
        .filter_map(|origin| placement(origin, candidate.len(), read_len))
        .map(|offset| mismatch_fraction(window.sequence, offset, candidate))
        .fold(1.0_f64, f64::min);
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn window(sequence: &[u8], start: usize, end: usize, anchor: Anchor) -> ReadWindow<'_> {
        ReadWindow {
            sequence,
            start,
            end,
            anchor,
        }
    }

    #[rstest]
    fn test_exact_match_scores_zero() {
        let w = window(b"TTACGTACGG", 2, 8, Anchor::Both);
        assert_eq!(difference_score(&w, b"ACGTAC", 0), Some(0.0));
    }

    #[rstest]
    fn test_single_mismatch_fraction() {
        let w = window(b"TTACGTACGG", 2, 8, Anchor::Both);
        assert_eq!(difference_score(&w, b"ACCTAC", 0), Some(1.0 / 6.0));
    }

    #[rstest]
    fn test_unknown_base_never_matches() {
        let w = window(b"TTACNTACGG", 2, 8, Anchor::Both);
        assert_eq!(difference_score(&w, b"ACNTAC", 0), Some(1.0 / 6.0));
    }

    #[rstest]
    fn test_longer_candidate_reads_past_window() {
        // window covers 4 bases but the read carries the extra inserted base after it
        let w = window(b"GGACATGG", 2, 6, Anchor::Left);
        assert_eq!(difference_score(&w, b"ACATG", 0), Some(0.0));
    }

    #[rstest]
    fn test_candidate_running_off_the_read_is_not_scored() {
        let w = window(b"GGACAT", 2, 6, Anchor::Left);
        assert_eq!(difference_score(&w, b"ACATGG", 0), None);
        assert_eq!(difference_score(&w, b"ACAT", 0), Some(0.0));
    }

    #[rstest]
    fn test_right_anchor_before_read_start_is_not_scored() {
        let w = window(b"CGTAGG", 0, 4, Anchor::Right);
        assert_eq!(difference_score(&w, b"ACGTA", 0), None);
        assert_eq!(difference_score(&w, b"CGTA", 0), Some(0.0));
    }

    #[rstest]
    fn test_both_anchors_must_hold_the_candidate() {
        // the left placement runs off the end even though the right one fits
        let w = window(b"AACCGG", 1, 6, Anchor::Both);
        assert_eq!(difference_score(&w, b"ACCGGT", 0), None);
    }

    #[rstest]
    fn test_shifts_off_the_read_are_skipped() {
        let w = window(b"ACGT", 0, 4, Anchor::Both);
        assert_eq!(difference_score(&w, b"ACGT", 3), Some(0.0));
        assert_eq!(difference_score(&w, b"TCGT", 3), Some(0.25));
    }

    #[rstest]
    fn test_right_anchor_aligns_on_window_end() {
        let w = window(b"CCACGTA", 0, 7, Anchor::Right);
        assert_eq!(difference_score(&w, b"CGTA", 0), Some(0.0));
        assert_eq!(difference_score(&w, b"CCAC", 0), Some(0.75));
    }

    #[rstest]
    fn test_shift_absorbs_offset() {
        let w = window(b"AACCGTTT", 1, 7, Anchor::Left);
        assert_eq!(difference_score(&w, b"CCGTTT", 0), Some(0.5));
        assert_eq!(difference_score(&w, b"CCGTTT", 1), Some(0.0));
    }

    #[rstest]
    #[case(0, 0.0)]
    #[case(3, 1.0)]
    fn test_empty_candidate(#[case] width: usize, #[case] expected: f64) {
        let w = window(b"ACGT", 0, width, Anchor::Both);
        assert_eq!(difference_score(&w, b"", 0), Some(expected));
    }
}
