//! CIGAR parsing and coordinate translation.
//!
//! A [`Cigar`] is parsed once per read. A [`CigarWalker`] built from it and the read's
//! 0-based alignment start answers two questions: which read base sits at a given genomic
//! position, and which genomic position (if any) a given read base belongs to.

use std::fmt::{self, Display};
use std::str::FromStr;

use thiserror::Error;

use crate::consts::UNALIGNED_CIGAR;
use crate::models::Window;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CigarError {
    #[error("unknown CIGAR operation '{op}' at byte {offset}")]
    UnknownOperation { op: char, offset: usize },

    #[error("CIGAR operation '{op}' at byte {offset} has no length")]
    MissingLength { op: char, offset: usize },

    #[error("CIGAR operation '{op}' at byte {offset} has zero length")]
    ZeroLength { op: char, offset: usize },

    #[error("CIGAR length starting at byte {offset} does not fit in 32 bits")]
    LengthOverflow { offset: usize },

    #[error("CIGAR ends with a length but no operation: {0}")]
    TrailingLength(String),
}

/// A single CIGAR operation with its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CigarOp {
    Match(u32),
    Insertion(u32),
    Deletion(u32),
    RefSkip(u32),
    SoftClip(u32),
    HardClip(u32),
    Padding(u32),
    Equal(u32),
    Diff(u32),
}

impl CigarOp {
    pub fn from_code(code: char, length: u32) -> Option<Self> {
        let op = match code {
            'M' => CigarOp::Match(length),
            'I' => CigarOp::Insertion(length),
            'D' => CigarOp::Deletion(length),
            'N' => CigarOp::RefSkip(length),
            'S' => CigarOp::SoftClip(length),
            'H' => CigarOp::HardClip(length),
            'P' => CigarOp::Padding(length),
            '=' => CigarOp::Equal(length),
            'X' => CigarOp::Diff(length),
            _ => return None,
        };
        Some(op)
    }

    pub fn code(&self) -> char {
        match self {
            CigarOp::Match(_) => 'M',
            CigarOp::Insertion(_) => 'I',
            CigarOp::Deletion(_) => 'D',
            CigarOp::RefSkip(_) => 'N',
            CigarOp::SoftClip(_) => 'S',
            CigarOp::HardClip(_) => 'H',
            CigarOp::Padding(_) => 'P',
            CigarOp::Equal(_) => '=',
            CigarOp::Diff(_) => 'X',
        }
    }

    pub fn length(&self) -> u32 {
        match *self {
            CigarOp::Match(n)
            | CigarOp::Insertion(n)
            | CigarOp::Deletion(n)
            | CigarOp::RefSkip(n)
            | CigarOp::SoftClip(n)
            | CigarOp::HardClip(n)
            | CigarOp::Padding(n)
            | CigarOp::Equal(n)
            | CigarOp::Diff(n) => n,
        }
    }

    /// M, =, X: one read base against one reference base.
    pub fn is_aligned(&self) -> bool {
        matches!(self, CigarOp::Match(_) | CigarOp::Equal(_) | CigarOp::Diff(_))
    }

    pub fn consumes_read(&self) -> bool {
        self.is_aligned() || matches!(self, CigarOp::Insertion(_) | CigarOp::SoftClip(_))
    }

    pub fn consumes_reference(&self) -> bool {
        self.is_aligned() || matches!(self, CigarOp::Deletion(_) | CigarOp::RefSkip(_))
    }
}

impl Display for CigarOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.length(), self.code())
    }
}

/// A parsed CIGAR string. The empty CIGAR stands for `*` (no alignment).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cigar {
    ops: Vec<CigarOp>,
}

impl Cigar {
    pub fn new(ops: Vec<CigarOp>) -> Self {
        Cigar { ops }
    }

    pub fn ops(&self) -> &[CigarOp] {
        &self.ops
    }

    /// True when no operation places a read base on the reference.
    pub fn is_unaligned(&self) -> bool {
        !self.ops.iter().any(|op| op.is_aligned())
    }

    /// Number of read bases the CIGAR accounts for (M/I/S/=/X).
    pub fn query_length(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| op.consumes_read())
            .map(|op| op.length() as usize)
            .sum()
    }

    /// Number of reference bases the alignment spans (M/D/N/=/X).
    pub fn reference_length(&self) -> u64 {
        self.ops
            .iter()
            .filter(|op| op.consumes_reference())
            .map(|op| op.length() as u64)
            .sum()
    }
}

impl FromStr for Cigar {
    type Err = CigarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == UNALIGNED_CIGAR {
            return Ok(Cigar::default());
        }

        let mut ops = Vec::new();
        let mut length: Option<u32> = None;
        let mut length_offset = 0;

        for (offset, ch) in s.char_indices() {
            if let Some(digit) = ch.to_digit(10) {
                if length.is_none() {
                    length_offset = offset;
                }
                let next = length
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|n| n.checked_add(digit))
                    .ok_or(CigarError::LengthOverflow {
                        offset: length_offset,
                    })?;
                length = Some(next);
                continue;
            }

            let op = CigarOp::from_code(ch, length.unwrap_or(0))
                .ok_or(CigarError::UnknownOperation { op: ch, offset })?;
            let n = length
                .take()
                .ok_or(CigarError::MissingLength { op: ch, offset })?;
            if n == 0 {
                return Err(CigarError::ZeroLength { op: ch, offset });
            }
            ops.push(op);
        }

        if length.is_some() {
            return Err(CigarError::TrailingLength(s.to_string()));
        }

        Ok(Cigar { ops })
    }
}

impl Display for Cigar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return write!(f, "{}", UNALIGNED_CIGAR);
        }
        for op in &self.ops {
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}

/// Where a genomic position lands in a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadLocus {
    /// Aligned to the read base at this offset.
    Aligned(usize),
    /// Inside a `D` block; carries the offset of the first read base after the deletion.
    Deleted(usize),
    /// Inside an `N` block; never covered by this read fragment.
    Skipped,
    /// Before or after the aligned span.
    Unaligned,
}

/// Where a read base lands on the genome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenomicLocus {
    Aligned(u64),
    /// Inserted base; carries the reference position immediately following the
    /// last reference base consumed before it.
    Inserted(u64),
    SoftClipped,
    /// Offset past the bases the CIGAR accounts for.
    Unaddressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    op: CigarOp,
    read_start: usize,
    read_end: usize,
    ref_start: u64,
    ref_end: u64,
}

/// Coordinate translator for one aligned read.
#[derive(Debug, Clone)]
pub struct CigarWalker {
    segments: Vec<Segment>,
    query_length: usize,
}

impl CigarWalker {
    /// `start` is the 0-based genomic position of the first aligned base.
    pub fn new(start: u64, cigar: &Cigar) -> Self {
        let mut segments = Vec::with_capacity(cigar.ops().len());
        let mut read_pos = 0usize;
        let mut ref_pos = start;

        for &op in cigar.ops() {
            let n = op.length();
            let read_end = if op.consumes_read() {
                read_pos + n as usize
            } else {
                read_pos
            };
            let ref_end = if op.consumes_reference() {
                ref_pos + n as u64
            } else {
                ref_pos
            };
            segments.push(Segment {
                op,
                read_start: read_pos,
                read_end,
                ref_start: ref_pos,
                ref_end,
            });
            read_pos = read_end;
            ref_pos = ref_end;
        }

        CigarWalker {
            segments,
            query_length: read_pos,
        }
    }

    pub fn query_length(&self) -> usize {
        self.query_length
    }

    /// Genomic position → read offset.
    pub fn read_offset(&self, position: u64) -> ReadLocus {
        for seg in &self.segments {
            if position < seg.ref_start || position >= seg.ref_end {
                continue;
            }
            return match seg.op {
                op if op.is_aligned() => {
                    ReadLocus::Aligned(seg.read_start + (position - seg.ref_start) as usize)
                }
                CigarOp::Deletion(_) => ReadLocus::Deleted(seg.read_start),
                CigarOp::RefSkip(_) => ReadLocus::Skipped,
                _ => ReadLocus::Unaligned,
            };
        }
        ReadLocus::Unaligned
    }

    /// Read offset → genomic position.
    pub fn genomic_position(&self, offset: usize) -> GenomicLocus {
        for seg in &self.segments {
            if offset < seg.read_start || offset >= seg.read_end {
                continue;
            }
            return match seg.op {
                op if op.is_aligned() => {
                    GenomicLocus::Aligned(seg.ref_start + (offset - seg.read_start) as u64)
                }
                CigarOp::Insertion(_) => GenomicLocus::Inserted(seg.ref_start),
                _ => GenomicLocus::SoftClipped,
            };
        }
        GenomicLocus::Unaddressed
    }

    /// Genomic interval from the first to the last aligned base (end exclusive).
    pub fn aligned_span(&self) -> Option<Window> {
        let first = self.segments.iter().find(|s| s.op.is_aligned())?;
        let last = self.segments.iter().rev().find(|s| s.op.is_aligned())?;
        Some(Window::new(first.ref_start, last.ref_end))
    }

    /// Whether any `N` block shares a position with the window.
    pub fn skips_within(&self, window: &Window) -> bool {
        self.segments.iter().any(|s| {
            matches!(s.op, CigarOp::RefSkip(_)) && window.overlaps(s.ref_start, s.ref_end)
        })
    }

    /// Soft-clipped bases before the first aligned base (hard clips and padding ignored).
    pub fn leading_soft_clip(&self) -> usize {
        clipped_bases(self.segments.iter())
    }

    /// Soft-clipped bases after the last aligned base (hard clips and padding ignored).
    pub fn trailing_soft_clip(&self) -> usize {
        clipped_bases(self.segments.iter().rev())
    }

    /// Read offset of the first leading soft-clipped base.
    pub fn leading_clip_start(&self) -> usize {
        self.segments
            .iter()
            .take_while(|s| !s.op.is_aligned())
            .find(|s| matches!(s.op, CigarOp::SoftClip(_)))
            .map_or(0, |s| s.read_start)
    }

    /// Read offset one past the last trailing soft-clipped base.
    pub fn trailing_clip_end(&self) -> usize {
        self.segments
            .iter()
            .rev()
            .take_while(|s| !s.op.is_aligned())
            .find(|s| matches!(s.op, CigarOp::SoftClip(_)))
            .map_or(self.query_length, |s| s.read_end)
    }
}

fn clipped_bases<'a>(segments: impl Iterator<Item = &'a Segment>) -> usize {
    let mut clipped = 0;
    for seg in segments {
        match seg.op {
            CigarOp::SoftClip(n) => clipped += n as usize,
            CigarOp::HardClip(_) | CigarOp::Padding(_) => {}
            _ => break,
        }
    }
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn walker(start: u64, cigar: &str) -> CigarWalker {
        CigarWalker::new(start, &cigar.parse::<Cigar>().unwrap())
    }

    #[rstest]
    #[case("75M", 75, 75)]
    #[case("10S50M5I10M3D20M2H", 95, 83)]
    #[case("20M1000N30M", 50, 1050)]
    #[case("5=1X4=", 10, 10)]
    fn test_parse_lengths(#[case] cigar: &str, #[case] query: usize, #[case] reference: u64) {
        let cigar: Cigar = cigar.parse().unwrap();
        assert_eq!(cigar.query_length(), query);
        assert_eq!(cigar.reference_length(), reference);
    }

    #[rstest]
    fn test_parse_round_trips_display() {
        let cigar: Cigar = "3S10M2I4M1D6M".parse().unwrap();
        assert_eq!(cigar.to_string(), "3S10M2I4M1D6M");
        assert_eq!(cigar.ops().len(), 6);
    }

    #[rstest]
    #[case("*")]
    #[case("")]
    fn test_unaligned_cigar(#[case] cigar: &str) {
        let cigar: Cigar = cigar.parse().unwrap();
        assert!(cigar.is_unaligned());
        assert_eq!(cigar.to_string(), "*");
    }

    #[rstest]
    #[case("10M5Q", CigarError::UnknownOperation { op: 'Q', offset: 4 })]
    #[case("M10", CigarError::MissingLength { op: 'M', offset: 0 })]
    #[case("10MQ", CigarError::UnknownOperation { op: 'Q', offset: 3 })]
    #[case("10M0I5M", CigarError::ZeroLength { op: 'I', offset: 4 })]
    #[case("10M5", CigarError::TrailingLength("10M5".to_string()))]
    #[case("99999999999M", CigarError::LengthOverflow { offset: 0 })]
    fn test_parse_errors(#[case] cigar: &str, #[case] expected: CigarError) {
        assert_eq!(cigar.parse::<Cigar>().unwrap_err(), expected);
    }

    #[rstest]
    fn test_read_offset_through_indels() {
        // 100..110 aligned, 2 inserted bases, 110..115 aligned, 115..118 deleted, 118..123 aligned
        let w = walker(100, "10M2I5M3D5M");
        assert_eq!(w.read_offset(99), ReadLocus::Unaligned);
        assert_eq!(w.read_offset(100), ReadLocus::Aligned(0));
        assert_eq!(w.read_offset(109), ReadLocus::Aligned(9));
        assert_eq!(w.read_offset(110), ReadLocus::Aligned(12));
        assert_eq!(w.read_offset(115), ReadLocus::Deleted(17));
        assert_eq!(w.read_offset(116), ReadLocus::Deleted(17));
        assert_eq!(w.read_offset(118), ReadLocus::Aligned(17));
        assert_eq!(w.read_offset(122), ReadLocus::Aligned(21));
        assert_eq!(w.read_offset(123), ReadLocus::Unaligned);
    }

    #[rstest]
    fn test_genomic_position_of_read_bases() {
        let w = walker(100, "4S10M2I5M3S");
        assert_eq!(w.genomic_position(0), GenomicLocus::SoftClipped);
        assert_eq!(w.genomic_position(4), GenomicLocus::Aligned(100));
        assert_eq!(w.genomic_position(14), GenomicLocus::Inserted(110));
        assert_eq!(w.genomic_position(15), GenomicLocus::Inserted(110));
        assert_eq!(w.genomic_position(16), GenomicLocus::Aligned(110));
        assert_eq!(w.genomic_position(21), GenomicLocus::SoftClipped);
        assert_eq!(w.genomic_position(24), GenomicLocus::Unaddressed);
    }

    #[rstest]
    fn test_splice_gap_is_never_covered() {
        let w = walker(1000, "20M500N30M");
        assert_eq!(w.read_offset(1019), ReadLocus::Aligned(19));
        assert_eq!(w.read_offset(1020), ReadLocus::Skipped);
        assert_eq!(w.read_offset(1519), ReadLocus::Skipped);
        assert_eq!(w.read_offset(1520), ReadLocus::Aligned(20));
        assert!(w.skips_within(&Window::new(1015, 1025)));
        assert!(!w.skips_within(&Window::new(1000, 1020)));
    }

    #[rstest]
    fn test_aligned_span_and_clips() {
        let w = walker(500, "2H6S40M1I9M12S");
        assert_eq!(w.aligned_span(), Some(Window::new(500, 549)));
        assert_eq!(w.leading_soft_clip(), 6);
        assert_eq!(w.trailing_soft_clip(), 12);
        assert_eq!(w.leading_clip_start(), 0);
        assert_eq!(w.trailing_clip_end(), 68);
        assert_eq!(w.query_length(), 68);
    }

    #[rstest]
    fn test_unaligned_walker_has_no_span() {
        let w = walker(0, "*");
        assert_eq!(w.aligned_span(), None);
        assert_eq!(w.read_offset(0), ReadLocus::Unaligned);
    }
}
