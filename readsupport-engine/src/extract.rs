//! Read window extraction.
//!
//! For one read and one allele's discriminating window, find the read bases that cover the
//! window. Boundaries are located through the CIGAR, but the bases themselves are taken by
//! content: inserted bases between the boundaries are kept, and when the aligner stopped at
//! the variant and soft-clipped the rest, the clipped bases are used as window content.

use log::trace;

use readsupport_core::{CigarWalker, LocusWindow, Read, ReadLocus};

/// Which window boundaries were located on the alignment itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Both,
    /// Only the left boundary; the right side comes from a trailing soft clip.
    Left,
    /// Only the right boundary; the left side comes from a leading soft clip.
    Right,
}

/// Read bases covering a discriminating window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadWindow<'r> {
    /// The whole read sequence; scoring may look past `start..end`.
    pub sequence: &'r [u8],
    pub start: usize,
    pub end: usize,
    pub anchor: Anchor,
}

impl<'r> ReadWindow<'r> {
    pub fn bases(&self) -> &'r [u8] {
        &self.sequence[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Why a read cannot be used for a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageGap {
    /// The read has no aligned bases.
    NoAlignment,
    /// Neither window boundary falls on an aligned base.
    NotSpanned,
    /// The left side of the window is missing from the read.
    LeftFlank,
    /// The right side of the window is missing from the read.
    RightFlank,
    /// A splice gap (`N`) cuts through the window.
    SpliceGap,
    /// The alleles leave nothing to compare.
    EmptyWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction<'r> {
    Covered(ReadWindow<'r>),
    InsufficientCoverage(CoverageGap),
}

///
/// Extract the bases of `read` covering the discriminating window of `locus`.
///
/// `walker` must be the read's own CIGAR walker; it is passed in so a read is walked once
/// for all alleles at the locus.
///
pub fn extract_window<'r>(
    read: &'r Read,
    walker: &CigarWalker,
    locus: &LocusWindow,
) -> Extraction<'r> {
    let window = locus.window;
    let Some(last) = window.last() else {
        return Extraction::InsufficientCoverage(CoverageGap::EmptyWindow);
    };
    let Some(span) = walker.aligned_span() else {
        return Extraction::InsufficientCoverage(CoverageGap::NoAlignment);
    };
    if walker.skips_within(&window) {
        trace!("Splice gap inside window {}", window);
        return Extraction::InsufficientCoverage(CoverageGap::SpliceGap);
    }

    let sequence = read.sequence();
    let covered = |start, end, anchor| {
        Extraction::Covered(ReadWindow {
            sequence,
            start,
            end,
            anchor,
        })
    };

    // a boundary on a deleted base still lies on the alignment when the alignment carries on
    // past it: the window starts at the base after the deletion and ends just before it
    let start_offset = match walker.read_offset(window.start) {
        ReadLocus::Aligned(offset) => Some(offset),
        ReadLocus::Deleted(next) if span.contains(window.start) => Some(next),
        _ => None,
    };
    let end_offset = match walker.read_offset(last) {
        ReadLocus::Aligned(offset) => Some(offset + 1),
        ReadLocus::Deleted(next) if span.contains(last) => Some(next),
        _ => None,
    };

    match (start_offset, end_offset) {
        (Some(start), Some(end)) => covered(start, end.max(start), Anchor::Both),

        // alignment stops inside the window: rescue from a trailing soft clip
        (Some(start), None) => {
            let reaches_variant = span.end >= locus.core.start && span.end < window.end;
            if reaches_variant && walker.trailing_soft_clip() > 0 {
                let available = walker.trailing_clip_end().min(sequence.len()) - start;
                if available >= locus.shortest_expected() {
                    let end = start + available.min(locus.longest_expected());
                    return covered(start, end, Anchor::Left);
                }
            }
            Extraction::InsufficientCoverage(CoverageGap::RightFlank)
        }

        // alignment starts inside the window: rescue from a leading soft clip
        (None, Some(end)) => {
            let reaches_variant = span.start <= locus.core.end && span.start > window.start;
            if reaches_variant && walker.leading_soft_clip() > 0 {
                let available = end - walker.leading_clip_start();
                if available >= locus.shortest_expected() {
                    let start = end - available.min(locus.longest_expected());
                    return covered(start, end, Anchor::Right);
                }
            }
            Extraction::InsufficientCoverage(CoverageGap::LeftFlank)
        }

        (None, None) => Extraction::InsufficientCoverage(CoverageGap::NotSpanned),
    }
}
