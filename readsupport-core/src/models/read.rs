use std::fmt::{self, Display};

use serde::Serialize;
use thiserror::Error;

use crate::cigar::{Cigar, CigarError, CigarWalker};
use crate::consts::REVERSE_STRAND_FLAG;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("{0}")]
    InvalidCigar(#[from] CigarError),

    #[error("CIGAR consumes {consumed} read bases but the sequence has {length}")]
    CigarOverrun { consumed: usize, length: usize },

    #[error("invalid alignment start position {0} (positions are 1-based)")]
    InvalidStartPosition(i64),

    #[error("invalid base '{base}' at sequence offset {offset}")]
    InvalidBase { base: char, offset: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub fn from_flag(flag: u16) -> Self {
        if flag & REVERSE_STRAND_FLAG != 0 {
            Strand::Reverse
        } else {
            Strand::Forward
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

///
/// One aligned sequencing read. Immutable once built.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Read {
    sequence: Vec<u8>,
    start: u64,
    cigar: Cigar,
    flag: u16,
}

impl Read {
    ///
    /// Build a read from its SAM-style fields.
    ///
    /// `start_position` is the 1-based position of the first aligned base. The sequence is
    /// upper-cased; `*` stands for an absent sequence.
    ///
    pub fn new(
        sequence: &str,
        start_position: i64,
        cigar: &str,
        flag: u16,
    ) -> Result<Self, ReadError> {
        let cigar: Cigar = cigar.parse()?;

        let sequence = if sequence == "*" { "" } else { sequence };
        let mut bases = Vec::with_capacity(sequence.len());
        for (offset, ch) in sequence.chars().enumerate() {
            if !ch.is_ascii_alphabetic() {
                return Err(ReadError::InvalidBase { base: ch, offset });
            }
            bases.push(ch.to_ascii_uppercase() as u8);
        }

        let consumed = cigar.query_length();
        if consumed > bases.len() {
            return Err(ReadError::CigarOverrun {
                consumed,
                length: bases.len(),
            });
        }

        let start = if cigar.is_unaligned() {
            start_position.saturating_sub(1).max(0) as u64
        } else if start_position < 1 {
            return Err(ReadError::InvalidStartPosition(start_position));
        } else {
            (start_position - 1) as u64
        };

        Ok(Read {
            sequence: bases,
            start,
            cigar,
            flag,
        })
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    /// 0-based genomic position of the first aligned base.
    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn cigar(&self) -> &Cigar {
        &self.cigar
    }

    pub fn flag(&self) -> u16 {
        self.flag
    }

    pub fn strand(&self) -> Strand {
        Strand::from_flag(self.flag)
    }

    pub fn is_reverse(&self) -> bool {
        self.strand() == Strand::Reverse
    }

    pub fn walker(&self) -> CigarWalker {
        CigarWalker::new(self.start, &self.cigar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_read_converts_to_zero_based_start() {
        let read = Read::new("acgtACGT", 101, "8M", 0).unwrap();
        assert_eq!(read.start(), 100);
        assert_eq!(read.sequence(), b"ACGTACGT");
        assert_eq!(read.strand(), Strand::Forward);
    }

    #[rstest]
    #[case(0, Strand::Forward)]
    #[case(16, Strand::Reverse)]
    #[case(83, Strand::Reverse)]
    #[case(99, Strand::Forward)]
    fn test_strand_from_flag(#[case] flag: u16, #[case] expected: Strand) {
        assert_eq!(Strand::from_flag(flag), expected);
    }

    #[rstest]
    fn test_cigar_longer_than_sequence_is_rejected() {
        let err = Read::new("ACGT", 10, "5M", 0).unwrap_err();
        assert_eq!(
            err,
            ReadError::CigarOverrun {
                consumed: 5,
                length: 4
            }
        );
    }

    #[rstest]
    fn test_malformed_cigar_is_rejected() {
        let err = Read::new("ACGT", 10, "4Z", 0).unwrap_err();
        assert!(matches!(err, ReadError::InvalidCigar(_)));
    }

    #[rstest]
    fn test_aligned_read_needs_positive_start() {
        let err = Read::new("ACGT", 0, "4M", 0).unwrap_err();
        assert_eq!(err, ReadError::InvalidStartPosition(0));
    }

    #[rstest]
    fn test_unaligned_read_is_accepted() {
        let read = Read::new("ACGT", 0, "*", 4).unwrap();
        assert!(read.cigar().is_unaligned());
        assert_eq!(read.walker().aligned_span(), None);
    }

    #[rstest]
    fn test_non_nucleotide_characters_are_rejected() {
        let err = Read::new("AC-T", 1, "4M", 0).unwrap_err();
        assert_eq!(err, ReadError::InvalidBase { base: '-', offset: 2 });
    }
}
