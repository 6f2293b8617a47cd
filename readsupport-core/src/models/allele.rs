use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlleleError {
    #[error("negative reference position {0}")]
    NegativePosition(i64),

    #[error("invalid base '{base}' in {field}")]
    InvalidBase { field: &'static str, base: char },

    #[error("reference and alternate alleles are identical ({0})")]
    IdenticalAlleles(String),

    #[error("left flank of {flank} bases starts before the genome at position {position}")]
    FlankBeforeGenomeStart { flank: usize, position: u64 },

    #[error("{field} does not start with the left flank followed by the {allele} allele")]
    InconsistentHaplotype {
        field: &'static str,
        allele: &'static str,
    },
}

///
/// One declared variant allele at a locus, with the reference context around it.
///
/// `ref_sequence` / `alt_sequence` are the haplotypes `left flank + allele + right flank`;
/// they are assembled from the flanks unless the caller supplies them.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlleleCandidate {
    /// 0-based genomic position of the first reference-allele base.
    pub ref_position: u64,
    pub ref_allele: Vec<u8>,
    pub alt_allele: Vec<u8>,
    pub ref_sequence: Vec<u8>,
    pub alt_sequence: Vec<u8>,
    pub left_flank_sequence: Vec<u8>,
    pub right_flank_sequence: Vec<u8>,
}

/// Parse a nucleotide string; `-` and `.` spell the empty allele.
fn parse_bases(field: &'static str, value: &str) -> Result<Vec<u8>, AlleleError> {
    let value = value.trim();
    if value == "-" || value == "." {
        return Ok(Vec::new());
    }
    value
        .chars()
        .map(|ch| match ch.to_ascii_uppercase() {
            b @ ('A' | 'C' | 'G' | 'T' | 'N') => Ok(b as u8),
            _ => Err(AlleleError::InvalidBase { field, base: ch }),
        })
        .collect()
}

impl AlleleCandidate {
    ///
    /// Create a candidate with no flanking context.
    ///
    pub fn new(ref_position: i64, ref_allele: &str, alt_allele: &str) -> Result<Self, AlleleError> {
        if ref_position < 0 {
            return Err(AlleleError::NegativePosition(ref_position));
        }
        let ref_allele = parse_bases("refallele", ref_allele)?;
        let alt_allele = parse_bases("altallele", alt_allele)?;
        if ref_allele == alt_allele {
            return Err(AlleleError::IdenticalAlleles(
                String::from_utf8_lossy(&ref_allele).into_owned(),
            ));
        }

        Ok(AlleleCandidate {
            ref_position: ref_position as u64,
            ref_sequence: ref_allele.clone(),
            alt_sequence: alt_allele.clone(),
            ref_allele,
            alt_allele,
            left_flank_sequence: Vec::new(),
            right_flank_sequence: Vec::new(),
        })
    }

    ///
    /// Attach flanking reference sequence and rebuild both haplotypes from it.
    ///
    pub fn with_flanks(mut self, left: &str, right: &str) -> Result<Self, AlleleError> {
        let left = parse_bases("leftflankseq", left)?;
        let right = parse_bases("rightflankseq", right)?;
        if left.len() as u64 > self.ref_position {
            return Err(AlleleError::FlankBeforeGenomeStart {
                flank: left.len(),
                position: self.ref_position,
            });
        }

        self.ref_sequence = [left.as_slice(), &self.ref_allele, &right].concat();
        self.alt_sequence = [left.as_slice(), &self.alt_allele, &right].concat();
        self.left_flank_sequence = left;
        self.right_flank_sequence = right;
        Ok(self)
    }

    ///
    /// Replace the assembled haplotypes with caller-supplied ones. Empty strings keep the
    /// assembled haplotype. Supplied haplotypes must begin with the left flank followed by
    /// their allele.
    ///
    pub fn with_haplotypes(mut self, refseq: &str, altseq: &str) -> Result<Self, AlleleError> {
        let refseq = parse_bases("refseq", refseq)?;
        let altseq = parse_bases("altseq", altseq)?;

        if !refseq.is_empty() {
            if !self.is_consistent(&refseq, &self.ref_allele) {
                return Err(AlleleError::InconsistentHaplotype {
                    field: "refseq",
                    allele: "reference",
                });
            }
            self.ref_sequence = refseq;
        }
        if !altseq.is_empty() {
            if !self.is_consistent(&altseq, &self.alt_allele) {
                return Err(AlleleError::InconsistentHaplotype {
                    field: "altseq",
                    allele: "alternate",
                });
            }
            self.alt_sequence = altseq;
        }
        Ok(self)
    }

    fn is_consistent(&self, haplotype: &[u8], allele: &[u8]) -> bool {
        haplotype.starts_with(&self.left_flank_sequence)
            && haplotype[self.left_flank_sequence.len()..].starts_with(allele)
    }

    /// Genomic position of the first haplotype base.
    pub fn haplotype_start(&self) -> u64 {
        self.ref_position - self.left_flank_sequence.len() as u64
    }

    /// Alternate length minus reference length.
    pub fn length_delta(&self) -> i64 {
        self.alt_allele.len() as i64 - self.ref_allele.len() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_haplotypes_are_assembled_from_flanks() {
        let allele = AlleleCandidate::new(10, "t", "TTGA")
            .unwrap()
            .with_flanks("ACGTA", "GGC")
            .unwrap();
        assert_eq!(allele.ref_sequence, b"ACGTATGGC");
        assert_eq!(allele.alt_sequence, b"ACGTATTGAGGC");
        assert_eq!(allele.haplotype_start(), 5);
        assert_eq!(allele.length_delta(), 3);
    }

    #[rstest]
    fn test_dash_is_an_empty_allele() {
        let allele = AlleleCandidate::new(3, "CA", "-").unwrap();
        assert!(allele.alt_allele.is_empty());
        assert_eq!(allele.length_delta(), -2);
    }

    #[rstest]
    fn test_identical_alleles_are_rejected() {
        let err = AlleleCandidate::new(3, "A", "a").unwrap_err();
        assert_eq!(err, AlleleError::IdenticalAlleles("A".to_string()));
    }

    #[rstest]
    fn test_invalid_bases_are_rejected() {
        let err = AlleleCandidate::new(3, "A", "<DEL>").unwrap_err();
        assert_eq!(
            err,
            AlleleError::InvalidBase {
                field: "altallele",
                base: '<'
            }
        );
    }

    #[rstest]
    fn test_flank_cannot_start_before_genome() {
        let err = AlleleCandidate::new(2, "A", "G")
            .unwrap()
            .with_flanks("ACGT", "")
            .unwrap_err();
        assert!(matches!(err, AlleleError::FlankBeforeGenomeStart { flank: 4, position: 2 }));
    }

    #[rstest]
    fn test_supplied_haplotypes_override_assembly() {
        let allele = AlleleCandidate::new(10, "A", "G")
            .unwrap()
            .with_flanks("CC", "TT")
            .unwrap()
            .with_haplotypes("CCATTAAA", "")
            .unwrap();
        assert_eq!(allele.ref_sequence, b"CCATTAAA");
        assert_eq!(allele.alt_sequence, b"CCGTT");
    }

    #[rstest]
    fn test_inconsistent_haplotype_is_rejected() {
        let err = AlleleCandidate::new(10, "A", "G")
            .unwrap()
            .with_flanks("CC", "TT")
            .unwrap()
            .with_haplotypes("", "CCATT")
            .unwrap_err();
        assert_eq!(
            err,
            AlleleError::InconsistentHaplotype {
                field: "altseq",
                allele: "alternate"
            }
        );
    }
}
