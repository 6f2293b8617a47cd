//! Allele trimming and repeat expansion.
//!
//! Bases shared by the reference and alternate alleles cannot tell them apart, and neither
//! can any stretch of repeat the variant could be slid through without changing the
//! haplotype. These helpers locate the part of a haplotype a read has to span before its
//! content can discriminate the alleles. Operates on `&[u8]` byte slices.

/// Alleles with their shared prefix and suffix removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimmedAlleles<'a> {
    /// Bases shared at the start of both alleles.
    pub prefix: usize,
    /// Bases shared at the end of both alleles, after the prefix is removed.
    pub suffix: usize,
    pub reference: &'a [u8],
    pub alternate: &'a [u8],
}

/// Trim the common prefix, then the common suffix, of a reference/alternate pair.
pub fn trim_alleles<'a>(reference: &'a [u8], alternate: &'a [u8]) -> TrimmedAlleles<'a> {
    let prefix = reference
        .iter()
        .zip(alternate.iter())
        .take_while(|(r, a)| r == a)
        .count();
    let (reference, alternate) = (&reference[prefix..], &alternate[prefix..]);

    let suffix = reference
        .iter()
        .rev()
        .zip(alternate.iter().rev())
        .take_while(|(r, a)| r == a)
        .count();

    TrimmedAlleles {
        prefix,
        suffix,
        reference: &reference[..reference.len() - suffix],
        alternate: &alternate[..alternate.len() - suffix],
    }
}

/// How many bases left of `position` (down to `bound`) the alleles can be rotated through.
fn roll_left(sequence: &[u8], alleles: &[&[u8]], position: usize, bound: usize) -> usize {
    let alleles: Vec<&[u8]> = alleles.iter().copied().filter(|a| !a.is_empty()).collect();
    if alleles.is_empty() || position <= bound {
        return 0;
    }

    let mut rolled = 0;
    while rolled < position - bound {
        let base = sequence[position - 1 - rolled];
        // walk each allele backwards, wrapping around
        let blocked = alleles
            .iter()
            .any(|a| a[a.len() - 1 - rolled % a.len()] != base);
        if blocked {
            break;
        }
        rolled += 1;
    }
    rolled
}

/// How many bases right of `position` (up to `bound`) the alleles can be rotated through.
fn roll_right(sequence: &[u8], alleles: &[&[u8]], position: usize, bound: usize) -> usize {
    let alleles: Vec<&[u8]> = alleles.iter().copied().filter(|a| !a.is_empty()).collect();
    if alleles.is_empty() || position >= bound {
        return 0;
    }

    let mut rolled = 0;
    while rolled < bound - position {
        let base = sequence[position + rolled];
        if alleles.iter().any(|a| a[rolled % a.len()] != base) {
            break;
        }
        rolled += 1;
    }
    rolled
}

///
/// Expand the variant core `[start, end)` of a reference haplotype through any repeat the
/// trimmed alleles can be shifted along, so that a read spanning the returned interval
/// cannot be explained equally well by both alleles.
///
/// # Arguments
/// * `haplotype` - reference haplotype bytes
/// * `start` - haplotype offset of the first trimmed reference base
/// * `end` - haplotype offset one past the last trimmed reference base
/// * `trimmed` - the trimmed allele pair
///
pub fn expand_core(
    haplotype: &[u8],
    start: usize,
    end: usize,
    trimmed: &TrimmedAlleles<'_>,
) -> (usize, usize) {
    let alleles = [trimmed.reference, trimmed.alternate];
    let left = roll_left(haplotype, &alleles, start, 0);
    let right = roll_right(haplotype, &alleles, end, haplotype.len());
    (start - left, end + right)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(b"ATCG", b"ATGG", 2, 1, b"C", b"G")]
    #[case(b"A", b"AT", 1, 0, b"", b"T")]
    #[case(b"GCAA", b"G", 1, 0, b"CAA", b"")]
    #[case(b"CAT", b"CGT", 1, 1, b"A", b"G")]
    fn test_trim_alleles(
        #[case] reference: &[u8],
        #[case] alternate: &[u8],
        #[case] prefix: usize,
        #[case] suffix: usize,
        #[case] trimmed_ref: &[u8],
        #[case] trimmed_alt: &[u8],
    ) {
        let trimmed = trim_alleles(reference, alternate);
        assert_eq!(trimmed.prefix, prefix);
        assert_eq!(trimmed.suffix, suffix);
        assert_eq!(trimmed.reference, trimmed_ref);
        assert_eq!(trimmed.alternate, trimmed_alt);
    }

    #[rstest]
    fn test_snv_core_does_not_expand() {
        let hap = b"ACGTACGT";
        let trimmed = trim_alleles(b"G", b"T");
        assert_eq!(expand_core(hap, 2, 3, &trimmed), (2, 3));
    }

    #[rstest]
    fn test_insertion_expands_through_homopolymer() {
        // insert an A after the T of TAAAAG: core starts empty at offset 2
        let hap = b"TAAAAG";
        let trimmed = trim_alleles(b"A", b"AA");
        assert_eq!(trimmed.prefix, 1);
        assert_eq!(expand_core(hap, 2, 2, &trimmed), (1, 5));
    }

    #[rstest]
    fn test_deletion_expands_through_homopolymer() {
        let hap = b"TAAAAG";
        let trimmed = trim_alleles(b"AA", b"A");
        assert_eq!(expand_core(hap, 2, 3, &trimmed), (1, 5));
    }

    #[rstest]
    fn test_dinucleotide_repeat_expansion() {
        // deleting one CA unit from GCACACAT
        let hap = b"GCACACAT";
        let trimmed = trim_alleles(b"GCA", b"G");
        assert_eq!(expand_core(hap, 1, 3, &trimmed), (1, 7));
    }
}
