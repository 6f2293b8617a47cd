use log::{debug, warn};

use crate::models::{AlleleCandidate, Window};
use crate::normalize::{expand_core, trim_alleles};

///
/// The stretch of genome a read must span to discriminate one reference/alternate pair,
/// together with what each allele predicts the read carries over that stretch.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocusWindow {
    /// Genomic window, margin included.
    pub window: Window,
    /// Repeat-expanded variant core inside the window. Empty for a pure insertion.
    pub core: Window,
    /// Reference haplotype over the window.
    pub ref_expected: Vec<u8>,
    /// Alternate haplotype over the same genomic span (longer or shorter by the indel).
    pub alt_expected: Vec<u8>,
    /// Set when the flanks were too short to pad the core by the full margin.
    pub clamped: bool,
}

impl LocusWindow {
    pub fn shortest_expected(&self) -> usize {
        self.ref_expected.len().min(self.alt_expected.len())
    }

    pub fn longest_expected(&self) -> usize {
        self.ref_expected.len().max(self.alt_expected.len())
    }

    /// Length difference between the two expected sequences.
    pub fn length_delta(&self) -> usize {
        self.ref_expected.len().abs_diff(self.alt_expected.len())
    }
}

impl AlleleCandidate {
    ///
    /// Derive the discriminating window for this allele.
    ///
    /// The alleles are trimmed of shared bases, the remaining core is expanded through any
    /// repeat in the reference haplotype, and `margin` bases are added on each side, limited
    /// to the context both haplotypes actually provide.
    ///
    pub fn discriminating_window(&self, margin: usize) -> LocusWindow {
        let left = self.left_flank_sequence.len();
        let trimmed = trim_alleles(&self.ref_allele, &self.alt_allele);
        let (core_start, core_end) = expand_core(
            &self.ref_sequence,
            left + trimmed.prefix,
            left + self.ref_allele.len() - trimmed.suffix,
            &trimmed,
        );

        let delta = self.length_delta();
        let limit = (self.ref_sequence.len() as i64)
            .min(self.alt_sequence.len() as i64 - delta)
            .max(core_start as i64) as usize;
        let core_end = core_end.min(limit);

        let start = core_start.saturating_sub(margin);
        let wanted_end = core_end + margin;
        let end = wanted_end.min(limit);
        let clamped = core_start < margin || end < wanted_end;

        let alt_end = ((end as i64 + delta).max(start as i64) as usize).min(self.alt_sequence.len());

        let origin = self.haplotype_start();
        let locus = LocusWindow {
            window: Window::new(origin + start as u64, origin + end as u64),
            core: Window::new(origin + core_start as u64, origin + core_end as u64),
            ref_expected: self.ref_sequence[start..end].to_vec(),
            alt_expected: self.alt_sequence[start..alt_end].to_vec(),
            clamped,
        };

        if clamped {
            warn!(
                "Flanking sequence around position {} is shorter than the {} base margin; window clamped to {}",
                self.ref_position, margin, locus.window
            );
        }
        debug!(
            "Locus {} {}>{}: core {} window {}",
            self.ref_position,
            String::from_utf8_lossy(&self.ref_allele),
            String::from_utf8_lossy(&self.alt_allele),
            locus.core,
            locus.window
        );

        locus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_snv_window_is_core_plus_margin() {
        let allele = AlleleCandidate::new(110, "C", "T")
            .unwrap()
            .with_flanks("GATTACAGAT", "TGCATGCAAG")
            .unwrap();
        let locus = allele.discriminating_window(5);
        assert_eq!(locus.core, Window::new(110, 111));
        assert_eq!(locus.window, Window::new(105, 116));
        assert_eq!(locus.ref_expected, b"CAGATCTGCAT");
        assert_eq!(locus.alt_expected, b"CAGATTTGCAT");
        assert!(!locus.clamped);
        assert_eq!(locus.length_delta(), 0);
    }

    #[rstest]
    fn test_homopolymer_insertion_window_spans_the_run() {
        // anchor C at 1000 followed by seven A's, insertion of one more A
        let allele = AlleleCandidate::new(1000, "C", "CA")
            .unwrap()
            .with_flanks("GTCAGGTC", "AAAAAAAGTCTAGGC")
            .unwrap();
        let locus = allele.discriminating_window(3);
        assert_eq!(locus.core, Window::new(1001, 1008));
        assert_eq!(locus.window, Window::new(998, 1011));
        assert_eq!(locus.ref_expected, b"TCCAAAAAAAGTC");
        assert_eq!(locus.alt_expected, b"TCCAAAAAAAAGTC");
        assert_eq!(locus.shortest_expected(), 13);
        assert_eq!(locus.longest_expected(), 14);
    }

    #[rstest]
    fn test_deletion_window_maps_alternate_past_the_gap() {
        let allele = AlleleCandidate::new(20, "GCAA", "G")
            .unwrap()
            .with_flanks("TTACG", "GTTCA")
            .unwrap();
        let locus = allele.discriminating_window(2);
        // trimmed core is CAA at 21..24; nothing to roll through
        assert_eq!(locus.core, Window::new(21, 24));
        assert_eq!(locus.window, Window::new(19, 26));
        assert_eq!(locus.ref_expected, b"GGCAAGT");
        assert_eq!(locus.alt_expected, b"GGGT");
        assert_eq!(locus.length_delta(), 3);
    }

    #[rstest]
    fn test_short_flanks_clamp_the_window() {
        let allele = AlleleCandidate::new(50, "A", "G")
            .unwrap()
            .with_flanks("TC", "G")
            .unwrap();
        let locus = allele.discriminating_window(5);
        assert!(locus.clamped);
        assert_eq!(locus.window, Window::new(48, 52));
        assert_eq!(locus.ref_expected, b"TCAG");
        assert_eq!(locus.alt_expected, b"TCGG");
    }
}
