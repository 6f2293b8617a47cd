use rayon::prelude::*;
use serde::Serialize;
use statrs::distribution::{Discrete, Hypergeometric};

use readsupport_core::{Category, Strand, StrictnessMode};

use crate::classify::ClassificationResult;

/// Relative slack when comparing table probabilities against the observed one.
const PMF_TOLERANCE: f64 = 1e-7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StrandPair {
    pub forward: u64,
    pub reverse: u64,
}

impl StrandPair {
    pub fn add(&mut self, strand: Strand) {
        match strand {
            Strand::Forward => self.forward += 1,
            Strand::Reverse => self.reverse += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.forward + self.reverse
    }

    fn merge(&mut self, other: &StrandPair) {
        self.forward += other.forward;
        self.reverse += other.reverse;
    }
}

///
/// Forward/reverse support per allele. Reads classified `none` or `amb` are not counted.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StrandCounts {
    pub reference: StrandPair,
    /// Summed over every alternate.
    pub alternate: StrandPair,
    /// One entry per declared alternate, by index.
    pub per_allele: Vec<StrandPair>,
}

impl StrandCounts {
    pub fn new(alternates: usize) -> Self {
        StrandCounts {
            per_allele: vec![StrandPair::default(); alternates],
            ..Default::default()
        }
    }

    pub fn record(&mut self, category: Category, strand: Strand) {
        match category {
            Category::Reference => self.reference.add(strand),
            Category::Alternate(index) => {
                self.alternate.add(strand);
                if index >= self.per_allele.len() {
                    self.per_allele.resize(index + 1, StrandPair::default());
                }
                self.per_allele[index].add(strand);
            }
            Category::NoMatch | Category::Ambiguous => {}
        }
    }

    pub fn merge(mut self, other: StrandCounts) -> StrandCounts {
        self.reference.merge(&other.reference);
        self.alternate.merge(&other.alternate);
        if other.per_allele.len() > self.per_allele.len() {
            self.per_allele
                .resize(other.per_allele.len(), StrandPair::default());
        }
        for (mine, theirs) in self.per_allele.iter_mut().zip(&other.per_allele) {
            mine.merge(theirs);
        }
        self
    }

    /// Strand-bias test on reference vs alternate support.
    pub fn strand_bias(&self) -> StrandBias {
        fisher_exact(
            self.reference.forward,
            self.reference.reverse,
            self.alternate.forward,
            self.alternate.reverse,
        )
    }
}

///
/// Tally the primary call of every read under `mode`.
///
/// Each rayon worker folds its share of reads into local counts which are then merged, so
/// no counter is shared between threads.
///
pub fn aggregate(
    results: &[ClassificationResult],
    mode: StrictnessMode,
    alternates: usize,
) -> StrandCounts {
    results
        .par_iter()
        .fold(
            || StrandCounts::new(alternates),
            |mut counts, result| {
                counts.record(result.primary(mode), result.strand);
                counts
            },
        )
        .reduce(|| StrandCounts::new(alternates), StrandCounts::merge)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrandBias {
    /// Two-sided Fisher exact test p-value.
    pub p_value: f64,
    /// Sample odds ratio `(ref_fwd * alt_rev) / (ref_rev * alt_fwd)`.
    pub odds_ratio: f64,
}

///
/// Two-sided Fisher exact test on the table
///
/// ```text
///             forward  reverse
/// reference   ref_fwd  ref_rev
/// alternate   alt_fwd  alt_rev
/// ```
///
/// The p-value sums the hypergeometric probability of every table with the same margins
/// that is no more likely than the observed one. A table with an empty row or column has
/// p-value 1.
///
pub fn fisher_exact(ref_fwd: u64, ref_rev: u64, alt_fwd: u64, alt_rev: u64) -> StrandBias {
    let numerator = (ref_fwd * alt_rev) as f64;
    let denominator = (ref_rev * alt_fwd) as f64;
    let odds_ratio = if denominator == 0.0 {
        if numerator == 0.0 { 0.0 } else { f64::INFINITY }
    } else {
        numerator / denominator
    };

    let total = ref_fwd + ref_rev + alt_fwd + alt_rev;
    let reference = ref_fwd + ref_rev;
    let forward = ref_fwd + alt_fwd;
    let unbiased = StrandBias {
        p_value: 1.0,
        odds_ratio,
    };
    if reference == 0 || forward == 0 || reference == total || forward == total {
        return unbiased;
    }

    let Ok(dist) = Hypergeometric::new(total, reference, forward) else {
        return unbiased;
    };

    let observed = dist.pmf(ref_fwd);
    let threshold = observed * (1.0 + PMF_TOLERANCE);
    let low = (reference + forward).saturating_sub(total);
    let high = reference.min(forward);
    let p_value: f64 = (low..=high)
        .map(|k| dist.pmf(k))
        .filter(|&p| p <= threshold)
        .sum();

    StrandBias {
        p_value: p_value.min(1.0),
        odds_ratio,
    }
}
