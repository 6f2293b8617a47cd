//! Per-read classification.
//!
//! A read is scored once against every allele it covers. The two strictness modes only
//! differ in the tolerance applied to the best score, so both decisions come from the same
//! ranked scores.

use arrayvec::ArrayVec;
use log::{debug, trace};

use readsupport_core::consts::{MAX_ALTERNATES, MAX_CANDIDATES};
use readsupport_core::{
    AlleleCandidate, Category, LocusWindow, Read, ReadSupportError, Result, Strand,
    StrictnessMode,
};

use crate::compare::difference_score;
use crate::config::ClassifierConfig;
use crate::consts::SCORE_EPSILON;
use crate::extract::{Extraction, extract_window};

/// Categories for one read, best match first.
pub type RankedCategories = ArrayVec<Category, MAX_CANDIDATES>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub category: Category,
    pub score: f64,
}

/// What scoring a read produced, before any tolerance is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadEvidence {
    /// No allele's window was covered.
    Ambiguous,
    /// Reference and every covered alternate, ascending by score. Ties keep the reference
    /// first, then alternates by index.
    Scored(ArrayVec<ScoredCandidate, MAX_CANDIDATES>),
}

fn single(category: Category) -> RankedCategories {
    let mut ranked = RankedCategories::new();
    ranked.push(category);
    ranked
}

///
/// Decide the categories for a read given its ranked scores.
///
/// The read is classified when the best score is within `tolerance` and the runner-up
/// trails it by more than `min_separation`; the full ranking is returned then. Otherwise
/// the read matches nothing.
///
pub fn decide(evidence: &ReadEvidence, tolerance: f64, min_separation: f64) -> RankedCategories {
    let ranked = match evidence {
        ReadEvidence::Ambiguous => return single(Category::Ambiguous),
        ReadEvidence::Scored(ranked) => ranked,
    };
    let Some(best) = ranked.first() else {
        return single(Category::Ambiguous);
    };

    let within_tolerance = best.score <= tolerance + SCORE_EPSILON;
    let decisive = ranked
        .get(1)
        .is_none_or(|second| second.score - best.score > min_separation);

    if within_tolerance && decisive {
        ranked.iter().map(|c| c.category).collect()
    } else {
        single(Category::NoMatch)
    }
}

/// The classification of one read under both strictness modes.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    /// Index of the read in the request.
    pub read_number: usize,
    pub strand: Strand,
    pub evidence: ReadEvidence,
    pub lenient: RankedCategories,
    pub strict: RankedCategories,
}

impl ClassificationResult {
    pub fn categories(&self, mode: StrictnessMode) -> &[Category] {
        match mode {
            StrictnessMode::Lenient => &self.lenient,
            StrictnessMode::Strict => &self.strict,
        }
    }

    /// The first ranked category. Ranked lists are never empty.
    pub fn primary(&self, mode: StrictnessMode) -> Category {
        self.categories(mode)
            .first()
            .copied()
            .unwrap_or(Category::Ambiguous)
    }

    /// Lowest difference score over all candidates, `None` when nothing was covered.
    pub fn best_score(&self) -> Option<f64> {
        match &self.evidence {
            ReadEvidence::Ambiguous => None,
            ReadEvidence::Scored(ranked) => ranked.first().map(|c| c.score),
        }
    }
}

///
/// Classifier for the reads at one locus.
///
/// Discriminating windows are derived once at construction; classifying a read needs no
/// other state, so a single classifier is shared across worker threads.
///
#[derive(Debug, Clone)]
pub struct ReadClassifier {
    loci: Vec<LocusWindow>,
    max_shift: usize,
    config: ClassifierConfig,
}

impl ReadClassifier {
    pub fn new(alleles: &[AlleleCandidate], config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        if alleles.is_empty() {
            return Err(ReadSupportError::EmptyAlleleList);
        }
        if alleles.len() > MAX_ALTERNATES {
            return Err(ReadSupportError::TooManyAlleles(
                alleles.len(),
                MAX_ALTERNATES,
            ));
        }

        let loci: Vec<LocusWindow> = alleles
            .iter()
            .map(|allele| allele.discriminating_window(config.window_margin))
            .collect();
        let max_shift = loci.iter().map(|l| l.length_delta()).max().unwrap_or(0);

        debug!(
            "Classifier ready: {} alternate(s), maximum shift {}",
            loci.len(),
            max_shift
        );

        Ok(ReadClassifier {
            loci,
            max_shift,
            config,
        })
    }

    pub fn loci(&self) -> &[LocusWindow] {
        &self.loci
    }

    pub fn max_shift(&self) -> usize {
        self.max_shift
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    ///
    /// Score a read against every allele whose window it covers. A window counts as covered
    /// only when the read holds both expected sequences in full. The reference score is the
    /// best reference match over the covered windows.
    ///
    pub fn score_read(&self, read: &Read) -> ReadEvidence {
        let walker = read.walker();
        let mut reference: Option<f64> = None;
        let mut alternates = ArrayVec::<ScoredCandidate, MAX_CANDIDATES>::new();

        for (index, locus) in self.loci.iter().enumerate() {
            let window = match extract_window(read, &walker, locus) {
                Extraction::Covered(window) => window,
                Extraction::InsufficientCoverage(gap) => {
                    trace!("alt_{}: window {} not covered ({:?})", index, locus.window, gap);
                    continue;
                }
            };

            let scores = (
                difference_score(&window, &locus.ref_expected, self.max_shift),
                difference_score(&window, &locus.alt_expected, self.max_shift),
            );
            let (Some(ref_score), Some(alt_score)) = scores else {
                trace!("alt_{}: read ends inside an expected sequence", index);
                continue;
            };
            reference = Some(reference.map_or(ref_score, |r| r.min(ref_score)));
            alternates.push(ScoredCandidate {
                category: Category::Alternate(index),
                score: alt_score,
            });
        }

        let Some(ref_score) = reference else {
            return ReadEvidence::Ambiguous;
        };

        let mut ranked = ArrayVec::<ScoredCandidate, MAX_CANDIDATES>::new();
        ranked.push(ScoredCandidate {
            category: Category::Reference,
            score: ref_score,
        });
        // one alternate per locus and at most MAX_ALTERNATES loci
        ranked.extend(alternates);
        ranked.sort_by(|a, b| a.score.total_cmp(&b.score));
        ReadEvidence::Scored(ranked)
    }

    pub fn classify(&self, read_number: usize, read: &Read) -> ClassificationResult {
        let evidence = self.score_read(read);
        let separation = self.config.min_separation;
        let lenient = decide(
            &evidence,
            self.config.tolerance(StrictnessMode::Lenient),
            separation,
        );
        let strict = decide(
            &evidence,
            self.config.tolerance(StrictnessMode::Strict),
            separation,
        );

        ClassificationResult {
            read_number,
            strand: read.strand(),
            evidence,
            lenient,
            strict,
        }
    }
}
