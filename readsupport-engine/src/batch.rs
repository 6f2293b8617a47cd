use std::time::Instant;

use log::info;
use rayon::prelude::*;

use readsupport_core::{Category, ClassificationRequest, RequestPayload, Result, StrictnessMode};

use crate::classify::{ClassificationResult, ReadClassifier};
use crate::config::ClassifierConfig;
use crate::strand::{StrandBias, StrandCounts, aggregate};

/// Everything a run produces for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// Mode the counts and the reported categories refer to.
    pub strictness: StrictnessMode,
    /// One result per input read, in input order.
    pub results: Vec<ClassificationResult>,
    pub counts: StrandCounts,
    pub bias: StrandBias,
    pub alternates: usize,
}

impl BatchOutcome {
    /// Categories of each read under the requested strictness, in input order.
    pub fn categories(&self) -> impl Iterator<Item = (usize, &[Category])> {
        self.results
            .iter()
            .map(|r| (r.read_number, r.categories(self.strictness)))
    }
}

///
/// Classify every read of a validated request.
///
/// Reads are classified in parallel on the current rayon pool; the output keeps input order.
/// Both strictness modes are decided for every read, the counts use the requested one.
///
pub fn classify_batch(
    request: &ClassificationRequest,
    config: &ClassifierConfig,
) -> Result<BatchOutcome> {
    let start = Instant::now();
    let classifier = ReadClassifier::new(&request.alleles, *config)?;

    let results: Vec<ClassificationResult> = request
        .reads
        .par_iter()
        .enumerate()
        .map(|(read_number, read)| classifier.classify(read_number, read))
        .collect();

    let alternates = request.alleles.len();
    let counts = aggregate(&results, request.strictness, alternates);
    let bias = counts.strand_bias();

    info!(
        "Classified {} reads in {:.2?}: ref {}/{} alt {}/{} (forward/reverse), strand p-value {:.4}",
        results.len(),
        start.elapsed(),
        counts.reference.forward,
        counts.reference.reverse,
        counts.alternate.forward,
        counts.alternate.reverse,
        bias.p_value
    );

    Ok(BatchOutcome {
        strictness: request.strictness,
        results,
        counts,
        bias,
        alternates,
    })
}

/// Validate a raw payload and classify it. Nothing is classified unless the whole payload
/// validates.
pub fn classify_payload(
    payload: RequestPayload,
    config: &ClassifierConfig,
) -> Result<BatchOutcome> {
    let request = payload.validate()?;
    classify_batch(&request, config)
}
