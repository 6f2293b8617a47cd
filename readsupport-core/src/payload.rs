//! The JSON request a classification run is driven by.
//!
//! Records are deserialized leniently (every field optional) so that a missing field is
//! reported with the index of the offending read or allele rather than as a bare serde
//! error. [`RequestPayload::validate`] turns the records into domain types, and rejects the
//! whole request on the first problem.

use std::io::BufRead;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::consts::MAX_ALTERNATES;
use crate::errors::{ReadSupportError, Result};
use crate::models::{AlleleCandidate, Read, StrictnessMode};
use crate::utils::get_dynamic_reader;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRecord {
    #[serde(default, alias = "sequence")]
    pub read_sequence: Option<String>,
    #[serde(default)]
    pub start_position: Option<i64>,
    #[serde(default)]
    pub cigar: Option<String>,
    #[serde(default)]
    pub flag: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlleleRecord {
    #[serde(default)]
    pub ref_position: Option<i64>,
    #[serde(default, alias = "ref_allele")]
    pub refallele: Option<String>,
    #[serde(default, alias = "alt_allele")]
    pub altallele: Option<String>,
    #[serde(default)]
    pub refseq: Option<String>,
    #[serde(default)]
    pub altseq: Option<String>,
    #[serde(default)]
    pub leftflankseq: Option<String>,
    #[serde(default)]
    pub rightflankseq: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPayload {
    #[serde(default)]
    pub reads: Vec<ReadRecord>,
    #[serde(default)]
    pub alleles: Vec<AlleleRecord>,
    #[serde(default)]
    pub strictness: Option<i64>,
}

/// A fully validated request: every read and allele parsed, nothing left to reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
    pub reads: Vec<Read>,
    pub alleles: Vec<AlleleCandidate>,
    pub strictness: StrictnessMode,
}

impl ReadRecord {
    fn into_read(self, index: usize) -> Result<Read> {
        let missing = |field| ReadSupportError::MissingReadField { index, field };

        let sequence = self.read_sequence.ok_or_else(|| missing("read_sequence"))?;
        let start_position = self.start_position.ok_or_else(|| missing("start_position"))?;
        let cigar = self.cigar.ok_or_else(|| missing("cigar"))?;

        Read::new(&sequence, start_position, &cigar, self.flag.unwrap_or(0))
            .map_err(|source| ReadSupportError::InvalidRead { index, source })
    }
}

impl AlleleRecord {
    fn into_candidate(self, index: usize) -> Result<AlleleCandidate> {
        let missing = |field| ReadSupportError::MissingAlleleField { index, field };

        let ref_position = self.ref_position.ok_or_else(|| missing("ref_position"))?;
        let refallele = self.refallele.ok_or_else(|| missing("refallele"))?;
        let altallele = self.altallele.ok_or_else(|| missing("altallele"))?;

        let candidate = AlleleCandidate::new(ref_position, &refallele, &altallele)
            .and_then(|c| {
                c.with_flanks(
                    self.leftflankseq.as_deref().unwrap_or(""),
                    self.rightflankseq.as_deref().unwrap_or(""),
                )
            })
            .and_then(|c| {
                c.with_haplotypes(
                    self.refseq.as_deref().unwrap_or(""),
                    self.altseq.as_deref().unwrap_or(""),
                )
            })
            .map_err(|source| ReadSupportError::InvalidAllele { index, source })?;

        Ok(candidate)
    }
}

impl RequestPayload {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    ///
    /// Read a payload from a file (`.gz` allowed) or from stdin when the path is `-`.
    ///
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = get_dynamic_reader(path)?;
        let payload = Self::from_reader(reader)?;
        debug!(
            "Loaded payload from {}: {} reads, {} alleles",
            path.display(),
            payload.reads.len(),
            payload.alleles.len()
        );
        Ok(payload)
    }

    ///
    /// Validate every record. The first failure aborts the request; nothing is classified
    /// from a request that did not fully validate.
    ///
    pub fn validate(self) -> Result<ClassificationRequest> {
        if self.reads.is_empty() {
            return Err(ReadSupportError::EmptyReadList);
        }
        if self.alleles.is_empty() {
            return Err(ReadSupportError::EmptyAlleleList);
        }
        if self.alleles.len() > MAX_ALTERNATES {
            return Err(ReadSupportError::TooManyAlleles(
                self.alleles.len(),
                MAX_ALTERNATES,
            ));
        }

        let strictness = match self.strictness {
            Some(value) => StrictnessMode::try_from(value)?,
            None => StrictnessMode::default(),
        };

        let alleles = self
            .alleles
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_candidate(index))
            .collect::<Result<Vec<_>>>()?;

        let reads = self
            .reads
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_read(index))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Validated request: {} reads, {} alternate alleles, strictness {}",
            reads.len(),
            alleles.len(),
            strictness
        );

        Ok(ClassificationRequest {
            reads,
            alleles,
            strictness,
        })
    }
}
