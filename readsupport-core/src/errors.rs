use thiserror::Error;

use crate::models::{AlleleError, ReadError};

#[derive(Error, Debug)]
pub enum ReadSupportError {
    #[error("Read {index} is missing required field `{field}`")]
    MissingReadField { index: usize, field: &'static str },

    #[error("Allele {index} is missing required field `{field}`")]
    MissingAlleleField { index: usize, field: &'static str },

    #[error("Request contains no reads")]
    EmptyReadList,

    #[error("Request contains no alleles")]
    EmptyAlleleList,

    #[error("Request declares {0} alternate alleles, at most {1} are supported")]
    TooManyAlleles(usize, usize),

    #[error("Invalid strictness {0}: expected 0 (lenient) or 1 (strict)")]
    InvalidStrictness(i64),

    #[error("Read {index}: {source}")]
    InvalidRead {
        index: usize,
        #[source]
        source: ReadError,
    },

    #[error("Allele {index}: {source}")]
    InvalidAllele {
        index: usize,
        #[source]
        source: AlleleError,
    },

    #[error("Invalid classifier configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed request payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for readsupport operations.
pub type Result<T> = std::result::Result<T, ReadSupportError>;
