//! # Core models for read-support classification.
//!
//! This crate holds everything the classification engine needs to know about its inputs:
//! reads and their CIGAR alignments, allele candidates with their flanking context, the
//! request payload the engine is driven by, and the error types shared across the workspace.
//!
//! Nothing in here classifies anything; see `readsupport-engine` for that.
//!
pub mod cigar;
pub mod consts;
pub mod errors;
pub mod models;
pub mod normalize;
pub mod payload;
pub mod utils;

// re-expose the common types
pub use cigar::{Cigar, CigarError, CigarOp, CigarWalker, GenomicLocus, ReadLocus};
pub use errors::*;
pub use models::*;
pub use payload::{AlleleRecord, ClassificationRequest, ReadRecord, RequestPayload};
