//! # Read-support classification
//!
//! Given the declared alleles at one small-variant locus and the reads aligned around it,
//! decide for every read whether its sequence supports the reference, one of the
//! alternates, none of them, or cannot be decided because the read does not span the
//! discriminating window.
//!
//! The pipeline, leaves first:
//!
//! - [`extract`]: pull the read bases covering each allele's discriminating window
//! - [`compare`]: score those bases against each allele's expected sequence
//! - [`classify`]: rank the scores and decide a category under both strictness modes
//! - [`strand`]: tally forward/reverse support and test for strand bias
//! - [`output`]: render the line protocol consumed downstream
//!
//! [`classify_batch`] runs all of it over a validated request.
//!
pub mod batch;
pub mod classify;
pub mod compare;
pub mod config;
pub mod consts;
pub mod extract;
pub mod output;
pub mod strand;

// re-exports
pub use batch::*;
pub use classify::*;
pub use compare::difference_score;
pub use config::ClassifierConfig;
pub use extract::*;
pub use output::*;
pub use strand::*;
