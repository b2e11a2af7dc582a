//! Log record classification and diffing for offersift
//!
//! This crate provides the per-line classifier that routes push and read
//! records into their accumulators, and the result-map differ behind it.

mod diff;
mod sifter;

pub use diff::diff_result_maps;
pub use sifter::LogSifter;

// Re-export types used in our public API
pub use offersift_types::{
    Anomaly, DiffEntry, DiffMode, Extraction, FailedCase, FieldDiff, KeyPolicy, OfferAmounts,
    RequestKind, SiftOptions,
};
