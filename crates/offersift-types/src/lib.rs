//! Shared types for offersift
//!
//! This crate contains data structures used across multiple offersift crates.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

// ============================================================================
// Record Classification
// ============================================================================

/// Classification of a log record by its `requestType` field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestKind {
    /// A write request carrying offers to ingest
    Push,
    /// A query request carrying a search config and optional results
    Read,
    /// Anything else; ignored by the sifter
    Other,
}

impl RequestKind {
    /// Classify a raw `requestType` value.
    ///
    /// Matching is case-insensitive. `Push` requires equality; `Read` is a
    /// substring match, so variants like `"BulkReadV2"` also qualify.
    pub fn classify(request_type: &str) -> Self {
        let lower = request_type.to_lowercase();
        if lower == "push" {
            Self::Push
        } else if lower.contains("read") {
            Self::Read
        } else {
            Self::Other
        }
    }
}

// ============================================================================
// Diff Model
// ============================================================================

/// Element counts attached to a diff of the `Offers` key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OfferAmounts {
    pub actual: usize,
    pub wanted: usize,
}

/// A per-key discrepancy between an expected and actual result map
///
/// Serializes with dynamic key names: `actual_<key>` and `wanted_<key>`,
/// plus `actual_amount`/`wanted_amount` when the key carries offer counts.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDiff {
    pub key: String,
    pub actual: Value,
    pub wanted: Value,
    pub amounts: Option<OfferAmounts>,
}

impl Serialize for FieldDiff {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = if self.amounts.is_some() { 4 } else { 2 };
        let mut map = serializer.serialize_map(Some(entries))?;
        map.serialize_entry(&format!("actual_{}", self.key), &self.actual)?;
        map.serialize_entry(&format!("wanted_{}", self.key), &self.wanted)?;
        if let Some(amounts) = &self.amounts {
            map.serialize_entry("actual_amount", &amounts.actual)?;
            map.serialize_entry("wanted_amount", &amounts.wanted)?;
        }
        map.end()
    }
}

/// Full diff for one read record whose expected and actual results differ
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DiffEntry {
    /// The record's search config, wrapped in a single-element sequence
    pub input: Vec<Value>,
    /// One entry per differing field
    pub diff: Vec<FieldDiff>,
}

/// One failed read record, in either detail level
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum FailedCase {
    /// Per-field diff with the triggering search config
    Detailed(DiffEntry),
    /// Just the search config of the failing record
    Coarse(Value),
}

// ============================================================================
// Anomalies
// ============================================================================

/// A record that matched a branch but lacked a structurally required field
///
/// The record is skipped; the anomaly is kept for visibility instead of
/// aborting the whole parse.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Anomaly {
    /// 1-based input line number
    pub line: usize,
    pub reason: String,
}

impl Anomaly {
    pub fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Accumulators
// ============================================================================

/// Everything extracted from one pass over a log
///
/// All collections are append-only during processing and handed to the
/// output sink afterwards. A fresh instance is created per invocation.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Extraction {
    /// Concatenation of every push record's `write_config.Offers` elements
    pub push_offers: Vec<Value>,
    /// `search_config` of every read record
    pub read_configs: Vec<Value>,
    /// `expected_result` of read records that carried one
    pub wanted_results: Vec<Value>,
    /// `actual_result` of read records that carried one
    pub actual_results: Vec<Value>,
    /// Read records whose expected and actual results differ
    pub failed_cases: Vec<FailedCase>,
    /// Structurally incomplete records that were skipped
    pub anomalies: Vec<Anomaly>,
}

impl Extraction {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Options
// ============================================================================

/// Detail level for failed cases
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DiffMode {
    /// Expand each differing field into a [`FieldDiff`]
    #[default]
    Detailed,
    /// Record only the failing record's search config
    Coarse,
}

/// Which key set drives the per-field diff
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    /// Compare only keys present in the expected result. Keys unique to the
    /// actual result are invisible to the diff (known limitation of the
    /// historical output format).
    #[default]
    WantedOnly,
    /// Compare the union of both sides' keys
    Union,
}

/// Configuration for one sifting pass
#[derive(Clone, Copy, Debug, Default)]
pub struct SiftOptions {
    pub mode: DiffMode,
    pub key_policy: KeyPolicy,
}
