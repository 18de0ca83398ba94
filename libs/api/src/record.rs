use serde::{Deserialize, Serialize};

use super::payload::Payload;

// ════════════════════════════════════════════════════════════════
//  Producer → Stream
// ════════════════════════════════════════════════════════════════

/// One entry of a batch submission to the stream.
///
/// The partition key decides shard placement downstream; no ordering is
/// guaranteed across different keys.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StreamEntry {
    pub data: Payload,
    pub partition_key: String,
}

/// Per-entry result of one batch submission, in submission order.
///
/// Exactly one of `sequence_number` (accepted) or `error_code` +
/// `error_message` (rejected) is populated.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EntryResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl EntryResult {
    pub fn is_failed(&self) -> bool {
        self.error_code.is_some()
    }
}

/// Outcome of one whole-batch submission call.
///
/// A populated `failed_count` is a *partial* failure report: the call
/// itself succeeded. Whole-call failures (network class) surface as `Err`
/// from the publisher instead.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PutBatchOutcome {
    pub failed_count: usize,
    pub results: Vec<EntryResult>,
}

impl PutBatchOutcome {
    pub fn fully_successful(&self) -> bool {
        self.failed_count == 0
    }

    /// Rejected entries with their positions in the submitted batch.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &EntryResult)> {
        self.results.iter().enumerate().filter(|(_, r)| r.is_failed())
    }
}

// ════════════════════════════════════════════════════════════════
//  Stream → Transform
// ════════════════════════════════════════════════════════════════

/// One buffered record handed to the transform stage by the stream runtime.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransformRecord {
    pub record_id: String,
    pub data: Payload,
}

/// Outcome tag of one transform attempt.
///
/// `ProcessingFailed` records are retried or dead-lettered by the stream
/// runtime; the transform itself never retries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformResult {
    Ok,
    ProcessingFailed,
}

/// One record of the transform output batch.
///
/// Invariant: the output batch has exactly one entry per input record, in
/// the same order, with the same `record_id`. On `ProcessingFailed` the
/// payload is the original input payload, unmodified.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransformedRecord {
    pub record_id: String,
    pub result: TransformResult,
    pub data: Payload,
}
