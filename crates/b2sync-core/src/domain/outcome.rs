//! Per-pair results and whole-cycle outcomes

use std::time::Duration;

use super::{errors::CycleError, errors::PairError, pair::SyncPair};

// ============================================================================
// SyncResult
// ============================================================================

/// What happened to one pair during one cycle
///
/// Produced by the pair executor and never modified afterwards.
/// `files_count` is an estimate scraped from the tool's output; it is not a
/// transfer audit.
#[derive(Debug, Clone)]
pub struct SyncResult {
    /// The pair this result belongs to
    pub pair: SyncPair,
    /// Whether the tool exited successfully
    pub success: bool,
    /// Approximate number of transferred files (0 on failure)
    pub files_count: u64,
    /// Wall-clock time including the source existence check
    pub duration: Duration,
    /// Why the pair failed, if it did
    pub error: Option<PairError>,
    /// Captured stdout and stderr of the tool
    pub raw_output: String,
}

impl SyncResult {
    /// A pair whose tool invocation exited successfully
    pub fn succeeded(
        pair: SyncPair,
        files_count: u64,
        duration: Duration,
        raw_output: String,
    ) -> Self {
        Self {
            pair,
            success: true,
            files_count,
            duration,
            error: None,
            raw_output,
        }
    }

    /// A pair that failed its precondition or whose tool invocation failed
    pub fn failed(
        pair: SyncPair,
        error: PairError,
        duration: Duration,
        raw_output: String,
    ) -> Self {
        Self {
            pair,
            success: false,
            files_count: 0,
            duration,
            error: Some(error),
            raw_output,
        }
    }
}

// ============================================================================
// CycleOutcome
// ============================================================================

/// Result of one cycle
///
/// Either the ordered per-pair results (one per configured pair, in
/// configuration order) or the single reason the cycle never got as far as
/// running pairs. `Completed(vec![])` (no pairs configured) and `Aborted(_)`
/// are distinct.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Every configured pair was attempted
    Completed(Vec<SyncResult>),
    /// The cycle was short-circuited before any pair ran
    Aborted(CycleError),
}

impl CycleOutcome {
    /// Per-pair results; empty for an aborted cycle
    pub fn results(&self) -> &[SyncResult] {
        match self {
            CycleOutcome::Completed(results) => results,
            CycleOutcome::Aborted(_) => &[],
        }
    }

    /// The cycle-level error, if the cycle was aborted
    pub fn abort_reason(&self) -> Option<&CycleError> {
        match self {
            CycleOutcome::Completed(_) => None,
            CycleOutcome::Aborted(err) => Some(err),
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, CycleOutcome::Aborted(_))
    }

    /// Sum of `files_count` over successful pairs
    pub fn successful_files(&self) -> u64 {
        self.results()
            .iter()
            .filter(|r| r.success)
            .map(|r| r.files_count)
            .sum()
    }

    /// Results of pairs that failed, in configuration order
    pub fn failures(&self) -> impl Iterator<Item = &SyncResult> {
        self.results().iter().filter(|r| !r.success)
    }
}
