use std::path::PathBuf;

use prs_core::{SamplerVariant, SweepError};
use serde::{Deserialize, Serialize};

use crate::ledger::LedgerState;

/// A trial whose launch failed after all permitted attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialFailure {
    pub sampler: SamplerVariant,
    pub threads: u32,
    pub k: u64,
    pub repeat: u32,
    /// Launches spent on this repeat, retries included.
    pub attempts: u32,
    pub reason: String,
}

/// Outcome of one (sampler, thread count) sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub sampler: SamplerVariant,
    pub threads: u32,
    pub ledger: PathBuf,
    pub ledger_state: LedgerState,
    pub points: u64,
    pub launches: u64,
    /// Rows the child processes appended to the ledger during this sweep;
    /// `None` when the ledger could not be read back.
    pub rows_appended: Option<u64>,
}

/// Run-level report persisted next to the ledgers when requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub plan_hash: String,
    pub started_at: String,
    pub finished_at: String,
    pub dry_run: bool,
    pub built: bool,
    pub launches: u64,
    pub sweeps: Vec<SweepSummary>,
    #[serde(default)]
    pub failures: Vec<TrialFailure>,
    /// Set when the failure policy stopped the run early.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aborted: Option<SweepError>,
}

impl RunReport {
    /// True when no trial failed and the run was not aborted.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.aborted.is_none()
    }
}
