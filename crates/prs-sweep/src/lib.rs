//! Sweep generation and trial execution for the sampling benchmark driver.

mod build;
mod hash;
pub mod ledger;
mod orchestrate;
mod plan;
mod points;
mod process;
mod report;
mod serde;
mod trial;

pub use build::BuildStep;
pub use hash::stable_hash_string;
pub use ledger::{count_rows, ensure_ready, ledger_path, LedgerState, LEDGER_HEADER};
pub use orchestrate::{run_plan, RunOpts};
pub use plan::{load_plan, PlanOverrides, SweepPlan};
pub use points::{AdaptiveSteps, SweepPoints, SweepStrategy};
pub use process::{DryRunLauncher, ProcessLauncher};
pub use report::{RunReport, SweepSummary, TrialFailure};
pub use trial::{FailurePolicy, TrialRunner, TrialSummary};

pub use crate::serde::{from_yaml_slice, to_canonical_json_bytes};
