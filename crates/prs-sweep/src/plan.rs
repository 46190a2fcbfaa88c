use std::fs;
use std::path::{Path, PathBuf};

use prs_core::errors::{ErrorInfo, SweepError};
use prs_core::{SamplerVariant, SweepConfig};
use serde::{Deserialize, Serialize};

use crate::build::BuildStep;
use crate::hash::stable_hash_string;
use crate::ledger::ledger_path;
use crate::points::SweepStrategy;
use crate::serde::{from_yaml_slice, to_yaml_string};
use crate::trial::FailurePolicy;

/// Complete description of a benchmark sweep, usually loaded from YAML.
///
/// Omitted fields fall back to the 500M campaign settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepPlan {
    /// Sampling executable launched for every trial.
    pub executable: PathBuf,
    /// Directory holding the ledgers; must already exist.
    pub results_dir: PathBuf,
    /// Ledger file name prefix.
    pub sweep_label: String,
    /// Environment variable conveying the worker thread count.
    pub thread_env: String,
    pub samplers: Vec<SamplerVariant>,
    pub threads: Vec<u32>,
    /// Total sample-space bound `N`.
    pub n: u64,
    /// Measured repeats per point; one extra warm-up launch precedes them.
    pub repeats: u32,
    pub strategy: SweepStrategy,
    /// Optional build run once before the first trial.
    pub build: Option<BuildStep>,
    pub on_failure: FailurePolicy,
}

impl Default for SweepPlan {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("./build/ParRandomSampling"),
            results_dir: PathBuf::from("analysis"),
            sweep_label: "new_bench_results".to_string(),
            thread_env: "PARLAY_NUM_THREADS".to_string(),
            samplers: SamplerVariant::ALL.to_vec(),
            threads: vec![1, 12, 24],
            n: 500_000_000,
            repeats: 3,
            strategy: SweepStrategy::default(),
            build: None,
            on_failure: FailurePolicy::default(),
        }
    }
}

/// Command line overrides applied on top of a loaded plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanOverrides {
    pub samplers: Option<Vec<SamplerVariant>>,
    pub threads: Option<Vec<u32>>,
    pub repeats: Option<u32>,
    pub results_dir: Option<PathBuf>,
    pub on_failure: Option<FailurePolicy>,
}

impl SweepPlan {
    /// Returns the deterministic hash associated with the plan contents.
    pub fn plan_hash(&self) -> Result<String, SweepError> {
        stable_hash_string(self)
    }

    /// Produces a YAML representation of the plan.
    pub fn to_yaml_string(&self) -> Result<String, SweepError> {
        to_yaml_string(self)
    }

    /// Ledger shared by every sampler swept at `thread_count`.
    pub fn ledger_path(&self, thread_count: u32) -> PathBuf {
        ledger_path(&self.results_dir, &self.sweep_label, thread_count, self.n)
    }

    /// Immutable per-sweep configuration for one (sampler, threads) pair.
    pub fn sweep_config(
        &self,
        sampler: SamplerVariant,
        thread_count: u32,
    ) -> Result<SweepConfig, SweepError> {
        SweepConfig::new(sampler, thread_count, self.n, self.repeats)
    }

    /// The k values every (sampler, threads) sweep visits.
    pub fn points(&self) -> Vec<u64> {
        self.strategy.points(self.n).collect()
    }

    /// Launches a full run issues, excluding the build step.
    pub fn total_launches(&self) -> u64 {
        let sweeps = (self.samplers.len() * self.threads.len()) as u64;
        sweeps * self.points().len() as u64 * (u64::from(self.repeats) + 1)
    }

    /// Applies CLI overrides in place.
    pub fn apply(&mut self, overrides: PlanOverrides) {
        if let Some(samplers) = overrides.samplers {
            self.samplers = samplers;
        }
        if let Some(threads) = overrides.threads {
            self.threads = threads;
        }
        if let Some(repeats) = overrides.repeats {
            self.repeats = repeats;
        }
        if let Some(results_dir) = overrides.results_dir {
            self.results_dir = results_dir;
        }
        if let Some(policy) = overrides.on_failure {
            self.on_failure = policy;
        }
    }

    /// Rejects plans that cannot drive a meaningful sweep.
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.samplers.is_empty() {
            return Err(plan_error("plan-samplers", "at least one sampler is required"));
        }
        if self.threads.is_empty() {
            return Err(plan_error("plan-threads", "at least one thread count is required"));
        }
        if self.threads.contains(&0) {
            return Err(plan_error("plan-threads", "thread counts must be positive"));
        }
        if self.n == 0 {
            return Err(plan_error("plan-n", "sample space bound n must be positive"));
        }
        if self.sweep_label.is_empty() || self.sweep_label.contains(['/', '\\']) {
            return Err(SweepError::Config(
                ErrorInfo::new("plan-label", "sweep_label must be a plain file name prefix")
                    .with_context("sweep_label", self.sweep_label.clone()),
            ));
        }
        if self.thread_env.is_empty() || self.thread_env.contains('=') {
            return Err(SweepError::Config(
                ErrorInfo::new("plan-thread-env", "thread_env must be a variable name")
                    .with_context("thread_env", self.thread_env.clone()),
            ));
        }
        self.strategy.validate(self.n)
    }
}

fn plan_error(code: &str, message: &str) -> SweepError {
    SweepError::config(code, message)
}

/// Loads and validates a plan from disk.
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<SweepPlan, SweepError> {
    let plan_path = path.as_ref();
    let bytes = fs::read(plan_path).map_err(|err| {
        SweepError::Config(
            ErrorInfo::new("plan_read", err.to_string())
                .with_context("path", plan_path.display().to_string()),
        )
    })?;
    let plan: SweepPlan = from_yaml_slice(&bytes)?;
    plan.validate()?;
    Ok(plan)
}
