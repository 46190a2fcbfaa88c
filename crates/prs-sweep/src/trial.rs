//! Sequential trial execution for one swept k.

use std::path::Path;

use prs_core::errors::{ErrorInfo, SweepError};
use prs_core::{LaunchOutcome, LaunchRequest, Launcher, SweepConfig, TrialInvocation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::report::TrialFailure;

/// What to do when a trial exits non-zero or cannot be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the whole run at the first failed trial.
    Abort,
    /// Record the failure and move on to the next repeat.
    #[default]
    Continue,
    /// Relaunch the same repeat up to `attempts` more times, then record and continue.
    Retry { attempts: u32 },
}

impl FailurePolicy {
    fn extra_attempts(&self) -> u32 {
        match self {
            FailurePolicy::Retry { attempts } => *attempts,
            FailurePolicy::Abort | FailurePolicy::Continue => 0,
        }
    }
}

/// Launch totals for one swept k.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrialSummary {
    pub launches: u64,
    pub failures: Vec<TrialFailure>,
}

/// Issues the `R + 1` launches for a point, one at a time.
pub struct TrialRunner<'a, L: Launcher> {
    launcher: &'a mut L,
    executable: &'a Path,
    thread_env: &'a str,
    policy: FailurePolicy,
    launched: u64,
}

impl<'a, L: Launcher> TrialRunner<'a, L> {
    pub fn new(
        launcher: &'a mut L,
        executable: &'a Path,
        thread_env: &'a str,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            launcher,
            executable,
            thread_env,
            policy,
            launched: 0,
        }
    }

    /// Launches issued through this runner so far, including those of a
    /// point that ended in an abort.
    pub fn launched(&self) -> u64 {
        self.launched
    }

    /// Runs repeats `0..=R` for `k`, each launch blocking until the child exits.
    ///
    /// Repeat 0 is the warm-up; it is launched like any other and the
    /// executable decides whether its row counts.
    pub fn run_trials(
        &mut self,
        config: &SweepConfig,
        ledger: &Path,
        k: u64,
    ) -> Result<TrialSummary, SweepError> {
        let mut summary = TrialSummary::default();
        for repeat in 0..=config.repeats() {
            let invocation = TrialInvocation {
                thread_count: config.thread_count(),
                ledger_path: ledger.to_path_buf(),
                sampler: config.sampler(),
                k,
                repeat,
            };
            let request = LaunchRequest::for_trial(self.executable, self.thread_env, &invocation);
            debug!(command = %request.display_command(), "launching trial");

            let mut attempts = 0;
            let failure = loop {
                attempts += 1;
                summary.launches += 1;
                self.launched += 1;
                let reason = match self.launcher.launch(&request) {
                    Ok(outcome) if outcome.success() => break None,
                    Ok(outcome) => exit_reason(&outcome),
                    Err(err) => err.to_string(),
                };
                if attempts > self.policy.extra_attempts() {
                    break Some(reason);
                }
                warn!(
                    sampler = %config.sampler(),
                    threads = config.thread_count(),
                    k,
                    repeat,
                    attempt = attempts,
                    %reason,
                    "trial failed, retrying"
                );
            };

            if let Some(reason) = failure {
                warn!(
                    sampler = %config.sampler(),
                    threads = config.thread_count(),
                    k,
                    repeat,
                    %reason,
                    "trial failed"
                );
                if self.policy == FailurePolicy::Abort {
                    return Err(SweepError::Trial(
                        ErrorInfo::new("trial-failed", reason)
                            .with_context("sampler", config.sampler().as_str())
                            .with_context("threads", config.thread_count().to_string())
                            .with_context("k", k.to_string())
                            .with_context("repeat", repeat.to_string())
                            .with_hint("set on_failure to continue or retry to keep sweeping"),
                    ));
                }
                summary.failures.push(TrialFailure {
                    sampler: config.sampler(),
                    threads: config.thread_count(),
                    k,
                    repeat,
                    attempts,
                    reason,
                });
            }
        }
        Ok(summary)
    }
}

fn exit_reason(outcome: &LaunchOutcome) -> String {
    match outcome.code {
        Some(code) => format!("exited with status {code}"),
        None => "terminated by signal".to_string(),
    }
}
