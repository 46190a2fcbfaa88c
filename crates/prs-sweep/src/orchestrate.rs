//! Top-level sweep driver: samplers × thread counts × k × repeats.

use std::path::Path;

use chrono::Utc;
use prs_core::{Launcher, SweepError};
use tracing::{info, warn};

use crate::ledger::{count_rows, ensure_ready};
use crate::plan::SweepPlan;
use crate::report::{RunReport, SweepSummary};
use crate::trial::TrialRunner;

/// Options governing a single driver invocation.
#[derive(Debug, Clone, Default)]
pub struct RunOpts {
    /// Skip the plan's build step even when one is configured.
    pub skip_build: bool,
    /// Marks the report as produced by a launcher that ran nothing.
    pub dry_run: bool,
}

/// Executes every sweep in `plan`, one blocking launch at a time.
///
/// The ledger for each (sampler, threads) pair is bootstrapped before that
/// sweep's first trial; a ledger that cannot be created aborts the run.
///
/// A trial failure under [`FailurePolicy::Abort`](crate::FailurePolicy::Abort)
/// stops launching but still returns the report gathered so far, with the
/// error in [`RunReport::aborted`].
pub fn run_plan<L: Launcher>(
    plan: &SweepPlan,
    launcher: &mut L,
    opts: &RunOpts,
) -> Result<RunReport, SweepError> {
    plan.validate()?;
    let plan_hash = plan.plan_hash()?;
    let started_at = Utc::now().to_rfc3339();
    info!(
        plan_hash = %plan_hash,
        launches = plan.total_launches(),
        strategy = plan.strategy.kind(),
        "starting benchmark sweep"
    );

    let mut built = false;
    if let Some(build) = plan.build.as_ref().filter(|_| !opts.skip_build) {
        build.run(&mut *launcher)?;
        built = true;
    }

    let mut sweeps = Vec::with_capacity(plan.samplers.len() * plan.threads.len());
    let mut failures = Vec::new();
    let mut launches = 0;
    let mut aborted = None;

    'sweeps: for &sampler in &plan.samplers {
        info!(%sampler, "running sampler");
        for &threads in &plan.threads {
            let config = plan.sweep_config(sampler, threads)?;
            let ledger = plan.ledger_path(threads);
            let ledger_state = ensure_ready(&ledger)?;
            let rows_before = rows_in(&ledger);
            info!(%sampler, threads, ledger = %ledger.display(), ?ledger_state, "sweep start");

            let mut runner = TrialRunner::new(
                &mut *launcher,
                &plan.executable,
                &plan.thread_env,
                plan.on_failure,
            );
            let mut points = 0;
            for k in plan.strategy.points(config.n()) {
                info!(%sampler, threads, k, repeats = config.repeats(), "running point");
                match runner.run_trials(&config, &ledger, k) {
                    Ok(summary) => failures.extend(summary.failures),
                    Err(err) => {
                        aborted = Some(err);
                        break;
                    }
                }
                points += 1;
            }
            let sweep_launches = runner.launched();

            let rows_appended = rows_before
                .zip(rows_in(&ledger))
                .map(|(before, after)| after.saturating_sub(before));
            launches += sweep_launches;
            sweeps.push(SweepSummary {
                sampler,
                threads,
                ledger,
                ledger_state,
                points,
                launches: sweep_launches,
                rows_appended,
            });
            if aborted.is_some() {
                break 'sweeps;
            }
        }
    }

    match &aborted {
        Some(err) => warn!(
            launches,
            failures = failures.len(),
            error = %err,
            "benchmark sweep aborted"
        ),
        None => info!(launches, failures = failures.len(), "benchmark sweep finished"),
    }
    Ok(RunReport {
        plan_hash,
        started_at,
        finished_at: Utc::now().to_rfc3339(),
        dry_run: opts.dry_run,
        built,
        launches,
        sweeps,
        failures,
        aborted,
    })
}

/// Row count for bookkeeping only; an unreadable ledger never stops the sweep.
fn rows_in(ledger: &Path) -> Option<u64> {
    match count_rows(ledger) {
        Ok(rows) => Some(rows),
        Err(err) => {
            warn!(ledger = %ledger.display(), error = %err, "could not count ledger rows");
            None
        }
    }
}
