use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use prs_sweep::{
    run_plan, to_canonical_json_bytes, DryRunLauncher, FailurePolicy, PlanOverrides,
    ProcessLauncher, RunOpts, RunReport,
};
use tracing::warn;

use super::PlanArgs;

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub plan: PlanArgs,
    /// Log every launch instead of running it.
    #[arg(long)]
    pub dry_run: bool,
    /// Skip the plan's build step.
    #[arg(long)]
    pub no_build: bool,
    /// Policy applied when a trial exits non-zero.
    #[arg(long, value_enum)]
    pub on_failure: Option<FailureArg>,
    /// Extra attempts per failed repeat with `--on-failure retry`.
    #[arg(long, default_value_t = 1)]
    pub retries: u32,
    /// Write the JSON run report to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailureArg {
    Abort,
    Continue,
    Retry,
}

impl RunArgs {
    fn failure_policy(&self) -> Option<FailurePolicy> {
        self.on_failure.map(|arg| match arg {
            FailureArg::Abort => FailurePolicy::Abort,
            FailureArg::Continue => FailurePolicy::Continue,
            FailureArg::Retry => FailurePolicy::Retry {
                attempts: self.retries,
            },
        })
    }
}

pub fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let plan = args.plan.load(PlanOverrides {
        on_failure: args.failure_policy(),
        ..PlanOverrides::default()
    })?;
    let opts = RunOpts {
        skip_build: args.no_build,
        dry_run: args.dry_run,
    };
    let report = if args.dry_run {
        run_plan(&plan, &mut DryRunLauncher::default(), &opts)?
    } else {
        run_plan(&plan, &mut ProcessLauncher, &opts)?
    };

    if let Some(path) = &args.report {
        persist_report(path, &report)?;
    }
    println!(
        "{} launches across {} sweeps, {} failed trials",
        report.launches,
        report.sweeps.len(),
        report.failures.len()
    );
    for failure in &report.failures {
        warn!(
            sampler = %failure.sampler,
            threads = failure.threads,
            k = failure.k,
            repeat = failure.repeat,
            reason = %failure.reason,
            "missing measurement"
        );
    }
    match report.aborted {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn persist_report(path: &Path, report: &RunReport) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let bytes = to_canonical_json_bytes(report)?;
    fs::write(path, bytes)?;
    Ok(())
}
