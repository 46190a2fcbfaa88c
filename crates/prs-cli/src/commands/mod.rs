pub mod doctor;
pub mod points;
pub mod run;

use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use prs_core::SamplerVariant;
use prs_sweep::{load_plan, PlanOverrides, SweepPlan};

/// Plan selection shared by every subcommand.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// YAML sweep plan; built-in 500M campaign defaults when omitted.
    #[arg(long)]
    pub plan: Option<PathBuf>,
    /// Comma separated thread counts replacing the plan's list.
    #[arg(long, value_delimiter = ',')]
    pub threads: Vec<u32>,
    /// Comma separated sampler variants replacing the plan's list.
    #[arg(long, value_delimiter = ',', value_parser = parse_sampler)]
    pub samplers: Vec<SamplerVariant>,
    /// Measured repeats per point (a warm-up run is always added).
    #[arg(long)]
    pub repeats: Option<u32>,
    /// Directory holding the ledgers.
    #[arg(long)]
    pub results_dir: Option<PathBuf>,
}

impl PlanArgs {
    pub fn overrides(&self) -> PlanOverrides {
        PlanOverrides {
            samplers: (!self.samplers.is_empty()).then(|| self.samplers.clone()),
            threads: (!self.threads.is_empty()).then(|| self.threads.clone()),
            repeats: self.repeats,
            results_dir: self.results_dir.clone(),
            on_failure: None,
        }
    }

    /// Loads the plan, applies overrides and validates the result.
    pub fn load(&self, extra: PlanOverrides) -> Result<SweepPlan, Box<dyn Error>> {
        let mut plan = match &self.plan {
            Some(path) => load_plan(path)?,
            None => SweepPlan::default(),
        };
        plan.apply(self.overrides());
        plan.apply(extra);
        plan.validate()?;
        Ok(plan)
    }
}

fn parse_sampler(value: &str) -> Result<SamplerVariant, String> {
    value.parse().map_err(|err: prs_core::SweepError| err.to_string())
}
