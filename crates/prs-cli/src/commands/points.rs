use std::error::Error;

use clap::Args;
use prs_sweep::{to_canonical_json_bytes, PlanOverrides};
use serde::Serialize;

use super::PlanArgs;

#[derive(Args, Debug)]
pub struct PointsArgs {
    #[command(flatten)]
    pub plan: PlanArgs,
    /// Emit a JSON summary instead of one k per line.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct PointsListing {
    strategy: &'static str,
    n: u64,
    points: Vec<u64>,
    sweeps: usize,
    launches: u64,
}

pub fn run(args: &PointsArgs) -> Result<(), Box<dyn Error>> {
    let plan = args.plan.load(PlanOverrides::default())?;
    let listing = PointsListing {
        strategy: plan.strategy.kind(),
        n: plan.n,
        points: plan.points(),
        sweeps: plan.samplers.len() * plan.threads.len(),
        launches: plan.total_launches(),
    };
    if args.json {
        let json = to_canonical_json_bytes(&listing)?;
        println!("{}", String::from_utf8(json)?);
    } else {
        for k in &listing.points {
            println!("{k}");
        }
        println!(
            "# {} points x {} sweeps x {} launches each = {} launches",
            listing.points.len(),
            listing.sweeps,
            plan.repeats + 1,
            listing.launches
        );
    }
    Ok(())
}
