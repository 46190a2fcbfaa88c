use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    doctor::{self, DoctorArgs},
    points::{self, PointsArgs},
    run::{self, RunArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "prs-bench", about = "Parallel random sampling benchmark sweep driver")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the target and sweep every sampler, thread count and k in the plan.
    Run(RunArgs),
    /// Print the k values and launch count a plan would produce.
    Points(PointsArgs),
    /// Check that the executable, results directory and plan are usable.
    Doctor(DoctorArgs),
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Run(args) => run::run(&args),
        Command::Points(args) => points::run(&args),
        Command::Doctor(args) => doctor::run(&args),
    }
}
