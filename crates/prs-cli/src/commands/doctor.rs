use std::error::Error;
use std::path::Path;

use clap::Args;
use prs_sweep::{load_plan, to_canonical_json_bytes, SweepPlan};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// YAML sweep plan to inspect; built-in defaults when omitted.
    #[arg(long)]
    pub plan: Option<std::path::PathBuf>,
    /// Emit only JSON without additional context.
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: String,
    ok: bool,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    status: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(args: &DoctorArgs) -> Result<(), Box<dyn Error>> {
    let report = diagnose(args.plan.as_deref());
    let json = to_canonical_json_bytes(&report)?;
    let rendered = String::from_utf8(json)?;
    if args.quiet {
        println!("{}", rendered);
    } else {
        println!("prs-bench doctor status: {}", report.status);
        println!("{}", rendered);
    }
    if report.status != "ok" {
        return Err("one or more checks failed".into());
    }
    Ok(())
}

fn diagnose(plan_path: Option<&Path>) -> DoctorReport {
    let mut checks = Vec::new();
    let plan = match plan_path {
        Some(path) => match load_plan(path) {
            Ok(plan) => {
                checks.push(pass("plan", path.display().to_string()));
                Some(plan)
            }
            Err(err) => {
                checks.push(fail("plan", err.to_string()));
                None
            }
        },
        None => {
            checks.push(pass("plan", "built-in defaults".to_string()));
            Some(SweepPlan::default())
        }
    };

    if let Some(plan) = plan {
        checks.push(check_path("executable", &plan.executable, false));
        checks.push(check_path("results_dir", &plan.results_dir, true));
        if let Some(build) = &plan.build {
            checks.push(pass("build", build.program.display().to_string()));
        }
        for &threads in &plan.threads {
            let ledger = plan.ledger_path(threads);
            let state = if ledger.exists() { "present" } else { "absent" };
            checks.push(pass(
                &format!("ledger[{threads}]"),
                format!("{} ({state})", ledger.display()),
            ));
        }
    }

    let status = if checks.iter().all(|check| check.ok) {
        "ok"
    } else {
        "needs-attention"
    };
    DoctorReport {
        status: status.into(),
        checks,
    }
}

fn pass(name: &str, detail: String) -> DoctorCheck {
    DoctorCheck {
        name: name.into(),
        ok: true,
        detail,
    }
}

fn fail(name: &str, detail: String) -> DoctorCheck {
    DoctorCheck {
        name: name.into(),
        ok: false,
        detail,
    }
}

fn check_path(name: &str, path: &Path, want_dir: bool) -> DoctorCheck {
    match path.metadata() {
        Ok(meta) if meta.is_dir() == want_dir => pass(name, path.display().to_string()),
        Ok(_) if want_dir => fail(name, format!("{} is not a directory", path.display())),
        Ok(_) => fail(name, format!("{} is a directory", path.display())),
        Err(_) => fail(name, format!("{} missing", path.display())),
    }
}
