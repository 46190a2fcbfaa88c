#![allow(dead_code)]

use std::fs::OpenOptions;
use std::io::Write;

use prs_core::{LaunchOutcome, LaunchRequest, Launcher, SweepError};

/// Records every request and optionally mimics the executable's ledger append.
#[derive(Default)]
pub struct RecordingLauncher {
    pub requests: Vec<LaunchRequest>,
    pub append_rows: bool,
    pub fail_when: Option<fn(&LaunchRequest) -> bool>,
}

impl RecordingLauncher {
    pub fn appending() -> Self {
        Self {
            append_rows: true,
            ..Self::default()
        }
    }

    pub fn failing(predicate: fn(&LaunchRequest) -> bool) -> Self {
        Self {
            fail_when: Some(predicate),
            ..Self::default()
        }
    }

    /// (sampler, threads, k, repeat) of every trial launch, in order.
    pub fn trials(&self) -> Vec<(String, u32, u64, u32)> {
        self.requests
            .iter()
            .filter(|request| request.args.len() == 5)
            .map(|request| {
                (
                    request.args[2].clone(),
                    request.args[0].parse().unwrap(),
                    request.args[3].parse().unwrap(),
                    request.args[4].parse().unwrap(),
                )
            })
            .collect()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&mut self, request: &LaunchRequest) -> Result<LaunchOutcome, SweepError> {
        self.requests.push(request.clone());
        if let Some(predicate) = self.fail_when {
            if predicate(request) {
                return Ok(LaunchOutcome { code: Some(1) });
            }
        }
        if self.append_rows && request.args.len() == 5 {
            let mut ledger = OpenOptions::new()
                .append(true)
                .open(&request.args[1])
                .expect("ledger exists before trial");
            writeln!(
                ledger,
                "{},{},{},{}",
                request.args[2], request.args[3], request.args[0], 1234
            )
            .expect("append row");
        }
        Ok(LaunchOutcome::ok())
    }
}
