use std::process::Command;

use prs_core::errors::{ErrorInfo, SweepError};
use prs_core::{LaunchOutcome, LaunchRequest, Launcher};
use tracing::info;

/// Spawns real child processes and waits for each to exit.
///
/// Standard streams are inherited so the executable's own output reaches the
/// console. No timeout is applied; a hung child blocks the sweep.
#[derive(Debug, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&mut self, request: &LaunchRequest) -> Result<LaunchOutcome, SweepError> {
        let status = Command::new(&request.program)
            .args(&request.args)
            .envs(&request.env)
            .status()
            .map_err(|err| {
                SweepError::Trial(
                    ErrorInfo::new("spawn", "failed to start process")
                        .with_context("program", request.program.display().to_string())
                        .with_hint(err.to_string()),
                )
            })?;
        Ok(LaunchOutcome {
            code: status.code(),
        })
    }
}

/// Logs each request instead of running it.
#[derive(Debug, Default)]
pub struct DryRunLauncher {
    pub launched: u64,
}

impl Launcher for DryRunLauncher {
    fn launch(&mut self, request: &LaunchRequest) -> Result<LaunchOutcome, SweepError> {
        self.launched += 1;
        info!(command = %request.display_command(), "dry run");
        Ok(LaunchOutcome::ok())
    }
}
