use std::path::PathBuf;

use prs_core::errors::{ErrorInfo, SweepError};
use prs_core::{LaunchRequest, Launcher};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// External build invocation executed once before any trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStep {
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

impl BuildStep {
    /// Runs the build; any failure is fatal for the whole run.
    pub fn run<L: Launcher>(&self, launcher: &mut L) -> Result<(), SweepError> {
        let request = LaunchRequest::new(&self.program, self.args.clone());
        let command = request.display_command();
        info!(%command, "building target executable");
        let outcome = launcher.launch(&request).map_err(|err| {
            SweepError::Build(
                ErrorInfo::new("build-spawn", "build step could not be started")
                    .with_context("command", command.clone())
                    .with_hint(err.to_string()),
            )
        })?;
        if !outcome.success() {
            error!(%command, code = ?outcome.code, "build failed");
            let status = outcome
                .code
                .map(|code| code.to_string())
                .unwrap_or_else(|| "signal".to_string());
            return Err(SweepError::Build(
                ErrorInfo::new("build-status", "build step exited unsuccessfully")
                    .with_context("command", command)
                    .with_context("status", status),
            ));
        }
        Ok(())
    }
}
