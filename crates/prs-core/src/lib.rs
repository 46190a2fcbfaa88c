#![deny(missing_docs)]
#![doc = "Core types, error surface and process-launch seam for the sampling benchmark driver."]

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod sampler;
mod types;

pub use errors::{ErrorInfo, SweepError};
pub use sampler::SamplerVariant;
pub use types::{size_label, SweepConfig, TrialInvocation};

/// A single blocking process launch.
///
/// Environment overrides are carried on the request and applied to the child
/// only; the driver never mutates its own environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchRequest {
    /// Program to execute.
    pub program: PathBuf,
    /// Positional arguments.
    pub args: Vec<String>,
    /// Environment variables set for the child in addition to the inherited ones.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl LaunchRequest {
    /// Creates a request with no environment overrides.
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            env: BTreeMap::new(),
        }
    }

    /// Adds an environment override for the child process.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Builds the request for one trial, conveying the thread count through `thread_env`.
    pub fn for_trial(
        executable: impl Into<PathBuf>,
        thread_env: &str,
        invocation: &TrialInvocation,
    ) -> Self {
        Self::new(executable, invocation.args())
            .with_env(thread_env, invocation.thread_count.to_string())
    }

    /// Shell-like rendering used in logs and dry runs.
    pub fn display_command(&self) -> String {
        let mut parts = Vec::with_capacity(self.env.len() + self.args.len() + 1);
        for (key, value) in &self.env {
            parts.push(format!("{key}={value}"));
        }
        parts.push(self.program.display().to_string());
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Exit information for a finished child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchOutcome {
    /// Exit code, `None` when the child was terminated by a signal.
    pub code: Option<i32>,
}

impl LaunchOutcome {
    /// Outcome of a child that exited cleanly.
    pub fn ok() -> Self {
        Self { code: Some(0) }
    }

    /// Returns true when the child exited with status zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Launches external processes, blocking until each one exits.
///
/// `Err` is reserved for launches that could not be started at all; a child
/// that ran and failed is reported through [`LaunchOutcome`].
pub trait Launcher {
    /// Runs the request to completion.
    fn launch(&mut self, request: &LaunchRequest) -> Result<LaunchOutcome, SweepError>;
}
