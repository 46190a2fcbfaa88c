use std::path::PathBuf;

use serde::Serialize;

use crate::errors::{ErrorInfo, SweepError};
use crate::sampler::SamplerVariant;

/// Immutable description of one (sampler, thread count) sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepConfig {
    sampler: SamplerVariant,
    thread_count: u32,
    n: u64,
    repeats: u32,
}

impl SweepConfig {
    /// Builds a configuration, rejecting a zero thread count or an empty sample space.
    pub fn new(
        sampler: SamplerVariant,
        thread_count: u32,
        n: u64,
        repeats: u32,
    ) -> Result<Self, SweepError> {
        if thread_count == 0 {
            return Err(SweepError::Config(
                ErrorInfo::new("thread-count", "thread count must be positive")
                    .with_context("sampler", sampler.as_str()),
            ));
        }
        if n == 0 {
            return Err(SweepError::Config(ErrorInfo::new(
                "sample-space",
                "sample space bound N must be positive",
            )));
        }
        Ok(Self {
            sampler,
            thread_count,
            n,
            repeats,
        })
    }

    /// Sampler variant under test.
    pub fn sampler(&self) -> SamplerVariant {
        self.sampler
    }

    /// Worker thread count handed to the executable.
    pub fn thread_count(&self) -> u32 {
        self.thread_count
    }

    /// Total sample-space bound `N`.
    pub fn n(&self) -> u64 {
        self.n
    }

    /// Measured repeats `R`; each point is launched `R + 1` times.
    pub fn repeats(&self) -> u32 {
        self.repeats
    }

    /// Number of launches issued per swept k, warm-up included.
    pub fn launches_per_point(&self) -> u64 {
        u64::from(self.repeats) + 1
    }
}

/// Argument tuple for a single launch of the sampling executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialInvocation {
    /// Worker thread count.
    pub thread_count: u32,
    /// Ledger the child appends its timing row to.
    pub ledger_path: PathBuf,
    /// Sampler variant token.
    pub sampler: SamplerVariant,
    /// Sample size.
    pub k: u64,
    /// Repeat index; 0 is the warm-up run.
    pub repeat: u32,
}

impl TrialInvocation {
    /// Positional arguments in the order the executable expects:
    /// threads, ledger path, sampler, k, repeat.
    pub fn args(&self) -> Vec<String> {
        vec![
            self.thread_count.to_string(),
            self.ledger_path.display().to_string(),
            self.sampler.as_str().to_string(),
            self.k.to_string(),
            self.repeat.to_string(),
        ]
    }
}

/// Short human label for a sample-space size, used in ledger file names.
///
/// Exact multiples of a thousand, million or billion collapse to `K`, `M`
/// or `G`; anything else is rendered verbatim.
pub fn size_label(n: u64) -> String {
    const UNITS: [(u64, &str); 3] = [
        (1_000_000_000, "G"),
        (1_000_000, "M"),
        (1_000, "K"),
    ];
    for (scale, suffix) in UNITS {
        if n >= scale && n % scale == 0 {
            return format!("{}{}", n / scale, suffix);
        }
    }
    n.to_string()
}
