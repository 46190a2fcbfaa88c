//! Sweep generators producing the k values tested for one (sampler, threads) pair.

use prs_core::errors::{ErrorInfo, SweepError};
use serde::{Deserialize, Serialize};

/// Strategy used to enumerate sample sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SweepStrategy {
    /// Fine steps at small k, coarsening by `factor` with a periodic reset.
    Adaptive {
        /// Initial value and step; defaults to `N / 20_000`.
        #[serde(default)]
        step0: Option<u64>,
        /// Coarsen once `k` reaches `coarsen_after × step`.
        #[serde(default = "SweepStrategy::default_coarsen_after")]
        coarsen_after: u64,
        /// Multiplier applied to the step when coarsening.
        #[serde(default = "SweepStrategy::default_factor")]
        factor: u64,
        /// Upper bound on k as a percentage of `N`, i.e. `k ≤ ⌊N × limit_percent / 100⌋`.
        #[serde(default = "SweepStrategy::default_limit_percent")]
        limit_percent: u64,
    },
    /// A single large k; defaults to `N / 2`.
    Fixed {
        #[serde(default)]
        k: Option<u64>,
    },
    /// Fixed percentages of `N`, in the listed order.
    Percent { percents: Vec<u64> },
}

impl Default for SweepStrategy {
    fn default() -> Self {
        SweepStrategy::Adaptive {
            step0: None,
            coarsen_after: Self::default_coarsen_after(),
            factor: Self::default_factor(),
            limit_percent: Self::default_limit_percent(),
        }
    }
}

impl SweepStrategy {
    const fn default_coarsen_after() -> u64 {
        4
    }

    const fn default_factor() -> u64 {
        10
    }

    const fn default_limit_percent() -> u64 {
        10
    }

    /// Short name used in logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            SweepStrategy::Adaptive { .. } => "adaptive",
            SweepStrategy::Fixed { .. } => "fixed",
            SweepStrategy::Percent { .. } => "percent",
        }
    }

    /// Returns a fresh generator over the k values for sample space `n`.
    ///
    /// Each call restarts from the beginning and yields the same sequence.
    pub fn points(&self, n: u64) -> SweepPoints {
        match self {
            SweepStrategy::Adaptive {
                step0,
                coarsen_after,
                factor,
                limit_percent,
            } => {
                let step = step0.unwrap_or((n / 20_000).max(1));
                SweepPoints::Adaptive(AdaptiveSteps {
                    k: step,
                    delta: step,
                    coarsened: false,
                    coarsen_after: *coarsen_after,
                    factor: *factor,
                    limit: percent_of(n, *limit_percent),
                    done: step == 0,
                })
            }
            SweepStrategy::Fixed { k } => {
                SweepPoints::Listed(vec![k.unwrap_or(n / 2)].into_iter())
            }
            SweepStrategy::Percent { percents } => SweepPoints::Listed(
                percents
                    .iter()
                    .map(|percent| percent_of(n, *percent))
                    .collect::<Vec<_>>()
                    .into_iter(),
            ),
        }
    }

    /// Checks the knobs against `n` and rejects strategies yielding no points.
    pub fn validate(&self, n: u64) -> Result<(), SweepError> {
        match self {
            SweepStrategy::Adaptive {
                step0,
                coarsen_after,
                factor,
                limit_percent,
            } => {
                if *step0 == Some(0) {
                    return Err(strategy_error("adaptive-step0", "step0 must be positive"));
                }
                if *coarsen_after < 2 {
                    return Err(strategy_error(
                        "adaptive-coarsen-after",
                        "coarsen_after must be at least 2",
                    ));
                }
                if *factor < 2 {
                    return Err(strategy_error("adaptive-factor", "factor must be at least 2"));
                }
                if *limit_percent == 0 || *limit_percent > 100 {
                    return Err(strategy_error(
                        "adaptive-limit",
                        "limit_percent must lie in 1..=100",
                    ));
                }
            }
            SweepStrategy::Fixed { k } => {
                if let Some(k) = k {
                    if *k == 0 || *k > n {
                        return Err(SweepError::Config(
                            ErrorInfo::new("fixed-k", "fixed k must lie in 1..=N")
                                .with_context("k", k.to_string())
                                .with_context("n", n.to_string()),
                        ));
                    }
                }
            }
            SweepStrategy::Percent { percents } => {
                if let Some(bad) = percents.iter().find(|p| **p == 0 || **p > 100) {
                    return Err(SweepError::Config(
                        ErrorInfo::new("percent-range", "percentages must lie in 1..=100")
                            .with_context("percent", bad.to_string()),
                    ));
                }
            }
        }
        let mut points = self.points(n);
        match points.next() {
            Some(k) if k > 0 => Ok(()),
            _ => Err(SweepError::Config(
                ErrorInfo::new("empty-sweep", "strategy yields no positive k")
                    .with_context("strategy", self.kind())
                    .with_context("n", n.to_string()),
            )),
        }
    }
}

fn strategy_error(code: &str, message: &str) -> SweepError {
    SweepError::Config(ErrorInfo::new(code, message).with_context("strategy", "adaptive"))
}

fn percent_of(n: u64, percent: u64) -> u64 {
    let scaled = u128::from(n) * u128::from(percent) / 100;
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// Lazy, finite sequence of k values.
#[derive(Debug, Clone)]
pub enum SweepPoints {
    /// Adaptive coarsening generator.
    Adaptive(AdaptiveSteps),
    /// Precomputed list.
    Listed(std::vec::IntoIter<u64>),
}

impl Iterator for SweepPoints {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        match self {
            SweepPoints::Adaptive(steps) => steps.next(),
            SweepPoints::Listed(values) => values.next(),
        }
    }
}

/// Sawtooth generator: `k` advances by `delta`; on reaching
/// `coarsen_after × delta` the step grows by `factor`, and the following
/// value restarts at the new step.
#[derive(Debug, Clone)]
pub struct AdaptiveSteps {
    k: u64,
    delta: u64,
    coarsened: bool,
    coarsen_after: u64,
    factor: u64,
    limit: u64,
    done: bool,
}

impl Iterator for AdaptiveSteps {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.done || self.k > self.limit {
            return None;
        }
        let current = self.k;
        match current.checked_add(self.delta) {
            Some(mut next) => {
                if next >= self.delta.saturating_mul(self.coarsen_after) {
                    self.delta = self.delta.saturating_mul(self.factor);
                    self.coarsened = true;
                } else if self.coarsened {
                    next = self.delta;
                    self.coarsened = false;
                }
                self.k = next;
            }
            None => self.done = true,
        }
        Some(current)
    }
}
