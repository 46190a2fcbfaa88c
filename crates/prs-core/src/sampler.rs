//! Catalog of sampler variants understood by the external executable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, SweepError};

/// Named algorithmic strategy passed verbatim to the sampling executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplerVariant {
    /// Shuffle-everything baseline.
    Naive,
    /// Sequential priority (random key) sampler.
    SeqPriority,
    /// Parallel priority sampler.
    ParPriority,
    /// Sequential partial Knuth shuffle.
    SeqPerm,
    /// Sequential partial shuffle over a copied input.
    SeqPermCopy,
    /// Sequential full permutation.
    SeqPermFull,
    /// Parallel partial permutation.
    ParPerm,
    /// Parallel full permutation.
    ParPermFull,
}

impl SamplerVariant {
    /// Every variant in the order the driver sweeps them by default.
    pub const ALL: [SamplerVariant; 8] = [
        SamplerVariant::Naive,
        SamplerVariant::SeqPriority,
        SamplerVariant::ParPriority,
        SamplerVariant::SeqPerm,
        SamplerVariant::SeqPermCopy,
        SamplerVariant::SeqPermFull,
        SamplerVariant::ParPerm,
        SamplerVariant::ParPermFull,
    ];

    /// Command line token understood by the executable.
    pub fn as_str(&self) -> &'static str {
        match self {
            SamplerVariant::Naive => "naive",
            SamplerVariant::SeqPriority => "seqpriority",
            SamplerVariant::ParPriority => "parpriority",
            SamplerVariant::SeqPerm => "seqperm",
            SamplerVariant::SeqPermCopy => "seqpermcopy",
            SamplerVariant::SeqPermFull => "seqpermfull",
            SamplerVariant::ParPerm => "parperm",
            SamplerVariant::ParPermFull => "parpermfull",
        }
    }
}

impl fmt::Display for SamplerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SamplerVariant {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        SamplerVariant::ALL
            .iter()
            .copied()
            .find(|variant| variant.as_str() == needle)
            .ok_or_else(|| {
                SweepError::Config(
                    ErrorInfo::new("unknown-sampler", "unrecognised sampler variant")
                        .with_context("sampler", s)
                        .with_hint(
                            "expected one of naive, seqpriority, parpriority, seqperm, \
                             seqpermcopy, seqpermfull, parperm, parpermfull",
                        ),
                )
            })
    }
}
