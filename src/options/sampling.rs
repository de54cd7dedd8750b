use serde::{Deserialize, Serialize};

/// Stochastic sample pool sizing and seeding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SamplingOptions {
    /// Entries in each sample buffer.
    pub pool_size: u32,
    /// Fixed RNG seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Candidate cap per unit-sphere point before giving up.
    pub max_rejection_attempts: u32,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            pool_size: 4096,
            seed: None,
            max_rejection_attempts: 10_000,
        }
    }
}
