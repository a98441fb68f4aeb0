//! Engine configuration
//!
//! Passed explicitly to each driver's `with_config` constructor; there is no
//! global configuration.

use crate::engine::DEFAULT_DELAY;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Pause after each recorded step
    pub delay: Duration,
    pub stack_capacity: usize,
    pub queue_capacity: usize,
    /// Initial bucket count of the hash table
    pub hash_capacity: usize,
    /// The hash table doubles once `size / capacity` exceeds this
    pub load_factor_threshold: f64,
    /// Value range covered by one bucket in bucket sort
    pub bucket_size: i64,
    /// Seed for `generate_random_array`; `None` draws from the thread RNG
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Configuration with no pacing, for tests and headless runs
    pub fn instant() -> Self {
        EngineConfig {
            delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            delay: DEFAULT_DELAY,
            stack_capacity: 10,
            queue_capacity: 10,
            hash_capacity: 8,
            load_factor_threshold: 0.75,
            bucket_size: 5,
            seed: None,
        }
    }
}
