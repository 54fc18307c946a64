//! Run configuration.
//!
//! The core only needs a group size and a verbosity flag. The seed and
//! worker count are optional knobs for reproducibility and tuning.

use crate::error::ConfigurationError;

/// Group size used when none is given
pub const DEFAULT_GROUP_SIZE: usize = 5;

/// Parameters for one generate + match run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Members per group (both groups have the same size)
    pub group_size: usize,

    /// Log every generated ranking and the final pairing
    pub verbose: bool,

    /// Fixed seed; a fresh one is drawn when absent
    pub seed: Option<u64>,

    /// Generation worker threads; defaults to available parallelism
    pub workers: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            group_size: DEFAULT_GROUP_SIZE,
            verbose: false,
            seed: None,
            workers: None,
        }
    }
}

impl RunConfig {
    /// Config for `group_size` with everything else defaulted
    pub fn with_group_size(group_size: usize) -> Self {
        Self {
            group_size,
            ..Self::default()
        }
    }

    /// Reject values no run can start with
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.group_size == 0 {
            return Err(ConfigurationError::EmptyGroup);
        }
        if self.workers == Some(0) {
            return Err(ConfigurationError::NoWorkers);
        }
        Ok(())
    }
}
