//! Validated sort settings.
//!
//! Everything here is checked when it is built, so the engine never sees
//! an invalid configuration and a bad value is reported before the first
//! frame is read.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use pixsort_common::config::SortDefaults;
use pixsort_common::error::{PixsortError, PixsortResult};

use crate::axis::Axis;
use crate::key::{KeyMode, SortKey, SortOrder};

/// Number of worker threads per frame. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct WorkerCount(NonZeroUsize);

impl WorkerCount {
    pub const DEFAULT: usize = 4;

    /// Reject zero.
    pub fn new(count: usize) -> PixsortResult<Self> {
        NonZeroUsize::new(count)
            .map(Self)
            .ok_or_else(|| PixsortError::config("worker count must be at least 1"))
    }

    /// One worker per available CPU, or the default when that is unknown.
    pub fn available_parallelism() -> Self {
        std::thread::available_parallelism()
            .map(Self)
            .unwrap_or_default()
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for WorkerCount {
    fn default() -> Self {
        Self(NonZeroUsize::new(Self::DEFAULT).unwrap_or(NonZeroUsize::MIN))
    }
}

impl TryFrom<usize> for WorkerCount {
    type Error = PixsortError;

    fn try_from(count: usize) -> Result<Self, Self::Error> {
        Self::new(count)
    }
}

impl From<WorkerCount> for usize {
    fn from(count: WorkerCount) -> Self {
        count.get()
    }
}

/// Everything one transform call needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortConfig {
    pub axis: Axis,
    pub key: SortKey,
    pub workers: WorkerCount,
}

impl SortConfig {
    pub fn new(axis: Axis, key: SortKey) -> Self {
        Self {
            axis,
            key,
            workers: WorkerCount::default(),
        }
    }

    pub fn with_workers(mut self, workers: WorkerCount) -> Self {
        self.workers = workers;
        self
    }

    /// Resolve string-typed defaults from the application config.
    pub fn from_defaults(defaults: &SortDefaults) -> PixsortResult<Self> {
        let axis: Axis = defaults.axis.parse()?;
        let mode: KeyMode = defaults.key.parse()?;
        let order: SortOrder = defaults.order.parse()?;
        let workers = WorkerCount::new(defaults.workers)?;
        Ok(Self::new(axis, SortKey::new(mode, order)).with_workers(workers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_workers_rejected() {
        let err = WorkerCount::new(0).unwrap_err();
        assert!(err.is_config());
        assert_eq!(WorkerCount::new(3).unwrap().get(), 3);
    }

    #[test]
    fn test_default_is_four_workers() {
        assert_eq!(WorkerCount::default().get(), 4);
        assert_eq!(SortConfig::default().workers.get(), 4);
        assert_eq!(SortConfig::default().axis, Axis::Columns);
    }

    #[test]
    fn test_from_defaults() {
        let defaults = SortDefaults {
            axis: "y".to_string(),
            key: "channel0".to_string(),
            order: "desc".to_string(),
            workers: 2,
        };
        let config = SortConfig::from_defaults(&defaults).unwrap();
        assert_eq!(config.axis, Axis::Columns);
        assert_eq!(config.key, SortKey::descending(KeyMode::Channel0));
        assert_eq!(config.workers.get(), 2);
    }

    #[test]
    fn test_from_defaults_rejects_bad_values() {
        let mut defaults = SortDefaults::default();
        defaults.workers = 0;
        assert!(SortConfig::from_defaults(&defaults).unwrap_err().is_config());

        let mut defaults = SortDefaults::default();
        defaults.axis = "t".to_string();
        assert!(SortConfig::from_defaults(&defaults).unwrap_err().is_config());
    }

    #[test]
    fn test_worker_count_serde_rejects_zero() {
        assert!(serde_json::from_str::<WorkerCount>("0").is_err());
        let count: WorkerCount = serde_json::from_str("6").unwrap();
        assert_eq!(count.get(), 6);
    }
}
