use crate::storage::{error::StorageError, prefix::StoragePrefix};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::time::Duration;

pub mod error;
pub mod memory;
pub mod prefix;
pub mod store;

/// Outcome of a prefix purge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PurgeSummary {
    pub objects_deleted: usize,
    /// Objects left in place because they were modified inside the retention window.
    pub objects_retained: usize,
}

/// Client for the object storage holding partition data.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Recursively deletes every object under `prefix` last modified before
    /// `retention` ago. A zero retention deletes everything immediately.
    async fn delete_prefix(
        &self,
        prefix: &StoragePrefix,
        retention: Duration,
    ) -> Result<PurgeSummary, StorageError>;
}

/// Whether an object modified at `last_modified` falls outside the retention window.
pub fn is_expired(last_modified: DateTime<Utc>, now: DateTime<Utc>, retention: Duration) -> bool {
    if retention.is_zero() {
        return true;
    }

    TimeDelta::from_std(retention)
        .ok()
        .and_then(|window| now.checked_sub_signed(window))
        .is_some_and(|cutoff| last_modified <= cutoff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_retention_expires_everything() {
        let now = Utc::now();
        assert!(is_expired(now, now, Duration::ZERO));
        assert!(is_expired(now + TimeDelta::hours(1), now, Duration::ZERO));
    }

    #[test]
    fn test_retention_window() {
        let now = Utc::now();
        let window = Duration::from_secs(3600);

        assert!(is_expired(now - TimeDelta::hours(2), now, window));
        assert!(!is_expired(now - TimeDelta::minutes(10), now, window));
    }

    #[test]
    fn test_unrepresentable_retention_keeps_everything() {
        let now = Utc::now();
        assert!(!is_expired(now - TimeDelta::days(365), now, Duration::MAX));
    }
}
