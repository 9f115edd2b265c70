use crate::storage::{
    ObjectStorage, PurgeSummary, error::StorageError, is_expired, prefix::StoragePrefix,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{collections::BTreeMap, time::Duration};
use tokio::sync::RwLock;

/// In-process object storage keyed by full object URL.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    objects: RwLock<BTreeMap<String, DateTime<Utc>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, key: impl Into<String>) {
        self.put_modified_at(key, Utc::now()).await;
    }

    pub async fn put_modified_at(&self, key: impl Into<String>, modified: DateTime<Utc>) {
        self.objects.write().await.insert(key.into(), modified);
    }

    pub async fn keys(&self) -> Vec<String> {
        self.objects.read().await.keys().cloned().collect()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.objects.read().await.contains_key(key)
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn delete_prefix(
        &self,
        prefix: &StoragePrefix,
        retention: Duration,
    ) -> Result<PurgeSummary, StorageError> {
        let now = Utc::now();
        let mut summary = PurgeSummary::default();

        self.objects.write().await.retain(|key, modified| {
            if !prefix.contains(key) {
                return true;
            }
            if is_expired(*modified, now, retention) {
                summary.objects_deleted += 1;
                false
            } else {
                summary.objects_retained += 1;
                true
            }
        });

        Ok(summary)
    }
}
