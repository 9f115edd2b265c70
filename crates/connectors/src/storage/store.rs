//! Object storage backed by the `object_store` crate.
//!
//! Storage roots are resolved per call with [`object_store::parse_url_opts`],
//! so one client serves `s3://`, `file://` and any other scheme the crate was
//! built with. Only the root is parsed as a URL; the partition segment is
//! appended as a literal path part. Credentials and region come from `options`.

use crate::storage::{
    ObjectStorage, PurgeSummary, error::StorageError, is_expired, prefix::StoragePrefix,
};
use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use object_store::{ObjectMeta, ObjectStore, path::Path};
use std::{collections::HashMap, time::Duration};
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, Default)]
pub struct ObjectStoreStorage {
    options: HashMap<String, String>,
}

impl ObjectStoreStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend options such as `aws_region` or `aws_endpoint`.
    pub fn with_options(options: HashMap<String, String>) -> Self {
        Self { options }
    }

    /// Resolves the store for the prefix's root and the object path to list.
    fn resolve(&self, prefix: &StoragePrefix) -> Result<(Box<dyn ObjectStore>, Path), StorageError> {
        let url = Url::parse(prefix.root()).map_err(|err| StorageError::InvalidUrl {
            url: prefix.root().to_string(),
            message: err.to_string(),
        })?;
        let (store, root) = object_store::parse_url_opts(&url, self.options.iter())?;

        let path = match prefix.partition() {
            Some(segment) => root.child(segment),
            None => root,
        };
        Ok((store, path))
    }
}

#[async_trait]
impl ObjectStorage for ObjectStoreStorage {
    async fn delete_prefix(
        &self,
        prefix: &StoragePrefix,
        retention: Duration,
    ) -> Result<PurgeSummary, StorageError> {
        let (store, path) = self.resolve(prefix)?;

        let objects: Vec<ObjectMeta> = store.list(Some(&path)).try_collect().await?;
        let now = Utc::now();
        let mut summary = PurgeSummary::default();

        for meta in objects {
            if is_expired(meta.last_modified, now, retention) {
                store.delete(&meta.location).await?;
                debug!(location = %meta.location, "Deleted object");
                summary.objects_deleted += 1;
            } else {
                summary.objects_retained += 1;
            }
        }

        Ok(summary)
    }
}
