use crate::{error::TransformError, reconcile::PartitionReconciler};
use async_trait::async_trait;
use model::records::batch::Batch;
use std::sync::Arc;
use tracing::debug;

/// A pipeline step that receives a whole batch and hands one on.
#[async_trait]
pub trait BatchTransform: Send + Sync {
    fn name(&self) -> &str;

    async fn apply(&self, batch: Batch) -> Result<Batch, TransformError>;
}

pub trait TransformPipelineExt {
    fn add_if<T, F>(self, condition: bool, factory: F) -> Self
    where
        T: BatchTransform + 'static,
        F: FnOnce() -> T;
}

#[derive(Clone)]
pub struct BatchPipeline {
    transforms: Vec<Arc<dyn BatchTransform>>,
}

impl BatchPipeline {
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Runs every step in order; the first failure stops the pipeline.
    pub async fn apply(&self, batch: Batch) -> Result<Batch, TransformError> {
        let mut batch = batch;
        for transform in &self.transforms {
            debug!(transform = transform.name(), rows = batch.len(), "Applying transform");
            batch = transform.apply(batch).await?;
        }
        Ok(batch)
    }

    pub fn add_transform<T: BatchTransform + 'static>(mut self, transform: T) -> Self {
        self.transforms.push(Arc::new(transform));
        self
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl TransformPipelineExt for BatchPipeline {
    fn add_if<T, F>(mut self, condition: bool, factory: F) -> Self
    where
        T: BatchTransform + 'static,
        F: FnOnce() -> T,
    {
        if condition {
            self = self.add_transform(factory());
        }
        self
    }
}

impl Default for BatchPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BatchTransform for PartitionReconciler {
    fn name(&self) -> &str {
        "partition_reconciler"
    }

    async fn apply(&self, batch: Batch) -> Result<Batch, TransformError> {
        Ok(self.reconcile(batch).await?)
    }
}
