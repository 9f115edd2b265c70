//! Deletes catalog partitions, and the storage data behind them, for the
//! partition values present in a batch, then hands the batch on unchanged.

use crate::error::ReconcileError;
use connectors::{
    catalog::Catalog,
    storage::{ObjectStorage, prefix::StoragePrefix},
};
use destination::Destination;
use engine_config::settings::ReconcileSettings;
use keys::PartitionKeySet;
use model::records::{batch::Batch, collection::BatchCollection};
use report::{PurgedPartition, ReconcileOutcome, ReconcileReport};
use std::sync::Arc;
use tracing::{debug, info};

pub mod destination;
pub mod keys;
pub mod report;

pub struct PartitionReconciler {
    catalog: Arc<dyn Catalog>,
    storage: Arc<dyn ObjectStorage>,
    settings: ReconcileSettings,
}

impl PartitionReconciler {
    /// Validates `settings` before wiring the collaborators, so settings
    /// built in code get the same checks as settings loaded from JSON.
    pub fn new(
        catalog: Arc<dyn Catalog>,
        storage: Arc<dyn ObjectStorage>,
        settings: ReconcileSettings,
    ) -> Result<Self, ReconcileError> {
        settings.validate()?;
        Ok(Self {
            catalog,
            storage,
            settings,
        })
    }

    /// Reconciles the batch's partitions and returns the batch untouched.
    pub async fn reconcile(&self, batch: Batch) -> Result<Batch, ReconcileError> {
        let report = self.reconcile_with_report(&batch).await?;
        debug!(batch_id = %report.batch_id, outcome = ?report.outcome, "Passing batch through");
        Ok(batch)
    }

    /// Runs the reconcile and describes what it did.
    ///
    /// The first failing catalog or storage call aborts the run. Partitions
    /// deleted before the failure stay deleted.
    pub async fn reconcile_with_report(
        &self,
        batch: &Batch,
    ) -> Result<ReconcileReport, ReconcileError> {
        let destination = Destination::from_batch(
            batch,
            &self.settings.columns,
            self.settings.destination_policy,
        )?;
        let keys = PartitionKeySet::from_batch(batch, &self.settings.columns.partition_value)?;
        let table = destination.table.clone();
        let mut report = ReconcileReport::new(
            batch.id.clone(),
            destination,
            keys,
            self.settings.dry_run,
        );

        let database_exists = self
            .catalog
            .database_exists(&table.database)
            .await
            .map_err(ReconcileError::catalog("database_exists", &table.database))?;
        if !database_exists {
            info!(database = %table.database, "Database does not exist, skipping partition deletion");
            return Ok(report.finish(ReconcileOutcome::DatabaseNotFound));
        }

        let table_exists = self
            .catalog
            .table_exists(&table)
            .await
            .map_err(ReconcileError::catalog("table_exists", &table))?;
        if !table_exists {
            info!(table = %table, "Table does not exist in database, skipping partition deletion");
            return Ok(report.finish(ReconcileOutcome::TableNotFound));
        }

        if report.partition_keys.is_empty() {
            info!(table = %table, "Batch has no partition values, nothing to delete");
            return Ok(report.finish(ReconcileOutcome::NoPartitionKeys));
        }

        let predicate = report
            .partition_keys
            .to_predicate(&self.settings.partition_column);
        report.expression = Some(predicate.to_expression());

        let partitions = self
            .catalog
            .list_partitions(&table, &predicate)
            .await
            .map_err(ReconcileError::catalog("list_partitions", &table))?;
        info!(
            table = %table,
            expression = %predicate,
            keys = report.partition_keys.len(),
            matched = partitions.len(),
            "Matched partitions for deletion"
        );

        let retention = self.settings.retention();
        for partition in partitions {
            let date = partition
                .leading_value()
                .ok_or_else(|| ReconcileError::MalformedPartition {
                    table: table.clone(),
                })?;
            let prefix = StoragePrefix::for_partition(
                &report.destination.storage_root,
                &self.settings.partition_column,
                date,
            );

            if self.settings.dry_run {
                info!(table = %table, values = ?partition.values, prefix = %prefix, "Dry run, partition would be purged");
                report.purged.push(PurgedPartition {
                    values: partition.values,
                    prefix,
                    summary: Default::default(),
                });
                continue;
            }

            self.catalog
                .delete_partition(&table, &partition.values)
                .await
                .map_err(ReconcileError::catalog("delete_partition", &table))?;

            let summary = self
                .storage
                .delete_prefix(&prefix, retention)
                .await
                .map_err(|source| ReconcileError::Storage {
                    prefix: prefix.to_string(),
                    source,
                })?;

            info!(
                table = %table,
                prefix = %prefix,
                deleted = summary.objects_deleted,
                retained = summary.objects_retained,
                "Purged partition"
            );
            report.purged.push(PurgedPartition {
                values: partition.values,
                prefix,
                summary,
            });
        }

        Ok(report.finish(ReconcileOutcome::Reconciled))
    }

    /// Reconciles the first batch of `input` and emits it alone under the
    /// configured output name.
    pub async fn transform_collection(
        &self,
        mut input: BatchCollection,
    ) -> Result<BatchCollection, ReconcileError> {
        let (name, batch) = input.take_first().ok_or_else(|| {
            ReconcileError::MissingMetadata("input collection holds no batch".into())
        })?;
        if !input.is_empty() {
            debug!(selected = %name, ignored = input.len(), "Only the first batch is reconciled");
        }

        let batch = self.reconcile(batch).await?;
        Ok(BatchCollection::single(
            self.settings.output_name.clone(),
            batch,
        ))
    }
}
