use async_trait::async_trait;
use connectors::{
    catalog::{
        Catalog, PartitionDescriptor, error::CatalogError, memory::MemoryCatalog,
        predicate::PartitionPredicate,
    },
    storage::{
        ObjectStorage, PurgeSummary, error::StorageError, memory::MemoryStorage,
        prefix::StoragePrefix,
    },
};
use engine_config::settings::ReconcileSettings;
use engine_processing::reconcile::PartitionReconciler;
use model::{
    core::{identifiers::TableRef, value::FieldValue},
    records::{batch::Batch, row::RowData},
};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

pub const DATABASE: &str = "analytics";
pub const TABLE: &str = "events";
pub const STORAGE_ROOT: &str = "s3://bucket/path/";

/// A collaborator call as observed by the recording doubles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    DatabaseExists(String),
    TableExists(TableRef),
    ListPartitions(TableRef, String),
    DeletePartition(TableRef, Vec<String>),
    DeletePrefix(String, Duration),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(self, Call::DeletePartition(..) | Call::DeletePrefix(..))
    }
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

fn record(log: &CallLog, call: Call) {
    log.lock().expect("call log poisoned").push(call);
}

/// Catalog double that logs every call before delegating to a [`MemoryCatalog`].
pub struct RecordingCatalog {
    pub inner: Arc<MemoryCatalog>,
    log: CallLog,
    fail_delete_after: Option<usize>,
    malformed_listing: bool,
}

impl RecordingCatalog {
    pub fn new(inner: Arc<MemoryCatalog>, log: CallLog) -> Self {
        Self {
            inner,
            log,
            fail_delete_after: None,
            malformed_listing: false,
        }
    }

    /// Makes `list_partitions` answer with a single partition that has no values.
    pub fn listing_malformed_partition(mut self) -> Self {
        self.malformed_listing = true;
        self
    }

    /// Makes `delete_partition` fail once `n` deletions have succeeded.
    pub fn failing_delete_after(mut self, n: usize) -> Self {
        self.fail_delete_after = Some(n);
        self
    }

    fn deletions(&self) -> usize {
        self.log
            .lock()
            .expect("call log poisoned")
            .iter()
            .filter(|c| matches!(c, Call::DeletePartition(..)))
            .count()
    }
}

#[async_trait]
impl Catalog for RecordingCatalog {
    async fn database_exists(&self, database: &str) -> Result<bool, CatalogError> {
        record(&self.log, Call::DatabaseExists(database.to_string()));
        self.inner.database_exists(database).await
    }

    async fn table_exists(&self, table: &TableRef) -> Result<bool, CatalogError> {
        record(&self.log, Call::TableExists(table.clone()));
        self.inner.table_exists(table).await
    }

    async fn list_partitions(
        &self,
        table: &TableRef,
        predicate: &PartitionPredicate,
    ) -> Result<Vec<PartitionDescriptor>, CatalogError> {
        record(
            &self.log,
            Call::ListPartitions(table.clone(), predicate.to_expression()),
        );
        if self.malformed_listing {
            return Ok(vec![PartitionDescriptor::new(Vec::<String>::new())]);
        }
        self.inner.list_partitions(table, predicate).await
    }

    async fn delete_partition(
        &self,
        table: &TableRef,
        values: &[String],
    ) -> Result<(), CatalogError> {
        if let Some(limit) = self.fail_delete_after {
            if self.deletions() >= limit {
                return Err(CatalogError::Service("throttled".to_string()));
            }
        }
        record(
            &self.log,
            Call::DeletePartition(table.clone(), values.to_vec()),
        );
        self.inner.delete_partition(table, values).await
    }
}

/// Storage double that logs every call before delegating to a [`MemoryStorage`].
pub struct RecordingStorage {
    pub inner: Arc<MemoryStorage>,
    log: CallLog,
    fail: bool,
}

impl RecordingStorage {
    pub fn new(inner: Arc<MemoryStorage>, log: CallLog) -> Self {
        Self {
            inner,
            log,
            fail: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl ObjectStorage for RecordingStorage {
    async fn delete_prefix(
        &self,
        prefix: &StoragePrefix,
        retention: Duration,
    ) -> Result<PurgeSummary, StorageError> {
        record(
            &self.log,
            Call::DeletePrefix(prefix.to_string(), retention),
        );
        if self.fail {
            return Err(StorageError::Service("access denied".to_string()));
        }
        self.inner.delete_prefix(prefix, retention).await
    }
}

/// Catalog and storage seeded with one partition (and one object) per date.
pub struct Harness {
    pub catalog: Arc<MemoryCatalog>,
    pub storage: Arc<MemoryStorage>,
    pub log: CallLog,
}

impl Harness {
    pub async fn seeded(dates: &[&str]) -> Self {
        let catalog = Arc::new(MemoryCatalog::new());
        let storage = Arc::new(MemoryStorage::new());
        let table = target_table();

        catalog.create_database(DATABASE).await;
        catalog
            .create_table(&table, vec!["partition_date".to_string()])
            .await
            .expect("create table");
        for date in dates {
            catalog
                .add_partition(&table, [*date])
                .await
                .expect("add partition");
            storage
                .put(format!("{STORAGE_ROOT}partition_date={date}/part-00000.parquet"))
                .await;
        }

        Self {
            catalog,
            storage,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn reconciler(&self, settings: ReconcileSettings) -> PartitionReconciler {
        PartitionReconciler::new(
            Arc::new(RecordingCatalog::new(self.catalog.clone(), self.log.clone())),
            Arc::new(RecordingStorage::new(self.storage.clone(), self.log.clone())),
            settings,
        )
        .expect("valid settings")
    }

    pub fn with_collaborators(
        &self,
        catalog: RecordingCatalog,
        storage: RecordingStorage,
    ) -> PartitionReconciler {
        PartitionReconciler::new(
            Arc::new(catalog),
            Arc::new(storage),
            ReconcileSettings::default(),
        )
        .expect("valid settings")
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.lock().expect("call log poisoned").clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn clear(&self) {
        self.log.lock().expect("call log poisoned").clear();
    }

    pub async fn remaining_dates(&self) -> Vec<String> {
        self.catalog
            .partitions(&target_table())
            .await
            .expect("list partitions")
            .into_iter()
            .filter_map(|p| p.leading_value().map(str::to_string))
            .collect()
    }
}

pub fn target_table() -> TableRef {
    TableRef::new(DATABASE, TABLE)
}

pub fn input_row(database: &str, table: &str, root: &str, file_date: &str) -> RowData {
    RowData::new(
        "source",
        vec![
            FieldValue::string("id", "1"),
            FieldValue::string("tgt_db_name", database),
            FieldValue::string("tgt_tbl_name", table),
            FieldValue::string("tgt_s3_path", root),
            FieldValue::string("file_date", file_date),
        ],
    )
}

/// A single-destination batch with one row per date.
pub fn input_batch(database: &str, dates: &[&str]) -> Batch {
    Batch::new(
        dates
            .iter()
            .map(|date| input_row(database, TABLE, STORAGE_ROOT, date))
            .collect(),
    )
}
