use crate::error::ReconcileError;
use engine_config::settings::{DestinationPolicy, columns::TargetColumns};
use model::{
    core::identifiers::TableRef,
    records::{batch::Batch, row::RowData},
};
use serde::Serialize;
use tracing::debug;

/// Where a batch's partitions live: the catalog table and its storage root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Destination {
    pub table: TableRef,
    pub storage_root: String,
}

impl Destination {
    /// Reads the destination from the first row. Under
    /// [`DestinationPolicy::RejectMixed`] every other row must agree with it.
    pub fn from_batch(
        batch: &Batch,
        columns: &TargetColumns,
        policy: DestinationPolicy,
    ) -> Result<Self, ReconcileError> {
        let first = batch.first().ok_or_else(|| {
            ReconcileError::MissingMetadata("batch has no rows to read the destination from".into())
        })?;

        let database = required(first, &columns.database)?;
        let table = required(first, &columns.table)?;
        let storage_root = required(first, &columns.storage_path)?;

        if policy == DestinationPolicy::RejectMixed {
            let expected = [
                (&columns.database, &database),
                (&columns.table, &table),
                (&columns.storage_path, &storage_root),
            ];
            for (idx, row) in batch.rows.iter().enumerate().skip(1) {
                for (column, value) in expected {
                    let found = row.get_value(column).as_string();
                    if found.as_deref() != Some(value.as_str()) {
                        return Err(ReconcileError::HeterogeneousBatch {
                            column: column.clone(),
                            expected: value.clone(),
                            found: found.unwrap_or_else(|| "NULL".to_string()),
                            row: idx,
                        });
                    }
                }
            }
        }

        if !storage_root.ends_with('/') {
            debug!(storage_root = %storage_root, "Storage root has no trailing slash, one will be appended");
        }

        Ok(Destination {
            table: TableRef::new(database, table),
            storage_root,
        })
    }
}

fn required(row: &RowData, column: &str) -> Result<String, ReconcileError> {
    let value = row.get_value(column);
    if value.is_null() {
        return Err(ReconcileError::MissingMetadata(format!(
            "column '{column}' is absent or null in the first row"
        )));
    }

    match value.as_string() {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(ReconcileError::MissingMetadata(format!(
            "column '{column}' is empty in the first row"
        ))),
    }
}
