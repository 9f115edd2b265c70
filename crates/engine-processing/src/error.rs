use connectors::{catalog::error::CatalogError, storage::error::StorageError};
use engine_config::settings::error::SettingsError;
use model::core::identifiers::TableRef;
use thiserror::Error;

/// Fatal errors of a reconcile run. A missing database or table is not an
/// error; it is reported as a pass-through outcome.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Invalid reconcile settings: {0}")]
    Settings(#[from] SettingsError),

    /// The batch does not carry usable destination metadata.
    #[error("Missing target metadata: {0}")]
    MissingMetadata(String),

    #[error(
        "Batch names more than one destination: column '{column}' is '{found}' at row {row}, expected '{expected}'"
    )]
    HeterogeneousBatch {
        column: String,
        expected: String,
        found: String,
        row: usize,
    },

    #[error("Catalog returned a partition without values for {table}")]
    MalformedPartition { table: TableRef },

    #[error("Catalog operation '{operation}' failed for {target}: {source}")]
    Catalog {
        operation: &'static str,
        target: String,
        #[source]
        source: CatalogError,
    },

    #[error("Failed to purge storage prefix '{prefix}': {source}")]
    Storage {
        prefix: String,
        #[source]
        source: StorageError,
    },
}

impl ReconcileError {
    pub(crate) fn catalog(
        operation: &'static str,
        target: impl ToString,
    ) -> impl FnOnce(CatalogError) -> Self {
        move |source| ReconcileError::Catalog {
            operation,
            target: target.to_string(),
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Partition reconcile failed: {0}")]
    Reconcile(#[from] ReconcileError),

    #[error("Transformation failed: {0}")]
    Transformation(String),
}
