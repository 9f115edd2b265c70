use model::core::identifiers::TableRef;
use thiserror::Error;

/// Errors raised by a metadata catalog client.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database not found: {0}")]
    DatabaseNotFound(String),

    #[error("Table not found: {0}")]
    TableNotFound(TableRef),

    /// The catalog has no partition with the given value tuple.
    #[error("Partition {values:?} not found in {table}")]
    PartitionNotFound { table: TableRef, values: Vec<String> },

    /// The predicate references something the table cannot be filtered by.
    #[error("Invalid partition predicate for {table}: {message}")]
    InvalidPredicate { table: TableRef, message: String },

    /// A partition definition does not fit the table's partition keys.
    #[error("Invalid partition for {table}: {message}")]
    InvalidPartition { table: TableRef, message: String },

    /// The catalog service rejected or failed the request.
    #[error("Catalog service error: {0}")]
    Service(String),
}
