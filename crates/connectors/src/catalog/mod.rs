use crate::catalog::{error::CatalogError, predicate::PartitionPredicate};
use async_trait::async_trait;
use model::core::identifiers::TableRef;
use serde::{Deserialize, Serialize};

pub mod error;
pub mod memory;
pub mod predicate;

/// A partition as reported by the catalog.
///
/// `values` follows the table's partition key order; the first entry is the
/// date partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionDescriptor {
    pub values: Vec<String>,
}

impl PartitionDescriptor {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn leading_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// Client for a metadata catalog holding database, table and partition definitions.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn database_exists(&self, database: &str) -> Result<bool, CatalogError>;

    async fn table_exists(&self, table: &TableRef) -> Result<bool, CatalogError>;

    /// Returns every partition matching the predicate. Implementations backed by
    /// a paginated service must follow continuation tokens to the end.
    async fn list_partitions(
        &self,
        table: &TableRef,
        predicate: &PartitionPredicate,
    ) -> Result<Vec<PartitionDescriptor>, CatalogError>;

    /// Deletes the partition keyed by its full ordered value tuple.
    /// Fails with [`CatalogError::PartitionNotFound`] when it does not exist.
    async fn delete_partition(&self, table: &TableRef, values: &[String])
    -> Result<(), CatalogError>;
}
