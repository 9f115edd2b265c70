use crate::catalog::{
    Catalog, PartitionDescriptor, error::CatalogError, predicate::PartitionPredicate,
};
use async_trait::async_trait;
use model::core::identifiers::TableRef;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, Default)]
struct MemoryTable {
    partition_keys: Vec<String>,
    partitions: Vec<Vec<String>>,
}

/// In-process catalog used as a stand-in for the managed catalog service.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    databases: RwLock<BTreeMap<String, BTreeMap<String, MemoryTable>>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create_database(&self, database: &str) {
        self.databases
            .write()
            .await
            .entry(database.to_string())
            .or_default();
    }

    pub async fn create_table(
        &self,
        table: &TableRef,
        partition_keys: Vec<String>,
    ) -> Result<(), CatalogError> {
        let mut databases = self.databases.write().await;
        let tables = databases
            .get_mut(&table.database)
            .ok_or_else(|| CatalogError::DatabaseNotFound(table.database.clone()))?;

        tables.insert(
            table.table.clone(),
            MemoryTable {
                partition_keys,
                partitions: Vec::new(),
            },
        );
        Ok(())
    }

    pub async fn add_partition<I, S>(&self, table: &TableRef, values: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        let mut databases = self.databases.write().await;
        let entry = Self::table_mut(&mut databases, table)?;

        if values.len() != entry.partition_keys.len() {
            return Err(CatalogError::InvalidPartition {
                table: table.clone(),
                message: format!(
                    "expected {} values for keys {:?}, got {}",
                    entry.partition_keys.len(),
                    entry.partition_keys,
                    values.len()
                ),
            });
        }

        if !entry.partitions.contains(&values) {
            entry.partitions.push(values);
        }
        Ok(())
    }

    /// All partitions of a table in insertion order.
    pub async fn partitions(&self, table: &TableRef) -> Result<Vec<PartitionDescriptor>, CatalogError> {
        let databases = self.databases.read().await;
        let entry = databases
            .get(&table.database)
            .and_then(|tables| tables.get(&table.table))
            .ok_or_else(|| CatalogError::TableNotFound(table.clone()))?;

        Ok(entry
            .partitions
            .iter()
            .map(|values| PartitionDescriptor::new(values.clone()))
            .collect())
    }

    fn table_mut<'a>(
        databases: &'a mut BTreeMap<String, BTreeMap<String, MemoryTable>>,
        table: &TableRef,
    ) -> Result<&'a mut MemoryTable, CatalogError> {
        databases
            .get_mut(&table.database)
            .and_then(|tables| tables.get_mut(&table.table))
            .ok_or_else(|| CatalogError::TableNotFound(table.clone()))
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn database_exists(&self, database: &str) -> Result<bool, CatalogError> {
        Ok(self.databases.read().await.contains_key(database))
    }

    async fn table_exists(&self, table: &TableRef) -> Result<bool, CatalogError> {
        let databases = self.databases.read().await;
        Ok(databases
            .get(&table.database)
            .is_some_and(|tables| tables.contains_key(&table.table)))
    }

    async fn list_partitions(
        &self,
        table: &TableRef,
        predicate: &PartitionPredicate,
    ) -> Result<Vec<PartitionDescriptor>, CatalogError> {
        let databases = self.databases.read().await;
        let entry = databases
            .get(&table.database)
            .and_then(|tables| tables.get(&table.table))
            .ok_or_else(|| CatalogError::TableNotFound(table.clone()))?;

        let index = entry
            .partition_keys
            .iter()
            .position(|key| key == predicate.column())
            .ok_or_else(|| CatalogError::InvalidPredicate {
                table: table.clone(),
                message: format!("'{}' is not a partition key", predicate.column()),
            })?;

        let matched: Vec<PartitionDescriptor> = entry
            .partitions
            .iter()
            .filter(|values| values.get(index).is_some_and(|v| predicate.matches(v)))
            .map(|values| PartitionDescriptor::new(values.clone()))
            .collect();

        debug!(table = %table, expression = %predicate, matched = matched.len(), "Listed partitions");
        Ok(matched)
    }

    async fn delete_partition(
        &self,
        table: &TableRef,
        values: &[String],
    ) -> Result<(), CatalogError> {
        let mut databases = self.databases.write().await;
        let entry = Self::table_mut(&mut databases, table)?;

        let position = entry
            .partitions
            .iter()
            .position(|existing| existing.as_slice() == values)
            .ok_or_else(|| CatalogError::PartitionNotFound {
                table: table.clone(),
                values: values.to_vec(),
            })?;

        entry.partitions.remove(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (MemoryCatalog, TableRef) {
        let catalog = MemoryCatalog::new();
        let table = TableRef::new("analytics", "events");
        catalog.create_database("analytics").await;
        catalog
            .create_table(&table, vec!["partition_date".into(), "region".into()])
            .await
            .unwrap();
        catalog.add_partition(&table, ["2024-01-01", "eu"]).await.unwrap();
        catalog.add_partition(&table, ["2024-01-01", "us"]).await.unwrap();
        catalog.add_partition(&table, ["2024-01-02", "eu"]).await.unwrap();
        (catalog, table)
    }

    #[tokio::test]
    async fn test_existence_checks() {
        let (catalog, table) = seeded().await;

        assert!(catalog.database_exists("analytics").await.unwrap());
        assert!(!catalog.database_exists("missing").await.unwrap());
        assert!(catalog.table_exists(&table).await.unwrap());
        assert!(
            !catalog
                .table_exists(&TableRef::new("analytics", "other"))
                .await
                .unwrap()
        );
        assert!(
            !catalog
                .table_exists(&TableRef::new("missing", "events"))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_list_filters_on_predicate_column() {
        let (catalog, table) = seeded().await;

        let predicate = PartitionPredicate::in_values("partition_date", ["2024-01-01"]);
        let partitions = catalog.list_partitions(&table, &predicate).await.unwrap();
        assert_eq!(partitions.len(), 2);
        assert!(partitions.iter().all(|p| p.leading_value() == Some("2024-01-01")));

        let predicate = PartitionPredicate::in_values("region", ["eu"]);
        let partitions = catalog.list_partitions(&table, &predicate).await.unwrap();
        assert_eq!(partitions.len(), 2);
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_column() {
        let (catalog, table) = seeded().await;

        let predicate = PartitionPredicate::in_values("file_date", ["2024-01-01"]);
        let err = catalog.list_partitions(&table, &predicate).await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPredicate { .. }));
    }

    #[tokio::test]
    async fn test_delete_partition_by_full_tuple() {
        let (catalog, table) = seeded().await;

        catalog
            .delete_partition(&table, &["2024-01-01".to_string(), "us".to_string()])
            .await
            .unwrap();

        let remaining = catalog.partitions(&table).await.unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(!remaining.contains(&PartitionDescriptor::new(["2024-01-01", "us"])));

        let err = catalog
            .delete_partition(&table, &["2024-01-01".to_string(), "us".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::PartitionNotFound { .. }));
    }

    #[tokio::test]
    async fn test_add_partition_checks_arity() {
        let (catalog, table) = seeded().await;

        let err = catalog.add_partition(&table, ["2024-01-03"]).await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPartition { .. }));
    }

    #[tokio::test]
    async fn test_create_table_requires_database() {
        let catalog = MemoryCatalog::new();
        let err = catalog
            .create_table(&TableRef::new("nope", "t"), vec!["partition_date".into()])
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::DatabaseNotFound(db) if db == "nope"));
    }
}
