use crate::error::ReconcileError;
use connectors::catalog::predicate::PartitionPredicate;
use model::{core::value::Value, records::batch::Batch};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::warn;

/// Distinct partition values found in a batch, ordered for stable predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartitionKeySet(BTreeSet<String>);

impl PartitionKeySet {
    /// Collects the distinct values of `column`. Every row must carry the
    /// column; rows where it is null contribute nothing.
    pub fn from_batch(batch: &Batch, column: &str) -> Result<Self, ReconcileError> {
        let mut keys = BTreeSet::new();
        let mut nulls = 0usize;

        for (idx, row) in batch.rows.iter().enumerate() {
            let field = row.get(column).ok_or_else(|| {
                ReconcileError::MissingMetadata(format!(
                    "partition column '{column}' is absent from row {idx}"
                ))
            })?;

            match field.value.as_ref().and_then(Value::as_partition_value) {
                Some(key) => {
                    keys.insert(key);
                }
                None => nulls += 1,
            }
        }

        if nulls > 0 {
            warn!(column, nulls, "Ignoring rows with a null partition value");
        }

        Ok(Self(keys))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn to_predicate(&self, partition_column: &str) -> PartitionPredicate {
        PartitionPredicate::in_values(partition_column, self.0.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use model::{core::value::FieldValue, records::row::RowData};

    fn batch(values: Vec<Option<Value>>) -> Batch {
        Batch::new(
            values
                .into_iter()
                .map(|value| {
                    RowData::new(
                        "input",
                        vec![FieldValue {
                            name: "file_date".to_string(),
                            value,
                        }],
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_distinct_sorted_values() {
        let keys = PartitionKeySet::from_batch(
            &batch(vec![
                Some(Value::String("2024-01-02".into())),
                Some(Value::String("2024-01-01".into())),
                Some(Value::String("2024-01-02".into())),
            ]),
            "file_date",
        )
        .unwrap();

        assert_eq!(keys.len(), 2);
        assert_eq!(keys.iter().collect::<Vec<_>>(), vec!["2024-01-01", "2024-01-02"]);
    }

    #[test]
    fn test_dates_and_strings_merge() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let keys = PartitionKeySet::from_batch(
            &batch(vec![
                Some(Value::Date(date)),
                Some(Value::String("2024-01-01".into())),
            ]),
            "file_date",
        )
        .unwrap();

        assert_eq!(keys.iter().collect::<Vec<_>>(), vec!["2024-01-01"]);
    }

    #[test]
    fn test_nulls_are_skipped() {
        let keys = PartitionKeySet::from_batch(
            &batch(vec![None, Some(Value::Null), Some(Value::String("2024-01-01".into()))]),
            "file_date",
        )
        .unwrap();

        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn test_absent_column_fails() {
        let batch = Batch::new(vec![RowData::new("input", vec![])]);
        let err = PartitionKeySet::from_batch(&batch, "file_date").unwrap_err();
        assert!(matches!(err, ReconcileError::MissingMetadata(_)));
    }

    #[test]
    fn test_predicate_keeps_comma_values_whole() {
        let keys = PartitionKeySet::from_batch(
            &batch(vec![
                Some(Value::String("2024-01-01,2024-01-02".into())),
                Some(Value::String("2024-01-03".into())),
            ]),
            "file_date",
        )
        .unwrap();

        let predicate = keys.to_predicate("partition_date");
        assert_eq!(
            predicate.to_expression(),
            "partition_date IN ('2024-01-01,2024-01-02','2024-01-03')"
        );
        assert!(!predicate.matches("2024-01-01"));
    }
}
