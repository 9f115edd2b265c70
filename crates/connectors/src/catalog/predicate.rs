use serde::Serialize;
use std::{collections::BTreeSet, fmt};

/// Selects partitions whose value for `column` is one of `values`.
///
/// Values are kept as atomic strings and only quoted when rendered, so a value
/// containing a comma or a quote never bleeds into its neighbours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionPredicate {
    column: String,
    values: BTreeSet<String>,
}

impl PartitionPredicate {
    pub fn in_values<I, S>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Case-sensitive membership test for a single partition value.
    pub fn matches(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    /// Renders the catalog expression form, e.g. `partition_date IN ('2024-01-01','2024-01-02')`.
    pub fn to_expression(&self) -> String {
        let quoted = self
            .values
            .iter()
            .map(|v| format!("'{}'", v.replace('\'', "''")))
            .collect::<Vec<_>>()
            .join(",");
        format!("{} IN ({quoted})", self.column)
    }
}

impl fmt::Display for PartitionPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_expression())
    }
}
