use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Boolean(bool),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_string(&self) -> Option<String> {
        match self {
            Value::Int(v) => Some(v.to_string()),
            Value::Uint(v) => Some(v.to_string()),
            Value::Float(v) => Some(v.to_string()),
            Value::String(v) => Some(v.clone()),
            Value::Boolean(v) => Some(v.to_string()),
            Value::Date(v) => Some(v.format("%Y-%m-%d").to_string()),
            Value::Timestamp(v) => Some(v.to_rfc3339()),
            Value::Null => None,
        }
    }

    /// Renders the value the way a catalog stores a partition value.
    ///
    /// Dates use the ISO calendar form and timestamps collapse to their UTC
    /// date, so a `file_date` column typed as either matches a string partition
    /// such as `2024-01-01`. `Null` has no partition form.
    pub fn as_partition_value(&self) -> Option<String> {
        match self {
            Value::Timestamp(v) => Some(v.date_naive().format("%Y-%m-%d").to_string()),
            other => other.as_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub name: String,
    pub value: Option<Value>,
}

impl FieldValue {
    pub fn new(name: &str, value: Value) -> Self {
        FieldValue {
            name: name.to_string(),
            value: Some(value),
        }
    }

    pub fn string(name: &str, value: &str) -> Self {
        Self::new(name, Value::String(value.to_string()))
    }
}
