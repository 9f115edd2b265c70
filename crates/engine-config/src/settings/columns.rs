use serde::{Deserialize, Serialize};

/// Names of the input columns carrying the destination and partition key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetColumns {
    pub database: String,
    pub table: String,
    pub storage_path: String,
    pub partition_value: String,
}

impl Default for TargetColumns {
    fn default() -> Self {
        Self {
            database: "tgt_db_name".to_string(),
            table: "tgt_tbl_name".to_string(),
            storage_path: "tgt_s3_path".to_string(),
            partition_value: "file_date".to_string(),
        }
    }
}

impl TargetColumns {
    /// The destination columns in the order they are read from the batch.
    pub fn destination(&self) -> [(&'static str, &str); 3] {
        [
            ("database", self.database.as_str()),
            ("table", self.table.as_str()),
            ("storage_path", self.storage_path.as_str()),
        ]
    }
}
