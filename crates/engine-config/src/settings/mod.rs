use columns::TargetColumns;
use error::SettingsError;
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use tracing::info;

pub mod columns;
pub mod error;

/// How to treat batches whose rows name more than one destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationPolicy {
    /// The batch is assumed single-destination and the first row decides.
    #[default]
    FirstRow,
    /// Every row must name the first row's destination.
    RejectMixed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileSettings {
    pub columns: TargetColumns,

    /// Catalog partition key matched against the batch's partition values.
    /// Also names the `key=value` storage directory.
    pub partition_column: String,

    /// Objects modified within this many hours survive a purge.
    pub retention_hours: u64,

    pub destination_policy: DestinationPolicy,

    /// List and report matching partitions without deleting anything.
    pub dry_run: bool,

    /// Name of the single batch emitted by the collection step.
    pub output_name: String,

    /// Fallback level for the tracing subscriber when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            columns: TargetColumns::default(),
            partition_column: "partition_date".to_string(),
            retention_hours: 0,
            destination_policy: DestinationPolicy::default(),
            dry_run: false,
            output_name: "CustomTransform0".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ReconcileSettings {
    pub fn from_json_str(source: &str) -> Result<Self, SettingsError> {
        let settings: ReconcileSettings = serde_json::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let settings = Self::from_json_str(&source)?;
        info!("Loaded reconciler settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let required = self
            .columns
            .destination()
            .into_iter()
            .map(|(setting, value)| (format!("columns.{setting}"), value))
            .chain([
                (
                    "columns.partition_value".to_string(),
                    self.columns.partition_value.as_str(),
                ),
                ("partition_column".to_string(), self.partition_column.as_str()),
                ("output_name".to_string(), self.output_name.as_str()),
            ]);

        for (setting, value) in required {
            if value.trim().is_empty() {
                return Err(SettingsError::Invalid {
                    setting,
                    message: "must not be empty".to_string(),
                });
            }
        }

        if self.partition_column.contains(['/', '=']) {
            return Err(SettingsError::Invalid {
                setting: "partition_column".to_string(),
                message: format!(
                    "'{}' cannot be used as a path segment key",
                    self.partition_column
                ),
            });
        }

        Ok(())
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_hours.saturating_mul(3600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = ReconcileSettings::default();
        assert_eq!(settings.columns.database, "tgt_db_name");
        assert_eq!(settings.columns.table, "tgt_tbl_name");
        assert_eq!(settings.columns.storage_path, "tgt_s3_path");
        assert_eq!(settings.columns.partition_value, "file_date");
        assert_eq!(settings.partition_column, "partition_date");
        assert_eq!(settings.retention(), Duration::ZERO);
        assert_eq!(settings.destination_policy, DestinationPolicy::FirstRow);
        assert_eq!(settings.output_name, "CustomTransform0");
        assert!(!settings.dry_run);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = ReconcileSettings::from_json_str(
            r#"{
                "retention_hours": 6,
                "destination_policy": "reject_mixed",
                "columns": { "partition_value": "load_date" }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.retention(), Duration::from_secs(6 * 3600));
        assert_eq!(settings.destination_policy, DestinationPolicy::RejectMixed);
        assert_eq!(settings.columns.partition_value, "load_date");
        assert_eq!(settings.columns.database, "tgt_db_name");
        assert_eq!(settings.partition_column, "partition_date");
    }

    #[test]
    fn test_rejects_empty_column() {
        let err = ReconcileSettings::from_json_str(r#"{ "columns": { "table": " " } }"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { setting, .. } if setting == "columns.table"));
    }

    #[test]
    fn test_rejects_path_like_partition_column() {
        let err = ReconcileSettings::from_json_str(r#"{ "partition_column": "a/b" }"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { .. }));
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let err = ReconcileSettings::from_json_str(r#"{ "destination_policy": "merge" }"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "dry_run": true, "output_name": "purged" }}"#).unwrap();

        let settings = ReconcileSettings::from_file(file.path()).unwrap();
        assert!(settings.dry_run);
        assert_eq!(settings.output_name, "purged");
    }

    #[test]
    fn test_from_missing_file() {
        let err = ReconcileSettings::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }
}
