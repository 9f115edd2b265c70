use crate::reconcile::{destination::Destination, keys::PartitionKeySet};
use connectors::storage::{PurgeSummary, prefix::StoragePrefix};
use model::core::identifiers::BatchId;
use serde::Serialize;

/// Which branch a reconcile run terminated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// The target database is not in the catalog; the batch passed through.
    DatabaseNotFound,
    /// The database exists but the table does not; the batch passed through.
    TableNotFound,
    /// The batch held no non-null partition values, so nothing was listed.
    NoPartitionKeys,
    /// Matching partitions were listed and purged (or planned, in a dry run).
    Reconciled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurgedPartition {
    pub values: Vec<String>,
    pub prefix: StoragePrefix,
    #[serde(flatten)]
    pub summary: PurgeSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub batch_id: BatchId,
    pub destination: Destination,
    pub outcome: ReconcileOutcome,
    pub partition_keys: PartitionKeySet,
    pub expression: Option<String>,
    pub purged: Vec<PurgedPartition>,
    pub dry_run: bool,
}

impl ReconcileReport {
    pub(crate) fn new(
        batch_id: BatchId,
        destination: Destination,
        partition_keys: PartitionKeySet,
        dry_run: bool,
    ) -> Self {
        Self {
            batch_id,
            destination,
            outcome: ReconcileOutcome::Reconciled,
            partition_keys,
            expression: None,
            purged: Vec::new(),
            dry_run,
        }
    }

    pub(crate) fn finish(mut self, outcome: ReconcileOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Catalog partitions removed by this run. Always zero for a dry run.
    pub fn partitions_deleted(&self) -> usize {
        if self.dry_run { 0 } else { self.purged.len() }
    }

    pub fn objects_deleted(&self) -> usize {
        self.purged.iter().map(|p| p.summary.objects_deleted).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::core::identifiers::TableRef;

    fn report(dry_run: bool) -> ReconcileReport {
        let mut report = ReconcileReport::new(
            BatchId::new("batch-7"),
            Destination {
                table: TableRef::new("db", "events"),
                storage_root: "s3://bucket/path/".to_string(),
            },
            PartitionKeySet::default(),
            dry_run,
        );
        report.purged.push(PurgedPartition {
            values: vec!["2024-01-01".to_string()],
            prefix: StoragePrefix::new("s3://bucket/path/partition_date=2024-01-01/"),
            summary: PurgeSummary {
                objects_deleted: 3,
                objects_retained: 1,
            },
        });
        report.finish(ReconcileOutcome::Reconciled)
    }

    #[test]
    fn test_counts() {
        let live = report(false);
        assert_eq!(live.partitions_deleted(), 1);
        assert_eq!(live.objects_deleted(), 3);

        let dry = report(true);
        assert_eq!(dry.partitions_deleted(), 0);
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&report(false).to_json().unwrap()).unwrap();

        assert_eq!(json["outcome"], "reconciled");
        assert_eq!(json["batch_id"], "batch-7");
        assert_eq!(json["destination"]["table"]["database"], "db");
        assert_eq!(
            json["purged"][0]["prefix"],
            "s3://bucket/path/partition_date=2024-01-01/"
        );
        assert_eq!(json["purged"][0]["objects_deleted"], 3);
    }
}
