use crate::{core::identifiers::BatchId, records::row::RowData};

#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub id: BatchId,
    pub rows: Vec<RowData>,
    pub ts: chrono::DateTime<chrono::Utc>,
}

impl Batch {
    pub fn new(rows: Vec<RowData>) -> Self {
        Self::with_id(BatchId::generate(), rows)
    }

    pub fn with_id(id: impl Into<BatchId>, rows: Vec<RowData>) -> Self {
        Batch {
            id: id.into(),
            rows,
            ts: chrono::Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn first(&self) -> Option<&RowData> {
        self.rows.first()
    }
}
