//! The loaded, immutable sales table.

use std::sync::Arc;

use super::Record;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Summary stats about the rows actually kept.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub rows_read: usize,
    pub rows_used: usize,
    pub year_min: i32,
    pub year_max: i32,
    pub recession_rows: usize,
}

/// Read-only sales table shared by every recomputation.
///
/// Records live behind an `Arc<[Record]>` so clones are cheap and nothing can
/// mutate the table after load.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[Record]>,
    pub source: String,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
}

impl Dataset {
    /// Build a dataset from already-validated records.
    ///
    /// Returns `None` when `records` is empty: a table with no rows cannot be
    /// summarized and is treated as unavailable by callers.
    pub fn new(
        records: Vec<Record>,
        source: impl Into<String>,
        rows_read: usize,
        row_errors: Vec<RowError>,
    ) -> Option<Self> {
        let year_min = records.iter().map(|r| r.year).min()?;
        let year_max = records.iter().map(|r| r.year).max()?;
        let stats = DatasetStats {
            rows_read,
            rows_used: records.len(),
            year_min,
            year_max,
            recession_rows: records.iter().filter(|r| r.recession).count(),
        };
        Some(Self {
            records: records.into(),
            source: source.into(),
            stats,
            row_errors,
        })
    }

    /// Convenience constructor for in-memory tables (tests, generators).
    pub fn from_records(records: Vec<Record>, source: impl Into<String>) -> Option<Self> {
        let n = records.len();
        Self::new(records, source, n, Vec::new())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
