use crate::error::Result;
use crate::idempotency::NaturalKey;
use crate::types::{BatchResult, RunSummary, ScholarshipRecord};
use chrono::{DateTime, Utc};

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryStore;
pub use sqlite::SqliteStore;

/// A scholarship row as held by a store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredScholarship {
    pub record: ScholarshipRecord,
    pub write_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of the run log
#[derive(Debug, Clone, PartialEq)]
pub struct RunLogEntry {
    pub run_id: String,
    pub source_name: String,
    pub items_scraped: usize,
    pub items_inserted: usize,
    pub items_duplicates: usize,
    pub items_errors: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub status: String,
}

impl RunLogEntry {
    pub fn from_summary(summary: &RunSummary) -> Self {
        Self {
            run_id: summary.run_id.to_string(),
            source_name: summary.run_name.clone(),
            items_scraped: summary.counters.scraped,
            items_inserted: summary.counters.inserted,
            items_duplicates: summary.counters.updated,
            items_errors: summary.counters.errors,
            started_at: summary.started_at,
            completed_at: summary.completed_at.unwrap_or_else(Utc::now),
            status: summary.status().as_str().to_string(),
        }
    }
}

/// Persistence for scholarships and run logs.
///
/// `upsert_batch` is all-or-nothing: on error no row of the batch is kept.
pub trait ScholarshipStore: Send + Sync {
    /// Insert each record, or on a natural-key collision overwrite its
    /// description, eligibility, amount and application link and refresh
    /// `updated_at`. Reports how many rows were inserted vs updated.
    fn upsert_batch(&self, records: &[ScholarshipRecord]) -> Result<BatchResult>;

    fn log_run(&self, summary: &RunSummary) -> Result<()>;

    fn find_by_key(&self, key: &NaturalKey) -> Result<Option<StoredScholarship>>;

    fn count_scholarships(&self) -> Result<usize>;

    fn run_logs(&self) -> Result<Vec<RunLogEntry>>;
}
