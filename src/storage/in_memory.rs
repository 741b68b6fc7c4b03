use super::{RunLogEntry, ScholarshipStore, StoredScholarship};
use crate::error::{Result, ScraperError};
use crate::idempotency::NaturalKey;
use crate::types::{BatchResult, RunSummary, ScholarshipRecord};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory store for tests and dry runs.
///
/// Applies the same upsert rules as the SQLite store and can be told to fail
/// upcoming batches or the run-log write.
#[derive(Default)]
pub struct InMemoryStore {
    rows: Mutex<HashMap<String, StoredScholarship>>,
    logs: Mutex<Vec<RunLogEntry>>,
    failing_batches: AtomicUsize,
    fail_run_log: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` calls to `upsert_batch` fail without writing
    pub fn fail_next_batches(&self, n: usize) {
        self.failing_batches.store(n, Ordering::SeqCst);
    }

    pub fn fail_run_log(&self, fail: bool) {
        self.fail_run_log.store(fail, Ordering::SeqCst);
    }

    fn injected_failure(&self) -> bool {
        self.failing_batches
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

fn poisoned() -> ScraperError {
    ScraperError::Store {
        message: "in-memory store mutex poisoned".to_string(),
    }
}

impl ScholarshipStore for InMemoryStore {
    fn upsert_batch(&self, records: &[ScholarshipRecord]) -> Result<BatchResult> {
        if self.injected_failure() {
            return Err(ScraperError::Store {
                message: format!("injected failure for batch of {}", records.len()),
            });
        }

        let mut rows = self.rows.lock().map_err(|_| poisoned())?;
        // Work on a copy so a rejected record leaves the committed rows untouched
        let mut staged = rows.clone();
        let mut result = BatchResult::default();
        let now = Utc::now();

        for record in records {
            if record.name.is_empty() {
                return Err(ScraperError::Store {
                    message: "scholarship name must not be empty".to_string(),
                });
            }

            let key = record.natural_key().digest();
            match staged.get_mut(&key) {
                Some(existing) => {
                    existing.record.description = record.description.clone();
                    existing.record.eligibility = record.eligibility.clone();
                    existing.record.amount = record.amount.clone();
                    existing.record.application_link = record.application_link.clone();
                    existing.updated_at = now;
                    existing.write_count += 1;
                    result.updated += 1;
                }
                None => {
                    staged.insert(
                        key,
                        StoredScholarship {
                            record: record.clone(),
                            write_count: 1,
                            created_at: now,
                            updated_at: now,
                        },
                    );
                    result.inserted += 1;
                }
            }
        }

        *rows = staged;
        Ok(result)
    }

    fn log_run(&self, summary: &RunSummary) -> Result<()> {
        if self.fail_run_log.load(Ordering::SeqCst) {
            return Err(ScraperError::Store {
                message: "injected run log failure".to_string(),
            });
        }
        let mut logs = self.logs.lock().map_err(|_| poisoned())?;
        logs.push(RunLogEntry::from_summary(summary));
        Ok(())
    }

    fn find_by_key(&self, key: &NaturalKey) -> Result<Option<StoredScholarship>> {
        let rows = self.rows.lock().map_err(|_| poisoned())?;
        Ok(rows.get(&key.digest()).cloned())
    }

    fn count_scholarships(&self) -> Result<usize> {
        Ok(self.rows.lock().map_err(|_| poisoned())?.len())
    }

    fn run_logs(&self) -> Result<Vec<RunLogEntry>> {
        Ok(self.logs.lock().map_err(|_| poisoned())?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_classifies_insert_and_update() {
        let store = InMemoryStore::new();
        let mut record = ScholarshipRecord::new("Women in STEM Award", "test");
        record.provider = Some("STEM Trust".to_string());

        assert_eq!(store.upsert_batch(&[record.clone()]).unwrap().inserted, 1);

        record.amount = Some("$5,000".to_string());
        let result = store.upsert_batch(&[record.clone()]).unwrap();
        assert_eq!(result, BatchResult { inserted: 0, updated: 1 });

        let stored = store.find_by_key(&record.natural_key()).unwrap().unwrap();
        assert_eq!(stored.record.amount.as_deref(), Some("$5,000"));
        assert!(stored.updated_at >= stored.created_at);
    }

    #[test]
    fn test_injected_failures_are_consumed() {
        let store = InMemoryStore::new();
        store.fail_next_batches(1);
        let record = ScholarshipRecord::new("Award", "test");

        assert!(store.upsert_batch(&[record.clone()]).is_err());
        assert_eq!(store.count_scholarships().unwrap(), 0);
        assert!(store.upsert_batch(&[record]).is_ok());
        assert_eq!(store.count_scholarships().unwrap(), 1);
    }

    #[test]
    fn test_rejected_record_discards_whole_batch() {
        let store = InMemoryStore::new();
        let good = ScholarshipRecord::new("Award", "test");
        let bad = ScholarshipRecord::new("", "test");

        assert!(store.upsert_batch(&[good, bad]).is_err());
        assert_eq!(store.count_scholarships().unwrap(), 0);
    }
}
