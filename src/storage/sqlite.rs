use super::{RunLogEntry, ScholarshipStore, StoredScholarship};
use crate::error::{Result, ScraperError};
use crate::idempotency::NaturalKey;
use crate::types::{BatchResult, RunSummary, ScholarshipRecord};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

const SCHEMA_SQL: &str = include_str!("../../migrations/001_create_scholarships.sql");

const UPSERT_SQL: &str = r#"
    INSERT INTO scholarships
        (natural_key, name, description, provider, eligibility, amount, currency,
         deadline, application_link, country, degree_level, subject,
         source_url, source_name, write_count, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, 1, ?15, ?15)
    ON CONFLICT(natural_key) DO UPDATE SET
        description = excluded.description,
        eligibility = excluded.eligibility,
        amount = excluded.amount,
        application_link = excluded.application_link,
        updated_at = excluded.updated_at,
        write_count = scholarships.write_count + 1
    RETURNING write_count
"#;

const SELECT_BY_KEY_SQL: &str = r#"
    SELECT name, description, provider, eligibility, amount, currency, deadline,
           application_link, country, degree_level, subject, source_url, source_name,
           write_count, created_at, updated_at
    FROM scholarships WHERE natural_key = ?1
"#;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-backed scholarship store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file and ensure the schema exists
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        info!("Opened scholarship store at {}", path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| ScraperError::Store {
            message: "connection mutex poisoned".to_string(),
        })
    }
}

struct ScholarshipRow {
    record: ScholarshipRecord,
    deadline: Option<String>,
    write_count: i64,
    created_at: String,
    updated_at: String,
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ScraperError::Store {
            message: format!("invalid timestamp '{value}': {e}"),
        })
}

impl ScholarshipStore for SqliteStore {
    fn upsert_batch(&self, records: &[ScholarshipRecord]) -> Result<BatchResult> {
        let mut conn = self.lock()?;
        // Dropping the transaction without commit rolls the whole batch back
        let tx = conn.transaction()?;
        let mut result = BatchResult::default();
        {
            let mut stmt = tx.prepare(UPSERT_SQL)?;
            let now = Utc::now().to_rfc3339();
            for record in records {
                let deadline = record.deadline.map(|d| d.format(DATE_FORMAT).to_string());
                let write_count: i64 = stmt.query_row(
                    params![
                        record.natural_key().digest(),
                        record.name,
                        record.description,
                        record.provider,
                        record.eligibility,
                        record.amount,
                        record.currency,
                        deadline,
                        record.application_link,
                        record.country,
                        record.degree_level,
                        record.subject,
                        record.source_url,
                        record.source_name,
                        now,
                    ],
                    |row| row.get(0),
                )?;
                if write_count == 1 {
                    result.inserted += 1;
                } else {
                    result.updated += 1;
                }
            }
        }
        tx.commit()?;
        debug!(
            "Committed batch of {} ({} inserted, {} updated)",
            records.len(),
            result.inserted,
            result.updated
        );
        Ok(result)
    }

    fn log_run(&self, summary: &RunSummary) -> Result<()> {
        let entry = RunLogEntry::from_summary(summary);
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO scraper_logs
                (run_id, source_name, items_scraped, items_inserted, items_duplicates,
                 items_errors, started_at, completed_at, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                entry.run_id,
                entry.source_name,
                entry.items_scraped as i64,
                entry.items_inserted as i64,
                entry.items_duplicates as i64,
                entry.items_errors as i64,
                entry.started_at.to_rfc3339(),
                entry.completed_at.to_rfc3339(),
                entry.status,
            ],
        )?;
        Ok(())
    }

    fn find_by_key(&self, key: &NaturalKey) -> Result<Option<StoredScholarship>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(SELECT_BY_KEY_SQL, params![key.digest()], |row| {
                Ok(ScholarshipRow {
                    record: ScholarshipRecord {
                        name: row.get(0)?,
                        description: row.get(1)?,
                        provider: row.get(2)?,
                        eligibility: row.get(3)?,
                        amount: row.get(4)?,
                        currency: row.get(5)?,
                        deadline: None,
                        application_link: row.get(7)?,
                        country: row.get(8)?,
                        degree_level: row.get(9)?,
                        subject: row.get(10)?,
                        source_url: row.get::<_, Option<String>>(11)?.unwrap_or_default(),
                        source_name: row.get(12)?,
                    },
                    deadline: row.get(6)?,
                    write_count: row.get(13)?,
                    created_at: row.get(14)?,
                    updated_at: row.get(15)?,
                })
            })
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut record = row.record;
        record.deadline = row
            .deadline
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok());

        Ok(Some(StoredScholarship {
            record,
            write_count: row.write_count as u32,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        }))
    }

    fn count_scholarships(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM scholarships", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn run_logs(&self) -> Result<Vec<RunLogEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT run_id, source_name, items_scraped, items_inserted, items_duplicates,
                    items_errors, started_at, completed_at, status
             FROM scraper_logs ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, String>(8)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (run_id, source_name, scraped, inserted, duplicates, errors, started, completed, status) = row?;
            entries.push(RunLogEntry {
                run_id,
                source_name,
                items_scraped: scraped as usize,
                items_inserted: inserted as usize,
                items_duplicates: duplicates as usize,
                items_errors: errors as usize,
                started_at: parse_timestamp(&started)?,
                completed_at: parse_timestamp(&completed)?,
                status,
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, provider: &str, deadline: Option<NaiveDate>) -> ScholarshipRecord {
        let mut record = ScholarshipRecord::new(name, "test");
        record.provider = Some(provider.to_string());
        record.deadline = deadline;
        record
    }

    #[test]
    fn test_second_write_is_an_update() {
        let store = SqliteStore::open_in_memory().unwrap();
        let deadline = NaiveDate::from_ymd_opt(2026, 6, 30);

        let first = store.upsert_batch(&[record("Global Excellence Scholarship", "IEF", deadline)]).unwrap();
        assert_eq!(first, BatchResult { inserted: 1, updated: 0 });

        let mut changed = record("Global Excellence Scholarship", "IEF", deadline);
        changed.description = Some("Updated description".to_string());
        changed.country = "UK".to_string();
        let second = store.upsert_batch(&[changed.clone()]).unwrap();
        assert_eq!(second, BatchResult { inserted: 0, updated: 1 });

        assert_eq!(store.count_scholarships().unwrap(), 1);
        let stored = store.find_by_key(&changed.natural_key()).unwrap().unwrap();
        assert_eq!(stored.write_count, 2);
        assert_eq!(stored.record.description.as_deref(), Some("Updated description"));
        // Only the mutable subset is overwritten on conflict
        assert_eq!(stored.record.country, "International");
        assert_eq!(stored.record.deadline, deadline);
    }

    #[test]
    fn test_duplicate_within_one_batch() {
        let store = SqliteStore::open_in_memory().unwrap();
        let r = record("Same Scholarship", "Provider", None);

        let result = store.upsert_batch(&[r.clone(), r]).unwrap();
        assert_eq!(result, BatchResult { inserted: 1, updated: 1 });
        assert_eq!(store.count_scholarships().unwrap(), 1);
    }

    #[test]
    fn test_failed_batch_rolls_back() {
        let store = SqliteStore::open_in_memory().unwrap();
        let valid = record("Valid Scholarship", "Provider", None);
        let invalid = record("", "Provider", None);

        assert!(store.upsert_batch(&[valid, invalid]).is_err());
        assert_eq!(store.count_scholarships().unwrap(), 0);
    }

    #[test]
    fn test_run_log_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut summary = RunSummary::start("unit");
        summary.counters.inserted = 3;
        summary.counters.errors = 1;
        summary.finish();

        store.log_run(&summary).unwrap();
        let logs = store.run_logs().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].items_inserted, 3);
        assert_eq!(logs[0].status, "partial");
        assert_eq!(logs[0].run_id, summary.run_id.to_string());
    }

    #[test]
    fn test_open_on_disk_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("scholarships.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.upsert_batch(&[record("Persisted Scholarship", "P", None)]).unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.count_scholarships().unwrap(), 1);
    }
}
