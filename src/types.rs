use crate::constants::*;
use crate::idempotency::NaturalKey;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Already-fetched page content, keyed by source identifier and URL
#[derive(Debug, Clone)]
pub struct RawPage {
    pub source_id: String,
    pub url: String,
    pub body: String,
    pub fetched_at: DateTime<Utc>,
}

impl RawPage {
    pub fn new(source_id: impl Into<String>, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            url: url.into(),
            body: body.into(),
            fetched_at: Utc::now(),
        }
    }
}

/// Field values as lifted from one page fragment, before any normalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialRecord {
    pub name: Option<String>,
    pub description: Option<String>,
    pub provider: Option<String>,
    pub eligibility: Option<String>,
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub deadline_text: Option<String>,
    pub application_link: Option<String>,
    pub country: Option<String>,
    pub degree_level: Option<String>,
    pub subject: Option<String>,
    pub source_url: String,
    pub source_name: String,
}

impl PartialRecord {
    pub fn new(source_name: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            source_url: source_url.into(),
            ..Default::default()
        }
    }
}

/// The canonical scholarship shape that reaches the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScholarshipRecord {
    pub name: String,
    pub description: Option<String>,
    pub provider: Option<String>,
    pub eligibility: Option<String>,
    pub amount: Option<String>,
    pub currency: String,
    pub deadline: Option<NaiveDate>,
    pub application_link: Option<String>,
    pub country: String,
    pub degree_level: String,
    pub subject: String,
    pub source_url: String,
    pub source_name: String,
}

impl ScholarshipRecord {
    /// A record carrying only the required fields and vocabulary defaults
    pub fn new(name: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            provider: None,
            eligibility: None,
            amount: None,
            currency: DEFAULT_CURRENCY.to_string(),
            deadline: None,
            application_link: None,
            country: DEFAULT_COUNTRY.to_string(),
            degree_level: DEFAULT_DEGREE_LEVEL.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            source_url: String::new(),
            source_name: source_name.into(),
        }
    }

    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey::new(&self.name, self.provider.as_deref(), self.deadline)
    }

    /// Silently clip every column to its storage width.
    pub fn truncate_to_storage_limits(&mut self) {
        truncate_chars(&mut self.name, MAX_NAME_LEN);
        truncate_opt(&mut self.description, MAX_DESCRIPTION_LEN);
        truncate_opt(&mut self.provider, MAX_PROVIDER_LEN);
        truncate_opt(&mut self.eligibility, MAX_ELIGIBILITY_LEN);
        truncate_opt(&mut self.amount, MAX_AMOUNT_LEN);
        truncate_chars(&mut self.currency, MAX_CURRENCY_LEN);
        truncate_chars(&mut self.country, MAX_COUNTRY_LEN);
        truncate_chars(&mut self.degree_level, MAX_DEGREE_LEVEL_LEN);
        truncate_chars(&mut self.subject, MAX_SUBJECT_LEN);
        truncate_chars(&mut self.source_name, MAX_SOURCE_NAME_LEN);
    }
}

/// Truncate in place at a character (not byte) boundary
pub fn truncate_chars(value: &mut String, max_chars: usize) {
    if let Some((idx, _)) = value.char_indices().nth(max_chars) {
        value.truncate(idx);
    }
}

fn truncate_opt(value: &mut Option<String>, max_chars: usize) {
    if let Some(v) = value.as_mut() {
        truncate_chars(v, max_chars);
    }
}

/// Per-row outcome counts of one upsert batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub inserted: usize,
    pub updated: usize,
}

/// Run counters, owned per source and merged by the orchestrator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    pub scraped: usize,
    pub inserted: usize,
    /// Natural-key collisions that were merged into an existing row
    #[serde(rename = "duplicates")]
    pub updated: usize,
    pub errors: usize,
    pub failed_sources: usize,
}

impl RunCounters {
    pub fn merge(&mut self, other: &RunCounters) {
        self.scraped += other.scraped;
        self.inserted += other.inserted;
        self.updated += other.updated;
        self.errors += other.errors;
        self.failed_sources += other.failed_sources;
    }

    pub fn record_batch(&mut self, result: BatchResult) {
        self.inserted += result.inserted;
        self.updated += result.updated;
    }

    pub fn is_clean(&self) -> bool {
        self.errors == 0 && self.failed_sources == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Partial,
}

impl RunStatus {
    pub fn from_counters(counters: &RunCounters) -> Self {
        if counters.is_clean() {
            RunStatus::Completed
        } else {
            RunStatus::Partial
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::Partial => "partial",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub source_id: String,
    #[serde(flatten)]
    pub counters: RunCounters,
}

/// One per execution; persisted exactly once by the run logger
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub run_name: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub counters: RunCounters,
    pub sources: Vec<SourceSummary>,
}

impl RunSummary {
    pub fn start(run_name: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            run_name: run_name.into(),
            started_at: Utc::now(),
            completed_at: None,
            counters: RunCounters::default(),
            sources: Vec::new(),
        }
    }

    pub fn record_source(&mut self, source_id: &str, counters: RunCounters) {
        self.counters.merge(&counters);
        self.sources.push(SourceSummary {
            source_id: source_id.to_string(),
            counters,
        });
    }

    pub fn finish(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    pub fn status(&self) -> RunStatus {
        RunStatus::from_counters(&self.counters)
    }
}
