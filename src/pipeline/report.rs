use crate::types::{RunCounters, RunStatus, RunSummary, SourceSummary};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// JSON summary printed at the end of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub success: bool,
    pub run_id: Uuid,
    pub status: RunStatus,
    pub stats: RunStats,
    pub sources: Vec<SourceSummary>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    #[serde(flatten)]
    pub counters: RunCounters,
    pub sources_processed: usize,
}

impl RunReport {
    pub fn from_summary(summary: &RunSummary) -> Self {
        Self {
            success: true,
            run_id: summary.run_id,
            status: summary.status(),
            stats: RunStats {
                counters: summary.counters,
                sources_processed: summary.sources.len().saturating_sub(summary.counters.failed_sources),
            },
            sources: summary.sources.clone(),
            timestamp: summary.completed_at.unwrap_or_else(Utc::now),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
