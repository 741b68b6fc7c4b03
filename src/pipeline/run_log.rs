use crate::storage::ScholarshipStore;
use crate::types::RunSummary;
use tracing::{error, info};

/// Persist the run summary. Returns whether the write succeeded; a failure is
/// logged and leaves the summary untouched.
pub fn log_run(store: &dyn ScholarshipStore, summary: &RunSummary) -> bool {
    match store.log_run(summary) {
        Ok(()) => {
            info!(run_id = %summary.run_id, status = summary.status().as_str(), "Run log written");
            true
        }
        Err(e) => {
            error!(run_id = %summary.run_id, "Failed to write run log: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;

    #[test]
    fn test_failure_is_swallowed() {
        let store = InMemoryStore::new();
        store.fail_run_log(true);
        let mut summary = RunSummary::start("test");
        summary.finish();

        assert!(!log_run(&store, &summary));
        assert!(store.run_logs().unwrap().is_empty());
    }

    #[test]
    fn test_success_writes_one_row() {
        let store = InMemoryStore::new();
        let mut summary = RunSummary::start("test");
        summary.finish();

        assert!(log_run(&store, &summary));
        assert_eq!(store.run_logs().unwrap().len(), 1);
    }
}
