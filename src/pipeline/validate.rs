use crate::types::ScholarshipRecord;
use thiserror::Error;

/// A record that may not be persisted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rejected record from {source_name}: {reason}")]
pub struct ValidationRejection {
    pub source_name: String,
    pub reason: String,
}

/// The only persistence requirement is a non-empty name.
pub fn validate(record: ScholarshipRecord) -> Result<ScholarshipRecord, ValidationRejection> {
    if record.name.trim().is_empty() {
        return Err(ValidationRejection {
            source_name: record.source_name,
            reason: "missing name".to_string(),
        });
    }
    Ok(record)
}
