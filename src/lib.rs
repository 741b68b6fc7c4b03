pub mod apis;
pub mod config;
pub mod constants;
pub mod error;
pub mod heuristics;
pub mod idempotency;
pub mod ingestion;
pub mod logging;
pub mod pipeline;
pub mod storage;
pub mod types;
