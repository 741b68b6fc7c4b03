use crate::storage::ScholarshipStore;
use crate::types::{RunCounters, ScholarshipRecord};
use metrics::{counter, histogram};
use std::time::Instant;
use tracing::{debug, error};

/// Buffers validated records for one source and writes them in batches.
///
/// Whatever is still buffered when the writer goes out of scope is written
/// on drop, so an early return from the source loop loses nothing.
pub struct BatchWriter<'a> {
    store: &'a dyn ScholarshipStore,
    counters: &'a mut RunCounters,
    source_id: String,
    batch_size: usize,
    buffer: Vec<ScholarshipRecord>,
}

impl<'a> BatchWriter<'a> {
    pub fn new(
        store: &'a dyn ScholarshipStore,
        counters: &'a mut RunCounters,
        source_id: impl Into<String>,
        batch_size: usize,
    ) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            store,
            counters,
            source_id: source_id.into(),
            batch_size,
            buffer: Vec::with_capacity(batch_size),
        }
    }

    /// Buffer a record, writing the batch once it is full
    pub fn add(&mut self, mut record: ScholarshipRecord) {
        record.truncate_to_storage_limits();
        self.buffer.push(record);
        if self.should_flush() {
            self.flush();
        }
    }

    pub fn should_flush(&self) -> bool {
        self.buffer.len() >= self.batch_size
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Write the buffered records as one batch. A failed batch is counted
    /// record by record as errors and then discarded.
    pub fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.buffer);
        let started = Instant::now();

        match self.store.upsert_batch(&batch) {
            Ok(result) => {
                debug!(
                    source = %self.source_id,
                    "Wrote batch of {}: {} inserted, {} updated",
                    batch.len(),
                    result.inserted,
                    result.updated
                );
                counter!("scholarship_records_inserted_total", "source" => self.source_id.clone())
                    .increment(result.inserted as u64);
                counter!("scholarship_records_updated_total", "source" => self.source_id.clone())
                    .increment(result.updated as u64);
                self.counters.record_batch(result);
            }
            Err(e) => {
                error!(source = %self.source_id, "Batch of {} failed and was rolled back: {}", batch.len(), e);
                counter!("scholarship_batch_failures_total", "source" => self.source_id.clone()).increment(1);
                self.counters.errors += batch.len();
            }
        }

        histogram!("scholarship_batch_write_duration_seconds", "source" => self.source_id.clone())
            .record(started.elapsed().as_secs_f64());
    }

    /// Write the remainder and release the counters
    pub fn finish(mut self) {
        self.flush();
    }
}

impl Drop for BatchWriter<'_> {
    fn drop(&mut self) {
        self.flush();
    }
}
