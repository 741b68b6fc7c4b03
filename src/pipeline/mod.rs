//! Ingestion run: fetch, extract, normalize, validate, write, log.

pub mod batch;
pub mod normalize;
pub mod report;
pub mod run_log;
pub mod validate;

pub use batch::BatchWriter;
pub use normalize::normalize;
pub use report::RunReport;
pub use validate::{validate, ValidationRejection};

use crate::apis::ExtractorRegistry;
use crate::config::{Config, SourceConfig};
use crate::constants::{DEFAULT_BATCH_SIZE, DEFAULT_RUN_NAME};
use crate::ingestion::PageSource;
use crate::storage::ScholarshipStore;
use crate::types::{RawPage, RunCounters, RunSummary};
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Result of one run: the summary plus whether it reached the run log
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub summary: RunSummary,
    pub run_logged: bool,
}

pub struct Pipeline {
    registry: ExtractorRegistry,
    pages: Arc<dyn PageSource>,
    store: Arc<dyn ScholarshipStore>,
    batch_size: usize,
    run_name: String,
}

impl Pipeline {
    pub fn new(pages: Arc<dyn PageSource>, store: Arc<dyn ScholarshipStore>) -> Self {
        Self {
            registry: ExtractorRegistry::new(),
            pages,
            store,
            batch_size: DEFAULT_BATCH_SIZE,
            run_name: DEFAULT_RUN_NAME.to_string(),
        }
    }

    pub fn from_config(config: &Config, pages: Arc<dyn PageSource>, store: Arc<dyn ScholarshipStore>) -> Self {
        Self::new(pages, store)
            .with_batch_size(config.batch_size)
            .with_run_name(&config.run_name)
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_run_name(mut self, run_name: impl Into<String>) -> Self {
        self.run_name = run_name.into();
        self
    }

    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Process every enabled source in order, then write the run log once.
    ///
    /// Nothing a single source does can abort the run: fetch failures,
    /// broken fragments, rejected records and failed batches all end up as
    /// counters on the summary.
    #[instrument(skip_all, fields(run_name = %self.run_name))]
    pub async fn run(&self, sources: &[SourceConfig]) -> PipelineOutcome {
        let mut summary = RunSummary::start(&self.run_name);
        let started = Instant::now();
        info!(run_id = %summary.run_id, "Starting run over {} sources", sources.len());
        counter!("scholarship_runs_total").increment(1);

        for source in sources.iter().filter(|s| s.enabled) {
            let counters = self.run_source(source).await;
            info!(
                source = %source.source_id,
                scraped = counters.scraped,
                inserted = counters.inserted,
                updated = counters.updated,
                errors = counters.errors,
                "Source finished"
            );
            summary.record_source(&source.source_id, counters);
        }

        summary.finish();
        let run_logged = run_log::log_run(self.store.as_ref(), &summary);

        histogram!("scholarship_run_duration_seconds").record(started.elapsed().as_secs_f64());
        info!(
            run_id = %summary.run_id,
            status = summary.status().as_str(),
            "Run finished: {} scraped, {} inserted, {} updated, {} errors",
            summary.counters.scraped,
            summary.counters.inserted,
            summary.counters.updated,
            summary.counters.errors
        );

        PipelineOutcome { summary, run_logged }
    }

    #[instrument(skip_all, fields(source = %source.source_id))]
    async fn run_source(&self, source: &SourceConfig) -> RunCounters {
        match self.pages.fetch(source).await {
            Ok(page) => self.ingest_page(&page),
            Err(e) => {
                warn!("Fetch failed, source yields no records: {}", e);
                counter!("scholarship_source_failures_total", "source" => source.source_id.clone()).increment(1);
                RunCounters {
                    failed_sources: 1,
                    ..RunCounters::default()
                }
            }
        }
    }

    /// Extract, normalize, validate and write the records of one page
    pub fn ingest_page(&self, page: &RawPage) -> RunCounters {
        let extractor = self.registry.resolve(&page.source_id, &page.url);
        debug!(
            source = %page.source_id,
            extractor = extractor.source_name(),
            fetched_at = %page.fetched_at,
            "Extracting {}",
            page.url
        );

        let extraction = extractor.extract_page(page);
        let mut counters = RunCounters {
            scraped: extraction.records.len(),
            errors: extraction.failed_fragments,
            ..RunCounters::default()
        };
        counter!("scholarship_records_scraped_total", "source" => page.source_id.clone())
            .increment(extraction.records.len() as u64);

        let mut rejected = 0;
        {
            let mut writer = BatchWriter::new(self.store.as_ref(), &mut counters, &page.source_id, self.batch_size);
            for partial in extraction.records {
                match validate(normalize(partial)) {
                    Ok(record) => writer.add(record),
                    Err(rejection) => {
                        warn!("{}", rejection);
                        rejected += 1;
                    }
                }
            }
            writer.finish();
        }

        if rejected > 0 {
            counter!("scholarship_validation_rejections_total", "source" => page.source_id.clone())
                .increment(rejected as u64);
        }
        counters.errors += rejected;
        counters
    }
}
