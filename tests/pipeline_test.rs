use anyhow::Result;
use chrono::NaiveDate;
use scholarship_scraper::apis::blog_listing::BlogListingExtractor;
use scholarship_scraper::apis::ExtractorRegistry;
use scholarship_scraper::config::SourceConfig;
use scholarship_scraper::constants::{FASTWEB, INTERNATIONAL_SCHOLARSHIPS, SCHOLARSHIPS_COM};
use scholarship_scraper::idempotency::NaturalKey;
use scholarship_scraper::ingestion::{DirectoryPageSource, HttpPageSource, StaticPageSource};
use scholarship_scraper::pipeline::{Pipeline, RunReport};
use scholarship_scraper::storage::{InMemoryStore, ScholarshipStore, SqliteStore};
use scholarship_scraper::types::RunStatus;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

const INTERNATIONAL_URL: &str = "https://www.internationalscholarships.com/";

const GLOBAL_EXCELLENCE: &str = r#"
    <html><body>
      <div class="scholarship-entry">
        <h2>Global Excellence Scholarship</h2>
        <span class="institution">IEF</span>
        <span class="funding">$20,000</span>
        <span class="deadline">2026-06-30</span>
        <div class="excerpt">Awarded to outstanding international students.</div>
      </div>
      <div class="scholarship-entry">
        <span class="institution">Anonymous Trust</span>
        <div class="excerpt">An entry whose title failed to render.</div>
      </div>
    </body></html>
"#;

const FASTWEB_PAGE: &str = r#"
    <div class="scholarship-card"><h3>Women in STEM Award</h3><span class="provider-name">STEM Trust</span></div>
    <div class="scholarship-card"><h3>First Generation Grant</h3><span class="provider-name">Access Fund</span></div>
"#;

fn international_source() -> SourceConfig {
    SourceConfig::new(INTERNATIONAL_SCHOLARSHIPS, INTERNATIONAL_URL)
}

fn global_excellence_key() -> NaturalKey {
    NaturalKey::new("Global Excellence Scholarship", Some("IEF"), NaiveDate::from_ymd_opt(2026, 6, 30))
}

#[tokio::test]
async fn test_end_to_end_from_saved_pages() -> Result<()> {
    let dir = tempdir()?;
    let pages_dir = dir.path().join("pages");
    std::fs::create_dir_all(&pages_dir)?;
    std::fs::write(pages_dir.join("internationalscholarships.com.html"), GLOBAL_EXCELLENCE)?;

    let store = Arc::new(SqliteStore::open(dir.path().join("scholarships.db"))?);
    let pipeline = Pipeline::new(Arc::new(DirectoryPageSource::new(&pages_dir)), store.clone());

    let outcome = pipeline.run(&[international_source()]).await;
    let counters = outcome.summary.counters;

    assert_eq!(counters.scraped, 2);
    assert_eq!(counters.inserted, 1);
    assert_eq!(counters.updated, 0);
    assert_eq!(counters.errors, 1);
    assert_eq!(outcome.summary.status(), RunStatus::Partial);
    assert!(outcome.run_logged);

    assert_eq!(store.count_scholarships()?, 1);
    let stored = store.find_by_key(&global_excellence_key())?.expect("row for natural key");
    assert_eq!(stored.record.amount.as_deref(), Some("$20,000"));
    assert_eq!(stored.record.source_name, INTERNATIONAL_SCHOLARSHIPS);

    let logs = store.run_logs()?;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].items_inserted, 1);
    assert_eq!(logs[0].items_errors, 1);
    assert_eq!(logs[0].status, "partial");
    Ok(())
}

#[tokio::test]
async fn test_second_identical_run_only_updates() -> Result<()> {
    let dir = tempdir()?;
    let store = Arc::new(SqliteStore::open(dir.path().join("scholarships.db"))?);
    let pages = Arc::new(StaticPageSource::new().with_page(INTERNATIONAL_SCHOLARSHIPS, GLOBAL_EXCELLENCE));
    let pipeline = Pipeline::new(pages, store.clone());
    let sources = [international_source()];

    let first = pipeline.run(&sources).await.summary;
    let first_row = store.find_by_key(&global_excellence_key())?.expect("row after first run");

    let second = pipeline.run(&sources).await.summary;
    assert_eq!(second.counters.inserted, 0);
    assert_eq!(second.counters.updated, 1);
    assert_eq!(store.count_scholarships()?, 1);
    assert_ne!(first.run_id, second.run_id);

    let second_row = store.find_by_key(&global_excellence_key())?.expect("row after second run");
    assert_eq!(second_row.write_count, 2);
    assert_eq!(second_row.created_at, first_row.created_at);
    assert!(second_row.updated_at >= first_row.updated_at);

    assert_eq!(store.run_logs()?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_fetch_failure_marks_run_partial() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    // Only the fastweb page is available
    let pages = Arc::new(StaticPageSource::new().with_page(FASTWEB, FASTWEB_PAGE));
    let pipeline = Pipeline::new(pages, store.clone());

    let outcome = pipeline
        .run(&[
            international_source(),
            SourceConfig::new(FASTWEB, "https://www.fastweb.com/college-scholarships"),
        ])
        .await;
    let summary = outcome.summary;

    assert_eq!(summary.counters.failed_sources, 1);
    assert_eq!(summary.counters.inserted, 2);
    assert_eq!(summary.counters.errors, 0);
    assert_eq!(summary.status(), RunStatus::Partial);
    assert_eq!(summary.sources.len(), 2);
    assert_eq!(summary.sources[0].counters.failed_sources, 1);
    assert_eq!(store.count_scholarships()?, 2);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_host_is_a_failed_source() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let pages = Arc::new(HttpPageSource::new(Duration::from_secs(2), "test-agent")?);
    let pipeline = Pipeline::new(pages, store.clone());

    let outcome = pipeline
        .run(&[SourceConfig::new(SCHOLARSHIPS_COM, "http://127.0.0.1:1/listing")])
        .await;

    assert_eq!(outcome.summary.counters.failed_sources, 1);
    assert_eq!(outcome.summary.counters.scraped, 0);
    assert_eq!(store.count_scholarships()?, 0);
    assert_eq!(store.run_logs()?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_failed_batch_is_contained() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    store.fail_next_batches(1);
    let pages = Arc::new(StaticPageSource::new().with_page(FASTWEB, FASTWEB_PAGE));
    let pipeline = Pipeline::new(pages, store.clone()).with_batch_size(1);

    let outcome = pipeline
        .run(&[SourceConfig::new(FASTWEB, "https://www.fastweb.com/college-scholarships")])
        .await;
    let counters = outcome.summary.counters;

    assert_eq!(counters.scraped, 2);
    assert_eq!(counters.errors, 1);
    assert_eq!(counters.inserted, 1);
    assert_eq!(outcome.summary.status(), RunStatus::Partial);
    assert_eq!(store.count_scholarships()?, 1);
    Ok(())
}

#[tokio::test]
async fn test_run_log_failure_does_not_change_summary() -> Result<()> {
    let healthy_store = Arc::new(InMemoryStore::new());
    let failing_store = Arc::new(InMemoryStore::new());
    failing_store.fail_run_log(true);
    let sources = [SourceConfig::new(FASTWEB, "https://www.fastweb.com/college-scholarships")];

    let healthy = Pipeline::new(
        Arc::new(StaticPageSource::new().with_page(FASTWEB, FASTWEB_PAGE)),
        healthy_store.clone(),
    )
    .run(&sources)
    .await;
    let failing = Pipeline::new(
        Arc::new(StaticPageSource::new().with_page(FASTWEB, FASTWEB_PAGE)),
        failing_store.clone(),
    )
    .run(&sources)
    .await;

    assert!(healthy.run_logged);
    assert!(!failing.run_logged);
    assert_eq!(healthy.summary.counters, failing.summary.counters);
    assert_eq!(failing.summary.status(), RunStatus::Completed);
    assert!(failing_store.run_logs()?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_failed_fragment_counts_as_error() -> Result<()> {
    let page = r#"
        <div class="scholarship-card"><h3>Broken Link Award</h3><a href="http://[::1">Details</a></div>
        <div class="scholarship-card"><h3>Working Link Award</h3><a href="/scholarships/2">Details</a></div>
    "#;
    let store = Arc::new(InMemoryStore::new());
    let pipeline = Pipeline::new(Arc::new(StaticPageSource::new().with_page(FASTWEB, page)), store.clone());

    let outcome = pipeline
        .run(&[SourceConfig::new(FASTWEB, "https://www.fastweb.com/college-scholarships")])
        .await;
    let counters = outcome.summary.counters;

    assert_eq!(counters.scraped, 1);
    assert_eq!(counters.inserted, 1);
    assert_eq!(counters.errors, 1);
    assert_eq!(outcome.summary.status(), RunStatus::Partial);
    assert_eq!(store.count_scholarships()?, 1);
    Ok(())
}

#[tokio::test]
async fn test_report_json_matches_summary() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let pages = Arc::new(StaticPageSource::new().with_page(INTERNATIONAL_SCHOLARSHIPS, GLOBAL_EXCELLENCE));
    let outcome = Pipeline::new(pages, store).run(&[international_source()]).await;

    let json: serde_json::Value = serde_json::from_str(&RunReport::from_summary(&outcome.summary).to_json()?)?;
    assert_eq!(json["success"], true);
    assert_eq!(json["run_id"], outcome.summary.run_id.to_string());
    assert_eq!(json["status"], "partial");
    assert_eq!(json["stats"]["inserted"], 1);
    assert_eq!(json["stats"]["duplicates"], 0);
    assert_eq!(json["stats"]["errors"], 1);
    assert_eq!(json["stats"]["sources_processed"], 1);
    Ok(())
}

#[tokio::test]
async fn test_custom_registered_extractor() -> Result<()> {
    let mut registry = ExtractorRegistry::new();
    registry.register("campus-board", Box::new(BlogListingExtractor::scholarship_roar()));

    let page = r#"
        <article><h2><a href="/p/1">Rural Students Bursary</a></h2>
          <div class="entry-content">Worth £3,000. Closing Date: 2026-09-01</div></article>
    "#;
    let store = Arc::new(InMemoryStore::new());
    let pipeline = Pipeline::new(Arc::new(StaticPageSource::new().with_page("campus-board", page)), store.clone())
        .with_registry(registry);

    let outcome = pipeline
        .run(&[SourceConfig::new("campus-board", "https://board.example.edu/awards")])
        .await;
    assert_eq!(outcome.summary.counters.inserted, 1);

    let stored = store
        .find_by_key(&NaturalKey::new("Rural Students Bursary", None, NaiveDate::from_ymd_opt(2026, 9, 1)))?
        .expect("bursary row");
    assert_eq!(stored.record.amount.as_deref(), Some("£3,000"));
    assert_eq!(stored.record.application_link.as_deref(), Some("https://board.example.edu/p/1"));
    Ok(())
}
