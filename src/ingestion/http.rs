use super::PageSource;
use crate::config::{Config, SourceConfig};
use crate::error::{Result, ScraperError};
use crate::types::RawPage;
use metrics::{counter, histogram};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Fetches listing pages over HTTP
pub struct HttpPageSource {
    client: reqwest::Client,
}

impl HttpPageSource {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(Duration::from_secs(config.http_timeout_secs), &config.user_agent)
    }
}

#[async_trait::async_trait]
impl PageSource for HttpPageSource {
    #[instrument(skip(self, source), fields(source_id = %source.source_id))]
    async fn fetch(&self, source: &SourceConfig) -> Result<RawPage> {
        debug!("Fetching {}", source.url);
        let started = Instant::now();

        let response = self
            .client
            .get(&source.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                counter!("scholarship_fetch_errors_total", "source" => source.source_id.clone()).increment(1);
                ScraperError::Fetch {
                    source_id: source.source_id.clone(),
                    message: e.to_string(),
                }
            })?;
        let body = response.text().await?;

        histogram!("scholarship_fetch_duration_seconds", "source" => source.source_id.clone())
            .record(started.elapsed().as_secs_f64());
        info!("Fetched {} bytes from {}", body.len(), source.url);

        Ok(RawPage::new(&source.source_id, &source.url, body))
    }
}
