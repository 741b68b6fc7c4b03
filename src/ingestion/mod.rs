//! Page acquisition. Fetching is kept apart from extraction so the pipeline
//! can run over live HTTP, saved pages or in-memory fixtures alike.

use crate::config::SourceConfig;
use crate::error::{Result, ScraperError};
use crate::types::RawPage;
use std::collections::HashMap;

pub mod directory;
pub mod http;

pub use directory::DirectoryPageSource;
pub use http::HttpPageSource;

#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, source: &SourceConfig) -> Result<RawPage>;
}

/// Pages held in memory, keyed by source id
#[derive(Debug, Default, Clone)]
pub struct StaticPageSource {
    pages: HashMap<String, String>,
}

impl StaticPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, source_id: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(source_id.into(), body.into());
        self
    }
}

#[async_trait::async_trait]
impl PageSource for StaticPageSource {
    async fn fetch(&self, source: &SourceConfig) -> Result<RawPage> {
        let body = self.pages.get(&source.source_id).ok_or_else(|| ScraperError::Fetch {
            source_id: source.source_id.clone(),
            message: "no page registered".to_string(),
        })?;
        Ok(RawPage::new(&source.source_id, &source.url, body.clone()))
    }
}
