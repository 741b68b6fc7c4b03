use super::PageSource;
use crate::config::SourceConfig;
use crate::error::{Result, ScraperError};
use crate::types::RawPage;
use std::path::PathBuf;
use tracing::debug;

/// Reads previously saved pages from `<dir>/<source id>.html`
pub struct DirectoryPageSource {
    dir: PathBuf,
}

impl DirectoryPageSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn page_path(&self, source_id: &str) -> PathBuf {
        self.dir.join(format!("{}.html", file_safe(source_id)))
    }
}

/// Anything outside `[A-Za-z0-9._-]` becomes `_`
fn file_safe(source_id: &str) -> String {
    source_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect()
}

#[async_trait::async_trait]
impl PageSource for DirectoryPageSource {
    async fn fetch(&self, source: &SourceConfig) -> Result<RawPage> {
        let path = self.page_path(&source.source_id);
        debug!("Reading saved page {}", path.display());
        let body = tokio::fs::read_to_string(&path).await.map_err(|e| ScraperError::Fetch {
            source_id: source.source_id.clone(),
            message: format!("{}: {}", path.display(), e),
        })?;
        Ok(RawPage::new(&source.source_id, &source.url, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_path_is_file_safe() {
        let pages = DirectoryPageSource::new("pages");
        assert_eq!(pages.page_path("fastweb.com"), PathBuf::from("pages/fastweb.com.html"));
        assert_eq!(pages.page_path("a/b c"), PathBuf::from("pages/a_b_c.html"));
    }

    #[tokio::test]
    async fn test_reads_saved_page() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("government.html"), "<html>saved</html>").unwrap();
        let pages = DirectoryPageSource::new(dir.path());

        let page = pages
            .fetch(&SourceConfig::new("government", "https://educationusa.state.gov/"))
            .await
            .unwrap();
        assert_eq!(page.body, "<html>saved</html>");

        let missing = pages.fetch(&SourceConfig::new("absent", "https://x.org/")).await;
        assert!(matches!(missing, Err(ScraperError::Fetch { .. })));
    }
}
