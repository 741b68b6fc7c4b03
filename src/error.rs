use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid URL '{url}': {message}")]
    Url { url: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Extraction failed for {source_name}: {message}")]
    Extraction { source_name: String, message: String },

    #[error("Fetch failed for {source_id}: {message}")]
    Fetch { source_id: String, message: String },

    #[error("Store error: {message}")]
    Store { message: String },
}

pub type Result<T> = std::result::Result<T, ScraperError>;
