use thiserror::Error;

#[derive(Error, Debug)]
pub enum StripError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Feed errors
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unknown comic source: {0}")]
    UnknownSource(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(String),

    // Parsing errors
    #[error("Feed parsing failed: {0}")]
    Parse(String),

    #[error("[{source_name}] Missing field: {field}")]
    MissingField { source_name: String, field: String },

    #[error("[{source_name}] Unable to find image for {number}")]
    ImageNotFound { source_name: String, number: String },

    // Rendering errors
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl StripError {
    /// Whether the error is scoped to a single feed item.
    ///
    /// Item-level failures are dropped at the aggregator's per-item boundary;
    /// everything else aborts the whole run.
    pub fn is_item_level(&self) -> bool {
        matches!(
            self,
            StripError::MissingField { .. } | StripError::ImageNotFound { .. }
        )
    }
}

pub type StripResult<T> = Result<T, StripError>;
