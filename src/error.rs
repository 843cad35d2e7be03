//! Error types shared by the source adapters and the sentiment pipeline.

use std::time::Duration;

/// Why a single source adapter could not produce headlines.
///
/// Adapters return this to the aggregator, which logs it and treats the
/// source as having contributed nothing. It never reaches API callers.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("unparseable payload: {0}")]
    Parse(String),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("source did not answer within {0:?}")]
    Timeout(Duration),

    #[error("missing credentials for {0}")]
    MissingCredentials(&'static str),

    #[error("adapter panicked: {0}")]
    Panicked(String),
}

impl FetchError {
    /// Short machine-friendly label, used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Http(_) => "http",
            FetchError::Status { .. } => "status",
            FetchError::Parse(_) => "parse",
            FetchError::Url(_) => "url",
            FetchError::Timeout(_) => "timeout",
            FetchError::MissingCredentials(_) => "credentials",
            FetchError::Panicked(_) => "panic",
        }
    }
}

/// Outcomes of one asset query that are not a report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// Every enabled source came back empty. Distinct from a Neutral report.
    #[error("no news found for {asset_id}")]
    EmptyAggregate { asset_id: String },

    #[error("asset identifier must not be empty")]
    InvalidAsset,
}
