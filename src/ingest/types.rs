// src/ingest/types.rs
use crate::error::FetchError;
use serde::{Deserialize, Serialize};

/// Canonical headline record every adapter normalizes into.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawHeadline {
    pub title: String,
    pub link: String,
    pub source: String, // adapter label, e.g. "Yahoo Finance"
}

impl RawHeadline {
    /// Builds a record, or `None` when the title or link is blank.
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        source: impl Into<String>,
    ) -> Option<Self> {
        let h = Self {
            title: title.into().trim().to_string(),
            link: link.into().trim().to_string(),
            source: source.into(),
        };
        h.is_valid().then_some(h)
    }

    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && !self.link.trim().is_empty()
    }
}

/// One news provider. `fetch` reports failures; the aggregator decides what
/// a failure means for the request (nothing, it contributes no headlines).
#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    async fn fetch(&self, asset_id: &str) -> Result<Vec<RawHeadline>, FetchError>;
    fn name(&self) -> &str;
}
