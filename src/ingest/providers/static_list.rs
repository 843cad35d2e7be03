// src/ingest/providers/static_list.rs
use async_trait::async_trait;

use crate::error::FetchError;
use crate::ingest::types::{RawHeadline, SourceAdapter};

/// Serves a fixed headline list for every asset. Used for offline demos and
/// as a deterministic source in tests.
pub struct StaticAdapter {
    label: String,
    items: Vec<RawHeadline>,
}

impl StaticAdapter {
    pub fn new(label: impl Into<String>, items: Vec<RawHeadline>) -> Self {
        Self {
            label: label.into(),
            items,
        }
    }

    /// Build from `(title, link)` pairs, tagging each with this adapter's label.
    /// Pairs with a blank title or link are dropped.
    pub fn from_pairs<T, L>(label: impl Into<String>, pairs: impl IntoIterator<Item = (T, L)>) -> Self
    where
        T: Into<String>,
        L: Into<String>,
    {
        let label = label.into();
        let items = pairs
            .into_iter()
            .filter_map(|(t, l)| RawHeadline::new(t, l, label.as_str()))
            .collect();
        Self { label, items }
    }
}

#[async_trait]
impl SourceAdapter for StaticAdapter {
    async fn fetch(&self, _asset_id: &str) -> Result<Vec<RawHeadline>, FetchError> {
        Ok(self.items.clone())
    }

    fn name(&self) -> &str {
        &self.label
    }
}
