// src/ingest/providers/newsapi.rs
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::error::FetchError;
use crate::ingest::normalize_text;
use crate::ingest::providers::{read_success_body, DEFAULT_MAX_ITEMS};
use crate::ingest::types::{RawHeadline, SourceAdapter};

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/";
pub const SOURCE_LABEL: &str = "NewsAPI";
pub const ENV_API_KEY: &str = "NEWSAPI_KEY";

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    url: Option<String>,
}

/// Keyword search on newsapi.org (`/v2/everything`), newest first.
pub struct NewsApiAdapter {
    base: Url,
    api_key: String,
    max_items: usize,
    client: reqwest::Client,
}

impl NewsApiAdapter {
    pub fn new(api_key: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base: Url::parse(DEFAULT_BASE_URL).expect("static newsapi base url"),
            api_key: api_key.into(),
            max_items: DEFAULT_MAX_ITEMS,
            client,
        }
    }

    pub fn with_base_url(mut self, base: &str) -> Result<Self, FetchError> {
        self.base = Url::parse(base)?;
        Ok(self)
    }

    pub fn with_max_items(mut self, n: usize) -> Self {
        self.max_items = n;
        self
    }

    pub fn parse_articles(body: &str, max_items: usize) -> Result<Vec<RawHeadline>, FetchError> {
        let env: Envelope =
            serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;
        if env.status != "ok" {
            return Err(FetchError::Parse(format!(
                "newsapi status {}: {}",
                env.status,
                env.message.unwrap_or_default()
            )));
        }

        Ok(env
            .articles
            .into_iter()
            .filter_map(|a| {
                let title = normalize_text(a.title.as_deref().unwrap_or_default());
                // NewsAPI marks deleted articles with this literal title.
                if title.eq_ignore_ascii_case("[Removed]") {
                    return None;
                }
                RawHeadline::new(title, a.url.unwrap_or_default(), SOURCE_LABEL)
            })
            .take(max_items)
            .collect())
    }
}

#[async_trait]
impl SourceAdapter for NewsApiAdapter {
    async fn fetch(&self, asset_id: &str) -> Result<Vec<RawHeadline>, FetchError> {
        if self.api_key.trim().is_empty() {
            return Err(FetchError::MissingCredentials(SOURCE_LABEL));
        }

        let mut url = self.base.join("v2/everything")?;
        url.query_pairs_mut()
            .append_pair("q", asset_id)
            .append_pair("language", "en")
            .append_pair("sortBy", "publishedAt")
            .append_pair("pageSize", &self.max_items.saturating_mul(2).to_string());

        let resp = self
            .client
            .get(url)
            .header("X-Api-Key", self.api_key.as_str())
            .send()
            .await?;
        let body = read_success_body(resp).await?;
        Self::parse_articles(&body, self.max_items)
    }

    fn name(&self) -> &str {
        SOURCE_LABEL
    }
}
