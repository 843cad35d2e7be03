// src/ingest/providers/yahoo.rs
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::FetchError;
use crate::ingest::normalize_text;
use crate::ingest::providers::{read_success_body, DEFAULT_MAX_ITEMS};
use crate::ingest::types::{RawHeadline, SourceAdapter};

pub const DEFAULT_BASE_URL: &str = "https://finance.yahoo.com/";
pub const SOURCE_LABEL: &str = "Yahoo Finance";

#[derive(Serialize)]
struct ServiceConfig<'a> {
    #[serde(rename = "snippetCount")]
    snippet_count: usize,
    s: [&'a str; 1],
}

#[derive(Serialize)]
struct NewsPayload<'a> {
    #[serde(rename = "serviceConfig")]
    service_config: ServiceConfig<'a>,
}

#[derive(Deserialize)]
struct NewsEnvelope {
    data: Option<NewsData>,
}

#[derive(Deserialize)]
struct NewsData {
    #[serde(rename = "tickerStream")]
    ticker_stream: Option<TickerStream>,
}

#[derive(Deserialize)]
struct TickerStream {
    stream: Option<Vec<StreamItem>>,
}

#[derive(Deserialize)]
struct StreamItem {
    content: Option<Content>,
    ad: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct Content {
    title: Option<String>,
    #[serde(rename = "canonicalUrl")]
    canonical_url: Option<LinkRef>,
    #[serde(rename = "clickThroughUrl")]
    click_through_url: Option<LinkRef>,
}

#[derive(Deserialize)]
struct LinkRef {
    url: Option<String>,
}

/// Latest-news stream of a ticker on Yahoo Finance.
pub struct YahooFinanceAdapter {
    base: Url,
    max_items: usize,
    client: reqwest::Client,
}

impl YahooFinanceAdapter {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            base: Url::parse(DEFAULT_BASE_URL).expect("static yahoo base url"),
            max_items: DEFAULT_MAX_ITEMS,
            client,
        }
    }

    /// Point the adapter at another host (tests, proxies). Headline links
    /// still resolve against the public site.
    pub fn with_base_url(mut self, base: &str) -> Result<Self, FetchError> {
        self.base = Url::parse(base)?;
        Ok(self)
    }

    pub fn with_max_items(mut self, n: usize) -> Self {
        self.max_items = n;
        self
    }

    // ask for a few extra to survive ad/invalid filtering
    fn snippet_count(&self) -> usize {
        self.max_items.saturating_mul(2)
    }

    /// Parse the JSON stream envelope. Ads and items without a title or link
    /// are skipped; site-relative links are resolved against the base URL.
    pub fn parse_stream(
        body: &str,
        base: &Url,
        max_items: usize,
    ) -> Result<Vec<RawHeadline>, FetchError> {
        let envelope: NewsEnvelope =
            serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;

        let stream = envelope
            .data
            .and_then(|d| d.ticker_stream)
            .and_then(|ts| ts.stream)
            .unwrap_or_default();

        Ok(stream
            .into_iter()
            .filter(|item| item.ad.is_none())
            .filter_map(|item| {
                let content = item.content?;
                let title = normalize_text(content.title.as_deref()?);
                let href = content
                    .canonical_url
                    .and_then(|u| u.url)
                    .or_else(|| content.click_through_url.and_then(|u| u.url))?;
                let link = base.join(&href).ok()?;
                RawHeadline::new(title, link.as_str(), SOURCE_LABEL)
            })
            .take(max_items)
            .collect())
    }
}

#[async_trait]
impl SourceAdapter for YahooFinanceAdapter {
    async fn fetch(&self, asset_id: &str) -> Result<Vec<RawHeadline>, FetchError> {
        let mut url = self.base.join("xhr/ncp")?;
        url.query_pairs_mut()
            .append_pair("queryRef", "latestNews")
            .append_pair("serviceKey", "ncp_fin");

        let payload = NewsPayload {
            service_config: ServiceConfig {
                snippet_count: self.snippet_count(),
                s: [asset_id],
            },
        };

        let resp = self.client.post(url).json(&payload).send().await?;
        let body = read_success_body(resp).await?;
        let site = Url::parse(DEFAULT_BASE_URL)?;
        Self::parse_stream(&body, &site, self.max_items)
    }

    fn name(&self) -> &str {
        SOURCE_LABEL
    }
}
