// src/ingest/providers/rss.rs
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::error::FetchError;
use crate::ingest::normalize_text;
use crate::ingest::providers::{encode_query_value, read_success_body, DEFAULT_MAX_ITEMS};
use crate::ingest::types::{RawHeadline, SourceAdapter};

/// Placeholder replaced by the (percent-encoded) asset id in feed URLs.
pub const ASSET_PLACEHOLDER: &str = "{asset}";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
}

/// Any RSS 2.0 feed addressed by a URL template, e.g. Google News search:
/// `https://news.google.com/rss/search?q={asset}+stock&hl=en-US`.
pub struct RssAdapter {
    label: String,
    url_template: String,
    max_items: usize,
    client: reqwest::Client,
}

impl RssAdapter {
    pub fn new(
        label: impl Into<String>,
        url_template: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            label: label.into(),
            url_template: url_template.into(),
            max_items: DEFAULT_MAX_ITEMS,
            client,
        }
    }

    pub fn with_max_items(mut self, n: usize) -> Self {
        self.max_items = n;
        self
    }

    pub fn feed_url(&self, asset_id: &str) -> String {
        self.url_template
            .replace(ASSET_PLACEHOLDER, &encode_query_value(asset_id))
    }

    /// Parse a feed body into at most `max_items` valid headlines.
    pub fn parse_feed(
        xml: &str,
        label: &str,
        max_items: usize,
    ) -> Result<Vec<RawHeadline>, FetchError> {
        let xml_clean = scrub_html_entities_for_xml(xml);
        let rss: Rss = from_str(&xml_clean).map_err(|e| FetchError::Parse(e.to_string()))?;

        Ok(rss
            .channel
            .item
            .into_iter()
            .filter_map(|it| {
                let title = normalize_text(it.title.as_deref().unwrap_or_default());
                RawHeadline::new(title, it.link.unwrap_or_default(), label)
            })
            .take(max_items)
            .collect())
    }
}

#[async_trait]
impl SourceAdapter for RssAdapter {
    async fn fetch(&self, asset_id: &str) -> Result<Vec<RawHeadline>, FetchError> {
        let url = self.feed_url(asset_id);
        let resp = self.client.get(&url).send().await?;
        let body = read_success_body(resp).await?;
        Self::parse_feed(&body, &self.label, self.max_items)
    }

    fn name(&self) -> &str {
        &self.label
    }
}

/// quick-xml only knows the XML entities; feeds often carry HTML ones.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}
