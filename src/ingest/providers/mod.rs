// src/ingest/providers/mod.rs
pub mod newsapi;
pub mod rss;
pub mod static_list;
pub mod yahoo;

use std::time::Duration;

use anyhow::{Context, Result};

use crate::error::FetchError;

pub use newsapi::NewsApiAdapter;
pub use rss::RssAdapter;
pub use static_list::StaticAdapter;
pub use yahoo::YahooFinanceAdapter;

/// Default number of headlines kept per source.
pub const DEFAULT_MAX_ITEMS: usize = 5;

/// Browser-like agent; several news sites reject library user agents.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Shared HTTP client for all adapters of one pipeline.
pub fn http_client(request_timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(4))
        .timeout(request_timeout)
        .build()
        .context("building http client for source adapters")
}

/// Turn a non-2xx response into [`FetchError::Status`] and read the body.
pub(crate) async fn read_success_body(resp: reqwest::Response) -> Result<String, FetchError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            url: resp.url().to_string(),
        });
    }
    Ok(resp.text().await?)
}

/// Percent-encode an asset id for use inside a query string.
pub(crate) fn encode_query_value(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}
