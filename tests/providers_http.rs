// tests/providers_http.rs
//
// Source adapters against a local mock server: request shape, payload
// normalization, and failure statuses.

use std::time::Duration;

use asset_sentiment::ingest::providers::{
    http_client, NewsApiAdapter, RssAdapter, YahooFinanceAdapter,
};
use asset_sentiment::{FetchError, SourceAdapter};
use httpmock::{
    Method::{GET, POST},
    MockServer,
};
use serde_json::json;

const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>Results</title>
  <item><title>Apple shares rally on upgrade - Reuters</title><link>https://r.test/1</link></item>
  <item><title>Apple faces EU probe&nbsp;over App Store</title><link>https://r.test/2</link></item>
  <item><title>Third</title><link>https://r.test/3</link></item>
</channel></rss>"#;

fn client() -> reqwest::Client {
    http_client(Duration::from_secs(5)).expect("client")
}

#[tokio::test]
async fn rss_adapter_fetches_and_truncates() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/rss").query_param("q", "AAPL");
            then.status(200)
                .header("content-type", "application/rss+xml")
                .body(FEED);
        })
        .await;

    let template = format!("{}/rss?q={{asset}}&hl=en-US", server.base_url());
    let a = RssAdapter::new("Google News", template, client()).with_max_items(2);
    let out = a.fetch("AAPL").await.expect("rss ok");

    mock.assert_async().await;
    assert_eq!(out.len(), 2);
    assert_eq!(out[1].title, "Apple faces EU probe over App Store");
    assert!(out.iter().all(|h| h.source == "Google News"));
}

#[tokio::test]
async fn rss_adapter_maps_server_error_to_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rss");
            then.status(503).body("busy");
        })
        .await;

    let a = RssAdapter::new("Feed", format!("{}/rss?q={{asset}}", server.base_url()), client());
    let err = a.fetch("AAPL").await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 503, .. }));
}

#[tokio::test]
async fn yahoo_adapter_posts_symbol_and_parses_stream() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/xhr/ncp")
                .query_param("queryRef", "latestNews")
                .query_param("serviceKey", "ncp_fin")
                .json_body(json!({ "serviceConfig": { "snippetCount": 4, "s": ["TSLA"] } }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "data": { "tickerStream": { "stream": [
                        { "id": "1", "content": {
                            "title": "Tesla deliveries beat estimates",
                            "canonicalUrl": { "url": "/news/tesla-1.html" } } },
                        { "id": "2", "ad": {}, "content": { "title": "Ad" } }
                    ] } }
                }));
        })
        .await;

    let a = YahooFinanceAdapter::new(client())
        .with_base_url(&server.base_url())
        .unwrap()
        .with_max_items(2);
    let out = a.fetch("TSLA").await.expect("yahoo ok");

    mock.assert_async().await;
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].title, "Tesla deliveries beat estimates");
    // links point at the public site, not the overridden host
    assert_eq!(out[0].link, "https://finance.yahoo.com/news/tesla-1.html");
    assert_eq!(out[0].source, "Yahoo Finance");
}

#[tokio::test]
async fn yahoo_adapter_html_error_page_is_parse_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/xhr/ncp");
            then.status(200).body("<html>consent wall</html>");
        })
        .await;

    let a = YahooFinanceAdapter::new(client())
        .with_base_url(&server.base_url())
        .unwrap();
    let err = a.fetch("AAPL").await.unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)));
}

#[tokio::test]
async fn newsapi_adapter_sends_key_and_query() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/everything")
                .query_param("q", "BTC")
                .header("x-api-key", "secret");
            then.status(200).json_body(json!({
                "status": "ok",
                "articles": [
                    { "source": { "name": "CoinDesk" }, "title": "Bitcoin slumps as miners sell", "url": "https://c.test/1" }
                ]
            }));
        })
        .await;

    let a = NewsApiAdapter::new("secret", client())
        .with_base_url(&server.base_url())
        .unwrap();
    let out = a.fetch("BTC").await.expect("newsapi ok");

    mock.assert_async().await;
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].source, "NewsAPI");
}

#[tokio::test]
async fn newsapi_huge_max_items_saturates_page_size() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/everything")
                .query_param("pageSize", usize::MAX.to_string());
            then.status(200).json_body(json!({ "status": "ok", "articles": [] }));
        })
        .await;

    let a = NewsApiAdapter::new("secret", client())
        .with_base_url(&server.base_url())
        .unwrap()
        .with_max_items(usize::MAX);
    let out = a.fetch("BTC").await.expect("newsapi ok");

    mock.assert_async().await;
    assert!(out.is_empty());
}

#[tokio::test]
async fn newsapi_unauthorized_is_status_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/everything");
            then.status(401).json_body(json!({ "status": "error", "message": "bad key" }));
        })
        .await;

    let a = NewsApiAdapter::new("wrong", client())
        .with_base_url(&server.base_url())
        .unwrap();
    let err = a.fetch("BTC").await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 401, .. }));
}
