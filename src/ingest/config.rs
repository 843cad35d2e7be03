// src/ingest/config.rs
//! Source configuration: which adapters are enabled, in what priority order,
//! with which endpoints and credentials. Built once and handed to the
//! aggregator; nothing here is global.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ingest::aggregator::Aggregator;
use crate::ingest::providers::{
    self, newsapi, NewsApiAdapter, RssAdapter, StaticAdapter, YahooFinanceAdapter,
    DEFAULT_MAX_ITEMS,
};
use crate::ingest::types::SourceAdapter;

pub const ENV_SOURCES_PATH: &str = "SENTIMENT_SOURCES_PATH";
pub const DEFAULT_TOML_PATH: &str = "config/sources.toml";
pub const DEFAULT_JSON_PATH: &str = "config/sources.json";

pub const DEFAULT_TIMEOUT_SECS: u64 = 8;
const MAX_TIMEOUT_SECS: u64 = 60;
const MAX_ITEMS_CAP: usize = 50;

pub const GOOGLE_NEWS_RSS: &str =
    "https://news.google.com/rss/search?q={asset}+stock&hl=en-US&gl=US&ceid=US:en";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Yahoo,
    Rss,
    NewsApi,
    Static,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticHeadline {
    pub title: String,
    pub link: String,
}

/// One adapter entry. Entries are used in file order, which is also the
/// merge order of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub kind: SourceKind,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Display name; defaults per kind.
    #[serde(default)]
    pub label: Option<String>,
    /// RSS: feed template with `{asset}`. Yahoo/NewsAPI: base URL override.
    #[serde(default)]
    pub url: Option<String>,
    /// NewsAPI key. `"ENV"` or absent reads `$NEWSAPI_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Static: the fixed headlines to serve.
    #[serde(default)]
    pub headlines: Vec<StaticHeadline>,
}

fn default_enabled() -> bool {
    true
}

impl SourceEntry {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            enabled: true,
            label: None,
            url: None,
            api_key: None,
            headlines: Vec::new(),
        }
    }

    pub fn display_name(&self) -> String {
        if let Some(l) = self.label.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            return l.to_string();
        }
        match self.kind {
            SourceKind::Yahoo => providers::yahoo::SOURCE_LABEL.to_string(),
            SourceKind::Rss => "RSS".to_string(),
            SourceKind::NewsApi => newsapi::SOURCE_LABEL.to_string(),
            SourceKind::Static => "Static".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Per-adapter time budget.
    pub timeout_secs: u64,
    /// Headlines kept per adapter.
    pub max_items: usize,
    /// Opt-in title dedup between aggregation and scoring.
    pub dedup: bool,
    pub sources: Vec<SourceEntry>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        let mut google = SourceEntry::new(SourceKind::Rss);
        google.label = Some("Google News".to_string());
        google.url = Some(GOOGLE_NEWS_RSS.to_string());

        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_items: DEFAULT_MAX_ITEMS,
            dedup: false,
            sources: vec![SourceEntry::new(SourceKind::Yahoo), google],
        }
    }
}

impl SourcesConfig {
    /// Load from an explicit path. Supports TOML or JSON.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading sources config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing sources config {}", path.display()))
    }

    /// Load using env var + fallbacks:
    /// 1) $SENTIMENT_SOURCES_PATH
    /// 2) config/sources.toml
    /// 3) config/sources.json
    /// 4) built-in defaults (Yahoo Finance + Google News RSS)
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_SOURCES_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!(
                "{ENV_SOURCES_PATH} points to non-existent path {}",
                pb.display()
            ));
        }
        for p in [DEFAULT_TOML_PATH, DEFAULT_JSON_PATH] {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
        }
        Ok(Self::default())
    }

    /// Per-adapter budget. Configs built in code skip `sanitize`, so the
    /// same fallback and cap apply here.
    pub fn timeout(&self) -> Duration {
        let secs = match self.timeout_secs {
            0 => DEFAULT_TIMEOUT_SECS,
            s => s.min(MAX_TIMEOUT_SECS),
        };
        Duration::from_secs(secs)
    }

    /// Clamp numeric knobs into sane ranges.
    fn sanitize(mut self) -> Self {
        if self.timeout_secs == 0 {
            self.timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
        self.timeout_secs = self.timeout_secs.min(MAX_TIMEOUT_SECS);
        if self.max_items == 0 {
            self.max_items = DEFAULT_MAX_ITEMS;
        }
        self.max_items = self.max_items.min(MAX_ITEMS_CAP);
        self
    }

    /// Instantiate enabled adapters in declaration order.
    ///
    /// A NewsAPI entry without a resolvable key is skipped with a warning;
    /// an RSS entry without a URL is a configuration error.
    pub fn build_adapters(&self, client: &reqwest::Client) -> Result<Vec<Box<dyn SourceAdapter>>> {
        let mut out: Vec<Box<dyn SourceAdapter>> = Vec::new();

        for entry in self.sources.iter().filter(|e| e.enabled) {
            let name = entry.display_name();
            match entry.kind {
                SourceKind::Yahoo => {
                    let mut a = YahooFinanceAdapter::new(client.clone()).with_max_items(self.max_items);
                    if let Some(base) = entry.url.as_deref() {
                        a = a
                            .with_base_url(base)
                            .with_context(|| format!("yahoo base url for {name}"))?;
                    }
                    out.push(Box::new(a));
                }
                SourceKind::Rss => {
                    let Some(url) = entry.url.as_deref().filter(|u| !u.trim().is_empty()) else {
                        bail!("rss source '{name}' needs a url");
                    };
                    out.push(Box::new(
                        RssAdapter::new(name, url, client.clone()).with_max_items(self.max_items),
                    ));
                }
                SourceKind::NewsApi => {
                    let Some(key) = resolve_api_key(entry.api_key.as_deref()) else {
                        tracing::warn!(
                            provider = name.as_str(),
                            "newsapi enabled but no api key found; source skipped"
                        );
                        continue;
                    };
                    let mut a = NewsApiAdapter::new(key, client.clone()).with_max_items(self.max_items);
                    if let Some(base) = entry.url.as_deref() {
                        a = a
                            .with_base_url(base)
                            .with_context(|| format!("newsapi base url for {name}"))?;
                    }
                    out.push(Box::new(a));
                }
                SourceKind::Static => {
                    let pairs = entry
                        .headlines
                        .iter()
                        .take(self.max_items)
                        .map(|h| (h.title.clone(), h.link.clone()));
                    out.push(Box::new(StaticAdapter::from_pairs(name, pairs)));
                }
            }
        }

        Ok(out)
    }

    /// Build the aggregator with a fresh shared HTTP client.
    pub fn aggregator(&self) -> Result<Aggregator> {
        let client = providers::http_client(self.timeout())?;
        let adapters = self.build_adapters(&client)?;
        Ok(Aggregator::new(adapters).with_timeout(self.timeout()))
    }
}

/// `None`/`"ENV"` → `$NEWSAPI_KEY`; blank values resolve to `None`.
fn resolve_api_key(raw: Option<&str>) -> Option<String> {
    let raw = raw.map(str::trim).unwrap_or("ENV");
    let key = if raw.eq_ignore_ascii_case("env") {
        std::env::var(newsapi::ENV_API_KEY).ok()?
    } else {
        raw.to_string()
    };
    let key = key.trim().to_string();
    (!key.is_empty()).then_some(key)
}

fn parse_config(s: &str, hint_ext: &str) -> Result<SourcesConfig> {
    // JSON if hinted or the content looks like an object; TOML otherwise.
    let looks_json = hint_ext == "json" || s.trim_start().starts_with('{');
    let cfg: SourcesConfig = if looks_json {
        serde_json::from_str(s).context("invalid json sources config")?
    } else {
        toml::from_str(s).context("invalid toml sources config")?
    };
    Ok(cfg.sanitize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    const TOML: &str = r#"
timeout_secs = 3
max_items = 10
dedup = true

[[sources]]
kind = "yahoo"

[[sources]]
kind = "rss"
label = "CoinDesk"
url = "https://www.coindesk.com/arc/outboundfeeds/rss/?q={asset}"

[[sources]]
kind = "newsapi"
enabled = false
api_key = "ENV"
"#;

    #[test]
    fn parses_toml() {
        let cfg = parse_config(TOML, "toml").unwrap();
        assert_eq!(cfg.timeout_secs, 3);
        assert_eq!(cfg.max_items, 10);
        assert!(cfg.dedup);
        assert_eq!(cfg.sources.len(), 3);
        assert_eq!(cfg.sources[0].kind, SourceKind::Yahoo);
        assert_eq!(cfg.sources[1].display_name(), "CoinDesk");
        assert!(!cfg.sources[2].enabled);
    }

    #[test]
    fn parses_json_and_fills_defaults() {
        let json = r#"{"sources":[{"kind":"static","label":"Demo",
            "headlines":[{"title":"Shares soar","link":"https://x.test/1"}]}]}"#;
        let cfg = parse_config(json, "json").unwrap();
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(cfg.max_items, DEFAULT_MAX_ITEMS);
        assert!(!cfg.dedup);
        assert_eq!(cfg.sources[0].headlines.len(), 1);
        assert!(cfg.sources[0].enabled);
    }

    #[test]
    fn sanitize_clamps_knobs() {
        let cfg = parse_config("timeout_secs = 0\nmax_items = 500\nsources = []", "toml").unwrap();
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(cfg.max_items, MAX_ITEMS_CAP);
    }

    #[test]
    fn zero_timeout_in_code_falls_back_to_default() {
        let cfg = SourcesConfig {
            timeout_secs: 0,
            ..SourcesConfig::default()
        };
        assert_eq!(cfg.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(cfg.aggregator().unwrap().timeout(), cfg.timeout());

        let huge = SourcesConfig {
            timeout_secs: 3_600,
            ..SourcesConfig::default()
        };
        assert_eq!(huge.timeout(), Duration::from_secs(MAX_TIMEOUT_SECS));
    }

    #[test]
    fn unknown_kind_is_error() {
        assert!(parse_config(r#"[[sources]]
kind = "twitter""#, "toml").is_err());
    }

    #[test]
    fn default_has_yahoo_then_google_news() {
        let cfg = SourcesConfig::default();
        let names: Vec<_> = cfg.sources.iter().map(|s| s.display_name()).collect();
        assert_eq!(names, vec!["Yahoo Finance", "Google News"]);
    }

    #[test]
    fn disabled_sources_are_not_built() {
        let mut cfg = parse_config(TOML, "toml").unwrap();
        cfg.sources.push(SourceEntry {
            enabled: false,
            ..SourceEntry::new(SourceKind::Yahoo)
        });
        let adapters = cfg.build_adapters(&reqwest::Client::new()).unwrap();
        let names: Vec<_> = adapters.iter().map(|a| a.name().to_string()).collect();
        assert_eq!(names, vec!["Yahoo Finance", "CoinDesk"]);
    }

    #[test]
    fn rss_without_url_is_error() {
        let cfg = SourcesConfig {
            sources: vec![SourceEntry::new(SourceKind::Rss)],
            ..SourcesConfig::default()
        };
        assert!(cfg.build_adapters(&reqwest::Client::new()).is_err());
    }

    #[test]
    fn explicit_api_key_builds_newsapi() {
        let cfg = SourcesConfig {
            sources: vec![SourceEntry {
                api_key: Some("k-123".into()),
                ..SourceEntry::new(SourceKind::NewsApi)
            }],
            ..SourcesConfig::default()
        };
        let adapters = cfg.build_adapters(&reqwest::Client::new()).unwrap();
        assert_eq!(adapters.len(), 1);
        assert_eq!(adapters[0].name(), "NewsAPI");
    }

    #[serial_test::serial]
    #[test]
    fn newsapi_without_key_is_skipped() {
        env::remove_var(newsapi::ENV_API_KEY);
        let cfg = SourcesConfig {
            sources: vec![SourceEntry::new(SourceKind::NewsApi)],
            ..SourcesConfig::default()
        };
        let adapters = cfg.build_adapters(&reqwest::Client::new()).unwrap();
        assert!(adapters.is_empty());

        env::set_var(newsapi::ENV_API_KEY, "from-env");
        let adapters = cfg.build_adapters(&reqwest::Client::new()).unwrap();
        assert_eq!(adapters.len(), 1);
        env::remove_var(newsapi::ENV_API_KEY);
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        // Isolate CWD so the repo's own config/ is not picked up
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();
        env::remove_var(ENV_SOURCES_PATH);

        // Nothing on disk → built-in defaults
        let v = SourcesConfig::load_default().unwrap();
        assert_eq!(v, SourcesConfig::default());

        // Fallback TOML in ./config/
        fs::create_dir_all(tmp.path().join("config")).unwrap();
        fs::write(tmp.path().join(DEFAULT_TOML_PATH), TOML).unwrap();
        let vt = SourcesConfig::load_default().unwrap();
        assert_eq!(vt.timeout_secs, 3);

        // Env wins
        let p_env = tmp.path().join("custom.json");
        fs::write(&p_env, r#"{"timeout_secs": 5, "sources": []}"#).unwrap();
        env::set_var(ENV_SOURCES_PATH, p_env.display().to_string());
        let ve = SourcesConfig::load_default().unwrap();
        assert_eq!(ve.timeout_secs, 5);
        assert!(ve.sources.is_empty());

        // Env pointing nowhere is an error
        env::set_var(ENV_SOURCES_PATH, tmp.path().join("missing.toml").display().to_string());
        assert!(SourcesConfig::load_default().is_err());
        env::remove_var(ENV_SOURCES_PATH);

        env::set_current_dir(&old).unwrap();
    }
}
