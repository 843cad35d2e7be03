// src/ingest/mod.rs
pub mod aggregator;
pub mod config;
pub mod providers;
pub mod types;

use crate::ingest::types::RawHeadline;
use metrics::{describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use std::collections::HashSet;

pub use aggregator::{aggregate, Aggregator, SourceOutcome, SourceStatus};

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "ingest_headlines_total",
            "Valid headlines returned by source adapters."
        );
        describe_counter!(
            "ingest_provider_errors_total",
            "Adapter fetch/parse errors, downgraded to empty results."
        );
        describe_counter!(
            "ingest_provider_timeouts_total",
            "Adapter calls cut off by the per-source timeout."
        );
        describe_counter!(
            "ingest_dedup_total",
            "Headlines removed by the opt-in title dedup."
        );
        describe_histogram!("ingest_fetch_ms", "Adapter fetch time in milliseconds.");
        describe_counter!("sentiment_reports_total", "Aggregate reports produced.");
        describe_counter!(
            "sentiment_empty_total",
            "Queries where every source came back empty."
        );
        describe_counter!(
            "sentiment_invalid_score_total",
            "Scorer outputs outside [-1, 1] that had to be clamped."
        );
    });
}

/// Maximum headline length kept after normalization.
const MAX_TITLE_CHARS: usize = 500;

/// Normalize headline text: decode entities, drop tags, fold quotes and
/// whitespace, strip trailing sentence punctuation.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Typographic quotes to ASCII
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace (incl. nbsp)
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Trailing sentence punctuation
    while let Some(last) = out.chars().last() {
        if matches!(last, '!' | '?' | '.' | ',') {
            out.pop();
        } else {
            break;
        }
    }

    if out.chars().count() > MAX_TITLE_CHARS {
        out = out.chars().take(MAX_TITLE_CHARS).collect();
    }

    out
}

/// Opt-in dedup between aggregation and scoring: later headlines whose
/// normalized, case-folded title was already seen are dropped. Order of the
/// survivors is unchanged. Returns `(kept, removed_count)`.
pub fn dedup_by_title(items: Vec<RawHeadline>) -> (Vec<RawHeadline>, usize) {
    let mut seen: HashSet<String> = HashSet::with_capacity(items.len());
    let mut kept = Vec::with_capacity(items.len());
    let mut removed = 0usize;

    for h in items {
        let key = normalize_text(&h.title).to_lowercase();
        if !seen.insert(key) {
            removed += 1;
            continue;
        }
        kept.push(h);
    }

    (kept, removed)
}
