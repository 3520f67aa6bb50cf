use std::sync::LazyLock;

use log::debug;
use regex::{Captures, Regex};
use url::Url;

use crate::Provider;

/// Query key YouTube's embedded player reads its start offset from
pub const YOUTUBE_START_KEY: &str = "start";

/// Query key Bilibili's player (and any unknown host) reads its start offset from
pub const DEFAULT_START_KEY: &str = "t";

static TEXTUAL_OFFSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([?&])t=\d*(&|$)").expect("offset pattern is valid"));

/// Build the embeddable player URL for a provider ID, without a start offset
pub fn build_from_id(provider: Provider, id: &str) -> String {
    match provider {
        Provider::YouTube => format!("https://www.youtube.com/embed/{id}?rel=0&controls=1"),
        Provider::Bilibili => {
            format!("https://player.bilibili.com/player.html?bvid={id}&page=1&high_quality=1")
        }
    }
}

/// Return `source` rewritten so the player starts at `seconds`.
///
/// Any existing start offset is replaced rather than appended, and every
/// other query parameter is kept. Sources that do not parse as absolute URLs
/// (protocol-relative player links, for instance) get a textual rewrite of
/// the `t` parameter instead.
pub fn with_start_offset(source: &str, seconds: u64) -> String {
    if source.is_empty() {
        return String::new();
    }

    match Url::parse(source) {
        Ok(mut url) => {
            let host = url.host_str().unwrap_or_default().to_lowercase();
            let key = if host.contains("youtube.com") {
                YOUTUBE_START_KEY
            } else {
                DEFAULT_START_KEY
            };
            set_query_param(&mut url, key, &seconds.to_string());
            url.to_string()
        }
        Err(e) => {
            debug!("Structured parse of {source} failed ({e}), rewriting textually");
            with_textual_offset(source, seconds)
        }
    }
}

/// Set `key` to `value`, keeping its position when already present and
/// dropping any repeated occurrences.
fn set_query_param(url: &mut Url, key: &str, value: &str) {
    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let mut found = false;
    pairs.retain_mut(|(k, v)| {
        if k != key {
            return true;
        }
        if found {
            return false;
        }
        found = true;
        *v = value.to_string();
        true
    });
    if !found {
        pairs.push((key.to_string(), value.to_string()));
    }
    url.query_pairs_mut().clear().extend_pairs(&pairs);
}

fn with_textual_offset(source: &str, seconds: u64) -> String {
    let mut stripped = source.to_string();
    while TEXTUAL_OFFSET.is_match(&stripped) {
        stripped = TEXTUAL_OFFSET
            .replacen(&stripped, 1, |caps: &Captures| {
                // keep the leading separator only when another parameter follows
                if &caps[2] == "&" { caps[1].to_string() } else { String::new() }
            })
            .into_owned();
    }
    let connector = if stripped.contains('?') { '&' } else { '?' };
    format!("{stripped}{connector}t={seconds}")
}
