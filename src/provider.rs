use url::Url;

use crate::Provider;

const YOUTUBE_HOSTS: [&str; 2] = ["youtube.com", "youtu.be"];
const YOUTUBE_SHORT_HOST: &str = "youtu.be";
const YOUTUBE_EMBED_PREFIX: &str = "/embed/";
const BILIBILI_HOST: &str = "bilibili.com";
const BILIBILI_PLAYER_HOST: &str = "player.bilibili.com";

/// Identify which provider a link belongs to, if any
pub fn classify(url: &str) -> Option<Provider> {
    let lower = url.to_lowercase();
    if YOUTUBE_HOSTS.iter().any(|h| lower.contains(h)) {
        return Some(Provider::YouTube);
    }
    if lower.contains(BILIBILI_HOST) {
        return Some(Provider::Bilibili);
    }
    None
}

/// Whether a Bilibili link already points at the embeddable player
pub fn is_bilibili_player(url: &str) -> bool {
    url.to_lowercase().contains(BILIBILI_PLAYER_HOST)
}

/// Extract the video ID from a YouTube link
///
/// Handles `youtu.be/ID`, `youtube.com/watch?v=ID` and `youtube.com/embed/ID`.
pub fn youtube_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?;

    if host == YOUTUBE_SHORT_HOST {
        let id = parsed.path().strip_prefix('/').unwrap_or(parsed.path());
        return non_empty(id);
    }

    if host.contains("youtube.com") {
        if let Some(v) = query_value(&parsed, "v") {
            return Some(v);
        }
        if let Some(id) = parsed.path().strip_prefix(YOUTUBE_EMBED_PREFIX) {
            return non_empty(id);
        }
    }

    None
}

/// Extract the BV-id from a Bilibili link
///
/// Player links carry it in the `bvid` query parameter; video pages carry it
/// in the path segment following `video`.
pub fn bilibili_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;

    if parsed.host_str().is_some_and(|h| h.contains(BILIBILI_PLAYER_HOST)) {
        if let Some(bvid) = query_value(&parsed, "bvid") {
            return Some(bvid);
        }
    }

    bvid_from_path(&parsed)
}

fn bvid_from_path(url: &Url) -> Option<String> {
    let segments: Vec<&str> = url.path().split('/').filter(|s| !s.is_empty()).collect();
    let idx = segments.iter().position(|s| s.eq_ignore_ascii_case("video"))?;
    let next = segments.get(idx + 1)?;
    let id = next.split('?').next().unwrap_or(next);
    non_empty(id)
}

fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
