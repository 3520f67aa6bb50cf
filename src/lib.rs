pub mod citation;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod dom;
pub mod embed;
pub mod host;
pub mod meta;
pub mod provider;
pub mod render;
pub mod timestamp;

use serde::Serialize;

/// Supported video host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    YouTube,
    Bilibili,
}

impl Provider {
    /// Name shown to the user in notifications
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::YouTube => "YouTube",
            Provider::Bilibili => "Bilibili",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::YouTube => write!(f, "youtube"),
            Provider::Bilibili => write!(f, "bilibili"),
        }
    }
}

/// Metadata describing a single video, fetched once at insertion time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoMeta {
    pub title: String,
    pub author: String,
    pub description: String,
    pub canonical_url: String,
    pub provider: Provider,
}
