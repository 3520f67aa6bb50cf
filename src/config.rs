use std::path::PathBuf;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BILIBILI_API: &str = "https://api.bilibili.com";
pub const DEFAULT_YOUTUBE_OEMBED: &str = "https://www.youtube.com/oembed";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub bilibili_api: Option<String>,
    pub youtube_oembed: Option<String>,
    pub user_agent: Option<String>,
}

impl Config {
    /// Load config from ~/.config/vls/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    pub fn bilibili_api(&self) -> &str {
        self.bilibili_api.as_deref().unwrap_or(DEFAULT_BILIBILI_API)
    }

    pub fn youtube_oembed(&self) -> &str {
        self.youtube_oembed.as_deref().unwrap_or(DEFAULT_YOUTUBE_OEMBED)
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("vls")
        .join("config.toml")
}
