use async_trait::async_trait;
use eyre::{Result, bail};
use log::debug;
use serde::Deserialize;

use crate::config::{Config, DEFAULT_BILIBILI_API, DEFAULT_YOUTUBE_OEMBED};
use crate::host::MetadataSource;
use crate::provider;
use crate::{Provider, VideoMeta};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

#[derive(Debug, Deserialize)]
struct BilibiliViewResponse {
    code: i64,
    data: Option<BilibiliVideo>,
}

#[derive(Debug, Deserialize)]
struct BilibiliVideo {
    title: Option<String>,
    bvid: Option<String>,
    desc: Option<String>,
    owner: Option<BilibiliOwner>,
}

#[derive(Debug, Deserialize)]
struct BilibiliOwner {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    title: Option<String>,
    author_name: Option<String>,
}

/// Fetches video metadata from each provider's public API
#[derive(Debug, Clone)]
pub struct MetaClient {
    client: reqwest::Client,
    bilibili_api: String,
    youtube_oembed: String,
    user_agent: String,
}

impl Default for MetaClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

impl MetaClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            bilibili_api: DEFAULT_BILIBILI_API.to_string(),
            youtube_oembed: DEFAULT_YOUTUBE_OEMBED.to_string(),
            user_agent: USER_AGENT.to_string(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            bilibili_api: config.bilibili_api().to_string(),
            youtube_oembed: config.youtube_oembed().to_string(),
            user_agent: config.user_agent.clone().unwrap_or_else(|| USER_AGENT.to_string()),
        }
    }

    pub fn with_endpoints(mut self, bilibili_api: impl Into<String>, youtube_oembed: impl Into<String>) -> Self {
        self.bilibili_api = bilibili_api.into();
        self.youtube_oembed = youtube_oembed.into();
        self
    }

    /// Look up a Bilibili video; `None` when the BV-id is missing or the API
    /// does not answer with a successful payload
    pub async fn fetch_bilibili(&self, url: &str) -> Option<VideoMeta> {
        let bvid = provider::bilibili_id(url)?;
        match self.request_bilibili(&bvid).await {
            Ok(meta) => meta,
            Err(e) => {
                debug!("Bilibili metadata lookup for {bvid} failed: {e}");
                None
            }
        }
    }

    /// Look up a YouTube video through oEmbed; the description is always
    /// empty since oEmbed does not expose it
    pub async fn fetch_youtube(&self, url: &str) -> Option<VideoMeta> {
        match self.request_oembed(url).await {
            Ok(meta) => Some(meta),
            Err(e) => {
                debug!("YouTube metadata lookup for {url} failed: {e}");
                None
            }
        }
    }

    async fn request_bilibili(&self, bvid: &str) -> Result<Option<VideoMeta>> {
        let api_url = format!(
            "{}/x/web-interface/view?bvid={bvid}",
            self.bilibili_api.trim_end_matches('/')
        );
        debug!("Fetching Bilibili metadata: {api_url}");

        let resp: BilibiliViewResponse = self
            .client
            .get(&api_url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if resp.code != 0 {
            debug!("Bilibili API returned code {} for {bvid}", resp.code);
            return Ok(None);
        }
        let Some(data) = resp.data else {
            debug!("Bilibili API returned no data for {bvid}");
            return Ok(None);
        };

        let canonical_bvid = data.bvid.filter(|b| !b.is_empty()).unwrap_or_else(|| bvid.to_string());
        Ok(Some(VideoMeta {
            title: data.title.unwrap_or_default(),
            author: data.owner.and_then(|o| o.name).unwrap_or_default(),
            description: data.desc.unwrap_or_default(),
            canonical_url: format!("https://www.bilibili.com/video/{canonical_bvid}"),
            provider: Provider::Bilibili,
        }))
    }

    async fn request_oembed(&self, url: &str) -> Result<VideoMeta> {
        let api_url = format!("{}?url={}&format=json", self.youtube_oembed, urlencoding::encode(url));
        debug!("Fetching YouTube oEmbed: {api_url}");

        let resp = self
            .client
            .get(&api_url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;

        if !resp.status().is_success() {
            bail!("oEmbed returned {}", resp.status());
        }

        let body: OEmbedResponse = resp.json().await?;
        Ok(VideoMeta {
            title: body.title.unwrap_or_default(),
            author: body.author_name.unwrap_or_default(),
            description: String::new(),
            canonical_url: url.to_string(),
            provider: Provider::YouTube,
        })
    }
}

#[async_trait]
impl MetadataSource for MetaClient {
    async fn fetch(&self, provider: Provider, url: &str) -> Option<VideoMeta> {
        match provider {
            Provider::YouTube => self.fetch_youtube(url).await,
            Provider::Bilibili => self.fetch_bilibili(url).await,
        }
    }
}
