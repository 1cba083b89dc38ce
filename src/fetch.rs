//! HTTP access to the landing page, media descriptors and streams

use crate::config::HttpConfig;
use crate::stream::MediaDescriptor;
use crate::{Result, SandmannError};
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::{Client, Response};
use scraper::Html;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Byte stream of a media file together with what the server told about it
pub struct SourceStream {
    /// Size announced by the server
    pub content_length: Option<u64>,
    /// Content type announced by the server
    pub content_type: Option<String>,
    /// Body chunks
    pub body: BoxStream<'static, Result<Bytes>>,
}

impl std::fmt::Debug for SourceStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceStream")
            .field("content_length", &self.content_length)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Thin HTTP client; one request per call, no retries
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    /// Create a fetcher from the HTTP settings
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        // Per-read bound keeps long downloads alive but aborts a stalled body
        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client, timeout })
    }

    /// Fetch and parse the landing page
    pub async fn fetch_landing_page(&self, url: &Url) -> Result<Html> {
        info!("📄 Fetching landing page: {}", url);

        let html_content = self.get(url, Some(self.timeout)).await?.text().await?;
        debug!("📄 Downloaded {} characters of HTML content", html_content.len());

        Ok(Html::parse_document(&html_content))
    }

    /// Fetch and parse a media descriptor
    pub async fn fetch_descriptor(&self, url: &Url) -> Result<MediaDescriptor> {
        info!("🧾 Fetching media descriptor: {}", url);

        let json = self.get(url, Some(self.timeout)).await?.text().await?;
        debug!("🧾 Downloaded {} bytes of descriptor JSON", json.len());

        MediaDescriptor::from_json(&json)
    }

    /// Open the media stream; the body is read lazily by the caller
    pub async fn open_stream(&self, url: &Url) -> Result<SourceStream> {
        info!("🎬 Opening stream: {}", url);

        let response = self.get(url, None).await?;
        let content_length = response.content_length();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(SandmannError::from))
            .boxed();

        Ok(SourceStream {
            content_length,
            content_type,
            body,
        })
    }

    async fn get(&self, url: &Url, timeout: Option<Duration>) -> Result<Response> {
        let mut request = self.client.get(url.clone());
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?.error_for_status()?;
        Ok(response)
    }
}
