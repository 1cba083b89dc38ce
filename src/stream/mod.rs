/// Media descriptor model and stream selection
///
/// The descriptor is the JSON document the teaser links point at. Only the
/// fields needed to pick a stream are modelled; everything else is ignored.

pub mod selector;

pub use selector::StreamSelector;

use crate::{Result, SandmannError};
use serde::Deserialize;
use serde_json::Value;

/// Media descriptor of a single episode
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaDescriptor {
    #[serde(rename = "_mediaArray", default)]
    pub media_array: Option<Vec<MediaEntry>>,
}

/// One media group of a descriptor
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaEntry {
    #[serde(rename = "_mediaStreamArray", default)]
    pub stream_array: Option<Vec<StreamEntry>>,
}

/// One playable rendition of the episode
#[derive(Debug, Clone, Deserialize)]
pub struct StreamEntry {
    #[serde(rename = "_quality", default)]
    pub quality: Quality,
    #[serde(rename = "_stream", default)]
    pub stream: Option<StreamRef>,
}

/// Stream location; some descriptors list mirrors instead of a single URL
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StreamRef {
    Single(String),
    Mirrors(Vec<String>),
}

impl StreamRef {
    /// Primary location of the stream
    pub fn primary(&self) -> Option<&str> {
        match self {
            StreamRef::Single(url) => Some(url.as_str()),
            StreamRef::Mirrors(urls) => urls.first().map(String::as_str),
        }
    }
}

/// Stream quality as published in `_quality`
///
/// Variant order defines the ranking: `Auto` sorts below every fixed quality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(from = "Value")]
pub enum Quality {
    /// Adaptive stream (`"auto"` or anything non-numeric)
    #[default]
    Auto,
    /// Fixed quality level, higher is better
    Fixed(i64),
}

impl From<Value> for Quality {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => n.as_i64().map(Quality::Fixed).unwrap_or(Quality::Auto),
            Value::String(s) => s.trim().parse().map(Quality::Fixed).unwrap_or(Quality::Auto),
            _ => Quality::Auto,
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quality::Auto => write!(f, "auto"),
            Quality::Fixed(level) => write!(f, "{}", level),
        }
    }
}

impl MediaDescriptor {
    /// Parse a descriptor document
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SandmannError::MalformedDescriptor(format!("invalid JSON: {}", e)))
    }

    /// Stream entries of the first media group
    pub fn streams(&self) -> Result<&[StreamEntry]> {
        let media = self
            .media_array
            .as_deref()
            .ok_or_else(|| SandmannError::MalformedDescriptor("missing _mediaArray".to_string()))?;

        let first = media
            .first()
            .ok_or_else(|| SandmannError::MalformedDescriptor("empty _mediaArray".to_string()))?;

        let streams = first.stream_array.as_deref().ok_or_else(|| {
            SandmannError::MalformedDescriptor("missing _mediaArray[0]._mediaStreamArray".to_string())
        })?;

        if streams.is_empty() {
            return Err(SandmannError::MalformedDescriptor(
                "empty _mediaArray[0]._mediaStreamArray".to_string(),
            ));
        }

        Ok(streams)
    }
}
