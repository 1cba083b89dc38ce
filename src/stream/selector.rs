use super::{MediaDescriptor, StreamEntry, StreamRef};
use crate::{Result, SandmannError};
use tracing::debug;
use url::Url;

/// Picks the highest quality stream of a media descriptor
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamSelector;

impl StreamSelector {
    pub fn new() -> Self {
        Self
    }

    /// URL of the best stream in the first media group
    pub fn select_best(&self, descriptor: &MediaDescriptor) -> Result<Url> {
        let entry = self.best_entry(descriptor)?;

        let raw = entry
            .stream
            .as_ref()
            .and_then(StreamRef::primary)
            .ok_or_else(|| SandmannError::MalformedDescriptor("selected stream has no _stream".to_string()))?;

        debug!("Selected stream with quality {}: {}", entry.quality, raw);

        Url::parse(raw).map_err(|source| SandmannError::InvalidUrl {
            url: raw.to_string(),
            source,
        })
    }

    /// Entry with the highest quality; the first one wins on ties
    pub fn best_entry<'a>(&self, descriptor: &'a MediaDescriptor) -> Result<&'a StreamEntry> {
        let streams = descriptor.streams()?;

        let mut best = &streams[0];
        for entry in &streams[1..] {
            if entry.quality > best.quality {
                best = entry;
            }
        }

        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::Quality;
    use serde_json::json;

    fn descriptor(streams: serde_json::Value) -> MediaDescriptor {
        let doc = json!({ "_mediaArray": [{ "_mediaStreamArray": streams }] });
        MediaDescriptor::from_json(&doc.to_string()).unwrap()
    }

    #[test]
    fn test_highest_fixed_quality_wins() {
        let descriptor = descriptor(json!([
            {"_quality": 240, "_stream": "https://media.example/240.mp4"},
            {"_quality": 480, "_stream": "https://media.example/480.mp4"},
            {"_quality": 720, "_stream": "https://media.example/720.mp4"},
            {"_quality": "auto", "_stream": "https://media.example/master.m3u8"}
        ]));

        let url = StreamSelector::new().select_best(&descriptor).unwrap();
        assert_eq!(url.as_str(), "https://media.example/720.mp4");
    }

    #[test]
    fn test_all_auto_picks_first() {
        let descriptor = descriptor(json!([
            {"_quality": "auto", "_stream": "https://media.example/first.m3u8"},
            {"_quality": "auto", "_stream": "https://media.example/second.m3u8"}
        ]));

        let url = StreamSelector::new().select_best(&descriptor).unwrap();
        assert_eq!(url.as_str(), "https://media.example/first.m3u8");
    }

    #[test]
    fn test_ties_pick_first_in_array_order() {
        let descriptor = descriptor(json!([
            {"_quality": 3, "_stream": "https://media.example/a.mp4"},
            {"_quality": 3, "_stream": "https://media.example/b.mp4"},
            {"_quality": 1, "_stream": "https://media.example/c.mp4"}
        ]));

        let entry = StreamSelector::new().best_entry(&descriptor).unwrap();
        assert_eq!(entry.quality, Quality::Fixed(3));
        assert_eq!(entry.stream.as_ref().and_then(StreamRef::primary), Some("https://media.example/a.mp4"));
    }

    #[test]
    fn test_auto_before_fixed_is_not_chosen() {
        let descriptor = descriptor(json!([
            {"_quality": "auto", "_stream": "https://media.example/master.m3u8"},
            {"_quality": 0, "_stream": "https://media.example/0.mp4"}
        ]));

        let url = StreamSelector::new().select_best(&descriptor).unwrap();
        assert_eq!(url.as_str(), "https://media.example/0.mp4");
    }

    #[test]
    fn test_empty_stream_array_is_malformed() {
        let err = StreamSelector::new().select_best(&descriptor(json!([]))).unwrap_err();
        assert!(matches!(err, SandmannError::MalformedDescriptor(_)));
        assert!(err.to_string().contains("_mediaStreamArray"));
    }

    #[test]
    fn test_empty_media_array_is_malformed() {
        let descriptor = MediaDescriptor::from_json(r#"{"_mediaArray": []}"#).unwrap();
        let err = StreamSelector::new().select_best(&descriptor).unwrap_err();
        assert!(matches!(err, SandmannError::MalformedDescriptor(_)));
    }

    #[test]
    fn test_missing_stream_field_is_malformed() {
        let descriptor = descriptor(json!([{"_quality": 720}]));
        let err = StreamSelector::new().select_best(&descriptor).unwrap_err();
        assert!(err.to_string().contains("_stream"));
    }

    #[test]
    fn test_relative_stream_url_is_rejected() {
        let descriptor = descriptor(json!([{"_quality": 720, "_stream": "/720.mp4"}]));
        let err = StreamSelector::new().select_best(&descriptor).unwrap_err();
        assert!(matches!(err, SandmannError::InvalidUrl { .. }));
    }

    #[test]
    fn test_only_first_media_group_is_considered() {
        let doc = json!({ "_mediaArray": [
            { "_mediaStreamArray": [{"_quality": 1, "_stream": "https://media.example/first-group.mp4"}] },
            { "_mediaStreamArray": [{"_quality": 9, "_stream": "https://media.example/second-group.mp4"}] }
        ]});
        let descriptor = MediaDescriptor::from_json(&doc.to_string()).unwrap();

        let url = StreamSelector::new().select_best(&descriptor).unwrap();
        assert_eq!(url.as_str(), "https://media.example/first-group.mp4");
    }
}
