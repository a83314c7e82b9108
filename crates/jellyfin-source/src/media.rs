//! Playback URL resolution.
//!
//! Only the original file is offered: the first media source is streamed
//! statically, without transcoding.

use crate::api::client::join_segments;
use crate::api::types::Item;
use shared::Video;
use tracing::debug;
use url::Url;

/// Quality label of the direct stream
pub const SOURCE_QUALITY: &str = "Source";

/// `{base}/Videos/{itemId}/stream?static=True`
pub fn stream_url(base_url: &Url, item_id: &str) -> Url {
    let mut url = join_segments(base_url, &["Videos", item_id, "stream"]);
    url.query_pairs_mut().append_pair("static", "True");
    url
}

/// Playable videos for an item, or none if it has no media source
pub fn resolve_videos(item: &Item, base_url: &Url, auth_header: &str) -> Vec<Video> {
    if item.first_media_source().is_none() {
        debug!(item_id = %item.id, "Item has no media sources");
        return Vec::new();
    }

    let url = stream_url(base_url, &item.id).to_string();
    vec![Video {
        url: url.clone(),
        quality: SOURCE_QUALITY.to_string(),
        video_url: url,
        headers: vec![("Authorization".to_string(), auth_header.to_string())],
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{ImageTags, ItemType, MediaSource};

    fn episode(media_sources: Option<Vec<MediaSource>>) -> Item {
        Item {
            id: "ep1".to_string(),
            name: "Pilot".to_string(),
            item_type: ItemType::Episode,
            location_type: "FileSystem".to_string(),
            image_tags: ImageTags::default(),
            series_id: None,
            series_name: None,
            season_name: None,
            series_primary_image_tag: None,
            status: None,
            overview: None,
            genres: None,
            studios: None,
            original_title: None,
            sort_name: None,
            index_number: None,
            premiere_date: None,
            run_time_ticks: None,
            date_created: None,
            media_sources,
        }
    }

    fn source() -> MediaSource {
        MediaSource {
            id: Some("ms1".to_string()),
            size: Some(1_000_000),
            bitrate: Some(8_000_000),
            transcoding_url: None,
            supports_transcoding: true,
            supports_direct_stream: true,
            media_streams: Vec::new(),
        }
    }

    #[test]
    fn test_stream_url() {
        let base = Url::parse("http://10.20.30.50").unwrap();
        assert_eq!(
            stream_url(&base, "ep1").as_str(),
            "http://10.20.30.50/Videos/ep1/stream?static=True"
        );
    }

    #[test]
    fn test_single_source_video() {
        let base = Url::parse("http://10.20.30.50").unwrap();
        let videos = resolve_videos(&episode(Some(vec![source(), source()])), &base, "MediaBrowser x");

        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].quality, "Source");
        assert_eq!(videos[0].url, videos[0].video_url);
        assert_eq!(
            videos[0].headers,
            vec![("Authorization".to_string(), "MediaBrowser x".to_string())]
        );
    }

    #[test]
    fn test_no_media_sources() {
        let base = Url::parse("http://10.20.30.50").unwrap();
        assert!(resolve_videos(&episode(None), &base, "h").is_empty());
        assert!(resolve_videos(&episode(Some(Vec::new())), &base, "h").is_empty());
    }
}
