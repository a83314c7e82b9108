//! Jellyfin API response types.
//!
//! These types represent the JSON payloads of the Jellyfin HTTP API, which uses
//! PascalCase field names. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Kind of catalog item.
///
/// Unknown type names decode to [`ItemType::Other`] so new server-side types
/// never surface as raw strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum ItemType {
    BoxSet,
    Movie,
    Season,
    Series,
    Episode,
    Other,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::BoxSet => "BoxSet",
            ItemType::Movie => "Movie",
            ItemType::Season => "Season",
            ItemType::Series => "Series",
            ItemType::Episode => "Episode",
            ItemType::Other => "Other",
        }
    }

    /// Case-insensitive lookup with [`ItemType::Other`] as the fallback
    pub fn parse(value: &str) -> Self {
        [
            ItemType::BoxSet,
            ItemType::Movie,
            ItemType::Season,
            ItemType::Series,
            ItemType::Episode,
        ]
        .into_iter()
        .find(|t| t.as_str().eq_ignore_ascii_case(value))
        .unwrap_or(ItemType::Other)
    }
}

impl From<String> for ItemType {
    fn from(value: String) -> Self {
        ItemType::parse(&value)
    }
}

impl From<ItemType> for String {
    fn from(value: ItemType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paged item listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemList {
    pub items: Vec<Item>,
    #[serde(default)]
    pub total_record_count: u32,
}

/// Raw catalog record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(rename = "Type")]
    pub item_type: ItemType,
    pub location_type: String,
    pub image_tags: ImageTags,
    pub series_id: Option<String>,
    pub series_name: Option<String>,
    pub season_name: Option<String>,
    pub series_primary_image_tag: Option<String>,
    pub status: Option<String>,
    pub overview: Option<String>,
    pub genres: Option<Vec<String>>,
    pub studios: Option<Vec<Studio>>,
    pub original_title: Option<String>,
    pub sort_name: Option<String>,
    pub index_number: Option<i32>,
    pub premiere_date: Option<String>,
    pub run_time_ticks: Option<i64>,
    pub date_created: Option<String>,
    pub media_sources: Option<Vec<MediaSource>>,
}

impl Item {
    /// A season placeholder without concrete media
    pub fn is_virtual(&self) -> bool {
        self.location_type == "Virtual"
    }

    pub fn first_media_source(&self) -> Option<&MediaSource> {
        self.media_sources.as_ref().and_then(|sources| sources.first())
    }
}

/// Image tags of an item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageTags {
    pub primary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Studio {
    pub name: String,
}

/// A playable file of an item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaSource {
    pub id: Option<String>,
    pub size: Option<i64>,
    pub bitrate: Option<i64>,
    pub transcoding_url: Option<String>,
    pub supports_transcoding: bool,
    pub supports_direct_stream: bool,
    pub media_streams: Vec<MediaStream>,
}

/// Audio, video or subtitle stream inside a media source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaStream {
    pub codec: String,
    pub index: i32,
    #[serde(rename = "Type")]
    pub stream_type: String,
    pub supports_external_stream: bool,
    pub is_external: bool,
    pub language: Option<String>,
    pub display_title: Option<String>,
    pub bit_rate: Option<i64>,
}

/// Body of `POST /Users/AuthenticateByName`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    #[serde(rename = "Username")]
    pub username: &'a str,
    #[serde(rename = "Pw")]
    pub password: &'a str,
}

/// Response of `POST /Users/AuthenticateByName`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub session_info: LoginSessionInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginSessionInfo {
    pub user_id: String,
}
