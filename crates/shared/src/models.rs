//! Normalized catalog entities.
//!
//! These are the types handed to the presentation layer. They are derived per
//! request from raw server records and owned by the caller.

use serde::{Deserialize, Serialize};

/// Airing/completion status of a catalog entry
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompletionStatus {
    #[default]
    Unknown,
    Ongoing,
    Completed,
}

impl std::fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompletionStatus::Unknown => write!(f, "unknown"),
            CompletionStatus::Ongoing => write!(f, "ongoing"),
            CompletionStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A series, season, movie or box set as shown in the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnimeEntity {
    /// Locator: item URL whose fragment records how episodes are fetched
    pub url: String,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub author: Option<String>,
    pub status: CompletionStatus,
}

/// One playable entry of an [`AnimeEntity`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EpisodeEntity {
    pub name: String,
    pub url: String,
    /// Bullet-separated extra details (overview, size, runtime)
    pub extra_info: String,
    /// Release time in milliseconds since the Unix epoch
    pub release_timestamp: Option<i64>,
    /// Episode number, -1 when unknown
    pub episode_number: f32,
}

/// A playable stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Video {
    pub url: String,
    pub quality: String,
    pub video_url: String,
    /// Headers the player must send with the stream request
    pub headers: Vec<(String, String)>,
}

/// One page of catalog results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimesPage {
    pub animes: Vec<AnimeEntity>,
    pub has_next_page: bool,
}
