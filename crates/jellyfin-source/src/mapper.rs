//! Mapping of raw catalog records into normalized entities.

use crate::api::types::{Item, ItemType};
use crate::format::{date_part, format_bytes, format_seconds, html_to_text, parse_date_time, TICKS_PER_SECOND};
use crate::locator::{item_url, CatalogLocator, LocatorKind};
use crate::template;
use shared::config::EpisodeConfig;
use shared::{AnimeEntity, CompletionStatus, EpisodeDetail, EpisodeEntity};
use std::collections::{HashMap, HashSet};
use url::Url;

/// Separator between the parts of an episode's extra info line
const INFO_SEPARATOR: &str = " • ";

/// Episode number reported when the server has none
pub const UNKNOWN_EPISODE_NUMBER: f32 = -1.0;

/// `{base}/Items/{itemId}/Images/Primary?tag={tag}`
pub fn image_url(base_url: &Url, item_id: &str, tag: &str) -> String {
    let mut url = base_url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .extend(["Items", item_id, "Images", "Primary"]);
    }
    url.query_pairs_mut().append_pair("tag", tag);
    url.to_string()
}

/// Completion status from the raw status string (case-insensitive)
pub fn parse_status(status: Option<&str>) -> CompletionStatus {
    match status.map(str::to_lowercase).as_deref() {
        Some("ended") => CompletionStatus::Completed,
        Some("continuing") => CompletionStatus::Ongoing,
        _ => CompletionStatus::Unknown,
    }
}

/// Map a catalog item to an entry of the catalog
pub fn to_anime(item: &Item, base_url: &Url, user_id: &str) -> AnimeEntity {
    let locator = CatalogLocator::build(base_url, user_id, &item.id, &LocatorKind::for_item(item));

    let mut title = item.name.clone();
    let mut thumbnail_url = item
        .image_tags
        .primary
        .as_deref()
        .map(|tag| image_url(base_url, &item.id, tag));

    if item.item_type == ItemType::Season {
        if item.is_virtual() {
            title = item
                .series_name
                .clone()
                .unwrap_or_else(|| "Season".to_string());
        } else if let Some(series_name) = &item.series_name {
            title = format!("{} {}", series_name, item.name);
        }

        // Seasons without artwork borrow the series image
        if item.image_tags.primary.is_none() {
            if let (Some(series_id), Some(tag)) = (&item.series_id, &item.series_primary_image_tag) {
                thumbnail_url = Some(image_url(base_url, series_id, tag));
            }
        }
    }

    let status = if item.item_type == ItemType::Movie {
        CompletionStatus::Completed
    } else {
        parse_status(item.status.as_deref())
    };

    AnimeEntity {
        url: locator.to_string(),
        title,
        thumbnail_url,
        description: item.overview.as_deref().map(html_to_text),
        genre: item.genres.as_ref().map(|genres| genres.join(", ")),
        author: item.studios.as_ref().map(|studios| {
            studios
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }),
        status,
    }
}

/// How episode names and info lines are composed
#[derive(Debug, Clone)]
pub struct EpisodeFormat {
    pub template: String,
    pub prefix: String,
    pub details: HashSet<EpisodeDetail>,
}

impl Default for EpisodeFormat {
    fn default() -> Self {
        Self::from(&EpisodeConfig::default())
    }
}

impl From<&EpisodeConfig> for EpisodeFormat {
    fn from(config: &EpisodeConfig) -> Self {
        Self {
            template: config.template.clone(),
            prefix: config.prefix.clone(),
            details: config.details.iter().copied().collect(),
        }
    }
}

/// Placeholder values available to episode templates
pub fn episode_values(item: &Item, prefix: &str) -> HashMap<&'static str, String> {
    let runtime_secs = item.run_time_ticks.map(|ticks| ticks / TICKS_PER_SECOND);
    let size_bytes = item.first_media_source().and_then(|source| source.size);

    let mut title = prefix.to_string();
    if item.item_type != ItemType::Movie {
        title.push_str(&item.name);
    }

    let type_name = item.item_type.as_str();

    HashMap::from([
        ("title", title),
        ("originalTitle", item.original_title.clone().unwrap_or_default()),
        ("sortTitle", item.sort_name.clone().unwrap_or_default()),
        ("type", type_name.to_string()),
        ("typeShort", type_name.replace("Episode", "Ep.")),
        ("seriesTitle", item.series_name.clone().unwrap_or_default()),
        ("seasonTitle", item.season_name.clone().unwrap_or_default()),
        ("number", item.index_number.map(|n| n.to_string()).unwrap_or_default()),
        ("createdDate", item.date_created.as_deref().map(date_part).unwrap_or_default().to_string()),
        ("releaseDate", item.premiere_date.as_deref().map(date_part).unwrap_or_default().to_string()),
        ("size", size_bytes.map(format_bytes).unwrap_or_default()),
        ("sizeBytes", size_bytes.map(|b| b.to_string()).unwrap_or_default()),
        ("runtime", runtime_secs.map(format_seconds).unwrap_or_default()),
        ("runtimeS", runtime_secs.map(|s| s.to_string()).unwrap_or_default()),
    ])
}

/// Map an item to an episode of its parent entry
pub fn to_episode(item: &Item, base_url: &Url, user_id: &str, format: &EpisodeFormat) -> EpisodeEntity {
    let values = episode_values(item, &format.prefix);
    let name = template::render(&format.template, &values);

    let size = item
        .first_media_source()
        .and_then(|source| source.size)
        .map(format_bytes)
        .filter(|s| !s.is_empty());
    let runtime = item
        .run_time_ticks
        .map(|ticks| format_seconds(ticks / TICKS_PER_SECOND));

    let mut extra_info = Vec::new();
    if format.details.contains(&EpisodeDetail::Overview) && item.item_type == ItemType::Episode {
        if let Some(overview) = &item.overview {
            extra_info.push(overview.clone());
        }
    }
    if format.details.contains(&EpisodeDetail::Size) {
        extra_info.extend(size);
    }
    if format.details.contains(&EpisodeDetail::Runtime) {
        extra_info.extend(runtime);
    }

    let episode_number = if item.item_type == ItemType::Movie {
        1.0
    } else {
        item.index_number
            .map(|n| n as f32)
            .unwrap_or(UNKNOWN_EPISODE_NUMBER)
    };

    EpisodeEntity {
        name,
        url: item_url(base_url, user_id, &item.id).to_string(),
        extra_info: extra_info.join(INFO_SEPARATOR),
        release_timestamp: item.premiere_date.as_deref().map(parse_date_time),
        episode_number,
    }
}
