//! Catalog locators.
//!
//! A mapped entry's url is `{base}/Users/{userId}/Items/{itemId}#fragment`.
//! The fragment records the item kind so the episode list can later be
//! fetched the right way.

use crate::api::types::{Item, ItemType};
use crate::error::{Result, SourceError};
use url::Url;

const SERIES: &str = "series";
const MOVIE: &str = "movie";
const BOX_SET: &str = "boxSet";
const SEASON_PREFIX: &str = "seriesId,";

/// How an entry's episodes are listed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorKind {
    Series,
    Season { series_id: String },
    Movie,
    BoxSet,
    /// No fragment: the item is its own single episode
    Item,
}

impl LocatorKind {
    pub fn for_item(item: &Item) -> Self {
        match item.item_type {
            ItemType::Season => LocatorKind::Season {
                series_id: item.series_id.clone().unwrap_or_default(),
            },
            ItemType::Movie => LocatorKind::Movie,
            ItemType::BoxSet => LocatorKind::BoxSet,
            ItemType::Series => LocatorKind::Series,
            ItemType::Episode | ItemType::Other => LocatorKind::Item,
        }
    }

    fn fragment(&self) -> Option<String> {
        match self {
            LocatorKind::Series => Some(SERIES.to_string()),
            LocatorKind::Season { series_id } => Some(format!("{}{}", SEASON_PREFIX, series_id)),
            LocatorKind::Movie => Some(MOVIE.to_string()),
            LocatorKind::BoxSet => Some(BOX_SET.to_string()),
            LocatorKind::Item => None,
        }
    }

    fn from_fragment(fragment: Option<&str>) -> Self {
        match fragment {
            Some(SERIES) => LocatorKind::Series,
            Some(MOVIE) => LocatorKind::Movie,
            Some(BOX_SET) => LocatorKind::BoxSet,
            Some(f) if f.starts_with(SEASON_PREFIX) => LocatorKind::Season {
                series_id: f[SEASON_PREFIX.len()..].to_string(),
            },
            _ => LocatorKind::Item,
        }
    }
}

/// Decoded catalog locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLocator {
    pub item_id: String,
    pub kind: LocatorKind,
    /// Item URL without the fragment
    pub item_url: Url,
}

impl CatalogLocator {
    /// Build the locator url for an item owned by `user_id`
    pub fn build(base_url: &Url, user_id: &str, item_id: &str, kind: &LocatorKind) -> Url {
        let mut url = item_url(base_url, user_id, item_id);
        url.set_fragment(kind.fragment().as_deref());
        url
    }

    /// Decode a locator url produced by [`CatalogLocator::build`]
    pub fn parse(locator: &str) -> Result<Self> {
        let url = Url::parse(locator)?;

        let item_id = url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_string)
            .ok_or_else(|| SourceError::InvalidLocator(locator.to_string()))?;

        let kind = LocatorKind::from_fragment(url.fragment());

        let mut item_url = url;
        item_url.set_fragment(None);

        Ok(Self {
            item_id,
            kind,
            item_url,
        })
    }
}

/// `{base}/Users/{userId}/Items/{itemId}`
pub fn item_url(base_url: &Url, user_id: &str, item_id: &str) -> Url {
    let mut url = base_url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .extend(["Users", user_id, "Items", item_id]);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://10.20.30.50").unwrap()
    }

    #[test]
    fn test_fragments() {
        let cases = [
            (LocatorKind::Series, "http://10.20.30.50/Users/u1/Items/i1#series"),
            (LocatorKind::Movie, "http://10.20.30.50/Users/u1/Items/i1#movie"),
            (LocatorKind::BoxSet, "http://10.20.30.50/Users/u1/Items/i1#boxSet"),
            (
                LocatorKind::Season {
                    series_id: "s9".to_string(),
                },
                "http://10.20.30.50/Users/u1/Items/i1#seriesId,s9",
            ),
            (LocatorKind::Item, "http://10.20.30.50/Users/u1/Items/i1"),
        ];

        for (kind, expected) in cases {
            let url = CatalogLocator::build(&base(), "u1", "i1", &kind);
            assert_eq!(url.as_str(), expected);

            let parsed = CatalogLocator::parse(url.as_str()).unwrap();
            assert_eq!(parsed.kind, kind);
            assert_eq!(parsed.item_id, "i1");
            assert_eq!(parsed.item_url.as_str(), "http://10.20.30.50/Users/u1/Items/i1");
        }
    }

    #[test]
    fn test_unknown_fragment_is_plain_item() {
        let parsed = CatalogLocator::parse("http://host/Users/u1/Items/i1#whatever").unwrap();
        assert_eq!(parsed.kind, LocatorKind::Item);
    }

    #[test]
    fn test_invalid_locators() {
        assert!(matches!(
            CatalogLocator::parse("not a url"),
            Err(SourceError::Url(_))
        ));
        assert!(matches!(
            CatalogLocator::parse("http://host/"),
            Err(SourceError::InvalidLocator(_))
        ));
    }
}
