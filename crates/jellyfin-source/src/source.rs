//! Catalog source orchestrator.
//!
//! Ties the client, mapper and media resolver together into the operations the
//! presentation layer calls: listing pages, details, episodes and videos.
//! Each operation resolves the session once and reuses it for all its requests.

use crate::api::{DeviceIdentity, Item, JellyfinClient, SessionManager};
use crate::error::Result;
use crate::locator::{CatalogLocator, LocatorKind};
use crate::mapper::{self, EpisodeFormat};
use crate::media;
use crate::pagination::{has_more, ListQuery, SortDirection, SortField};
use anyhow::Context;
use futures::future::join_all;
use serde::Serialize;
use shared::config::CategoryConfig;
use shared::{AnimeEntity, AnimesPage, Config, EpisodeEntity, PreferenceStore, Video};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Filter selections for a search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// Library folder to search in
    pub parent_id: Option<String>,
    pub sort: Option<(SortField, SortDirection)>,
}

/// Filter choices offered to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterList {
    pub categories: Vec<String>,
    pub sort: Vec<&'static str>,
}

/// Jellyfin catalog source
pub struct JellyfinSource {
    client: JellyfinClient,
    episode_format: EpisodeFormat,
    categories: Vec<CategoryConfig>,
}

impl JellyfinSource {
    /// Create a new source
    pub fn new(
        client: JellyfinClient,
        episode_format: EpisodeFormat,
        categories: Vec<CategoryConfig>,
    ) -> Self {
        Self {
            client,
            episode_format,
            categories,
        }
    }

    /// Build a source from configuration, restoring identity and session from the store
    pub fn from_config(config: &Config, store: Arc<PreferenceStore>) -> anyhow::Result<Self> {
        let device = DeviceIdentity::load_or_create(&store, &config.client)
            .context("Failed to load device identity")?;
        let session = SessionManager::new(store).context("Failed to restore session")?;

        let client = JellyfinClient::new(
            &config.server.base_url,
            config.server.username.clone(),
            config.server.password.clone(),
            device,
            session,
            Duration::from_secs(config.server.timeout_secs),
            config.session.fail_fast,
        )
        .context("Failed to create Jellyfin client")?;

        Ok(Self::new(
            client,
            EpisodeFormat::from(&config.episodes),
            config.catalog.categories.clone(),
        ))
    }

    pub fn client(&self) -> &JellyfinClient {
        &self.client
    }

    /// Library folders offered as the category filter
    pub fn categories(&self) -> &[CategoryConfig] {
        &self.categories
    }

    /// Parent id of a category, matched by name (case-insensitive)
    pub fn category_id(&self, name: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| c.parent_id.as_str())
    }

    /// Sort options offered by the sort filter
    pub fn sort_options(&self) -> &'static [SortField] {
        &SortField::SELECTABLE
    }

    /// Category names and sort labels, in display order
    pub fn filters(&self) -> FilterList {
        FilterList {
            categories: self.categories.iter().map(|c| c.name.clone()).collect(),
            sort: self.sort_options().iter().map(|s| s.label()).collect(),
        }
    }

    /// Default catalog listing
    pub async fn popular(&self, page: u32) -> Result<AnimesPage> {
        self.search(page, "", &SearchFilters::default()).await
    }

    /// Most recently added entries first
    pub async fn latest(&self, page: u32) -> Result<AnimesPage> {
        let query = ListQuery::page(page).sorted(SortField::RecentlyAdded, SortDirection::Descending);
        self.fetch_page(query).await
    }

    /// Free-text search with optional folder and sort filters
    pub async fn search(&self, page: u32, term: &str, filters: &SearchFilters) -> Result<AnimesPage> {
        let mut query = ListQuery::page(page).matching(term);
        if let Some(parent_id) = &filters.parent_id {
            query = query.in_folder(parent_id.clone());
        }
        if let Some((field, direction)) = filters.sort {
            query = query.sorted(field, direction);
        }
        self.fetch_page(query).await
    }

    async fn fetch_page(&self, query: ListQuery) -> Result<AnimesPage> {
        let session = self.client.session().await?;
        let list = self.client.get_items(&query, &session).await?;
        let base_url = self.client.base_url();

        let animes = list
            .items
            .iter()
            .map(|item| mapper::to_anime(item, base_url, &session.user_id))
            .collect::<Vec<_>>();

        info!(
            page = query.page,
            items = animes.len(),
            total = list.total_record_count,
            "Catalog page fetched"
        );

        Ok(AnimesPage {
            animes,
            has_next_page: has_more(query.page, list.total_record_count),
        })
    }

    /// Refresh an entry from its locator
    pub async fn anime_details(&self, locator: &str) -> Result<AnimeEntity> {
        let locator = CatalogLocator::parse(locator)?;
        let session = self.client.session().await?;
        let item = self.client.get_item(locator.item_url, &session).await?;
        Ok(mapper::to_anime(&item, self.client.base_url(), &session.user_id))
    }

    /// Refresh several entries concurrently
    pub async fn animes_details(&self, locators: &[String]) -> Vec<Result<AnimeEntity>> {
        join_all(locators.iter().map(|locator| self.anime_details(locator))).await
    }

    /// Episodes of an entry, newest first
    pub async fn episode_list(&self, locator: &str) -> Result<Vec<EpisodeEntity>> {
        let locator = CatalogLocator::parse(locator)?;
        let session = self.client.session().await?;

        debug!(item_id = %locator.item_id, kind = ?locator.kind, "Listing episodes");

        let items: Vec<Item> = match &locator.kind {
            LocatorKind::Series => {
                self.client
                    .get_show_episodes(&locator.item_id, None, &session)
                    .await?
                    .items
            }
            LocatorKind::Season { series_id } if !series_id.is_empty() => {
                self.client
                    .get_show_episodes(series_id, Some(&locator.item_id), &session)
                    .await?
                    .items
            }
            LocatorKind::BoxSet => {
                self.client
                    .get_children(&locator.item_id, &session)
                    .await?
                    .items
            }
            _ => vec![self.client.get_item(locator.item_url.clone(), &session).await?],
        };

        let base_url = self.client.base_url();
        let episodes = items
            .iter()
            .rev()
            .map(|item| mapper::to_episode(item, base_url, &session.user_id, &self.episode_format))
            .collect::<Vec<_>>();

        info!(item_id = %locator.item_id, episodes = episodes.len(), "Episodes fetched");
        Ok(episodes)
    }

    /// Playable videos of an episode
    pub async fn video_list(&self, episode_url: &str) -> Result<Vec<Video>> {
        let locator = CatalogLocator::parse(episode_url)?;
        let session = self.client.session().await?;
        let item = self.client.get_item(locator.item_url, &session).await?;

        let header = self.client.auth_header_for(&session);

        let videos = media::resolve_videos(&item, self.client.base_url(), &header);
        info!(item_id = %item.id, videos = videos.len(), "Videos resolved");
        Ok(videos)
    }
}
