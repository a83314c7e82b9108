//! Jellyfin catalog source.
//!
//! This library browses a Jellyfin media server as a catalog of series,
//! seasons and movies, maps the raw records into normalized entities and
//! resolves direct-stream URLs for playback.

pub mod api;
pub mod error;
pub mod format;
pub mod locator;
pub mod mapper;
pub mod media;
pub mod pagination;
pub mod source;
pub mod template;

pub use api::{DeviceIdentity, JellyfinClient, Session, SessionManager};
pub use error::{LoginError, Result, SourceError};
pub use locator::{CatalogLocator, LocatorKind};
pub use mapper::EpisodeFormat;
pub use pagination::{ListQuery, SortDirection, SortField, PAGE_SIZE};
pub use source::{FilterList, JellyfinSource, SearchFilters};
