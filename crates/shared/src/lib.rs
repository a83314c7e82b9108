//! Shared library for the Jellyfin catalog source.
//!
//! This crate provides common functionality used by the source crate and its CLI:
//! - Configuration management
//! - Persistent preference storage
//! - Normalized catalog entities
//! - Logging infrastructure

pub mod config;
pub mod logging;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use config::{Config, EpisodeDetail};
pub use logging::LogConfig;
pub use models::*;
pub use store::PreferenceStore;

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
