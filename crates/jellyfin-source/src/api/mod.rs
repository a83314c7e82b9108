//! Jellyfin API client implementation.
//!
//! This module provides the authenticated request pipeline, the session and
//! authorization header handling, and the raw API payload types.

pub mod auth;
pub mod client;
pub mod types;

pub use auth::{auth_header, DeviceIdentity, Session, SessionManager};
pub use client::JellyfinClient;
pub use types::*;
