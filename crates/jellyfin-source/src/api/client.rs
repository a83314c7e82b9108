//! Jellyfin API client with automatic session handling.
//!
//! Every request except the login itself goes through [`JellyfinClient::execute`],
//! which makes sure a session exists and attaches the `Authorization` header.
//! Catalog operations resolve the session once and hand it to the typed
//! getters, so a single operation never triggers more than one login.
//! There is no retry and no re-authentication on 401.

use super::auth::{auth_header, DeviceIdentity, Session, SessionManager};
use super::types::{Item, ItemList, LoginRequest, LoginResponse};
use crate::error::{LoginError, Result, SourceError};
use crate::pagination::ListQuery;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, Request, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const LOGIN_PATH: &str = "AuthenticateByName";

/// Extra fields requested for episode listings
const EPISODE_FIELDS: &str = "DateCreated,OriginalTitle,SortName,Overview,MediaSources";

/// Longest error body kept in [`SourceError::Status`]
const MAX_ERROR_BODY: usize = 512;

/// Whether a request targets the login endpoint
pub fn is_login_request(url: &Url) -> bool {
    url.path().contains(LOGIN_PATH)
}

/// Append path segments to a base URL
pub fn join_segments(base_url: &Url, segments: &[&str]) -> Url {
    let mut url = base_url.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Jellyfin HTTP API client
pub struct JellyfinClient {
    /// HTTP client
    http: Client,
    /// Server base URL
    base_url: Url,
    /// Account used for the automatic login
    username: String,
    password: String,
    /// Identity reported in the authorization header
    device: DeviceIdentity,
    /// Cached session
    session: SessionManager,
    /// Fail requests when no session can be established
    fail_fast: bool,
}

impl JellyfinClient {
    /// Create a new Jellyfin client
    pub fn new(
        base_url: &str,
        username: String,
        password: String,
        device: DeviceIdentity,
        session: SessionManager,
        timeout: Duration,
        fail_fast: bool,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(format!("{}/{}", device.client_name, device.version))
            .build()
            .map_err(|source| SourceError::Transport {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            username,
            password,
            device,
            session,
            fail_fast,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn device(&self) -> &DeviceIdentity {
        &self.device
    }

    pub fn session_manager(&self) -> &SessionManager {
        &self.session
    }

    /// Authorization header value for a session
    pub fn auth_header_for(&self, session: &Session) -> String {
        let token = Some(session.access_token.as_str()).filter(|t| !t.is_empty());
        auth_header(&self.device, token)
    }

    /// Current session, logging in if none is cached.
    ///
    /// With fail-fast disabled a failed login yields an empty session instead
    /// of an error.
    pub async fn session(&self) -> Result<Session> {
        match self.session.ensure_with(|| self.login()).await {
            Ok(session) => Ok(session),
            Err(e) if self.fail_fast => Err(SourceError::Login(e)),
            Err(e) => {
                warn!(error = %e, "Continuing without a session");
                Ok(Session::default())
            }
        }
    }

    /// Log in with the configured account
    async fn login(&self) -> std::result::Result<Session, LoginError> {
        let url = join_segments(&self.base_url, &["Users", LOGIN_PATH]);
        info!(url = %url, user = %self.username, "Authenticating");

        let request = self
            .http
            .post(url)
            .header(AUTHORIZATION, auth_header(&self.device, None))
            .json(&LoginRequest {
                username: &self.username,
                password: &self.password,
            })
            .build()
            .map_err(|e| LoginError::Transport(e.to_string()))?;

        let response = self
            .send(request)
            .await
            .map_err(|e| LoginError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoginError::Rejected(status.as_u16()));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| LoginError::Malformed(e.to_string()))?;

        Ok(Session {
            access_token: body.access_token,
            user_id: body.session_info.user_id,
        })
    }

    /// Send a request through the pipeline.
    ///
    /// Login requests pass through unmodified; all others get a session and
    /// the `Authorization` header first.
    pub async fn execute(&self, request: Request) -> Result<Response> {
        if is_login_request(request.url()) {
            return self.send(request).await;
        }

        let session = self.session().await?;
        self.execute_with(request, &session).await
    }

    /// Send a request with the header for an already resolved session
    pub async fn execute_with(&self, mut request: Request, session: &Session) -> Result<Response> {
        let header = HeaderValue::from_str(&self.auth_header_for(session))?;
        request.headers_mut().insert(AUTHORIZATION, header);

        self.send(request).await
    }

    async fn send(&self, request: Request) -> Result<Response> {
        let url = request.url().to_string();
        debug!(method = %request.method(), url = %url, "Making API request");

        self.http
            .execute(request)
            .await
            .map_err(|source| SourceError::Transport { url, source })
    }

    /// GET a URL as `session` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url, session: &Session) -> Result<T> {
        let request = self
            .http
            .get(url.clone())
            .build()
            .map_err(|source| SourceError::Transport {
                url: url.to_string(),
                source,
            })?;

        let response = self.execute_with(request, session).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            warn!(url = %url, status = %status, error = %body, "Request failed");

            return Err(SourceError::Status {
                url: url.to_string(),
                status,
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| SourceError::Transport {
                url: url.to_string(),
                source,
            })?;

        let data = serde_json::from_slice(&bytes).map_err(|source| {
            warn!(url = %url, error = %source, "Failed to parse response");
            SourceError::Decode {
                url: url.to_string(),
                source,
            }
        })?;

        debug!(url = %url, "Request successful");
        Ok(data)
    }

    /// Fetch one page of the catalog listing
    pub async fn get_items(&self, query: &ListQuery, session: &Session) -> Result<ItemList> {
        let url = query.to_url(&self.base_url, &session.user_id);
        info!(page = query.page, "Fetching catalog page");
        self.get_json(url, session).await
    }

    /// Fetch a single item by URL
    pub async fn get_item(&self, url: Url, session: &Session) -> Result<Item> {
        debug!(url = %url, "Fetching item");
        self.get_json(url, session).await
    }

    /// Fetch the episodes of a series, optionally restricted to one season
    pub async fn get_show_episodes(
        &self,
        series_id: &str,
        season_id: Option<&str>,
        session: &Session,
    ) -> Result<ItemList> {
        let mut url = join_segments(&self.base_url, &["Shows", series_id, "Episodes"]);
        {
            let mut query = url.query_pairs_mut();
            if let Some(season_id) = season_id {
                query.append_pair("SeasonId", season_id);
            }
            query.append_pair("Fields", EPISODE_FIELDS);
        }

        info!(series_id = series_id, season_id = ?season_id, "Fetching episodes");
        self.get_json(url, session).await
    }

    /// Fetch the direct children of a folder such as a box set
    pub async fn get_children(&self, parent_id: &str, session: &Session) -> Result<ItemList> {
        let mut url = join_segments(&self.base_url, &["Users", session.user_id.as_str(), "Items"]);
        url.query_pairs_mut()
            .append_pair("ParentId", parent_id)
            .append_pair("Fields", EPISODE_FIELDS);

        info!(parent_id = parent_id, "Fetching folder children");
        self.get_json(url, session).await
    }
}
