//! Client identity, authorization header and session caching.

use crate::error::LoginError;
use anyhow::Context;
use shared::config::ClientConfig;
use shared::PreferenceStore;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Scheme tag that prefixes the authorization header value
pub const AUTH_SCHEME: &str = "MediaBrowser";

const DEVICE_ID_KEY: &str = "device_id";
const ACCESS_TOKEN_KEY: &str = "access_token";
const USER_ID_KEY: &str = "user_id";

/// Identity of this client installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub client_name: String,
    pub version: String,
    pub device_id: String,
    pub device_name: String,
}

impl DeviceIdentity {
    /// Build the identity, generating and persisting the device id on first use
    pub fn load_or_create(store: &PreferenceStore, client: &ClientConfig) -> anyhow::Result<Self> {
        let device_id = match store.get(DEVICE_ID_KEY)? {
            Some(id) if !id.is_empty() => id,
            _ => {
                let id = generate_device_id();
                store
                    .set(DEVICE_ID_KEY, &id)
                    .context("Failed to persist device id")?;
                info!(device_id = %id, "Generated new device id");
                id
            }
        };

        Ok(Self {
            client_name: client.client_name.clone(),
            version: client.version.clone(),
            device_id,
            device_name: client.device_name.clone(),
        })
    }
}

/// 16 random hex characters
fn generate_device_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(16);
    id
}

/// Build the `Authorization` header value for a device and optional token.
///
/// Pairs are emitted in a fixed order; a missing token drops the `Token` pair.
pub fn auth_header(device: &DeviceIdentity, token: Option<&str>) -> String {
    let params: [(&str, Option<&str>); 5] = [
        ("Client", Some(device.client_name.as_str())),
        ("Version", Some(device.version.as_str())),
        ("DeviceId", Some(device.device_id.as_str())),
        ("Device", Some(device.device_name.as_str())),
        ("Token", token),
    ];

    let pairs = params
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| format!("{}=\"{}\"", key, encode_value(v))))
        .collect::<Vec<_>>();

    format!("{} {}", AUTH_SCHEME, pairs.join(", "))
}

fn encode_value(value: &str) -> String {
    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
    url::form_urlencoded::byte_serialize(normalized.as_bytes()).collect()
}

/// Access token and user id obtained by logging in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user_id: String,
}

/// Cached session plus the outcome of the last login attempt
#[derive(Default)]
struct SessionState {
    session: Option<Session>,
    /// Failure of the most recent attempt, shared with callers that queued behind it
    last_failure: Option<LoginError>,
}

/// Owns the cached session.
///
/// Population is single-flight: the state lock is held for the whole login,
/// so concurrent callers wait for the attempt in progress instead of issuing
/// their own, and receive its outcome whether it succeeded or failed.
pub struct SessionManager {
    store: Arc<PreferenceStore>,
    state: Mutex<SessionState>,
    /// Number of finished login attempts, bumped while the state lock is held
    attempts: AtomicU64,
}

impl SessionManager {
    /// Create a manager, restoring any session persisted by a previous run
    pub fn new(store: Arc<PreferenceStore>) -> anyhow::Result<Self> {
        let access_token = store.get_or_empty(ACCESS_TOKEN_KEY)?;
        let user_id = store.get_or_empty(USER_ID_KEY)?;

        let cached = if access_token.is_empty() {
            None
        } else {
            debug!(user_id = %user_id, "Restored cached session");
            Some(Session {
                access_token,
                user_id,
            })
        };

        Ok(Self {
            store,
            state: Mutex::new(SessionState {
                session: cached,
                last_failure: None,
            }),
            attempts: AtomicU64::new(0),
        })
    }

    /// The cached session, if any, without logging in
    pub async fn current(&self) -> Option<Session> {
        self.state.lock().await.session.clone()
    }

    /// Return the cached session, or run `login` to establish one.
    ///
    /// Callers that were waiting while another attempt ran get that attempt's
    /// result. A failed login leaves the cache empty, so the next call made
    /// after it has finished tries again.
    pub async fn ensure_with<F, Fut>(&self, login: F) -> Result<Session, LoginError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Session, LoginError>>,
    {
        let observed = self.attempts.load(Ordering::Acquire);
        let mut state = self.state.lock().await;

        if let Some(session) = state.session.as_ref() {
            return Ok(session.clone());
        }
        if self.attempts.load(Ordering::Acquire) != observed {
            if let Some(failure) = state.last_failure.as_ref() {
                debug!(error = %failure, "Reusing outcome of concurrent login");
                return Err(failure.clone());
            }
        }

        info!("No cached session, logging in");
        let outcome = login().await;
        match &outcome {
            Ok(session) => {
                self.persist(session);
                info!(user_id = %session.user_id, "Session established");
                state.session = Some(session.clone());
                state.last_failure = None;
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                state.last_failure = Some(e.clone());
            }
        }
        self.attempts.fetch_add(1, Ordering::Release);
        outcome
    }

    /// Forget the session in memory and in the store
    pub async fn clear(&self) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        *state = SessionState::default();
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(USER_ID_KEY)?;
        info!("Session cleared");
        Ok(())
    }

    fn persist(&self, session: &Session) {
        let result = self
            .store
            .set(ACCESS_TOKEN_KEY, &session.access_token)
            .and_then(|_| self.store.set(USER_ID_KEY, &session.user_id));

        // The in-memory session stays usable even if the store write fails
        if let Err(e) = result {
            warn!(error = %e, "Failed to persist session");
        }
    }
}
