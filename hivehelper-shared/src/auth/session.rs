/// Server-side session store
///
/// A session binds an opaque cookie token to a beekeeper identity until a
/// fixed absolute expiry. The expiry is set once at issuance and is never
/// extended by activity.
///
/// Stores are addressed through the [`SessionStore`] trait so the API server
/// receives one by injection. [`MemorySessionStore`] keeps sessions in
/// process memory, bounded by a configurable capacity.
///
/// # Token Handling
///
/// - Tokens are 48 random base62 characters
/// - Stores key sessions by the SHA-256 digest of the token, never the token
///
/// # Example
///
/// ```
/// use hivehelper_shared::auth::session::{
///     generate_session_token, MemorySessionStore, Session, SessionConfig, SessionStore,
/// };
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SessionConfig::default();
/// let store = MemorySessionStore::new(config.capacity);
///
/// let token = generate_session_token();
/// store.set(&token, Session::new(1, "Alice".to_string(), config.ttl())).await?;
///
/// let session = store.get(&token).await?.expect("session exists");
/// assert_eq!(session.beekeeper_id, 1);
///
/// store.destroy(&token).await?;
/// assert!(store.get(&token).await?.is_none());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Length of a session token (characters)
pub const SESSION_TOKEN_LENGTH: usize = 48;

/// Longest accepted session lifetime (ten years, in seconds)
pub const MAX_SESSION_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

/// Session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Absolute session lifetime from issuance (seconds)
    pub ttl_seconds: u64,

    /// Maximum number of live sessions held by the store
    pub capacity: usize,

    /// Name of the session cookie
    pub cookie_name: String,

    /// Whether the cookie carries the `Secure` attribute
    pub secure_cookie: bool,

    /// Interval of the background purge of expired sessions (seconds)
    pub purge_interval_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 3600,
            capacity: 10_000,
            cookie_name: "hivehelper.sid".to_string(),
            secure_cookie: false,
            purge_interval_seconds: 86_400,
        }
    }
}

impl SessionConfig {
    /// Session lifetime as a chrono duration, capped at [`MAX_SESSION_TTL_SECONDS`]
    pub fn ttl(&self) -> Duration {
        Duration::seconds(self.ttl_seconds.min(MAX_SESSION_TTL_SECONDS) as i64)
    }
}

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Beekeeper this session belongs to
    pub beekeeper_id: i64,

    /// Display name captured at login
    pub name: String,

    /// When the session was issued
    pub issued_at: DateTime<Utc>,

    /// Absolute expiry
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session issued now and expiring after `ttl`
    ///
    /// A `ttl` past the representable range saturates at the latest date.
    pub fn new(beekeeper_id: i64, name: String, ttl: Duration) -> Self {
        let issued_at = Utc::now();
        Self {
            beekeeper_id,
            name,
            issued_at,
            expires_at: issued_at
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Checks whether the session has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Checks whether the session has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Error type for session store operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The backing store could not be reached
    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}

/// Storage for sessions keyed by token
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the live session for a token, if any
    ///
    /// Expired sessions are reported as absent.
    async fn get(&self, token: &str) -> Result<Option<Session>, SessionError>;

    /// Stores a session under a token, replacing any previous one
    async fn set(&self, token: &str, session: Session) -> Result<(), SessionError>;

    /// Removes a session; unknown tokens are ignored
    async fn destroy(&self, token: &str) -> Result<(), SessionError>;

    /// Removes every expired session and returns how many were dropped
    async fn purge_expired(&self) -> Result<usize, SessionError>;
}

/// Generates a new random session token
pub fn generate_session_token() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..SESSION_TOKEN_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Derives the storage key of a token (hex SHA-256)
pub fn session_key(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// In-process session store with bounded capacity
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    capacity: usize,
}

impl MemorySessionStore {
    /// Creates an empty store holding at most `capacity` sessions
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Number of sessions currently held, expired ones included
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns true if no sessions are held
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, token: &str) -> Result<Option<Session>, SessionError> {
        let key = session_key(token);

        {
            let sessions = self.sessions.read().await;
            match sessions.get(&key) {
                None => return Ok(None),
                Some(session) if !session.is_expired() => return Ok(Some(session.clone())),
                Some(_) => {}
            }
        }

        // Expired: drop it so it cannot be observed again
        let mut sessions = self.sessions.write().await;
        if sessions.get(&key).is_some_and(Session::is_expired) {
            sessions.remove(&key);
            debug!("Expired session removed on access");
        }

        Ok(None)
    }

    async fn set(&self, token: &str, session: Session) -> Result<(), SessionError> {
        let key = session_key(token);
        let mut sessions = self.sessions.write().await;

        if !sessions.contains_key(&key) && sessions.len() >= self.capacity {
            let now = Utc::now();
            sessions.retain(|_, s| !s.is_expired_at(now));

            if sessions.len() >= self.capacity {
                let oldest = sessions
                    .iter()
                    .min_by_key(|(_, s)| s.expires_at)
                    .map(|(k, _)| k.clone());

                if let Some(oldest) = oldest {
                    sessions.remove(&oldest);
                    warn!(capacity = self.capacity, "Session store full, evicted oldest session");
                }
            }
        }

        sessions.insert(key, session);
        Ok(())
    }

    async fn destroy(&self, token: &str) -> Result<(), SessionError> {
        self.sessions.write().await.remove(&session_key(token));
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize, SessionError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        Ok(before - sessions.len())
    }
}

/// Spawns a task that purges expired sessions every `interval`
pub fn spawn_session_reaper(
    store: Arc<dyn SessionStore>,
    interval: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match store.purge_expired().await {
                Ok(0) => debug!("No expired sessions to purge"),
                Ok(purged) => info!(purged, "Purged expired sessions"),
                Err(e) => warn!(error = %e, "Session purge failed"),
            }
        }
    })
}
