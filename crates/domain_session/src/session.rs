//! Signed-in sessions

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, RwLock, TryLockError};
use tracing::debug;

use core_kernel::{ResumeToken, SessionId};

use crate::credentials::AuthToken;
use crate::preferences::Preferences;

/// The signed-in user as shown in the header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub username: String,
    pub signed_in_at: DateTime<Utc>,
}

/// State owned by one signed-in user
#[derive(Debug, Clone)]
pub struct UserSession {
    pub id: SessionId,
    pub user: CurrentUser,
    pub upstream_token: AuthToken,
    pub preferences: Preferences,
    /// Draft of the wizard the user has open, if any
    pub wizard: Option<ResumeToken>,
    pub last_seen: DateTime<Utc>,
}

impl UserSession {
    pub fn new(username: impl Into<String>, upstream_token: AuthToken) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            user: CurrentUser {
                username: username.into(),
                signed_in_at: now,
            },
            upstream_token,
            preferences: Preferences::default(),
            wizard: None,
            last_seen: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Utc::now();
    }
}

/// Shared handle to one session
///
/// Locking the handle is how actions on a session are serialised.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    inner: Arc<Mutex<UserSession>>,
}

impl SessionHandle {
    fn new(session: UserSession) -> Self {
        Self {
            id: session.id,
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Waits for exclusive access
    pub async fn lock(&self) -> MutexGuard<'_, UserSession> {
        self.inner.lock().await
    }

    /// Exclusive access, or an error if another action holds the session
    pub fn try_lock(&self) -> Result<MutexGuard<'_, UserSession>, TryLockError> {
        self.inner.try_lock()
    }
}

/// Registry of live sessions
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `session` and returns its handle
    pub async fn insert(&self, session: UserSession) -> SessionHandle {
        let handle = SessionHandle::new(session);
        self.sessions.write().await.insert(handle.id(), handle.clone());
        handle
    }

    pub async fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Removes the session; returns false if it was not registered
    pub async fn remove(&self, id: &SessionId) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops sessions idle for longer than `max_idle`
    ///
    /// Sessions busy with an action are never considered idle.
    pub async fn purge_idle(&self, max_idle: Duration) -> usize {
        let cutoff = Utc::now()
            .checked_sub_signed(max_idle)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => session.last_seen >= cutoff,
            Err(_) => true,
        });
        let purged = before - sessions.len();
        if purged > 0 {
            debug!(purged, "Purged idle sessions");
        }
        purged
    }
}
