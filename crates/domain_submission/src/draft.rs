//! Draft persistence
//!
//! In-progress wizards are checkpointed under a [`ResumeToken`] so that a
//! session can pick up where it left off. Drafts are ephemeral: each entry
//! expires a fixed time after it was last written.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use core_kernel::ResumeToken;

use crate::wizard::WizardSnapshot;

/// Default lifetime of a draft: eight hours
pub const DEFAULT_DRAFT_TTL_SECS: i64 = 8 * 60 * 60;

/// Key-value store for wizard drafts
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Stores (or replaces) the draft for `token`, restarting its TTL
    async fn put(&self, token: ResumeToken, snapshot: WizardSnapshot);

    /// Returns the draft for `token` unless it is missing or expired
    async fn get(&self, token: &ResumeToken) -> Option<WizardSnapshot>;

    /// Forgets the draft for `token`
    async fn remove(&self, token: &ResumeToken);

    /// Drops every expired draft, returning how many were removed
    async fn purge_expired(&self) -> usize;
}

#[derive(Debug, Clone)]
struct StoredDraft {
    snapshot: WizardSnapshot,
    expires_at: DateTime<Utc>,
}

/// Process-local draft store
#[derive(Debug)]
pub struct InMemoryDraftStore {
    ttl: Duration,
    entries: RwLock<HashMap<ResumeToken, StoredDraft>>,
}

impl InMemoryDraftStore {
    /// Creates a store whose drafts live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored drafts, expired ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True if nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for InMemoryDraftStore {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_DRAFT_TTL_SECS))
    }
}

#[async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn put(&self, token: ResumeToken, snapshot: WizardSnapshot) {
        let expires_at = Utc::now()
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.entries
            .write()
            .await
            .insert(token, StoredDraft { snapshot, expires_at });
    }

    async fn get(&self, token: &ResumeToken) -> Option<WizardSnapshot> {
        let now = Utc::now();
        {
            let entries = self.entries.read().await;
            match entries.get(token) {
                Some(stored) if stored.expires_at > now => return Some(stored.snapshot.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // Expired: evict lazily
        debug!(%token, "Draft expired");
        self.entries.write().await.remove(token);
        None
    }

    async fn remove(&self, token: &ResumeToken) {
        self.entries.write().await.remove(token);
    }

    async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, stored| stored.expires_at > now);
        before - entries.len()
    }
}
