//! Per-session record of the request that triggered a login challenge.
//!
//! The manager saves the original URI when it challenges a client and takes
//! it back out after that session authenticates, to resume navigation.
//! Entries are keyed by session id: one per session, last write wins.
//! `take` removes and returns in one step, so a URI is resumed at most once.
//!
//! Entries expire after a time-to-live, and the map holds at most
//! `max_entries`; the oldest entry is evicted to make room.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

#[derive(Debug, Clone)]
struct PendingRequest {
    uri: String,
    saved_at: Instant,
}

/// Concurrent map from session id to the originally requested URI.
#[derive(Clone, Debug)]
pub struct RequestCache {
    entries: Arc<DashMap<String, PendingRequest>>,
    ttl: Duration,
    max_entries: usize,
}

impl RequestCache {
    /// Cache with a 30 minute time-to-live and room for 10 000 sessions.
    pub fn new() -> Self {
        RequestCache {
            entries: Arc::new(DashMap::new()),
            ttl: Duration::from_secs(30 * 60),
            max_entries: 10_000,
        }
    }

    /// How long a pending request stays resumable.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Upper bound on pending requests; at least one.
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = max.max(1);
        self
    }

    pub fn get_ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get_max_entries(&self) -> usize {
        self.max_entries
    }

    /// Records `uri` for `session_id`, replacing any previous entry.
    pub fn save(&self, session_id: &str, uri: impl Into<String>) {
        let now = Instant::now();
        if !self.entries.contains_key(session_id) && self.entries.len() >= self.max_entries {
            self.purge_expired(now);
            while self.entries.len() >= self.max_entries {
                if !self.evict_oldest() {
                    break;
                }
            }
        }
        self.entries.insert(
            session_id.to_string(),
            PendingRequest {
                uri: uri.into(),
                saved_at: now,
            },
        );
    }

    /// Atomically removes and returns the entry for `session_id`.
    ///
    /// An expired entry is removed and reported as absent.
    pub fn take(&self, session_id: &str) -> Option<String> {
        let (_, pending) = self.entries.remove(session_id)?;
        (!self.is_expired(&pending, Instant::now())).then_some(pending.uri)
    }

    /// Returns the entry without consuming it.
    pub fn get(&self, session_id: &str) -> Option<String> {
        let now = Instant::now();
        self.entries
            .get(session_id)
            .filter(|entry| !self.is_expired(entry.value(), now))
            .map(|entry| entry.value().uri.clone())
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.get(session_id).is_some()
    }

    /// Number of stored entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every expired entry.
    pub fn purge(&self) {
        self.purge_expired(Instant::now());
    }

    fn purge_expired(&self, now: Instant) {
        let before = self.entries.len();
        self.entries
            .retain(|_, pending| now.saturating_duration_since(pending.saved_at) < self.ttl);
        let dropped = before.saturating_sub(self.entries.len());
        if dropped > 0 {
            tracing::debug!(dropped, "expired pending requests dropped");
        }
    }

    fn evict_oldest(&self) -> bool {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().saved_at)
            .map(|entry| entry.key().clone());
        match oldest {
            Some(session_id) => {
                tracing::debug!("pending request cache full, evicting oldest entry");
                self.entries.remove(&session_id).is_some()
            }
            None => false,
        }
    }

    fn is_expired(&self, pending: &PendingRequest, now: Instant) -> bool {
        now.saturating_duration_since(pending.saved_at) >= self.ttl
    }
}

impl Default for RequestCache {
    fn default() -> Self {
        Self::new()
    }
}
