//! In-memory session store.
//!
//! Each session owns one `ConversationState` behind its own async mutex, so
//! two requests for the same session run one after the other while
//! different sessions proceed independently. The index itself sits behind a
//! short-lived `std::sync::Mutex` that is never held across an await.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::HeaderMap;
use axum::http::header;
use memochat_agent::ConversationState;
use memochat_config::GatewayConfig;
use tokio::time::Instant;
use tracing::debug;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "memochat_session";

/// A session's state, locked for the duration of one request.
pub type SessionHandle = Arc<tokio::sync::Mutex<ConversationState>>;

struct SessionEntry {
    state: SessionHandle,
    last_seen: Instant,
}

pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    ttl: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(
            Duration::from_secs(config.session_ttl_minutes.saturating_mul(60)),
            config.max_sessions,
        )
    }

    /// Look up a live session and mark it as used.
    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());

        let expired = match sessions.get_mut(id) {
            Some(entry) if now.duration_since(entry.last_seen) < self.ttl => {
                entry.last_seen = now;
                return Some(entry.state.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            sessions.remove(id);
            debug!("Session expired");
        }
        None
    }

    /// Store a new session and return its id.
    ///
    /// Expired sessions are dropped first; if the store is still full the
    /// least recently used session is evicted.
    pub fn insert(&self, state: ConversationState) -> String {
        let now = Instant::now();
        let id = uuid::Uuid::new_v4().to_string();
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());

        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < self.ttl);

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(oldest) => {
                    sessions.remove(&oldest);
                    debug!("Evicted least recently used session");
                }
                None => break,
            }
        }

        sessions.insert(
            id.clone(),
            SessionEntry {
                state: Arc::new(tokio::sync::Mutex::new(state)),
                last_seen: now,
            },
        );
        id
    }

    pub fn remove(&self, id: &str) {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id);
    }

    /// Drop every session idle for longer than the TTL. Returns how many were dropped.
    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < self.ttl);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The session id from the request's `Cookie` header, if any.
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value binding the browser to `id`.
pub fn session_cookie(id: &str) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}
