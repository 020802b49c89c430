//! In-memory store of recent search results so result buttons can refer to them.
//!
//! Telegram caps callback payloads at 64 bytes, so buttons carry `dl:<token>:<index>` and the
//! candidates themselves stay here until they expire.

use book_search::BookCandidate;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

pub const CALLBACK_PREFIX: &str = "dl";

/// One week. Longer TTLs are clamped.
pub const MAX_SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct SearchSession {
    pub chat_id: i64,
    pub query: String,
    pub candidates: Vec<BookCandidate>,
    pub created_at: DateTime<Utc>,
}

pub struct SearchSessions {
    ttl: Duration,
    sessions: RwLock<HashMap<String, SearchSession>>,
}

impl SearchSessions {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs.min(MAX_SESSION_TTL_SECS) as i64),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Stores the results and returns their token. Expired sessions are pruned first.
    pub async fn insert(&self, chat_id: i64, query: &str, candidates: Vec<BookCandidate>) -> String {
        self.insert_at(chat_id, query, candidates, Utc::now()).await
    }

    pub(crate) async fn insert_at(
        &self,
        chat_id: i64,
        query: &str,
        candidates: Vec<BookCandidate>,
        now: DateTime<Utc>,
    ) -> String {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| now - s.created_at < self.ttl);
        if sessions.len() != before {
            debug!(pruned = before - sessions.len(), "Pruned expired search sessions");
        }

        let token = loop {
            let candidate = new_token();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        sessions.insert(
            token.clone(),
            SearchSession {
                chat_id,
                query: query.to_string(),
                candidates,
                created_at: now,
            },
        );
        token
    }

    /// The candidate behind a button, only for the chat that ran the search and only while fresh.
    pub async fn get(&self, token: &str, chat_id: i64, index: usize) -> Option<BookCandidate> {
        self.get_at(token, chat_id, index, Utc::now()).await
    }

    pub(crate) async fn get_at(
        &self,
        token: &str,
        chat_id: i64,
        index: usize,
        now: DateTime<Utc>,
    ) -> Option<BookCandidate> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(token)?;
        if session.chat_id != chat_id || now - session.created_at >= self.ttl {
            return None;
        }
        session.candidates.get(index).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// 8 hex characters.
fn new_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// `dl:<token>:<index>`
pub fn callback_data(token: &str, index: usize) -> String {
    format!("{}:{}:{}", CALLBACK_PREFIX, token, index)
}

/// Inverse of [`callback_data`]; None for anything else.
pub fn parse_callback_data(data: &str) -> Option<(&str, usize)> {
    let mut parts = data.splitn(3, ':');
    if parts.next()? != CALLBACK_PREFIX {
        return None;
    }
    let token = parts.next().filter(|t| !t.is_empty())?;
    let index = parts.next()?.parse().ok()?;
    Some((token, index))
}
