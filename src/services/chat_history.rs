use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::models::ChatMessage;

/// Session id used when the client does not send one
pub const DEFAULT_SESSION_ID: &str = "user-session";

/// Sessions kept before the least recently active one is dropped
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

#[derive(Default)]
struct Session {
    messages: Vec<ChatMessage>,
    last_active: u64,
}

#[derive(Default)]
struct Sessions {
    by_id: HashMap<String, Session>,
    clock: u64,
}

impl Sessions {
    fn evict_least_recent(&mut self) -> Option<String> {
        let oldest = self
            .by_id
            .iter()
            .min_by_key(|(_, session)| session.last_active)
            .map(|(id, _)| id.clone())?;
        self.by_id.remove(&oldest);
        Some(oldest)
    }
}

/// In-memory conversation history, keyed by session id.
///
/// Lives as long as the process; nothing is persisted. At most `max_sessions`
/// sessions are held, and recording into a new session past that limit drops
/// the session that was written to least recently.
#[derive(Clone)]
pub struct ChatHistoryStore {
    sessions: Arc<RwLock<Sessions>>,
    max_sessions: usize,
}

impl Default for ChatHistoryStore {
    fn default() -> Self {
        Self::with_max_sessions(DEFAULT_MAX_SESSIONS)
    }
}

impl ChatHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_sessions(max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(Sessions::default())),
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Snapshot of a session's messages, oldest first. Unknown sessions are empty.
    pub async fn messages(&self, session_id: &str) -> Vec<ChatMessage> {
        let sessions = self.sessions.read().await;
        sessions
            .by_id
            .get(session_id)
            .map(|session| session.messages.clone())
            .unwrap_or_default()
    }

    /// Records one question/answer exchange
    pub async fn append_exchange(&self, session_id: &str, question: &str, answer: &str) {
        let mut sessions = self.sessions.write().await;

        if !sessions.by_id.contains_key(session_id) && sessions.by_id.len() >= self.max_sessions {
            if let Some(evicted) = sessions.evict_least_recent() {
                tracing::debug!(session_id = %evicted, "Evicted chat session");
            }
        }

        sessions.clock += 1;
        let now = sessions.clock;
        let session = sessions.by_id.entry(session_id.to_string()).or_default();
        session.messages.push(ChatMessage::human(question));
        session.messages.push(ChatMessage::ai(answer));
        session.last_active = now;
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.by_id.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatRole;

    #[tokio::test]
    async fn test_unknown_session_is_empty() {
        let store = ChatHistoryStore::new();
        assert!(store.messages("nobody").await.is_empty());
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_exchanges_are_ordered() {
        let store = ChatHistoryStore::new();
        store.append_exchange("s1", "Best phone?", "The Pixel 7a.").await;
        store.append_exchange("s1", "Cheaper?", "The Redmi Note 12.").await;

        let messages = store.messages("s1").await;
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], ChatMessage::human("Best phone?"));
        assert_eq!(messages[1].role, ChatRole::Ai);
        assert_eq!(messages[3].content, "The Redmi Note 12.");
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = ChatHistoryStore::new();
        store.append_exchange("a", "q", "r").await;

        assert!(store.messages("b").await.is_empty());
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_session_count_is_capped() {
        let store = ChatHistoryStore::with_max_sessions(3);
        for i in 0..500 {
            store.append_exchange(&format!("client-{}", i), "q", "r").await;
        }

        assert_eq!(store.session_count().await, 3);
        assert!(store.messages("client-0").await.is_empty());
        assert_eq!(store.messages("client-499").await.len(), 2);
    }

    #[tokio::test]
    async fn test_least_recently_active_session_is_evicted() {
        let store = ChatHistoryStore::with_max_sessions(2);
        store.append_exchange("a", "q1", "r1").await;
        store.append_exchange("b", "q1", "r1").await;
        // Writing to "a" again makes "b" the oldest.
        store.append_exchange("a", "q2", "r2").await;
        store.append_exchange("c", "q1", "r1").await;

        assert_eq!(store.messages("a").await.len(), 4);
        assert!(store.messages("b").await.is_empty());
        assert_eq!(store.messages("c").await.len(), 2);
    }

    #[tokio::test]
    async fn test_existing_session_is_not_evicted_at_capacity() {
        let store = ChatHistoryStore::with_max_sessions(1);
        store.append_exchange("only", "q1", "r1").await;
        store.append_exchange("only", "q2", "r2").await;

        assert_eq!(store.session_count().await, 1);
        assert_eq!(store.messages("only").await.len(), 4);
    }

    #[test]
    fn test_zero_capacity_keeps_one_session() {
        assert_eq!(ChatHistoryStore::with_max_sessions(0).max_sessions(), 1);
        assert_eq!(ChatHistoryStore::new().max_sessions(), DEFAULT_MAX_SESSIONS);
    }
}
