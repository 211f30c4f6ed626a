//! Conversation store: process-wide session registry with LRU eviction.
//!
//! Sessions live in memory for the process lifetime, bounded by an LRU
//! capacity so long-running deployments do not grow without limit. All
//! access to a session's message sequence is serialized through the store
//! lock; append is a read-then-write and must not interleave.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use crate::domain::foundation::ConversationId;

use super::session::{ConversationSession, Role};

/// Default maximum number of live sessions.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Default message window for prompt context.
pub const DEFAULT_CONTEXT_WINDOW: usize = 8;

/// LRU-bounded registry of conversation sessions.
pub struct ConversationStore {
    sessions: Mutex<LruCache<ConversationId, ConversationSession>>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    /// Creates a store with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a store holding at most `capacity` sessions; the least
    /// recently used session is evicted beyond that.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Allocates a fresh session and returns its id.
    pub fn create(&self) -> ConversationId {
        let id = ConversationId::new();
        let mut sessions = self.sessions.lock().unwrap();
        sessions.put(id, ConversationSession::new(id));
        id
    }

    /// Appends a message, creating the session if the id is unknown.
    /// Never fails for an unknown id.
    pub fn append(&self, id: ConversationId, role: Role, content: impl Into<String>) {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.get_mut(&id).is_none() {
            sessions.put(id, ConversationSession::new(id));
        }
        if let Some(session) = sessions.get_mut(&id) {
            session.append(role, content);
        }
    }

    /// Windowed prompt context for a session; empty for unknown ids.
    pub fn windowed_context(&self, id: ConversationId, window: usize) -> String {
        let mut sessions = self.sessions.lock().unwrap();
        sessions
            .get(&id)
            .map(|session| session.windowed_context(window))
            .unwrap_or_default()
    }

    /// Message count for a session; zero for unknown ids.
    pub fn message_count(&self, id: ConversationId) -> usize {
        let mut sessions = self.sessions.lock().unwrap();
        sessions
            .get(&id)
            .map(ConversationSession::message_count)
            .unwrap_or(0)
    }

    /// True if the session currently exists. Does not refresh recency.
    pub fn contains(&self, id: ConversationId) -> bool {
        self.sessions.lock().unwrap().peek(&id).is_some()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// True when no sessions exist.
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().unwrap().is_empty()
    }
}
