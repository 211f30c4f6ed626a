//! Conversation sessions: ordered message history for multi-turn use.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{truncate, ConversationId, Timestamp};

/// Character cap applied to each message when building prompt context,
/// preventing unbounded prompt growth in long sessions.
const MESSAGE_CONTEXT_CAP: usize = 500;

/// Role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User input.
    User,
    /// Assistant response.
    Assistant,
}

impl Role {
    /// String form used in prompt context lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One timestamped message within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who sent this message.
    pub role: Role,
    /// Message content.
    pub content: String,
    /// When the message was appended.
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// Creates a new message stamped with the current time.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Timestamp::now(),
        }
    }
}

/// One conversation: an append-only message sequence plus opaque session
/// data. Messages are never reordered or truncated; context windowing is
/// read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    /// Unique session identifier.
    pub id: ConversationId,
    /// When the session was created.
    pub created_at: Timestamp,
    /// Ordered message history.
    pub messages: Vec<ChatMessage>,
    /// Opaque caller-managed data.
    pub session_data: serde_json::Value,
}

impl ConversationSession {
    /// Creates an empty session.
    pub fn new(id: ConversationId) -> Self {
        Self {
            id,
            created_at: Timestamp::now(),
            messages: Vec::new(),
            session_data: serde_json::Value::Null,
        }
    }

    /// Appends a timestamped message.
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(ChatMessage::new(role, content));
    }

    /// Number of messages in the session.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Formats the last `window` messages as role-labeled lines, each
    /// message capped at a fixed character budget.
    pub fn windowed_context(&self, window: usize) -> String {
        let start = self.messages.len().saturating_sub(window);
        self.messages[start..]
            .iter()
            .map(|message| {
                format!(
                    "{}: {}",
                    message.role.as_str(),
                    truncate(&message.content, MESSAGE_CONTEXT_CAP)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order() {
        let mut session = ConversationSession::new(ConversationId::new());
        session.append(Role::User, "first");
        session.append(Role::Assistant, "second");
        session.append(Role::User, "third");

        assert_eq!(session.message_count(), 3);
        assert_eq!(session.messages[0].content, "first");
        assert_eq!(session.messages[2].content, "third");
    }

    #[test]
    fn windowed_context_takes_last_n() {
        let mut session = ConversationSession::new(ConversationId::new());
        for i in 0..10 {
            session.append(Role::User, format!("message {i}"));
        }

        let context = session.windowed_context(3);
        let lines: Vec<&str> = context.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "user: message 7");
        assert_eq!(lines[2], "user: message 9");
    }

    #[test]
    fn windowed_context_labels_roles() {
        let mut session = ConversationSession::new(ConversationId::new());
        session.append(Role::User, "hi");
        session.append(Role::Assistant, "hello");

        assert_eq!(session.windowed_context(8), "user: hi\nassistant: hello");
    }

    #[test]
    fn windowed_context_caps_message_length() {
        let mut session = ConversationSession::new(ConversationId::new());
        session.append(Role::User, "x".repeat(2000));

        let context = session.windowed_context(8);
        // 500 chars plus the role label and ellipsis.
        assert!(context.len() < 600);
        assert!(context.ends_with("..."));
    }

    #[test]
    fn window_larger_than_history_returns_everything() {
        let mut session = ConversationSession::new(ConversationId::new());
        session.append(Role::User, "only");
        assert_eq!(session.windowed_context(50), "user: only");
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }
}
