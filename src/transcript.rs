//! Conversation transcript
//!
//! Append-only, role-tagged log of the whole session. The first turn is the
//! companion's system prompt; everything after it is appended in order and
//! replayed verbatim as context on every completion call.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One role-tagged message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Errors from transcript operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("transcript has not been started")]
    NotStarted,

    #[error("transcript was already started")]
    AlreadyStarted,

    #[error("only the opening turn may use the system role")]
    SystemTurnAfterStart,
}

/// Ordered, append-only history of turns for one session
#[derive(Debug, Clone, Default)]
pub struct ConversationTranscript {
    turns: Vec<Turn>,
}

impl ConversationTranscript {
    /// Create an empty transcript; `start` must be called before anything is appended
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transcript already started with the given system prompt
    pub fn started(system_prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(system_prompt)],
        }
    }

    /// Open the transcript with its single system turn
    pub fn start(&mut self, system_prompt: impl Into<String>) -> Result<(), TranscriptError> {
        if self.is_started() {
            debug!("start: already started");
            return Err(TranscriptError::AlreadyStarted);
        }
        self.turns.push(Turn::system(system_prompt));
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        !self.turns.is_empty()
    }

    /// Append one turn and return the new turn count
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> Result<usize, TranscriptError> {
        if !self.is_started() {
            debug!(%role, "append: transcript not started");
            return Err(TranscriptError::NotStarted);
        }
        if role == Role::System {
            return Err(TranscriptError::SystemTurnAfterStart);
        }
        self.turns.push(Turn {
            role,
            content: content.into(),
        });
        debug!(len = self.turns.len(), %role, "append: turn added");
        Ok(self.turns.len())
    }

    /// Read view sent as the request payload, never truncated
    pub fn as_ordered_sequence(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_creates_single_system_turn() {
        let mut t = ConversationTranscript::new();
        t.start("be kind").unwrap();

        assert_eq!(t.len(), 1);
        assert_eq!(t.as_ordered_sequence()[0], Turn::system("be kind"));
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let mut t = ConversationTranscript::started("one");
        assert_eq!(t.start("two"), Err(TranscriptError::AlreadyStarted));
        assert_eq!(t.len(), 1);
        assert_eq!(t.as_ordered_sequence()[0].content, "one");
    }

    #[test]
    fn test_append_before_start_fails() {
        let mut t = ConversationTranscript::new();
        assert_eq!(t.append(Role::User, "hello"), Err(TranscriptError::NotStarted));
        assert!(t.is_empty());
    }

    #[test]
    fn test_append_system_after_start_fails() {
        let mut t = ConversationTranscript::started("prompt");
        assert_eq!(
            t.append(Role::System, "sneaky"),
            Err(TranscriptError::SystemTurnAfterStart)
        );
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_append_preserves_order_and_earlier_turns() {
        let mut t = ConversationTranscript::started("prompt");
        assert_eq!(t.append(Role::User, "Start conversation").unwrap(), 2);
        let before: Vec<Turn> = t.as_ordered_sequence().to_vec();

        assert_eq!(t.append(Role::Assistant, "Hi there").unwrap(), 3);
        assert_eq!(t.append(Role::User, "okay").unwrap(), 4);

        let turns = t.as_ordered_sequence();
        assert_eq!(&turns[..before.len()], before.as_slice());
        assert_eq!(turns[2], Turn::assistant("Hi there"));
        assert_eq!(turns[3], Turn::user("okay"));
        assert_eq!(t.last(), Some(&Turn::user("okay")));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_value(Turn::assistant("hi")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
        assert_eq!(Role::System.to_string(), "system");
    }
}
