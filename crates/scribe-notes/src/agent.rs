//! Agent collaborator contract and conversation formatting

use crate::record::NotesRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Author of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Ai,
    System,
    Tool,
}

impl Role {
    /// Tag used in transcripts
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Ai => "ai",
            Self::System => "system",
            Self::Tool => "tool",
        }
    }
}

/// One conversation message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    /// Message from the user
    #[must_use]
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
        }
    }

    /// Message from the agent
    #[must_use]
    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: Role::Ai,
            content: content.into(),
        }
    }
}

/// `<role>\ncontent\n</role>` blocks separated by blank lines
#[must_use]
pub fn format_transcript(messages: &[ConversationMessage]) -> String {
    messages
        .iter()
        .map(|m| {
            let tag = m.role.as_str();
            format!("<{tag}>\n{}\n</{tag}>", m.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Failure of an agent collaborator
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Agent answered without a usable structured result
    #[error("agent returned no usable result: {0}")]
    NoResult(String),

    /// Call to the agent failed
    #[error("agent call failed: {0}")]
    Failed(String),
}

/// Everything the note-taking agent sees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesRequest {
    /// Formatted conversation, see [`format_transcript`]
    pub transcript: String,
    /// Current artifact text, or a placeholder when there is none
    pub artifact_text: String,
    /// Formatted existing notes, see [`crate::format_existing_notes`]
    pub existing_notes: String,
    /// Existing notes as data
    pub existing: Option<NotesRecord>,
}

/// Note-taking agent
///
/// Returns a fragment of new notes; merging is the caller's job.
#[async_trait]
pub trait NotesAgent: Send + Sync {
    /// Extract notes from the conversation
    async fn take_notes(&self, request: &NotesRequest) -> Result<NotesRecord, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_format() {
        let messages = [
            ConversationMessage::human("Write a poem"),
            ConversationMessage::ai("Here it is"),
        ];
        assert_eq!(
            format_transcript(&messages),
            "<human>\nWrite a poem\n</human>\n\n<ai>\nHere it is\n</ai>"
        );
        assert_eq!(format_transcript(&[]), "");
    }

    #[test]
    fn role_wire_names() {
        let msg: ConversationMessage =
            serde_json::from_str(r#"{"role":"human","content":"hi"}"#).unwrap();
        assert_eq!(msg, ConversationMessage::human("hi"));
    }
}
