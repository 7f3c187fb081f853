//! Error types for Scribe Core
//!
//! Failures fall into three groups:
//! - precondition failures (missing identifiers or inputs): terminal for
//!   the request, never retried
//! - stale references: not errors at all; logged and tolerated where they
//!   happen (stale suggestions, malformed board lines)
//! - collaborator failures (agent, store): surfaced to the view layer,
//!   canonical artifact left untouched

use crate::config::ConfigError;
use scribe_artifact::{ArtifactError, BoardError, ContentKind};
use scribe_notes::{AgentError, NotesError, StoreError};
use scribe_reconcile::ReconcileError;

/// Main Scribe error type
#[derive(Debug, thiserror::Error)]
pub enum ScribeError {
    /// Required input absent from the request
    #[error("{0} not found")]
    MissingContext(&'static str),

    /// Operation is disabled while a stream is outstanding
    #[error("operation disabled while streaming")]
    Streaming,

    /// Stream ticket is not outstanding (already finished or failed)
    #[error("stream {0} is not active")]
    InactiveStream(u64),

    /// Operation needs a board snapshot
    #[error("expected board content, current content is {0}")]
    NotBoard(ContentKind),

    /// Raw artifact uses the retired single-content shape
    #[error("legacy artifact format is not supported")]
    LegacyArtifact,

    /// Raw artifact JSON is malformed
    #[error("malformed artifact: {0}")]
    MalformedArtifact(#[from] serde_json::Error),

    /// Version store error
    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// Board edit error
    #[error("board error: {0}")]
    Board(#[from] BoardError),

    /// Suggestion reconciliation error
    #[error("reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// Notes accumulator error
    #[error("notes error: {0}")]
    Notes(#[from] NotesError),

    /// Agent collaborator failed
    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    /// Store collaborator failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ScribeError {
    /// Missing input; terminal for this request
    #[inline]
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        match self {
            Self::MissingContext(_) => true,
            Self::Notes(e) => e.is_precondition(),
            _ => false,
        }
    }

    /// An agent or store call failed; the view should show a failure state
    #[inline]
    #[must_use]
    pub fn is_collaborator_failure(&self) -> bool {
        match self {
            Self::Agent(_) | Self::Store(_) => true,
            Self::Notes(e) => e.is_collaborator_failure(),
            _ => false,
        }
    }

    /// Retry once the outstanding stream completes
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Streaming => true,
            Self::Reconcile(e) => e.is_transient(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(ScribeError::MissingContext("assistant_id").is_precondition());
        assert!(ScribeError::from(NotesError::MissingIdentifier("thread_id")).is_precondition());

        let agent = ScribeError::from(AgentError::Failed("timeout".into()));
        assert!(agent.is_collaborator_failure());
        assert!(!agent.is_precondition());

        let store = ScribeError::from(NotesError::from(StoreError::Unavailable("down".into())));
        assert!(store.is_collaborator_failure());

        assert!(ScribeError::from(ReconcileError::Streaming).is_transient());
        assert!(ScribeError::Streaming.is_transient());
        assert!(!ScribeError::LegacyArtifact.is_transient());
    }

    #[test]
    fn display() {
        assert_eq!(
            ScribeError::MissingContext("recent human message").to_string(),
            "recent human message not found"
        );
        assert_eq!(
            ScribeError::NotBoard(ContentKind::Text).to_string(),
            "expected board content, current content is text"
        );
    }
}
