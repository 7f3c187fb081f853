//! Error types for the notes accumulator

use crate::agent::AgentError;
use crate::store::StoreError;

/// Errors while taking notes
#[derive(Debug, thiserror::Error)]
pub enum NotesError {
    /// Required identifier absent from the request context
    #[error("`{0}` not found in request context")]
    MissingIdentifier(&'static str),

    /// Note-taking agent failed
    #[error("notes agent failed: {0}")]
    Agent(#[from] AgentError),

    /// Store failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl NotesError {
    /// Missing input; the request should not be retried as is
    #[inline]
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::MissingIdentifier(_))
    }

    /// A collaborator (agent or store) failed
    #[inline]
    #[must_use]
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, Self::Agent(_) | Self::Store(_))
    }
}
