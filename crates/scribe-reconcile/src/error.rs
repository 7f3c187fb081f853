//! Error types for suggestion reconciliation

use scribe_artifact::{ArtifactError, ContentKind};

/// Errors during suggestion selection and acceptance
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// Artifact has no current snapshot
    #[error("no current content to reconcile against")]
    NoContent,

    /// Suggestions only live on text snapshots
    #[error("suggestions require text content, current content is {0}")]
    NotText(ContentKind),

    /// Position names no pending suggestion
    #[error("suggestion {index} out of range ({len} pending)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Canonical text is still being streamed
    #[error("suggestion acceptance is disabled while streaming")]
    Streaming,

    /// Version store error
    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),
}

impl ReconcileError {
    /// Whether the caller should simply retry once streaming completes
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Streaming)
    }
}
