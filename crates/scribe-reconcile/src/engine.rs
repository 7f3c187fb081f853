//! Suggestion selection and acceptance
//!
//! [`apply_suggestion`] is the one path that commits a suggestion into the
//! canonical text. [`Reconciler`] layers the per-snapshot selection state
//! machine on top of it:
//!
//! ```text
//! Idle ──(suggestions attached)──▶ Pending ──select(i)──▶ Selected(i)
//!   ▲                                 ▲  ▲                   │  │
//!   └────────(list empty)─────────────┘  └──deselect()───────┘  │
//!                                     ▲                         │
//!                                     └──apply(i) / select(i)───┘
//! ```

use crate::error::ReconcileError;
use crate::splice::Substitution;
use scribe_artifact::{Artifact, ContentVariant, Suggestion};
use serde::{Deserialize, Serialize};

/// How an accepted suggestion is removed from the pending list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Remove exactly the accepted entry
    #[default]
    ByPosition,
    /// Remove every entry with the same `(prev_text, suggested_text)` pair
    ByValue,
}

/// Selection state of the current text snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// No pending suggestions
    Idle,
    /// Suggestions pending, none selected
    Pending,
    /// Suggestion at this list position is highlighted
    Selected(usize),
}

/// Result of committing one suggestion
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOutcome {
    /// Artifact with the current snapshot replaced
    pub artifact: Artifact,
    /// Substitution written into the text; `None` if the suggestion was stale
    pub applied: Option<Substitution>,
    /// Number of entries removed from the pending list
    pub removed: usize,
}

impl ApplyOutcome {
    /// Whether the canonical text was left unchanged
    #[inline]
    #[must_use]
    pub fn was_stale(&self) -> bool {
        self.applied.is_none()
    }
}

/// Result of [`Reconciler::select`]
#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    /// Suggestion is now highlighted
    Selected(usize),
    /// Suggestion was already highlighted and got applied
    Applied(ApplyOutcome),
}

/// Pending suggestions of the artifact's current snapshot
///
/// # Errors
/// Returns error if there is no current snapshot or it is not text
pub fn pending_suggestions(artifact: &Artifact) -> Result<&[Suggestion], ReconcileError> {
    let current = artifact.get_current().ok_or(ReconcileError::NoContent)?;
    current
        .as_text()
        .map(|text| text.suggested_changes.as_slice())
        .ok_or_else(|| ReconcileError::NotText(current.kind()))
}

/// Commit the suggestion at `index` into the current text snapshot
///
/// The first occurrence of `prev_text` is replaced by `suggested_text`; no
/// marker is written into the canonical text. A stale suggestion (its
/// `prev_text` no longer present) leaves the text unchanged and is still
/// removed from the pending list. All other snapshots are untouched.
///
/// # Errors
/// Returns error if there is no current text snapshot or `index` names no
/// pending suggestion
pub fn apply_suggestion(
    artifact: &Artifact,
    index: usize,
    policy: RemovalPolicy,
) -> Result<ApplyOutcome, ReconcileError> {
    let pending = pending_suggestions(artifact)?;
    let suggestion = pending
        .get(index)
        .ok_or(ReconcileError::IndexOutOfRange {
            index,
            len: pending.len(),
        })?;

    let text = artifact
        .get_current()
        .map_or("", ContentVariant::plain_text);
    let applied = Substitution::locate(text, suggestion);
    let new_text = match applied.as_ref().and_then(|sub| sub.apply(text)) {
        Some(t) => t,
        None => {
            tracing::warn!(
                index,
                prev_text = %suggestion.prev_text,
                "suggestion no longer matches text, removing without edit"
            );
            text.to_string()
        }
    };

    let remaining: Vec<Suggestion> = match policy {
        RemovalPolicy::ByPosition => pending
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != index)
            .map(|(_, s)| s.clone())
            .collect(),
        RemovalPolicy::ByValue => pending
            .iter()
            .filter(|s| !s.same_substitution(suggestion))
            .cloned()
            .collect(),
    };
    let removed = pending.len() - remaining.len();

    let artifact = artifact.replace_current(move |content| match content {
        ContentVariant::Text(mut t) => {
            t.full_markdown = new_text;
            t.suggested_changes = remaining;
            ContentVariant::Text(t)
        }
        other => other,
    })?;

    tracing::debug!(index, removed, stale = applied.is_none(), "applied suggestion");
    Ok(ApplyOutcome {
        artifact,
        applied,
        removed,
    })
}

/// Selection state machine for one text snapshot
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    policy: RemovalPolicy,
    selected: Option<usize>,
}

impl Reconciler {
    /// Create reconciler with the given removal policy
    #[must_use]
    pub fn new(policy: RemovalPolicy) -> Self {
        Self {
            policy,
            selected: None,
        }
    }

    /// Removal policy in effect
    #[inline]
    #[must_use]
    pub fn policy(&self) -> RemovalPolicy {
        self.policy
    }

    /// Highlighted position, if any
    #[inline]
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// State against the artifact's current pending list
    #[must_use]
    pub fn state(&self, artifact: &Artifact) -> SelectionState {
        let pending = pending_suggestions(artifact).map_or(0, <[Suggestion]>::len);
        match self.selected {
            _ if pending == 0 => SelectionState::Idle,
            Some(i) if i < pending => SelectionState::Selected(i),
            _ => SelectionState::Pending,
        }
    }

    /// Select suggestion `index`; selecting it again applies it
    ///
    /// # Errors
    /// Returns [`ReconcileError::Streaming`] while the text is streaming, or
    /// the errors of [`apply_suggestion`]
    pub fn select(
        &mut self,
        artifact: &Artifact,
        index: usize,
        streaming: bool,
    ) -> Result<SelectOutcome, ReconcileError> {
        if streaming {
            return Err(ReconcileError::Streaming);
        }
        if self.selected == Some(index) {
            return self.apply(artifact, index, streaming).map(SelectOutcome::Applied);
        }

        let len = pending_suggestions(artifact)?.len();
        if index >= len {
            return Err(ReconcileError::IndexOutOfRange { index, len });
        }
        self.selected = Some(index);
        Ok(SelectOutcome::Selected(index))
    }

    /// Clear the highlight without touching the text
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Apply suggestion `index` and clear the selection
    ///
    /// # Errors
    /// Returns [`ReconcileError::Streaming`] while the text is streaming, or
    /// the errors of [`apply_suggestion`]
    pub fn apply(
        &mut self,
        artifact: &Artifact,
        index: usize,
        streaming: bool,
    ) -> Result<ApplyOutcome, ReconcileError> {
        if streaming {
            return Err(ReconcileError::Streaming);
        }
        let outcome = apply_suggestion(artifact, index, self.policy)?;
        self.selected = None;
        Ok(outcome)
    }

    /// Drop a selection that no longer names a pending suggestion
    ///
    /// Call after the pending list is replaced or the artifact navigated.
    pub fn sync(&mut self, artifact: &Artifact) {
        if !matches!(self.state(artifact), SelectionState::Selected(_)) {
            self.selected = None;
        }
    }
}
