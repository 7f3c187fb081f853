//! Artifact session
//!
//! One [`ArtifactSession`] owns the artifact of one UI session and is the
//! only place it is replaced. Agent output arrives as a stream:
//!
//! 1. [`ArtifactSession::begin_stream`] hands out a [`StreamTicket`]
//! 2. [`ArtifactSession::push_partial`] stores the latest partial snapshot
//!    as a draft; [`ArtifactSession::view`] renders it, the version store
//!    does not see it
//! 3. [`ArtifactSession::finish_stream`] appends the final snapshot, or
//!    [`ArtifactSession::fail_stream`] drops it and raises `update_failed`
//!
//! While any ticket is outstanding, navigation and suggestion acceptance
//! are disabled. Tickets may finish in any order; each finished one appends,
//! so the newest append is always current.

use crate::config::ScribeConfig;
use crate::error::ScribeError;
use scribe_artifact::{
    is_legacy_artifact, Artifact, ArtifactError, Board, ContentVariant, Direction, Suggestion,
};
use scribe_reconcile::{
    annotate_with, layout_cards, pending_suggestions, Annotation, ApplyOutcome, HtmlMarkers,
    LayoutConfig, MarkerFormat, Reconciler, SelectOutcome, SelectionState, Viewport,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Handle for one outstanding agent stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamTicket {
    generation: u64,
}

impl StreamTicket {
    /// Monotonic generation number
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Parse a raw artifact JSON object
///
/// Content snapshots with an unrecognized `type` are dropped (logged); the
/// remaining ones must satisfy the index invariants.
///
/// # Errors
/// - [`ScribeError::LegacyArtifact`] for the retired single-content shape
/// - [`ScribeError::MalformedArtifact`] if `currentIndex` or `contents` is
///   missing or mistyped
/// - [`ScribeError::Artifact`] on zero or duplicate indices
pub fn parse_artifact(value: &Value) -> Result<Artifact, ScribeError> {
    if is_legacy_artifact(value) {
        return Err(ScribeError::LegacyArtifact);
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct RawArtifact {
        current_index: u32,
        contents: Vec<Value>,
    }

    let raw = RawArtifact::deserialize(value)?;
    let contents: Vec<ContentVariant> = raw
        .contents
        .iter()
        .filter_map(ContentVariant::from_value)
        .collect();
    if contents.len() < raw.contents.len() {
        tracing::warn!(
            dropped = raw.contents.len() - contents.len(),
            "dropped unrecognized content snapshots"
        );
    }
    Ok(Artifact::from_parts(raw.current_index, contents)?)
}

/// Artifact owned by one UI session
#[derive(Debug, Clone, Default)]
pub struct ArtifactSession {
    artifact: Option<Artifact>,
    reconciler: Reconciler,
    layout: LayoutConfig,
    streams: BTreeMap<u64, Option<ContentVariant>>,
    next_generation: u64,
    update_failed: bool,
}

impl ArtifactSession {
    /// Create empty session (no artifact yet)
    #[must_use]
    pub fn new(config: &ScribeConfig) -> Self {
        Self {
            reconciler: Reconciler::new(config.removal),
            layout: config.layout,
            ..Self::default()
        }
    }

    /// Builder: start from an existing artifact
    #[must_use]
    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifact = Some(artifact);
        self
    }

    /// Canonical artifact, if one exists
    #[inline]
    #[must_use]
    pub fn artifact(&self) -> Option<&Artifact> {
        self.artifact.as_ref()
    }

    /// Take ownership of the canonical artifact
    #[must_use]
    pub fn into_artifact(self) -> Option<Artifact> {
        self.artifact
    }

    /// Whether any stream is outstanding
    #[inline]
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        !self.streams.is_empty()
    }

    /// Whether the last collaborator call failed
    #[inline]
    #[must_use]
    pub fn update_failed(&self) -> bool {
        self.update_failed
    }

    /// Acknowledge a failure shown to the user
    pub fn clear_update_failed(&mut self) {
        self.update_failed = false;
    }

    /// Record a collaborator failure
    pub(crate) fn mark_update_failed(&mut self) {
        self.update_failed = true;
    }

    /// Open a new agent stream
    pub fn begin_stream(&mut self) -> StreamTicket {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.streams.insert(generation, None);
        self.update_failed = false;
        tracing::debug!(generation, "stream started");
        StreamTicket { generation }
    }

    /// Replace the draft of an outstanding stream with newer partial content
    ///
    /// # Errors
    /// Returns [`ScribeError::InactiveStream`] if the ticket already ended
    pub fn push_partial(
        &mut self,
        ticket: StreamTicket,
        content: ContentVariant,
    ) -> Result<(), ScribeError> {
        let draft = self
            .streams
            .get_mut(&ticket.generation)
            .ok_or(ScribeError::InactiveStream(ticket.generation))?;
        *draft = Some(content);
        Ok(())
    }

    /// Close a stream and append its final content as a new version
    ///
    /// Returns the index of the appended version.
    ///
    /// # Errors
    /// Returns [`ScribeError::InactiveStream`] if the ticket already ended
    pub fn finish_stream(
        &mut self,
        ticket: StreamTicket,
        content: ContentVariant,
    ) -> Result<u32, ScribeError> {
        if self.streams.remove(&ticket.generation).is_none() {
            return Err(ScribeError::InactiveStream(ticket.generation));
        }
        let index = self.append(content)?;
        tracing::info!(generation = ticket.generation, index, "stream finished");
        Ok(index)
    }

    /// Close a stream without touching the artifact and flag the failure
    ///
    /// # Errors
    /// Returns [`ScribeError::InactiveStream`] if the ticket already ended
    pub fn fail_stream(&mut self, ticket: StreamTicket) -> Result<(), ScribeError> {
        if self.streams.remove(&ticket.generation).is_none() {
            return Err(ScribeError::InactiveStream(ticket.generation));
        }
        self.update_failed = true;
        tracing::warn!(generation = ticket.generation, "stream failed, artifact unchanged");
        Ok(())
    }

    fn append(&mut self, content: ContentVariant) -> Result<u32, ScribeError> {
        let artifact = match &self.artifact {
            Some(artifact) => artifact.append_version(content)?,
            None => Artifact::new(content),
        };
        let index = artifact.current_index();
        self.replace(artifact);
        Ok(index)
    }

    fn replace(&mut self, artifact: Artifact) {
        self.reconciler.sync(&artifact);
        self.artifact = Some(artifact);
    }

    fn current_artifact(&self) -> Result<&Artifact, ScribeError> {
        self.artifact
            .as_ref()
            .ok_or(ScribeError::MissingContext("artifact"))
    }

    /// Snapshot to render: newest streamed draft, else the current version
    #[must_use]
    pub fn view(&self) -> Option<&ContentVariant> {
        self.streams
            .values()
            .rev()
            .find_map(Option::as_ref)
            .or_else(|| self.artifact.as_ref().and_then(Artifact::get_current))
    }

    /// Annotated view with HTML markers
    #[must_use]
    pub fn annotated_view(&self) -> Annotation {
        self.annotated_view_with(&HtmlMarkers)
    }

    /// Annotated view with the given markers
    ///
    /// Runs against partial text while streaming.
    #[must_use]
    pub fn annotated_view_with<M: MarkerFormat + ?Sized>(&self, markers: &M) -> Annotation {
        match self.view() {
            Some(content) => annotate_with(content.plain_text(), content.suggestions(), markers),
            None => Annotation::default(),
        }
    }

    /// Card positions for the current selection
    ///
    /// `marker_tops` and `measured_heights` are indexed by suggestion list
    /// position; `None` means not rendered / not measured yet.
    #[must_use]
    pub fn card_positions(
        &self,
        marker_tops: &[Option<f64>],
        measured_heights: &[Option<f64>],
        viewport: Viewport,
    ) -> Vec<f64> {
        let cards = self
            .layout
            .cards_from_markers(marker_tops, measured_heights, viewport);
        layout_cards(&cards, self.reconciler.selected(), &self.layout)
    }

    /// Whether navigation in `direction` is currently possible
    #[must_use]
    pub fn can_navigate(&self, direction: Direction) -> bool {
        self.artifact
            .as_ref()
            .is_some_and(|a| a.can_navigate(direction, self.is_streaming()))
    }

    /// Move through the version history; no-op at the ends or while streaming
    ///
    /// Returns the current index afterwards.
    ///
    /// # Errors
    /// Returns error if there is no artifact
    pub fn navigate(&mut self, direction: Direction) -> Result<u32, ScribeError> {
        let moved = self
            .current_artifact()?
            .navigate(direction, self.is_streaming());
        let index = moved.current_index();
        self.replace(moved);
        Ok(index)
    }

    /// Selection state of the current snapshot
    #[must_use]
    pub fn selection_state(&self) -> SelectionState {
        self.artifact
            .as_ref()
            .map_or(SelectionState::Idle, |a| self.reconciler.state(a))
    }

    /// Replace the pending suggestions of the current text snapshot
    ///
    /// # Errors
    /// Returns error if there is no artifact or the current snapshot is not text
    pub fn attach_suggestions(&mut self, batch: Vec<Suggestion>) -> Result<(), ScribeError> {
        let artifact = self.current_artifact()?;
        pending_suggestions(artifact)?;

        let count = batch.len();
        let updated = artifact.replace_current(move |content| match content {
            ContentVariant::Text(mut text) => {
                text.suggested_changes = batch;
                ContentVariant::Text(text)
            }
            other => other,
        })?;
        self.replace(updated);
        tracing::debug!(count, "attached suggestions");
        Ok(())
    }

    /// Select suggestion `index`; selecting it again applies it
    ///
    /// # Errors
    /// Returns error while streaming, or if `index` names no pending suggestion
    pub fn select(&mut self, index: usize) -> Result<SelectOutcome, ScribeError> {
        let streaming = self.is_streaming();
        let artifact = self
            .artifact
            .as_ref()
            .ok_or(ScribeError::MissingContext("artifact"))?;
        let outcome = self.reconciler.select(artifact, index, streaming)?;
        if let SelectOutcome::Applied(applied) = &outcome {
            self.replace(applied.artifact.clone());
        }
        Ok(outcome)
    }

    /// Clear the highlight
    pub fn deselect(&mut self) {
        self.reconciler.deselect();
    }

    /// Accept suggestion `index` into the canonical text
    ///
    /// # Errors
    /// Returns error while streaming, or if `index` names no pending suggestion
    pub fn apply(&mut self, index: usize) -> Result<ApplyOutcome, ScribeError> {
        let streaming = self.is_streaming();
        let artifact = self
            .artifact
            .as_ref()
            .ok_or(ScribeError::MissingContext("artifact"))?;
        let outcome = self.reconciler.apply(artifact, index, streaming)?;
        self.replace(outcome.artifact.clone());
        Ok(outcome)
    }

    /// Append a user edit as a new version
    ///
    /// # Errors
    /// Returns [`ScribeError::Streaming`] while a stream is outstanding
    pub fn commit_user_edit(&mut self, content: ContentVariant) -> Result<u32, ScribeError> {
        if self.is_streaming() {
            return Err(ScribeError::Streaming);
        }
        self.append(content)
    }

    /// Move one board note and commit the board in place
    ///
    /// # Errors
    /// Returns error while streaming, if the current snapshot is not a board,
    /// or if `note` names no valid note
    pub fn move_board_note(&mut self, note: usize, x: f64, y: f64) -> Result<(), ScribeError> {
        if self.is_streaming() {
            return Err(ScribeError::Streaming);
        }
        let artifact = self.current_artifact()?;
        let current = artifact.get_current().ok_or(ArtifactError::Empty)?;
        let board_content = current
            .as_board()
            .ok_or(ScribeError::NotBoard(current.kind()))?;

        let mut board = Board::parse(&board_content.board);
        board.move_note(note, x, y)?;
        let serialized = board.to_ndjson()?;

        let updated = artifact.replace_current(move |content| match content {
            ContentVariant::Board(mut b) => {
                b.board = serialized;
                ContentVariant::Board(b)
            }
            other => other,
        })?;
        self.replace(updated);
        Ok(())
    }
}
