//! Scribe CLI
//!
//! Offline commands over artifact JSON files: inspect the current version,
//! render suggestion markers, accept suggestions, walk the history, move
//! board notes and merge notes records. Commands that change an artifact
//! print the updated artifact JSON.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

use anyhow::{bail, Context, Result};
use scribe_artifact::{outline, Artifact, Direction, Heading};
use scribe_core::{parse_artifact, ArtifactSession, ScribeConfig};
use scribe_notes::{merge_notes, NotesRecord};
use scribe_reconcile::{
    annotate_with, layout_cards, Annotation, DiffMarkers, HtmlMarkers, Viewport,
};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Log filter from `RUST_LOG`, `info` when unset or invalid
#[must_use]
pub fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Read an artifact JSON file
///
/// # Errors
/// Returns error if the file cannot be read or is not a supported artifact
pub fn load_artifact(path: &Path) -> Result<Artifact> {
    let source =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&source).with_context(|| format!("parsing {}", path.display()))?;
    let artifact = parse_artifact(&value)?;
    tracing::debug!(path = %path.display(), versions = artifact.len(), "loaded artifact");
    Ok(artifact)
}

/// Load configuration, defaulting when no path is given
///
/// # Errors
/// Returns error if the file cannot be read or parsed
pub fn load_config(path: Option<&Path>) -> Result<ScribeConfig> {
    match path {
        Some(path) => Ok(ScribeConfig::load(path)?),
        None => Ok(ScribeConfig::default()),
    }
}

/// Raw payload of the current version
///
/// # Errors
/// Returns error if the artifact has no contents
pub fn current(artifact: &Artifact) -> Result<String> {
    let content = artifact
        .get_current()
        .context("artifact has no contents")?;
    Ok(content.raw_payload().to_string())
}

/// Current text with suggestion markers
///
/// # Errors
/// Returns error if the artifact has no contents
pub fn annotate(artifact: &Artifact, html: bool) -> Result<Annotation> {
    let content = artifact
        .get_current()
        .context("artifact has no contents")?;
    let annotation = if html {
        annotate_with(content.plain_text(), content.suggestions(), &HtmlMarkers)
    } else {
        annotate_with(content.plain_text(), content.suggestions(), &DiffMarkers)
    };
    Ok(annotation)
}

/// Accept suggestion `index`
///
/// # Errors
/// Returns error if `index` names no pending suggestion
pub fn apply(artifact: Artifact, config: &ScribeConfig, index: usize) -> Result<Artifact> {
    let mut session = ArtifactSession::new(config).with_artifact(artifact);
    let outcome = session.apply(index)?;
    if outcome.was_stale() {
        tracing::warn!(index, "suggestion no longer matches the text, dropped");
    }
    Ok(outcome.artifact)
}

/// Move the current pointer one version
///
/// # Errors
/// Returns error if the artifact has no contents
pub fn navigate(artifact: Artifact, direction: Direction) -> Result<Artifact> {
    let mut session = ArtifactSession::new(&ScribeConfig::default()).with_artifact(artifact);
    session.navigate(direction)?;
    session.into_artifact().context("artifact has no contents")
}

/// Move board note `note` to `(x, y)`
///
/// # Errors
/// Returns error if the current version is not a board or `note` is out of range
pub fn board_move(artifact: Artifact, note: usize, x: f64, y: f64) -> Result<Artifact> {
    let mut session = ArtifactSession::new(&ScribeConfig::default()).with_artifact(artifact);
    session.move_board_note(note, x, y)?;
    session.into_artifact().context("artifact has no contents")
}

/// Headings of the current text version
///
/// # Errors
/// Returns error if the artifact has no contents or the current version is not text
pub fn headings(artifact: &Artifact) -> Result<Vec<Heading>> {
    let content = artifact
        .get_current()
        .context("artifact has no contents")?;
    let Some(text) = content.as_text() else {
        bail!("outline needs text content, current content is {}", content.kind());
    };
    Ok(outline(&text.full_markdown))
}

/// Card tops for marker tops and measured heights
#[must_use]
pub fn layout(
    config: &ScribeConfig,
    marker_tops: &[Option<f64>],
    measured_heights: &[Option<f64>],
    selected: Option<usize>,
    viewport: Viewport,
) -> Vec<f64> {
    let cards = config
        .layout
        .cards_from_markers(marker_tops, measured_heights, viewport);
    layout_cards(&cards, selected, &config.layout)
}

/// Parse `100,-,250`; `-` or an empty entry is an unmeasured value
///
/// # Errors
/// Returns error on an entry that is not a number
pub fn parse_measurements(list: &str) -> Result<Vec<Option<f64>>> {
    if list.trim().is_empty() {
        return Ok(Vec::new());
    }
    list.split(',')
        .map(str::trim)
        .map(|entry| match entry {
            "" | "-" => Ok(None),
            number => number
                .parse::<f64>()
                .map(Some)
                .with_context(|| format!("invalid measurement {number:?}")),
        })
        .collect()
}

/// Merge two notes record files
///
/// # Errors
/// Returns error if a file cannot be read or is not a notes record
pub fn merge_notes_files(existing: Option<&Path>, incoming: &Path) -> Result<NotesRecord> {
    let read = |path: &Path| -> Result<NotesRecord> {
        let source =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&source).with_context(|| format!("parsing {}", path.display()))
    };
    let existing = existing.map(read).transpose()?;
    let incoming = read(incoming)?;
    let merged = merge_notes(existing.as_ref(), &incoming);
    tracing::info!(
        incoming = incoming.len(),
        total = merged.len(),
        "merged notes"
    );
    Ok(merged)
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
