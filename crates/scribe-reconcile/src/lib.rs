//! Scribe Suggestion Reconciliation
//!
//! Merges pending suggestions into a rendered view and commits accepted
//! ones into the canonical text.
//!
//! # Core Concepts
//!
//! - [`annotate`]: pure rendering projection; the canonical text is never touched
//! - [`apply_suggestion`]: the single commit path for an accepted suggestion
//! - [`Reconciler`]: `Idle -> Pending -> Selected(i)` state machine per snapshot
//! - [`layout_cards`]: stack / anchored placement of suggestion cards
//!
//! Offsets are always recomputed against the text they apply to. Nothing in
//! this crate caches a position across an edit.
//!
//! # Example
//!
//! ```rust
//! use scribe_artifact::{Artifact, ContentVariant, Suggestion, TextContent};
//! use scribe_reconcile::{annotate, apply_suggestion, RemovalPolicy};
//!
//! let artifact = Artifact::new(ContentVariant::Text(TextContent {
//!     index: 0,
//!     title: "Story".into(),
//!     full_markdown: "The cat sat.".into(),
//!     suggested_changes: vec![Suggestion::new("cat", "dog")],
//! }));
//!
//! let view = annotate("The cat sat.", &[Suggestion::new("cat", "dog")]);
//! assert!(view.text.contains("suggestion-prev-0"));
//!
//! let outcome = apply_suggestion(&artifact, 0, RemovalPolicy::ByPosition)?;
//! assert_eq!(outcome.artifact.get_current().unwrap().plain_text(), "The dog sat.");
//! # Ok::<(), scribe_reconcile::ReconcileError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod engine;
mod error;

pub mod annotate;
pub mod layout;
pub mod splice;

pub use annotate::{
    annotate, annotate_with, prev_marker_id, Annotation, DiffMarkers, HtmlMarkers, MarkerFormat,
    Placement,
};
pub use engine::{
    apply_suggestion, pending_suggestions, ApplyOutcome, Reconciler, RemovalPolicy,
    SelectOutcome, SelectionState,
};
pub use error::ReconcileError;
pub use layout::{layout_cards, CardInput, LayoutConfig, Viewport};
pub use splice::Substitution;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scribe_artifact::{Artifact, ContentVariant, Suggestion, TextContent};

    fn text_artifact(text: &str, suggestions: Vec<Suggestion>) -> Artifact {
        Artifact::new(ContentVariant::Text(TextContent {
            index: 0,
            title: "t".into(),
            full_markdown: text.into(),
            suggested_changes: suggestions,
        }))
    }

    fn view(artifact: &Artifact) -> Annotation {
        let current = artifact.get_current().unwrap();
        annotate_with(current.plain_text(), current.suggestions(), &DiffMarkers)
    }

    #[test]
    fn applying_later_suggestion_keeps_earlier_one_locatable() {
        let artifact = text_artifact(
            "A B C",
            vec![Suggestion::new("A", "X"), Suggestion::new("C", "Z")],
        );
        assert_eq!(view(&artifact).text, "[-0:A-]{+0:X+} B [-1:C-]{+1:Z+}");

        let after = apply_suggestion(&artifact, 1, RemovalPolicy::ByPosition).unwrap();
        assert_eq!(after.artifact.get_current().unwrap().plain_text(), "A B Z");
        assert_eq!(view(&after.artifact).text, "[-0:A-]{+0:X+} B Z");
    }

    #[test]
    fn layout_follows_annotation_order() {
        let artifact = text_artifact(
            "one two three",
            vec![Suggestion::new("three", "3"), Suggestion::new("one", "1")],
        );
        let annotation = view(&artifact);
        assert_eq!(annotation.order, vec![1, 0]);

        // Both markers on the same line: the second card stacks below the first.
        let cfg = LayoutConfig::default();
        let cards = cfg.cards_from_markers(&[Some(20.0), Some(20.0)], &[], Viewport::default());
        let positions = layout_cards(&cards, None, &cfg);
        assert_eq!(positions, vec![10.0, 92.0]);
    }
}
