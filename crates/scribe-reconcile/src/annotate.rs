//! Rendering projection of pending suggestions
//!
//! [`annotate`] merges a suggestion list into a copy of the canonical text,
//! wrapping each located `prev_text` in a "removed" marker followed by an
//! "added" marker for its `suggested_text`. The canonical text is never
//! touched; the function is pure and cheap enough to re-run on every text or
//! suggestion-list change, including against partial streamed text.
//!
//! Markers are tagged with the suggestion's position in the *input list*,
//! not its position in text order, so a click on a marker maps back to the
//! right entry. That mapping is valid for one pass only.

use crate::splice::Substitution;
use scribe_artifact::Suggestion;
use std::ops::Range;

/// How markers are written into the annotated text
pub trait MarkerFormat {
    /// Markup for the text being replaced
    fn removed(&self, index: usize, prev_text: &str) -> String;

    /// Markup for the proposed replacement
    fn added(&self, index: usize, suggested_text: &str) -> String;
}

/// Element id carried by the removed-text marker of suggestion `index`
///
/// View layers look this id up to measure the marker's vertical offset.
#[inline]
#[must_use]
pub fn prev_marker_id(index: usize) -> String {
    format!("suggestion-prev-{index}")
}

/// Inline HTML spans, for markdown renderers that pass raw HTML through
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlMarkers;

impl MarkerFormat for HtmlMarkers {
    fn removed(&self, index: usize, prev_text: &str) -> String {
        format!(
            r#"<span class="suggestion-removed" data-prevtext-id="{}">{prev_text}</span>"#,
            prev_marker_id(index)
        )
    }

    fn added(&self, index: usize, suggested_text: &str) -> String {
        format!(
            r#"<span class="suggestion-added" data-suggestion-id="suggestion-added-{index}">{suggested_text}</span>"#
        )
    }
}

/// Word-diff style markers: `[-0:old-]{+0:new+}`
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffMarkers;

impl MarkerFormat for DiffMarkers {
    fn removed(&self, index: usize, prev_text: &str) -> String {
        format!("[-{index}:{prev_text}-]")
    }

    fn added(&self, index: usize, suggested_text: &str) -> String {
        format!("{{+{index}:{suggested_text}+}}")
    }
}

/// Where one suggestion landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Position in the input suggestion list
    pub suggestion: usize,
    /// Byte range of `prev_text` in the canonical text
    pub source: Range<usize>,
    /// Byte range of the emitted markup in the annotated text
    pub marker: Range<usize>,
}

/// Result of [`annotate`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Annotation {
    /// Canonical text with markers spliced in
    pub text: String,
    /// Input positions sorted by text offset; unlocated suggestions last
    pub order: Vec<usize>,
    /// Placed suggestions, in text order
    pub placements: Vec<Placement>,
    /// Input positions that got no marker (stale, or overlapping an
    /// earlier placement)
    pub unplaced: Vec<usize>,
}

impl Annotation {
    /// Placement of the suggestion at input position `index`
    #[must_use]
    pub fn placement(&self, index: usize) -> Option<&Placement> {
        self.placements.iter().find(|p| p.suggestion == index)
    }

    /// Whether the suggestion at `index` got a marker
    #[inline]
    #[must_use]
    pub fn is_placed(&self, index: usize) -> bool {
        self.placement(index).is_some()
    }
}

/// Annotate with [`HtmlMarkers`]
#[must_use]
pub fn annotate(text: &str, suggestions: &[Suggestion]) -> Annotation {
    annotate_with(text, suggestions, &HtmlMarkers)
}

/// Annotate `text` with `suggestions` using the given marker format
///
/// Suggestions are ordered by the offset of the first occurrence of their
/// `prev_text`; unlocated ones sort last in list order. When two located
/// suggestions overlap, the one earlier in that order is placed and the
/// other is reported in [`Annotation::unplaced`]. Markers are spliced from
/// the last offset to the first so offsets computed on the canonical text
/// stay valid throughout.
#[must_use]
pub fn annotate_with<M>(text: &str, suggestions: &[Suggestion], markers: &M) -> Annotation
where
    M: MarkerFormat + ?Sized,
{
    let located: Vec<Option<Substitution>> = suggestions
        .iter()
        .map(|s| Substitution::locate(text, s))
        .collect();

    let mut order: Vec<usize> = (0..suggestions.len()).collect();
    order.sort_by_key(|&i| match &located[i] {
        Some(sub) => (false, sub.offset()),
        None => (true, 0),
    });

    // Text-order pass: pick non-overlapping placements.
    let mut accepted: Vec<(usize, &Substitution)> = Vec::new();
    let mut unplaced = Vec::new();
    for &i in &order {
        match &located[i] {
            Some(sub) if accepted.last().map_or(true, |(_, prev)| !prev.overlaps(sub)) => {
                accepted.push((i, sub));
            }
            Some(_) => {
                tracing::debug!(suggestion = i, "suggestion overlaps an earlier one, not placed");
                unplaced.push(i);
            }
            None => unplaced.push(i),
        }
    }

    let markups: Vec<String> = accepted
        .iter()
        .map(|&(i, _)| {
            let s = &suggestions[i];
            let mut markup = markers.removed(i, &s.prev_text);
            markup.push_str(&markers.added(i, &s.suggested_text));
            markup
        })
        .collect();

    // Splice right to left.
    let mut annotated = text.to_string();
    for ((_, sub), markup) in accepted.iter().zip(&markups).rev() {
        annotated.replace_range(sub.range(), markup);
    }

    // Marker ranges in the annotated text, left to right.
    let mut placements = Vec::with_capacity(accepted.len());
    let mut shift: isize = 0;
    for ((i, sub), markup) in accepted.iter().zip(&markups) {
        let source = sub.range();
        let start = source.start.saturating_add_signed(shift);
        placements.push(Placement {
            suggestion: *i,
            source: source.clone(),
            marker: start..start + markup.len(),
        });
        shift += len_delta(markup.len(), source.len());
    }

    Annotation {
        text: annotated,
        order,
        placements,
        unplaced,
    }
}

#[allow(clippy::cast_possible_wrap)]
fn len_delta(inserted: usize, removed: usize) -> isize {
    inserted as isize - removed as isize
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_suggestion_html() {
        let a = annotate("The cat sat.", &[Suggestion::new("cat", "dog")]);
        assert_eq!(
            a.text,
            concat!(
                "The ",
                r#"<span class="suggestion-removed" data-prevtext-id="suggestion-prev-0">cat</span>"#,
                r#"<span class="suggestion-added" data-suggestion-id="suggestion-added-0">dog</span>"#,
                " sat."
            )
        );
        assert_eq!(a.order, vec![0]);
        assert!(a.unplaced.is_empty());
    }

    #[test]
    fn two_suggestions_in_text_order() {
        let suggestions = [Suggestion::new("A", "X"), Suggestion::new("C", "Z")];
        let a = annotate_with("A B C", &suggestions, &DiffMarkers);
        assert_eq!(a.text, "[-0:A-]{+0:X+} B [-1:C-]{+1:Z+}");
        assert_eq!(a.order, vec![0, 1]);
        assert_eq!(a.placements[0].source, 0..1);
        assert_eq!(a.placements[1].source, 4..5);
    }

    #[test]
    fn markers_carry_list_position_not_text_position() {
        let suggestions = [Suggestion::new("C", "Z"), Suggestion::new("A", "X")];
        let a = annotate_with("A B C", &suggestions, &DiffMarkers);
        assert_eq!(a.text, "[-1:A-]{+1:X+} B [-0:C-]{+0:Z+}");
        assert_eq!(a.order, vec![1, 0]);
        assert_eq!(a.placement(0).unwrap().source, 4..5);
    }

    #[test]
    fn marker_ranges_point_at_markup() {
        let suggestions = [
            Suggestion::new("quick", "slow"),
            Suggestion::new("lazy", "sleepy"),
            Suggestion::new("missing", "x"),
        ];
        let text = "The quick brown fox jumps over the lazy dog";
        let a = annotate_with(text, &suggestions, &DiffMarkers);

        assert_eq!(&a.text[a.placement(0).unwrap().marker.clone()], "[-0:quick-]{+0:slow+}");
        assert_eq!(&a.text[a.placement(1).unwrap().marker.clone()], "[-1:lazy-]{+1:sleepy+}");
        assert_eq!(a.unplaced, vec![2]);
        assert_eq!(a.order, vec![0, 1, 2]);
    }

    #[test]
    fn unlocated_sort_last_in_list_order() {
        let suggestions = [
            Suggestion::new("gone", "x"),
            Suggestion::new("b", "B"),
            Suggestion::new("also gone", "y"),
            Suggestion::new("a", "A"),
        ];
        let a = annotate_with("a b", &suggestions, &DiffMarkers);
        assert_eq!(a.order, vec![3, 1, 0, 2]);
        assert_eq!(a.unplaced, vec![0, 2]);
    }

    #[test]
    fn overlapping_suggestions_place_first_only() {
        let suggestions = [Suggestion::new("cat", "dog"), Suggestion::new("cat", "cow")];
        let a = annotate_with("cat and cat", &suggestions, &DiffMarkers);
        assert_eq!(a.text, "[-0:cat-]{+0:dog+} and cat");
        assert_eq!(a.unplaced, vec![1]);
    }

    #[test]
    fn empty_inputs() {
        let a = annotate("partial strea", &[]);
        assert_eq!(a.text, "partial strea");
        assert!(a.order.is_empty());

        let b = annotate("", &[Suggestion::new("x", "y")]);
        assert_eq!(b.text, "");
        assert_eq!(b.unplaced, vec![0]);
    }

    #[test]
    fn annotate_is_idempotent() {
        let suggestions = [Suggestion::new("A", "X"), Suggestion::new("C", "Z")];
        assert_eq!(annotate("A B C", &suggestions), annotate("A B C", &suggestions));
    }

    #[test]
    fn multibyte_text() {
        let a = annotate_with("café au lait", &[Suggestion::new("lait", "thé")], &DiffMarkers);
        assert_eq!(a.text, "café au [-0:lait-]{+0:thé+}");
    }
}
