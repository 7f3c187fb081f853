//! Text substitutions
//!
//! A [`Substitution`] is a located suggestion: a byte range of the canonical
//! text and the replacement to put there. Locating is always redone against
//! the text it will be applied to; substitutions are never cached across
//! edits.

use scribe_artifact::Suggestion;
use std::ops::Range;

/// Replacement of one byte range of a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Byte offset of the replaced range
    offset: usize,
    /// Length in bytes of the replaced range
    removed_len: usize,
    /// Text inserted in place of the range
    inserted: String,
}

impl Substitution {
    /// Create substitution from parts
    #[inline]
    #[must_use]
    pub fn new(offset: usize, removed_len: usize, inserted: impl Into<String>) -> Self {
        Self {
            offset,
            removed_len,
            inserted: inserted.into(),
        }
    }

    /// Locate `suggestion` at the first occurrence of its `prev_text`
    ///
    /// Returns `None` when the text no longer contains it (stale suggestion).
    #[must_use]
    pub fn locate(text: &str, suggestion: &Suggestion) -> Option<Self> {
        suggestion.locate(text).map(|offset| Self {
            offset,
            removed_len: suggestion.prev_text.len(),
            inserted: suggestion.suggested_text.clone(),
        })
    }

    /// Byte offset
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Replaced byte range in the source text
    #[inline]
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.removed_len
    }

    /// Inserted text
    #[inline]
    #[must_use]
    pub fn inserted(&self) -> &str {
        &self.inserted
    }

    /// Whether two substitutions touch overlapping bytes
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let (a, b) = (self.range(), other.range());
        a.start < b.end && b.start < a.end
    }

    /// Apply to `text`, producing `text[..p] + inserted + text[p + len..]`
    ///
    /// Returns `None` if the range is out of bounds or not on a char boundary.
    #[must_use]
    pub fn apply(&self, text: &str) -> Option<String> {
        let range = self.range();
        let head = text.get(..range.start)?;
        let tail = text.get(range.end..)?;

        let mut out = String::with_capacity(head.len() + self.inserted.len() + tail.len());
        out.push_str(head);
        out.push_str(&self.inserted);
        out.push_str(tail);
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_and_apply() {
        let s = Suggestion::new("cat", "dog");
        let sub = Substitution::locate("The cat sat.", &s).unwrap();
        assert_eq!(sub.offset(), 4);
        assert_eq!(sub.range(), 4..7);
        assert_eq!(sub.apply("The cat sat.").unwrap(), "The dog sat.");
    }

    #[test]
    fn only_first_occurrence_is_replaced() {
        let s = Suggestion::new("a", "X");
        let sub = Substitution::locate("banana", &s).unwrap();
        assert_eq!(sub.apply("banana").unwrap(), "bXnana");
    }

    #[test]
    fn stale_suggestion_is_not_located() {
        assert!(Substitution::locate("The dog sat.", &Suggestion::new("cat", "dog")).is_none());
    }

    #[test]
    fn apply_rejects_bad_ranges() {
        assert!(Substitution::new(10, 2, "x").apply("short").is_none());
        // inside the two-byte 'é'
        assert!(Substitution::new(1, 1, "x").apply("é").is_none());
    }

    #[test]
    fn overlap_detection() {
        let a = Substitution::new(0, 5, "");
        let b = Substitution::new(4, 2, "");
        let c = Substitution::new(5, 2, "");
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(b.overlaps(&a));
    }
}
