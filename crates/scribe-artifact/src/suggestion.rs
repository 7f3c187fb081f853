//! Proposed text substitutions attached to a text snapshot

use serde::{Deserialize, Serialize};

/// A proposed `prev_text -> suggested_text` edit, pending acceptance
///
/// Owned by exactly one text snapshot. Its position in the owning list is
/// only meaningful for the duration of one rendering pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Text to be replaced (matched at its first occurrence)
    pub prev_text: String,
    /// Replacement text
    pub suggested_text: String,
    /// Short headline shown on the suggestion card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Suggestion {
    /// Create new suggestion without a description
    #[inline]
    #[must_use]
    pub fn new(prev_text: impl Into<String>, suggested_text: impl Into<String>) -> Self {
        Self {
            prev_text: prev_text.into(),
            suggested_text: suggested_text.into(),
            description: None,
        }
    }

    /// With card description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether two suggestions propose the same substitution
    ///
    /// Descriptions are ignored.
    #[inline]
    #[must_use]
    pub fn same_substitution(&self, other: &Self) -> bool {
        self.prev_text == other.prev_text && self.suggested_text == other.suggested_text
    }

    /// Byte offset of the first occurrence of `prev_text` in `text`
    ///
    /// An empty `prev_text` never matches.
    #[inline]
    #[must_use]
    pub fn locate(&self, text: &str) -> Option<usize> {
        if self.prev_text.is_empty() {
            return None;
        }
        text.find(&self.prev_text)
    }
}
