//! Artifact version store
//!
//! An [`Artifact`] is an append-only, indexed sequence of content snapshots
//! plus a `current_index` pointer. All operations return new values; the
//! receiver is never mutated, so observers holding the pre-operation value
//! during a render cycle keep a consistent view.

use crate::content::ContentVariant;
use serde::{Deserialize, Serialize};

/// Navigation direction through the version history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards index 1
    Back,
    /// Towards the newest version
    Forward,
}

impl std::str::FromStr for Direction {
    type Err = ArtifactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "back" | "backward" | "prev" => Ok(Self::Back),
            "forward" | "next" => Ok(Self::Forward),
            other => Err(ArtifactError::InvalidDirection(other.to_string())),
        }
    }
}

/// Errors related to the version store
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// Operation needs at least one snapshot
    #[error("artifact has no contents")]
    Empty,

    /// Snapshot index is zero
    #[error("content index must be positive, got {0}")]
    NonPositiveIndex(u32),

    /// Two snapshots share an index
    #[error("duplicate content index {0}")]
    DuplicateIndex(u32),

    /// No index left above the current maximum
    #[error("content index space exhausted at {0}")]
    IndexExhausted(u32),

    /// Unparseable navigation direction
    #[error("invalid direction: {0}")]
    InvalidDirection(String),
}

/// The versioned document being co-authored
///
/// # Invariants
/// - every snapshot index is positive and unique
/// - indices are assigned sequentially by [`Artifact::append_version`] and
///   never renumbered
/// - `current_index` normally names an existing snapshot; when it does not,
///   [`Artifact::get_current`] falls back to the last snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    current_index: u32,
    contents: Vec<ContentVariant>,
}

impl Artifact {
    /// Create artifact from its first draft (index 1, current 1)
    #[must_use]
    pub fn new(first: ContentVariant) -> Self {
        Self {
            current_index: 1,
            contents: vec![first.with_index(1)],
        }
    }

    /// Rebuild artifact from stored parts
    ///
    /// # Errors
    /// Returns error if an index is zero or duplicated
    pub fn from_parts(
        current_index: u32,
        contents: Vec<ContentVariant>,
    ) -> Result<Self, ArtifactError> {
        let artifact = Self {
            current_index,
            contents,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check index invariants (useful after deserialization)
    ///
    /// # Errors
    /// Returns error if an index is zero or duplicated
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let mut seen = std::collections::HashSet::with_capacity(self.contents.len());
        for content in &self.contents {
            let index = content.index();
            if index == 0 {
                return Err(ArtifactError::NonPositiveIndex(index));
            }
            if !seen.insert(index) {
                return Err(ArtifactError::DuplicateIndex(index));
            }
        }
        Ok(())
    }

    /// Raw current index pointer
    #[inline]
    #[must_use]
    pub fn current_index(&self) -> u32 {
        self.current_index
    }

    /// All snapshots, in storage order
    #[inline]
    #[must_use]
    pub fn contents(&self) -> &[ContentVariant] {
        &self.contents
    }

    /// Number of versions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Whether the artifact holds no versions
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Highest index in use (0 when empty)
    #[inline]
    #[must_use]
    pub fn max_index(&self) -> u32 {
        self.contents
            .iter()
            .map(ContentVariant::index)
            .max()
            .unwrap_or(0)
    }

    /// Snapshot with the given index
    #[inline]
    #[must_use]
    pub fn get(&self, index: u32) -> Option<&ContentVariant> {
        self.contents.iter().find(|c| c.index() == index)
    }

    /// Current snapshot
    ///
    /// Falls back to the last snapshot when `current_index` matches none
    /// (a pointer momentarily ahead of streamed content). `None` only when
    /// the artifact is empty.
    #[must_use]
    pub fn get_current(&self) -> Option<&ContentVariant> {
        self.get(self.current_index).or_else(|| {
            if !self.contents.is_empty() {
                tracing::trace!(
                    current_index = self.current_index,
                    "current index not found, falling back to last content"
                );
            }
            self.contents.last()
        })
    }

    /// Append a new version; it gets `max_index + 1` and becomes current
    ///
    /// # Errors
    /// Returns [`ArtifactError::IndexExhausted`] if the maximum index is `u32::MAX`
    pub fn append_version(&self, content: ContentVariant) -> Result<Self, ArtifactError> {
        let max = self.max_index();
        let index = max
            .checked_add(1)
            .ok_or(ArtifactError::IndexExhausted(max))?;
        let mut contents = self.contents.clone();
        contents.push(content.with_index(index));
        tracing::debug!(index, "appended artifact version");
        Ok(Self {
            current_index: index,
            contents,
        })
    }

    /// Whether [`Artifact::navigate`] would move in `direction`
    ///
    /// View layers disable their back/forward controls when this is false.
    #[must_use]
    pub fn can_navigate(&self, direction: Direction, streaming: bool) -> bool {
        !streaming && self.adjacent_index(direction).is_some()
    }

    /// Move `current_index` to the adjacent existing index
    ///
    /// Returns an unchanged copy at either boundary or while `streaming`.
    #[must_use]
    pub fn navigate(&self, direction: Direction, streaming: bool) -> Self {
        if streaming {
            return self.clone();
        }
        match self.adjacent_index(direction) {
            Some(index) => Self {
                current_index: index,
                contents: self.contents.clone(),
            },
            None => self.clone(),
        }
    }

    fn adjacent_index(&self, direction: Direction) -> Option<u32> {
        let current = self.get_current()?.index();
        let indices = self.contents.iter().map(ContentVariant::index);
        match direction {
            Direction::Back => indices.filter(|&i| i < current).max(),
            Direction::Forward => indices.filter(|&i| i > current).min(),
        }
    }

    /// Replace the current snapshot with `mutator(current)`
    ///
    /// Only that element changes; all others keep their value and order.
    /// The snapshot keeps its index whatever the mutator does with it.
    ///
    /// # Errors
    /// Returns [`ArtifactError::Empty`] if there is no current snapshot
    pub fn replace_current<F>(&self, mutator: F) -> Result<Self, ArtifactError>
    where
        F: FnOnce(ContentVariant) -> ContentVariant,
    {
        let current = self.get_current().ok_or(ArtifactError::Empty)?;
        let index = current.index();
        let replaced = mutator(current.clone()).with_index(index);

        let contents = self
            .contents
            .iter()
            .map(|c| {
                if c.index() == index {
                    replaced.clone()
                } else {
                    c.clone()
                }
            })
            .collect();

        Ok(Self {
            current_index: self.current_index,
            contents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn three_versions() -> Artifact {
        Artifact::new(ContentVariant::text("t", "v1"))
            .append_version(ContentVariant::text("t", "v2"))
            .unwrap()
            .append_version(ContentVariant::text("t", "v3"))
            .unwrap()
    }

    #[test]
    fn new_starts_at_one() {
        let artifact = Artifact::new(ContentVariant::text("t", "draft").with_index(9));
        assert_eq!(artifact.current_index(), 1);
        assert_eq!(artifact.get_current().unwrap().index(), 1);
    }

    #[test]
    fn append_moves_current() {
        let artifact = three_versions();
        assert_eq!(artifact.max_index(), 3);
        assert_eq!(artifact.current_index(), 3);
        assert_eq!(artifact.get_current().unwrap().plain_text(), "v3");
    }

    #[test]
    fn append_does_not_mutate_input() {
        let before = Artifact::new(ContentVariant::text("t", "v1"));
        let after = before.append_version(ContentVariant::text("t", "v2")).unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 2);
    }

    #[test]
    fn append_at_max_index_is_an_error() {
        let full = Artifact::from_parts(
            u32::MAX,
            vec![ContentVariant::text("t", "last").with_index(u32::MAX)],
        )
        .unwrap();
        let err = full
            .append_version(ContentVariant::text("t", "one more"))
            .unwrap_err();
        assert!(matches!(err, ArtifactError::IndexExhausted(u32::MAX)));
        assert_eq!(full.len(), 1);
    }

    #[test]
    fn get_current_falls_back_to_last() {
        let artifact = Artifact::from_parts(
            7,
            vec![
                ContentVariant::text("t", "a").with_index(1),
                ContentVariant::text("t", "b").with_index(2),
            ],
        )
        .unwrap();
        assert_eq!(artifact.get_current().unwrap().plain_text(), "b");
    }

    #[test]
    fn get_current_empty_is_none() {
        let artifact = Artifact::from_parts(1, Vec::new()).unwrap();
        assert!(artifact.get_current().is_none());
        assert!(matches!(
            artifact.replace_current(|c| c),
            Err(ArtifactError::Empty)
        ));
    }

    #[test]
    fn navigate_within_bounds() {
        let artifact = three_versions();
        let back = artifact.navigate(Direction::Back, false);
        assert_eq!(back.current_index(), 2);
        let forward = back.navigate(Direction::Forward, false);
        assert_eq!(forward.current_index(), 3);
    }

    #[test]
    fn navigate_boundaries_are_noops() {
        let artifact = three_versions();
        assert_eq!(artifact.navigate(Direction::Forward, false), artifact);
        assert!(!artifact.can_navigate(Direction::Forward, false));

        let first = artifact
            .navigate(Direction::Back, false)
            .navigate(Direction::Back, false);
        assert_eq!(first.current_index(), 1);
        assert_eq!(first.navigate(Direction::Back, false), first);
    }

    #[test]
    fn navigate_disabled_while_streaming() {
        let artifact = three_versions();
        assert_eq!(artifact.navigate(Direction::Back, true), artifact);
        assert!(!artifact.can_navigate(Direction::Back, true));
    }

    #[test]
    fn navigate_skips_index_gaps() {
        let artifact = Artifact::from_parts(
            5,
            vec![
                ContentVariant::text("t", "a").with_index(1),
                ContentVariant::text("t", "b").with_index(5),
            ],
        )
        .unwrap();
        assert_eq!(artifact.navigate(Direction::Back, false).current_index(), 1);
    }

    #[test]
    fn replace_current_touches_only_current() {
        let artifact = three_versions().navigate(Direction::Back, false);
        let replaced = artifact
            .replace_current(|_| ContentVariant::text("t", "edited").with_index(42))
            .unwrap();

        assert_eq!(replaced.current_index(), 2);
        assert_eq!(replaced.get(2).unwrap().plain_text(), "edited");
        assert_eq!(replaced.get(1), artifact.get(1));
        assert_eq!(replaced.get(3), artifact.get(3));
        let order: Vec<u32> = replaced.contents().iter().map(ContentVariant::index).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn validate_rejects_bad_indices() {
        let dup = Artifact::from_parts(
            1,
            vec![
                ContentVariant::text("t", "a").with_index(1),
                ContentVariant::text("t", "b").with_index(1),
            ],
        );
        assert!(matches!(dup, Err(ArtifactError::DuplicateIndex(1))));

        let zero = Artifact::from_parts(1, vec![ContentVariant::text("t", "a")]);
        assert!(matches!(zero, Err(ArtifactError::NonPositiveIndex(0))));
    }

    #[test]
    fn direction_from_str() {
        assert_eq!("back".parse::<Direction>().unwrap(), Direction::Back);
        assert_eq!("forward".parse::<Direction>().unwrap(), Direction::Forward);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn wire_format() {
        let artifact = Artifact::new(ContentVariant::text("t", "body"));
        let value = serde_json::to_value(&artifact).unwrap();
        assert_eq!(value["currentIndex"], 1);
        assert_eq!(value["contents"][0]["type"], "text");
    }
}
