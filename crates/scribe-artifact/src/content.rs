//! Content variants
//!
//! One snapshot of an artifact is a [`ContentVariant`]: text (markdown),
//! code, or board. The variant is discriminated by the `type` tag on the
//! wire and by the enum everywhere else; [`ContentVariant::kind`] and
//! [`classify`] are the only places the tag is inspected.

use crate::language::ProgrammingLanguage;
use crate::suggestion::Suggestion;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discriminant of a content snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Markdown document
    Text,
    /// Source code
    Code,
    /// Board of positioned notes
    Board,
    /// Missing or unrecognized `type` tag; callers treat it as absent
    Unknown,
}

impl ContentKind {
    /// Wire tag, `None` for [`ContentKind::Unknown`]
    #[inline]
    #[must_use]
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Self::Text => Some("text"),
            Self::Code => Some("code"),
            Self::Board => Some("board"),
            Self::Unknown => None,
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag().unwrap_or("unknown"))
    }
}

/// Markdown snapshot with its pending suggestions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    pub index: u32,
    pub title: String,
    pub full_markdown: String,
    #[serde(default)]
    pub suggested_changes: Vec<Suggestion>,
}

/// Source code snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeContent {
    pub index: u32,
    pub title: String,
    pub code: String,
    #[serde(default)]
    pub language: ProgrammingLanguage,
}

/// Board snapshot; `board` holds newline-delimited JSON note records
///
/// See [`crate::board::Board`] for the parsed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardContent {
    pub index: u32,
    pub title: String,
    pub board: String,
}

/// One immutable snapshot of an artifact at a version index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentVariant {
    Text(TextContent),
    Code(CodeContent),
    Board(BoardContent),
}

impl ContentVariant {
    /// New text snapshot (index assigned when appended)
    #[must_use]
    pub fn text(title: impl Into<String>, full_markdown: impl Into<String>) -> Self {
        Self::Text(TextContent {
            index: 0,
            title: title.into(),
            full_markdown: full_markdown.into(),
            suggested_changes: Vec::new(),
        })
    }

    /// New code snapshot (index assigned when appended)
    #[must_use]
    pub fn code(
        title: impl Into<String>,
        code: impl Into<String>,
        language: ProgrammingLanguage,
    ) -> Self {
        Self::Code(CodeContent {
            index: 0,
            title: title.into(),
            code: code.into(),
            language,
        })
    }

    /// New board snapshot (index assigned when appended)
    #[must_use]
    pub fn board(title: impl Into<String>, board: impl Into<String>) -> Self {
        Self::Board(BoardContent {
            index: 0,
            title: title.into(),
            board: board.into(),
        })
    }

    /// Parse a raw JSON snapshot
    ///
    /// Returns `None` (and logs) for objects whose `type` is missing or
    /// unrecognized, or whose fields do not match the tagged shape.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        if classify(value) == ContentKind::Unknown {
            tracing::debug!("ignoring content with unrecognized type tag");
            return None;
        }
        match Self::deserialize(value) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::warn!(error = %e, "malformed content snapshot");
                None
            }
        }
    }

    /// Variant discriminant
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Text(_) => ContentKind::Text,
            Self::Code(_) => ContentKind::Code,
            Self::Board(_) => ContentKind::Board,
        }
    }

    /// Version index
    #[inline]
    #[must_use]
    pub fn index(&self) -> u32 {
        match self {
            Self::Text(c) => c.index,
            Self::Code(c) => c.index,
            Self::Board(c) => c.index,
        }
    }

    /// Same snapshot at a different version index
    #[must_use]
    pub fn with_index(mut self, index: u32) -> Self {
        match &mut self {
            Self::Text(c) => c.index = index,
            Self::Code(c) => c.index = index,
            Self::Board(c) => c.index = index,
        }
        self
    }

    /// Title
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Text(c) => &c.title,
            Self::Code(c) => &c.title,
            Self::Board(c) => &c.title,
        }
    }

    /// Text payload, if this is a text snapshot
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&TextContent> {
        match self {
            Self::Text(c) => Some(c),
            _ => None,
        }
    }

    /// Code payload, if this is a code snapshot
    #[inline]
    #[must_use]
    pub fn as_code(&self) -> Option<&CodeContent> {
        match self {
            Self::Code(c) => Some(c),
            _ => None,
        }
    }

    /// Board payload, if this is a board snapshot
    #[inline]
    #[must_use]
    pub fn as_board(&self) -> Option<&BoardContent> {
        match self {
            Self::Board(c) => Some(c),
            _ => None,
        }
    }

    /// Pending suggestions (always empty for code and board)
    #[inline]
    #[must_use]
    pub fn suggestions(&self) -> &[Suggestion] {
        match self {
            Self::Text(c) => &c.suggested_changes,
            _ => &[],
        }
    }

    /// Linear text projection; see [`extract_plain_text`]
    #[inline]
    #[must_use]
    pub fn plain_text(&self) -> &str {
        match self {
            Self::Text(c) => &c.full_markdown,
            Self::Code(c) => &c.code,
            Self::Board(_) => "",
        }
    }

    /// Raw payload string, including the board's NDJSON
    ///
    /// Agents that read the whole document want this rather than
    /// [`Self::plain_text`].
    #[inline]
    #[must_use]
    pub fn raw_payload(&self) -> &str {
        match self {
            Self::Board(c) => &c.board,
            other => other.plain_text(),
        }
    }
}

/// Classify a raw JSON object by its `type` tag
///
/// Never fails: anything that is not an object with a recognized tag is
/// [`ContentKind::Unknown`].
#[must_use]
pub fn classify(value: &Value) -> ContentKind {
    match value.get("type").and_then(Value::as_str) {
        Some("text") => ContentKind::Text,
        Some("code") => ContentKind::Code,
        Some("board") => ContentKind::Board,
        _ => ContentKind::Unknown,
    }
}

/// Whether a raw JSON object is the deprecated single-content artifact
/// shape (numeric `currentContentIndex`)
#[must_use]
pub fn is_legacy_artifact(value: &Value) -> bool {
    value
        .get("currentContentIndex")
        .is_some_and(Value::is_number)
}

/// `fullMarkdown` for text, `code` for code, empty for board and for `None`
#[inline]
#[must_use]
pub fn extract_plain_text(content: Option<&ContentVariant>) -> &str {
    content.map_or("", ContentVariant::plain_text)
}
