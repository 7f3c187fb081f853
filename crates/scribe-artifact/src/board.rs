//! Board NDJSON codec
//!
//! A board snapshot stores one JSON note record per line:
//! `{"title": .., "content": .., "x": .., "y": .., "color": ..}`.
//!
//! Parsing never aborts on a bad line: malformed lines are logged, hidden
//! from [`Board::notes`], and written back verbatim by [`Board::to_ndjson`].
//! Lines whose note was not modified are also written back verbatim, so a
//! position commit on one note leaves every other line byte-identical.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Errors related to board editing
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// Note index is past the last valid note
    #[error("note index {index} out of range (board has {len} notes)")]
    NoteIndexOutOfRange { index: usize, len: usize },

    /// Note record could not be serialized
    #[error("failed to serialize note: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One positioned note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardNote {
    pub title: String,
    pub content: String,
    #[serde(serialize_with = "serialize_coordinate")]
    pub x: f64,
    #[serde(serialize_with = "serialize_coordinate")]
    pub y: f64,
    pub color: String,
    /// Fields this codec does not interpret; carried through edits
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BoardNote {
    /// Create new note
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        x: f64,
        y: f64,
        color: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            x,
            y,
            color: color.into(),
            extra: Map::new(),
        }
    }
}

// Whole coordinates are written as integers, matching what producers emit.
#[allow(clippy::trivially_copy_pass_by_ref, clippy::cast_possible_truncation)]
fn serialize_coordinate<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum BoardLine {
    Note {
        raw: String,
        note: BoardNote,
        dirty: bool,
    },
    Malformed(String),
}

/// Parsed board snapshot
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Board {
    lines: Vec<BoardLine>,
}

impl Board {
    /// Parse NDJSON board content
    ///
    /// Blank lines are dropped; malformed lines are kept aside (see module docs).
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut lines = Vec::new();
        for (lineno, raw) in source.trim().split('\n').enumerate() {
            let raw = raw.strip_suffix('\r').unwrap_or(raw);
            if raw.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<BoardNote>(raw) {
                Ok(note) => lines.push(BoardLine::Note {
                    raw: raw.to_string(),
                    note,
                    dirty: false,
                }),
                Err(e) => {
                    tracing::warn!(line = lineno + 1, error = %e, "skipping malformed board line");
                    lines.push(BoardLine::Malformed(raw.to_string()));
                }
            }
        }
        Self { lines }
    }

    /// Build board from notes
    #[must_use]
    pub fn from_notes(notes: impl IntoIterator<Item = BoardNote>) -> Self {
        Self {
            lines: notes
                .into_iter()
                .map(|note| BoardLine::Note {
                    raw: String::new(),
                    note,
                    dirty: true,
                })
                .collect(),
        }
    }

    /// Valid notes, in board order
    pub fn notes(&self) -> impl Iterator<Item = &BoardNote> {
        self.lines.iter().filter_map(|line| match line {
            BoardLine::Note { note, .. } => Some(note),
            BoardLine::Malformed(_) => None,
        })
    }

    /// Number of valid notes
    #[must_use]
    pub fn len(&self) -> usize {
        self.notes().count()
    }

    /// Whether the board has no valid notes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of malformed lines carried along
    #[must_use]
    pub fn malformed_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| matches!(line, BoardLine::Malformed(_)))
            .count()
    }

    /// Note at `index` among valid notes
    #[must_use]
    pub fn note(&self, index: usize) -> Option<&BoardNote> {
        self.notes().nth(index)
    }

    /// Move the note at `index` (among valid notes) to `(x, y)`
    ///
    /// # Errors
    /// Returns [`BoardError::NoteIndexOutOfRange`] and leaves the board
    /// untouched if `index` names no note
    pub fn move_note(&mut self, index: usize, x: f64, y: f64) -> Result<(), BoardError> {
        let len = self.len();
        let target = self
            .lines
            .iter_mut()
            .filter_map(|line| match line {
                BoardLine::Note { note, dirty, .. } => Some((note, dirty)),
                BoardLine::Malformed(_) => None,
            })
            .nth(index);

        match target {
            Some((note, dirty)) => {
                note.x = x;
                note.y = y;
                *dirty = true;
                Ok(())
            }
            None => Err(BoardError::NoteIndexOutOfRange { index, len }),
        }
    }

    /// Serialize back to NDJSON
    ///
    /// Unmodified and malformed lines are emitted exactly as parsed.
    ///
    /// # Errors
    /// Returns error if a modified note fails to serialize
    pub fn to_ndjson(&self) -> Result<String, BoardError> {
        let mut out = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            match line {
                BoardLine::Note {
                    raw, dirty: false, ..
                }
                | BoardLine::Malformed(raw) => out.push(raw.clone()),
                BoardLine::Note {
                    note, dirty: true, ..
                } => out.push(serde_json::to_string(note)?),
            }
        }
        Ok(out.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BOARD: &str = concat!(
        r##"{"title":"Intro","content":"Hook the reader","x":10,"y":20,"color":"#fde68a"}"##,
        "\n",
        r##"{"title":"Body","content":"Three points","x":220.5,"y":20,"color":"#bfdbfe"}"##,
        "\n",
        r##"{"title":"Outro","content":"Call to action","x":430,"y":20,"color":"#bbf7d0"}"##,
    );

    #[test]
    fn parse_valid_board() {
        let board = Board::parse(BOARD);
        assert_eq!(board.len(), 3);
        assert_eq!(board.note(1).unwrap().title, "Body");
        assert!((board.note(1).unwrap().x - 220.5).abs() < f64::EPSILON);
    }

    #[test]
    fn round_trip_is_byte_identical() {
        let board = Board::parse(BOARD);
        assert_eq!(board.to_ndjson().unwrap(), BOARD);
    }

    #[test]
    fn malformed_lines_are_skipped_not_fatal() {
        let source = format!("{BOARD}\nnot json\n{{\"title\":\"missing fields\"}}");
        let board = Board::parse(&source);
        assert_eq!(board.len(), 3);
        assert_eq!(board.malformed_count(), 2);
        assert_eq!(board.to_ndjson().unwrap(), source);
    }

    #[test]
    fn move_note_leaves_others_identical() {
        let mut board = Board::parse(BOARD);
        board.move_note(1, 300.0, 45.0).unwrap();

        let out = board.to_ndjson().unwrap();
        let original: Vec<&str> = BOARD.lines().collect();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], original[0]);
        assert_eq!(lines[2], original[2]);
        assert_eq!(
            lines[1],
            r##"{"title":"Body","content":"Three points","x":300,"y":45,"color":"#bfdbfe"}"##
        );
    }

    #[test]
    fn move_note_index_counts_valid_notes_only() {
        let source = format!("garbage\n{BOARD}");
        let mut board = Board::parse(&source);
        board.move_note(0, 1.0, 2.0).unwrap();
        assert_eq!(board.note(0).unwrap().title, "Intro");
        assert!(board.to_ndjson().unwrap().starts_with("garbage\n"));
    }

    #[test]
    fn move_note_out_of_range() {
        let mut board = Board::parse(BOARD);
        let err = board.move_note(3, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, BoardError::NoteIndexOutOfRange { index: 3, len: 3 }));
        assert_eq!(board.to_ndjson().unwrap(), BOARD);
    }

    #[test]
    fn extra_fields_survive_move() {
        let mut board = Board::parse(
            r##"{"title":"a","content":"b","x":1,"y":2,"color":"red","pinned":true}"##,
        );
        board.move_note(0, 5.0, 6.0).unwrap();
        let value: Value = serde_json::from_str(&board.to_ndjson().unwrap()).unwrap();
        assert_eq!(value["pinned"], true);
        assert_eq!(value["x"], 5);
    }

    #[test]
    fn empty_and_blank_boards() {
        assert!(Board::parse("").is_empty());
        assert!(Board::parse("\n\n  \n").is_empty());
        assert_eq!(Board::parse("").to_ndjson().unwrap(), "");
    }

    #[test]
    fn from_notes_serializes_fractional_coordinates() {
        let board = Board::from_notes([BoardNote::new("t", "c", 1.5, 2.0, "blue")]);
        assert_eq!(
            board.to_ndjson().unwrap(),
            r#"{"title":"t","content":"c","x":1.5,"y":2,"color":"blue"}"#
        );
    }
}
