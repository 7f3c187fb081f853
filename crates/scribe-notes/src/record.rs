//! Categorized notes and their merge rule

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// One of the four note categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteCategory {
    /// Purpose, audience, desired outcomes
    Goals,
    /// Tone, length, format, voice
    Style,
    /// Topics, themes, examples
    Ideas,
    /// Outline, sections, flow
    Structure,
}

impl NoteCategory {
    /// All categories, in prompt order
    pub const ALL: [Self; 4] = [Self::Goals, Self::Style, Self::Ideas, Self::Structure];

    /// Section heading used when notes are rendered for an agent prompt
    #[inline]
    #[must_use]
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Goals => "Goals",
            Self::Style => "Style Notes",
            Self::Ideas => "Ideas",
            Self::Structure => "Structure",
        }
    }
}

/// Accumulated notes for one `(assistant, thread)` conversation
///
/// # Invariants
/// No category holds the same string twice once it has been through
/// [`merge_notes`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesRecord {
    #[serde(default)]
    pub goals_notes: Vec<String>,
    #[serde(default)]
    pub style_notes: Vec<String>,
    #[serde(default)]
    pub ideas_notes: Vec<String>,
    #[serde(default)]
    pub structure_notes: Vec<String>,
}

impl NotesRecord {
    /// Create empty record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set one category
    #[must_use]
    pub fn with<I, S>(mut self, category: NoteCategory, notes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.category_mut(category) = notes.into_iter().map(Into::into).collect();
        self
    }

    /// Notes of one category
    #[inline]
    #[must_use]
    pub fn category(&self, category: NoteCategory) -> &[String] {
        match category {
            NoteCategory::Goals => &self.goals_notes,
            NoteCategory::Style => &self.style_notes,
            NoteCategory::Ideas => &self.ideas_notes,
            NoteCategory::Structure => &self.structure_notes,
        }
    }

    fn category_mut(&mut self, category: NoteCategory) -> &mut Vec<String> {
        match category {
            NoteCategory::Goals => &mut self.goals_notes,
            NoteCategory::Style => &mut self.style_notes,
            NoteCategory::Ideas => &mut self.ideas_notes,
            NoteCategory::Structure => &mut self.structure_notes,
        }
    }

    /// Total number of notes across categories
    #[must_use]
    pub fn len(&self) -> usize {
        NoteCategory::ALL
            .iter()
            .map(|&c| self.category(c).len())
            .sum()
    }

    /// Whether every category is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render notes as prompt context for the note-taking agent
    ///
    /// Empty categories are skipped. See [`format_existing_notes`] for the
    /// no-record case.
    #[must_use]
    pub fn to_prompt_context(&self) -> String {
        let mut out = String::from("Existing notes from previous conversations:\n\n");
        for category in NoteCategory::ALL {
            let notes = self.category(category);
            if notes.is_empty() {
                continue;
            }
            out.push_str("# ");
            out.push_str(category.heading());
            out.push('\n');
            let items: Vec<String> = notes.iter().map(|n| format!("- {n}")).collect();
            out.push_str(&items.join("\n"));
            out.push_str("\n\n");
        }
        out
    }
}

/// Prompt context for an optional existing record
#[must_use]
pub fn format_existing_notes(existing: Option<&NotesRecord>) -> String {
    existing.map_or_else(
        || "No existing notes found.".to_string(),
        NotesRecord::to_prompt_context,
    )
}

/// Merge `incoming` into `existing`
///
/// Per category: `existing ++ incoming`, deduplicated by exact string
/// equality, first occurrence kept. Never mutates its inputs.
#[must_use]
pub fn merge_notes(existing: Option<&NotesRecord>, incoming: &NotesRecord) -> NotesRecord {
    let mut merged = NotesRecord::new();
    for category in NoteCategory::ALL {
        let before = existing.map_or(&[][..], |e| e.category(category));
        let unique: IndexSet<&String> = before
            .iter()
            .chain(incoming.category(category))
            .collect();
        *merged.category_mut(category) = unique.into_iter().cloned().collect();
    }
    merged
}

/// Value persisted in the store: the record plus bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredNotes {
    #[serde(flatten)]
    pub notes: NotesRecord,
    /// When the record was last written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Conversation length seen by the last write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_count: Option<usize>,
}

impl StoredNotes {
    /// Stamp `notes` with the current time and message count
    #[must_use]
    pub fn stamped(notes: NotesRecord, message_count: usize) -> Self {
        Self {
            notes,
            timestamp: Some(Utc::now()),
            message_count: Some(message_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn merge_collapses_duplicates_in_order() {
        let existing = NotesRecord::new().with(NoteCategory::Goals, ["a"]);
        let incoming = NotesRecord::new().with(NoteCategory::Goals, ["a", "b"]);
        let merged = merge_notes(Some(&existing), &incoming);
        assert_eq!(merged.goals_notes, vec!["a", "b"]);
        assert!(merged.style_notes.is_empty());
    }

    #[test]
    fn merge_without_existing_dedupes_incoming() {
        let incoming = NotesRecord::new().with(NoteCategory::Ideas, ["x", "y", "x"]);
        assert_eq!(merge_notes(None, &incoming).ideas_notes, vec!["x", "y"]);
    }

    #[test]
    fn merge_keeps_categories_independent() {
        let existing = NotesRecord::new()
            .with(NoteCategory::Style, ["terse"])
            .with(NoteCategory::Structure, ["intro"]);
        let incoming = NotesRecord::new().with(NoteCategory::Goals, ["terse"]);
        let merged = merge_notes(Some(&existing), &incoming);
        assert_eq!(merged.goals_notes, vec!["terse"]);
        assert_eq!(merged.style_notes, vec!["terse"]);
        assert_eq!(merged.structure_notes, vec!["intro"]);
        assert_eq!(existing.goals_notes, Vec::<String>::new());
    }

    #[test]
    fn prompt_context() {
        assert_eq!(format_existing_notes(None), "No existing notes found.");

        let record = NotesRecord::new()
            .with(NoteCategory::Goals, ["persuade", "be brief"])
            .with(NoteCategory::Structure, ["three acts"]);
        assert_eq!(
            format_existing_notes(Some(&record)),
            "Existing notes from previous conversations:\n\n\
             # Goals\n- persuade\n- be brief\n\n\
             # Structure\n- three acts\n\n"
        );
    }

    #[test]
    fn wire_format_tolerates_missing_fields() {
        let stored: StoredNotes = serde_json::from_value(json!({"goalsNotes": ["g"]})).unwrap();
        assert_eq!(stored.notes.goals_notes, vec!["g"]);
        assert!(stored.notes.ideas_notes.is_empty());
        assert_eq!(stored.message_count, None);
    }

    #[test]
    fn stamped_record_serializes_metadata() {
        let stored = StoredNotes::stamped(NotesRecord::new().with(NoteCategory::Ideas, ["i"]), 4);
        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value["ideasNotes"], json!(["i"]));
        assert_eq!(value["messageCount"], 4);
        assert!(value["timestamp"].is_string());
    }
}
