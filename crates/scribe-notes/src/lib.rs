//! Scribe Notes Accumulator
//!
//! Categorized, deduplicated notes about one conversation, persisted in an
//! injected key-value store under `["notes", assistant_id, thread_id]`.
//!
//! # Core Concepts
//!
//! - [`NotesRecord`]: four note lists (goals, style, ideas, structure)
//! - [`merge_notes`]: `existing ++ incoming`, first occurrence wins
//! - [`KeyValueStore`]: namespaced JSON store seam; [`MemoryStore`] in-process
//! - [`NoteTaker`]: get, ask the agent, merge, put
//!
//! # Example
//!
//! ```rust
//! use scribe_notes::{merge_notes, NoteCategory, NotesRecord};
//!
//! let existing = NotesRecord::new().with(NoteCategory::Goals, ["a"]);
//! let incoming = NotesRecord::new().with(NoteCategory::Goals, ["a", "b"]);
//! assert_eq!(merge_notes(Some(&existing), &incoming).goals_notes, ["a", "b"]);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod agent;
mod error;
mod record;
mod taker;

pub mod store;

pub use agent::{
    format_transcript, AgentError, ConversationMessage, NotesAgent, NotesRequest, Role,
};
pub use error::NotesError;
pub use record::{format_existing_notes, merge_notes, NoteCategory, NotesRecord, StoredNotes};
pub use store::{KeyValueStore, MemoryStore, StoreError};
pub use taker::{NoteTaker, NotesConfig, NotesContext};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
