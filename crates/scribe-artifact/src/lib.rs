//! Scribe Artifact Model
//!
//! The versioned document co-authored by a user and an agent.
//!
//! # Core Concepts
//!
//! - [`ContentVariant`]: one immutable snapshot (text, code or board)
//! - [`Artifact`]: append-only version store with a current-index pointer
//! - [`Suggestion`]: a pending `prev_text -> suggested_text` edit on a text snapshot
//! - [`Board`]: tolerant NDJSON codec for board snapshots
//!
//! # Example
//!
//! ```rust
//! use scribe_artifact::{Artifact, ContentVariant, Direction};
//!
//! let artifact = Artifact::new(ContentVariant::text("Essay", "First draft"))
//!     .append_version(ContentVariant::text("Essay", "Second draft"))?;
//! assert_eq!(artifact.current_index(), 2);
//!
//! let back = artifact.navigate(Direction::Back, false);
//! assert_eq!(back.get_current().unwrap().plain_text(), "First draft");
//! # Ok::<(), scribe_artifact::ArtifactError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod artifact;
mod content;
mod language;
mod suggestion;

pub mod board;
pub mod outline;

pub use artifact::{Artifact, ArtifactError, Direction};
pub use board::{Board, BoardError, BoardNote};
pub use content::{
    classify, extract_plain_text, is_legacy_artifact, BoardContent, CodeContent, ContentKind,
    ContentVariant, TextContent,
};
pub use language::ProgrammingLanguage;
pub use outline::{outline, Heading};
pub use suggestion::Suggestion;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
