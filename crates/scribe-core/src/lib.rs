//! Scribe Core - session orchestration
//!
//! Ties the version store, reconciliation engine and notes accumulator
//! into one editing session:
//! - streams agent output as drafts and commits one version per stream
//! - gates navigation, selection and user edits while a stream is open
//! - requests suggestions from an agent using stored reflections
//! - loads configuration from TOML
//!
//! # Example
//!
//! ```rust
//! use scribe_artifact::{ContentVariant, Suggestion};
//! use scribe_core::{ArtifactSession, ScribeConfig};
//!
//! # fn main() -> Result<(), scribe_core::ScribeError> {
//! let mut session = ArtifactSession::new(&ScribeConfig::new());
//!
//! let ticket = session.begin_stream();
//! session.push_partial(ticket, ContentVariant::text("Draft", "The cat sat."))?;
//! session.finish_stream(ticket, ContentVariant::text("Draft", "The cat sat."))?;
//!
//! session.attach_suggestions(vec![Suggestion::new("cat", "dog")])?;
//! session.select(0)?;
//! session.select(0)?;
//! assert_eq!(session.view().map(|c| c.plain_text()), Some("The dog sat."));
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod session;
pub mod suggest;

pub use config::{ConfigError, ReflectionsConfig, ScribeConfig};
pub use error::ScribeError;
pub use session::{parse_artifact, ArtifactSession, StreamTicket};
pub use suggest::{
    format_reflections, request_suggestions, Reflections, SuggestionAgent, SuggestionContext,
    SuggestionRequest,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a Scribe session
    pub use crate::{
        request_suggestions, ArtifactSession, ScribeConfig, ScribeError, StreamTicket,
        SuggestionAgent, SuggestionContext,
    };
    pub use scribe_artifact::{Artifact, ContentVariant, Direction, Suggestion};
    pub use scribe_reconcile::{ApplyOutcome, RemovalPolicy, SelectOutcome, SelectionState};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
