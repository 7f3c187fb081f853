//! Note-taking service
//!
//! Reads the persisted record for a conversation, asks the agent for new
//! notes, merges, and writes the result back. Merges for the same
//! `(assistant, thread)` key are serialized within the process; writers in
//! other processes still race last-write-wins at the store.

use crate::agent::{format_transcript, ConversationMessage, NotesAgent, NotesRequest};
use crate::error::NotesError;
use crate::record::{format_existing_notes, merge_notes, NoteCategory, NotesRecord, StoredNotes};
use crate::store::{get_json, put_json, KeyValueStore};
use dashmap::DashMap;
use scribe_artifact::Artifact;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Where notes live in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// First namespace segment
    pub namespace_root: String,
    /// Key under the namespace
    pub key: String,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            namespace_root: "notes".to_string(),
            key: "ghostwriter_notes".to_string(),
        }
    }
}

impl NotesConfig {
    /// `[root, assistant_id, thread_id]`
    #[must_use]
    pub fn namespace(&self, assistant_id: &str, thread_id: &str) -> Vec<String> {
        vec![
            self.namespace_root.clone(),
            assistant_id.to_string(),
            thread_id.to_string(),
        ]
    }
}

/// Identifiers carried by a request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesContext {
    pub assistant_id: Option<String>,
    pub thread_id: Option<String>,
}

impl NotesContext {
    /// Context with both identifiers
    #[must_use]
    pub fn new(assistant_id: impl Into<String>, thread_id: impl Into<String>) -> Self {
        Self {
            assistant_id: Some(assistant_id.into()),
            thread_id: Some(thread_id.into()),
        }
    }

    fn require(&self) -> Result<(&str, &str), NotesError> {
        let assistant = self
            .assistant_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(NotesError::MissingIdentifier("assistant_id"))?;
        let thread = self
            .thread_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(NotesError::MissingIdentifier("thread_id"))?;
        Ok((assistant, thread))
    }
}

/// Note-taking service
pub struct NoteTaker {
    store: Arc<dyn KeyValueStore>,
    agent: Arc<dyn NotesAgent>,
    config: NotesConfig,
    locks: DashMap<(String, String), Arc<Mutex<()>>>,
}

impl std::fmt::Debug for NoteTaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteTaker")
            .field("config", &self.config)
            .field("active_keys", &self.active_keys())
            .finish_non_exhaustive()
    }
}

impl NoteTaker {
    /// Create service over a store and an agent
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, agent: Arc<dyn NotesAgent>) -> Self {
        Self {
            store,
            agent,
            config: NotesConfig::default(),
            locks: DashMap::new(),
        }
    }

    /// Builder: set store location
    #[must_use]
    pub fn with_config(mut self, config: NotesConfig) -> Self {
        self.config = config;
        self
    }

    /// Store location in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &NotesConfig {
        &self.config
    }

    /// Conversations with a merge in flight or waiting
    #[must_use]
    pub fn active_keys(&self) -> usize {
        self.locks.len()
    }

    /// Persisted notes for a conversation
    ///
    /// # Errors
    /// Returns error if an identifier is missing or the store fails
    pub async fn load(&self, ctx: &NotesContext) -> Result<Option<StoredNotes>, NotesError> {
        let (assistant, thread) = ctx.require()?;
        let namespace = self.config.namespace(assistant, thread);
        Ok(get_json(self.store.as_ref(), &namespace, &self.config.key).await?)
    }

    /// Take notes on the conversation and persist the merged record
    ///
    /// # Errors
    /// - [`NotesError::MissingIdentifier`] if the assistant or thread id is
    ///   absent or empty; nothing is read or written
    /// - [`NotesError::Agent`] / [`NotesError::Store`] if a collaborator
    ///   fails; the persisted record is left as it was
    pub async fn take_notes(
        &self,
        ctx: &NotesContext,
        messages: &[ConversationMessage],
        artifact: Option<&Artifact>,
    ) -> Result<NotesRecord, NotesError> {
        let (assistant, thread) = ctx.require()?;
        let key = (assistant.to_string(), thread.to_string());
        let lock = self.locks.entry(key.clone()).or_default().clone();
        let result = {
            let _guard = lock.lock().await;
            self.merge_locked(assistant, thread, messages, artifact).await
        };
        drop(lock);
        // only the map holds it now: no caller is merging or waiting on this key
        self.locks.remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    async fn merge_locked(
        &self,
        assistant: &str,
        thread: &str,
        messages: &[ConversationMessage],
        artifact: Option<&Artifact>,
    ) -> Result<NotesRecord, NotesError> {
        let namespace = self.config.namespace(assistant, thread);
        let existing: Option<StoredNotes> =
            get_json(self.store.as_ref(), &namespace, &self.config.key).await?;
        let existing = existing.map(|stored| stored.notes);

        let request = NotesRequest {
            transcript: format_transcript(messages),
            artifact_text: artifact
                .and_then(Artifact::get_current)
                .map_or_else(|| "No artifact context".to_string(), |c| c.plain_text().to_string()),
            existing_notes: format_existing_notes(existing.as_ref()),
            existing: existing.clone(),
        };
        let incoming = self.agent.take_notes(&request).await?;
        let merged = merge_notes(existing.as_ref(), &incoming);

        tracing::info!(?namespace, key = %self.config.key, "storing notes");
        let stored = StoredNotes::stamped(merged.clone(), messages.len());
        put_json(self.store.as_ref(), &namespace, &self.config.key, &stored).await?;

        let [new_goals, new_style, new_ideas, new_structure] =
            NoteCategory::ALL.map(|c| incoming.category(c).len());
        let [goals, style, ideas, structure] = NoteCategory::ALL.map(|c| merged.category(c).len());
        tracing::info!(
            assistant_id = assistant,
            thread_id = thread,
            new_goals,
            new_style,
            new_ideas,
            new_structure,
            goals,
            style,
            ideas,
            structure,
            "updated notes"
        );

        Ok(merged)
    }
}
