//! Testing utilities for the Scribe workspace
//!
//! Shared fixtures and scripted collaborators.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use scribe_artifact::{Artifact, ContentVariant, Suggestion, TextContent};
use scribe_core::{SuggestionAgent, SuggestionRequest};
use scribe_notes::{AgentError, KeyValueStore, NotesAgent, NotesRecord, NotesRequest, StoreError};
use serde_json::Value;
use std::collections::VecDeque;

pub fn text_content(text: &str, suggestions: Vec<Suggestion>) -> ContentVariant {
    ContentVariant::Text(TextContent {
        index: 0,
        title: "Test document".to_string(),
        full_markdown: text.to_string(),
        suggested_changes: suggestions,
    })
}

pub fn text_artifact(text: &str, suggestions: Vec<Suggestion>) -> Artifact {
    Artifact::new(text_content(text, suggestions))
}

/// Two valid notes around one malformed line
pub fn board_ndjson() -> String {
    [
        r#"{"title":"Hook","content":"Open with a question","x":0,"y":0,"color":"yellow"}"#,
        "not a note",
        r#"{"title":"Close","content":"Call to action","x":200,"y":40,"color":"blue"}"#,
    ]
    .join("\n")
}

pub fn board_artifact() -> Artifact {
    Artifact::new(ContentVariant::board("Outline board", board_ndjson()))
}

/// Notes agent that replays a fixed script and records every request
pub struct ScriptedNotesAgent {
    script: Mutex<VecDeque<Result<NotesRecord, AgentError>>>,
    requests: Mutex<Vec<NotesRequest>>,
}

impl ScriptedNotesAgent {
    pub fn new(script: impl IntoIterator<Item = Result<NotesRecord, AgentError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<NotesRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl NotesAgent for ScriptedNotesAgent {
    async fn take_notes(&self, request: &NotesRequest) -> Result<NotesRecord, AgentError> {
        self.requests.lock().push(request.clone());
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::NoResult("script exhausted".into())))
    }
}

/// Suggestion agent that replays a fixed script and records every request
pub struct ScriptedSuggestionAgent {
    script: Mutex<VecDeque<Result<Vec<Suggestion>, AgentError>>>,
    requests: Mutex<Vec<SuggestionRequest>>,
}

impl ScriptedSuggestionAgent {
    pub fn new(script: impl IntoIterator<Item = Result<Vec<Suggestion>, AgentError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<SuggestionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl SuggestionAgent for ScriptedSuggestionAgent {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<Suggestion>, AgentError> {
        self.requests.lock().push(request.clone());
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::NoResult("script exhausted".into())))
    }
}

/// Store whose every call fails
#[derive(Debug, Default)]
pub struct FailingStore;

impl FailingStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _namespace: &[String], _key: &str) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Unavailable("store offline".into()))
    }

    async fn put(
        &self,
        _namespace: &[String],
        _key: &str,
        _value: Value,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".into()))
    }
}
