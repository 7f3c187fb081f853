//! Suggestion requests
//!
//! [`request_suggestions`] asks the suggestion agent for edits to the
//! current text and attaches them as the pending list. The agent sees the
//! artifact content, the assistant's learned reflections, and the most
//! recent human message.

use crate::config::ReflectionsConfig;
use crate::error::ScribeError;
use crate::session::ArtifactSession;
use async_trait::async_trait;
use scribe_artifact::Suggestion;
use scribe_notes::store::get_json;
use scribe_notes::{AgentError, ConversationMessage, KeyValueStore, Role};
use scribe_reconcile::pending_suggestions;
use serde::{Deserialize, Serialize};

/// Learned per-assistant rules
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflections {
    /// Style rules the user has taught the assistant
    #[serde(default)]
    pub style_rules: Vec<String>,
    /// Facts about the user and their content
    #[serde(default)]
    pub content: Vec<String>,
}

impl Reflections {
    /// Render for an agent prompt
    #[must_use]
    pub fn to_prompt_context(&self) -> String {
        let section = |tag: &str, items: &[String]| {
            let body = if items.is_empty() {
                "No rules found.".to_string()
            } else {
                items
                    .iter()
                    .map(|item| format!("- {item}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            format!("<{tag}>\n{body}\n</{tag}>")
        };
        format!(
            "{}\n\n{}",
            section("style-guidelines", &self.style_rules),
            section("content-guidelines", &self.content)
        )
    }
}

/// Prompt context for optional reflections
#[must_use]
pub fn format_reflections(reflections: Option<&Reflections>) -> String {
    reflections.map_or_else(
        || "No reflections found.".to_string(),
        Reflections::to_prompt_context,
    )
}

/// Everything the suggestion agent sees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    /// Raw payload of the current snapshot
    pub artifact_content: String,
    /// Formatted reflections, see [`format_reflections`]
    pub reflections: String,
    /// Latest message from the user
    pub recent_human_message: ConversationMessage,
}

/// Suggestion agent
#[async_trait]
pub trait SuggestionAgent: Send + Sync {
    /// Propose `prev_text -> suggested_text` edits
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<Suggestion>, AgentError>;
}

/// Request context for [`request_suggestions`]
#[derive(Debug, Clone, Default)]
pub struct SuggestionContext {
    pub assistant_id: Option<String>,
    pub messages: Vec<ConversationMessage>,
}

/// Ask the agent for suggestions and attach them to the current text
///
/// Returns the number of suggestions attached.
///
/// # Errors
/// - [`ScribeError::MissingContext`] without an assistant id, an artifact,
///   or a human message; nothing is called
/// - a collaborator error if the store or agent fails; the session's
///   `update_failed` flag is raised and the artifact is left as it was
pub async fn request_suggestions<A, S>(
    session: &mut ArtifactSession,
    agent: &A,
    store: &S,
    ctx: &SuggestionContext,
    config: &ReflectionsConfig,
) -> Result<usize, ScribeError>
where
    A: SuggestionAgent + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let assistant_id = ctx
        .assistant_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(ScribeError::MissingContext("assistant_id"))?;
    let artifact = session
        .artifact()
        .ok_or(ScribeError::MissingContext("artifact"))?;
    let current = artifact
        .get_current()
        .ok_or(ScribeError::MissingContext("artifact content"))?;
    let recent_human_message = ctx
        .messages
        .iter()
        .rev()
        .find(|m| m.role == Role::Human)
        .cloned()
        .ok_or(ScribeError::MissingContext("recent human message"))?;
    pending_suggestions(artifact)?;
    let artifact_content = current.raw_payload().to_string();

    let namespace = config.namespace(assistant_id);
    let reflections: Option<Reflections> = match get_json(store, &namespace, &config.key).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "failed to load reflections");
            session.mark_update_failed();
            return Err(e.into());
        }
    };

    let request = SuggestionRequest {
        artifact_content,
        reflections: format_reflections(reflections.as_ref()),
        recent_human_message,
    };
    let batch = match agent.suggest(&request).await {
        Ok(batch) => batch,
        Err(e) => {
            tracing::error!(error = %e, "suggestion agent failed");
            session.mark_update_failed();
            return Err(e.into());
        }
    };

    let count = batch.len();
    session.attach_suggestions(batch)?;
    tracing::info!(assistant_id, count, "attached suggestions");
    Ok(count)
}
