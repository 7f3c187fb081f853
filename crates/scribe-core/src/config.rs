//! Scribe configuration
//!
//! Every field has a default; a TOML file only needs the keys it changes.
//!
//! ```toml
//! removal = "by_value"
//!
//! [layout]
//! card_spacing = 16.0
//!
//! [notes]
//! key = "notes_v2"
//! ```

use scribe_notes::NotesConfig;
use scribe_reconcile::{LayoutConfig, RemovalPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for [`ScribeConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be rendered as TOML
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Where reflections (learned style rules) live in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectionsConfig {
    /// First namespace segment
    pub namespace_root: String,
    /// Key under the namespace
    pub key: String,
}

impl Default for ReflectionsConfig {
    fn default() -> Self {
        Self {
            namespace_root: "memories".to_string(),
            key: "reflection".to_string(),
        }
    }
}

impl ReflectionsConfig {
    /// `[root, assistant_id]`
    #[must_use]
    pub fn namespace(&self, assistant_id: &str) -> Vec<String> {
        vec![self.namespace_root.clone(), assistant_id.to_string()]
    }
}

/// Scribe configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScribeConfig {
    /// How accepted suggestions leave the pending list
    pub removal: RemovalPolicy,
    /// Suggestion card geometry
    pub layout: LayoutConfig,
    /// Notes store location
    pub notes: NotesConfig,
    /// Reflections store location
    pub reflections: ReflectionsConfig,
}

impl ScribeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With card layout constants
    #[inline]
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// With removal policy
    #[inline]
    #[must_use]
    pub fn with_removal(mut self, removal: RemovalPolicy) -> Self {
        self.removal = removal;
        self
    }

    /// With notes store location
    #[inline]
    #[must_use]
    pub fn with_notes(mut self, notes: NotesConfig) -> Self {
        self.notes = notes;
        self
    }

    /// With reflections store location
    #[inline]
    #[must_use]
    pub fn with_reflections(mut self, reflections: ReflectionsConfig) -> Self {
        self.reflections = reflections;
        self
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns error if the text is not valid TOML or a field has the wrong type
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Render as TOML
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ScribeConfig::new();
        assert_eq!(config.removal, RemovalPolicy::ByPosition);
        assert_eq!(config.notes.key, "ghostwriter_notes");
        assert_eq!(config.reflections.namespace("a"), vec!["memories", "a"]);
        assert!((config.layout.card_spacing - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ScribeConfig::from_toml_str(
            r#"
            removal = "by_value"

            [layout]
            card_spacing = 16.0

            [notes]
            key = "notes_v2"
            "#,
        )
        .unwrap();

        assert_eq!(config.removal, RemovalPolicy::ByValue);
        assert!((config.layout.card_spacing - 16.0).abs() < f64::EPSILON);
        assert!((config.layout.base_height - 70.0).abs() < f64::EPSILON);
        assert_eq!(config.notes.key, "notes_v2");
        assert_eq!(config.notes.namespace_root, "notes");
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(ScribeConfig::from_toml_str("").unwrap(), ScribeConfig::default());
    }

    #[test]
    fn invalid_toml_is_rejected() {
        assert!(matches!(
            ScribeConfig::from_toml_str("removal = \"sometimes\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_from_file_round_trip() {
        let config = ScribeConfig::new()
            .with_removal(RemovalPolicy::ByValue)
            .with_reflections(ReflectionsConfig {
                namespace_root: "mem".into(),
                key: "refl".into(),
            });

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_toml_string().unwrap().as_bytes())
            .unwrap();

        assert_eq!(ScribeConfig::load(file.path()).unwrap(), config);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScribeConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }
}
