//! Programming languages for code snapshots

use serde::{Deserialize, Serialize};

/// Language of a `code` snapshot
///
/// Serialized in lowercase (`"typescript"`, `"cpp"`, ...). Unknown names
/// deserialize to [`ProgrammingLanguage::Other`] instead of failing, so a
/// snapshot written by a newer producer still loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgrammingLanguage {
    TypeScript,
    JavaScript,
    Cpp,
    Java,
    Php,
    Python,
    Html,
    Sql,
    Json,
    Rust,
    Xml,
    Clojure,
    CSharp,
    #[default]
    #[serde(other)]
    Other,
}

impl ProgrammingLanguage {
    /// All variants, in wire order
    pub const ALL: [Self; 14] = [
        Self::TypeScript,
        Self::JavaScript,
        Self::Cpp,
        Self::Java,
        Self::Php,
        Self::Python,
        Self::Html,
        Self::Sql,
        Self::Json,
        Self::Rust,
        Self::Xml,
        Self::Clojure,
        Self::CSharp,
        Self::Other,
    ];

    /// Get file extensions for this language
    #[inline]
    #[must_use]
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::TypeScript => &["ts", "tsx"],
            Self::JavaScript => &["js", "jsx", "mjs"],
            Self::Cpp => &["cpp", "cc", "cxx", "hpp", "h"],
            Self::Java => &["java"],
            Self::Php => &["php"],
            Self::Python => &["py"],
            Self::Html => &["html", "htm"],
            Self::Sql => &["sql"],
            Self::Json => &["json"],
            Self::Rust => &["rs"],
            Self::Xml => &["xml"],
            Self::Clojure => &["clj", "cljs", "cljc"],
            Self::CSharp => &["cs"],
            Self::Other => &[],
        }
    }

    /// Detect language from file extension
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext.as_str()))
    }

    /// Wire name (same as the serde representation)
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
            Self::Cpp => "cpp",
            Self::Java => "java",
            Self::Php => "php",
            Self::Python => "python",
            Self::Html => "html",
            Self::Sql => "sql",
            Self::Json => "json",
            Self::Rust => "rust",
            Self::Xml => "xml",
            Self::Clojure => "clojure",
            Self::CSharp => "csharp",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ProgrammingLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
