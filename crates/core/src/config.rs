//! Configuration module for breadcrumb rendering
//!
//! This module provides the caller-facing render options, the label set
//! used by the trail builder, and loading of TOML, YAML, or JSON documents.

use crate::formatter::strip_tags;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Maximum separator length in characters
pub const MAX_SEPARATOR_CHARS: usize = 10;

/// Separator used when the configured one sanitizes to nothing
pub const DEFAULT_SEPARATOR: &str = "/";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported document type: {0}")]
    UnsupportedFormat(String),
}

/// Caller-supplied rendering configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Keep the leading home crumb
    pub show_home: bool,

    /// Keep the crumb for the current location
    pub show_current: bool,

    /// Emit `label_text` before the list
    pub show_label: bool,

    pub label_text: String,

    /// Raw separator; see [`RenderOptions::sanitized_separator`]
    pub separator: String,

    pub aria_label: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_home: true,
            show_current: true,
            show_label: false,
            label_text: "You are here:".to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            aria_label: "Breadcrumbs".to_string(),
        }
    }
}

impl RenderOptions {
    /// Set show home (builder pattern)
    pub fn with_show_home(mut self, show: bool) -> Self {
        self.show_home = show;
        self
    }

    /// Set show current (builder pattern)
    pub fn with_show_current(mut self, show: bool) -> Self {
        self.show_current = show;
        self
    }

    /// Set leading label (builder pattern)
    pub fn with_label(mut self, text: &str) -> Self {
        self.show_label = true;
        self.label_text = text.to_string();
        self
    }

    /// Set separator (builder pattern)
    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    /// Set aria label (builder pattern)
    pub fn with_aria_label(mut self, label: &str) -> Self {
        self.aria_label = label.to_string();
        self
    }

    /// Separator as plain text, trimmed, capped at ten characters, `/` if empty
    pub fn sanitized_separator(&self) -> String {
        sanitize_separator(&self.separator)
    }
}

/// Plain-text, trimmed, length-capped separator
pub fn sanitize_separator(raw: &str) -> String {
    let plain = strip_tags(raw);
    let capped: String = plain.trim().chars().take(MAX_SEPARATOR_CHARS).collect();
    let capped = capped.trim();
    if capped.is_empty() {
        DEFAULT_SEPARATOR.to_string()
    } else {
        capped.to_string()
    }
}

/// Fixed crumb labels; `{term}`, `{name}`, and `{year}` are substituted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailLabels {
    pub home: String,
    pub blog: String,
    pub search_results: String,
    pub author_archive: String,
    pub author_fallback: String,
    pub year_archive: String,
    pub not_found: String,
    /// Stand-in crumb when a preview cannot resolve anything
    pub preview_fallback: String,
}

impl Default for TrailLabels {
    fn default() -> Self {
        Self {
            home: "Home".to_string(),
            blog: "Blog".to_string(),
            search_results: "Search Results for \"{term}\"".to_string(),
            author_archive: "Articles by {name}".to_string(),
            author_fallback: "Author Archive".to_string(),
            year_archive: "Year {year}".to_string(),
            not_found: "Page Not Found".to_string(),
            preview_fallback: "Current Page".to_string(),
        }
    }
}

/// Load a TOML, YAML, or JSON document, chosen by file extension
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let content = fs::read_to_string(path)?;
    parse_document(&content, &ext)
}

/// Parse a document of the given type (`toml`, `yaml`/`yml`, `json`)
pub fn parse_document<T: DeserializeOwned>(content: &str, ext: &str) -> Result<T, ConfigError> {
    match ext {
        "toml" => Ok(toml::from_str(content)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

/// Whether a path has an extension [`load_document`] understands
pub fn is_document_path(path: &Path) -> bool {
    path.extension()
        .map(|e| {
            matches!(
                e.to_string_lossy().to_lowercase().as_str(),
                "toml" | "yaml" | "yml" | "json"
            )
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = RenderOptions::default();
        assert!(options.show_home);
        assert!(options.show_current);
        assert!(!options.show_label);
        assert_eq!(options.sanitized_separator(), "/");
    }

    #[test]
    fn test_options_builder() {
        let options = RenderOptions::default()
            .with_show_home(false)
            .with_label("Path:")
            .with_separator("»");

        assert!(!options.show_home);
        assert!(options.show_label);
        assert_eq!(options.label_text, "Path:");
        assert_eq!(options.sanitized_separator(), "»");
    }

    #[test]
    fn test_separator_sanitization() {
        assert_eq!(sanitize_separator("   "), "/");
        assert_eq!(sanitize_separator(""), "/");
        assert_eq!(sanitize_separator("<b>></b>"), ">");
        assert_eq!(sanitize_separator("<script>alert(1)</script>"), "/");
        assert_eq!(sanitize_separator("abcdefghijklmnop"), "abcdefghij");
        assert_eq!(sanitize_separator("  |  "), "|");

        let long = sanitize_separator("<em>→→→→→→→→→→→→</em>");
        assert_eq!(long.chars().count(), MAX_SEPARATOR_CHARS);
        assert!(!long.contains('<'));
    }

    #[test]
    fn test_parse_options_toml() {
        let options: RenderOptions =
            parse_document("show_current = false\nseparator = \"|\"\n", "toml").unwrap();
        assert!(!options.show_current);
        assert!(options.show_home);
        assert_eq!(options.separator, "|");
    }

    #[test]
    fn test_unsupported_format() {
        let result: Result<RenderOptions, _> = parse_document("", "ini");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
