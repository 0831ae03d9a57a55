/// Configuration schema and defaults.
///
/// Sections: `[server]`, `[summarize]`, `[analysis]`, `[upload]` and
/// `[logging]`. Every field has a built-in default; a config file only
/// needs the values it changes.
use serde::{Deserialize, Serialize};

use crate::api::types::{Language, SummaryStyle};

/// Top-level configuration, mapped to `~/.nectar/config.toml` and
/// `.nectar.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NectarConfig {
    pub server: ServerConfig,
    pub summarize: SummarizeConfig,
    pub analysis: AnalysisConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Backend base URL.
    pub base_url: String,
    /// Request timeout in milliseconds. `0` waits indefinitely.
    pub timeout_ms: u64,
    /// Raw `Cookie` header sent with every request, e.g. `session=...`.
    /// Empty means start as a fresh guest session.
    pub session_cookie: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_ms: 0,
            session_cookie: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// [summarize]
// ---------------------------------------------------------------------------

/// Bounds and defaults of the target-length slider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizeConfig {
    pub default_words: u32,
    pub min_words: u32,
    pub max_words: u32,
    pub style: SummaryStyle,
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            default_words: 150,
            min_words: 50,
            max_words: 500,
            style: SummaryStyle::Paragraph,
        }
    }
}

impl SummarizeConfig {
    /// Clamp a requested word count into the slider range.
    pub fn clamp_words(&self, words: u32) -> u32 {
        let (lo, hi) = if self.min_words <= self.max_words {
            (self.min_words, self.max_words)
        } else {
            (self.max_words, self.min_words)
        };
        words.clamp(lo, hi)
    }
}

// ---------------------------------------------------------------------------
// [analysis]
// ---------------------------------------------------------------------------

/// Fixed parameters sent with each analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub keyword_count: u32,
    pub wordcloud_max_words: u32,
    pub title_count: u32,
    pub words_per_section: u32,
    pub target_language: Language,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            keyword_count: 10,
            wordcloud_max_words: 40,
            title_count: 5,
            words_per_section: 50,
            target_language: Language::En,
        }
    }
}

// ---------------------------------------------------------------------------
// [upload]
// ---------------------------------------------------------------------------

/// Client-side mirror of the backend's upload rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_bytes: u64,
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: 16 * 1024 * 1024,
            allowed_extensions: vec!["pdf".to_string(), "docx".to_string(), "txt".to_string()],
        }
    }
}

impl UploadConfig {
    pub fn allows_extension(&self, ext: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append every backend call to `~/.nectar/activity.jsonl`.
    pub enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl NectarConfig {
    /// Default configuration with comments, written by `nectar config init`.
    pub fn default_toml() -> &'static str {
        r#"# nectar configuration
# Precedence: defaults < ~/.nectar/config.toml < .nectar.toml < NECTAR_* env vars

[server]
# Backend base URL (NECTAR_URL)
base_url = "http://127.0.0.1:5000"
# Request timeout in milliseconds, 0 = wait indefinitely (NECTAR_TIMEOUT_MS)
timeout_ms = 0
# Cookie header of an existing browser session (NECTAR_SESSION)
session_cookie = ""

[summarize]
default_words = 150
min_words = 50
max_words = 500
# paragraph | bullets | academic | simple
style = "paragraph"

[analysis]
keyword_count = 10
wordcloud_max_words = 40
title_count = 5
words_per_section = 50
# fr | en | es | de | it | pt | ar | zh | ja | ru
target_language = "en"

[upload]
max_bytes = 16777216
allowed_extensions = ["pdf", "docx", "txt"]

[logging]
# Activity log at ~/.nectar/activity.jsonl (NECTAR_LOG)
enabled = true
"#
    }
}
