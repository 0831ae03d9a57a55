//! Request and response bodies for the backend endpoints.
//!
//! Response types are lenient: missing counters default to zero and
//! optional presentation fields stay `None`, so a partial payload still
//! renders what it carries. All of them also serialize, which is what
//! `--format json` prints.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Enumerations shared by requests and the UI
// ---------------------------------------------------------------------------

/// Summary style offered by the style selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStyle {
    #[default]
    Paragraph,
    Bullets,
    Academic,
    Simple,
}

impl SummaryStyle {
    pub const ALL: [Self; 4] = [Self::Paragraph, Self::Bullets, Self::Academic, Self::Simple];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Bullets => "bullets",
            Self::Academic => "academic",
            Self::Simple => "simple",
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "paragraph" => Ok(Self::Paragraph),
            "bullets" | "bullet" => Ok(Self::Bullets),
            "academic" => Ok(Self::Academic),
            "simple" => Ok(Self::Simple),
            other => Err(format!(
                "unknown style '{other}' (expected paragraph, bullets, academic or simple)"
            )),
        }
    }
}

/// Translation target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Fr,
    #[default]
    En,
    Es,
    De,
    It,
    Pt,
    Ar,
    Zh,
    Ja,
    Ru,
}

impl Language {
    pub const ALL: [Self; 10] = [
        Self::Fr,
        Self::En,
        Self::Es,
        Self::De,
        Self::It,
        Self::Pt,
        Self::Ar,
        Self::Zh,
        Self::Ja,
        Self::Ru,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::En => "en",
            Self::Es => "es",
            Self::De => "de",
            Self::It => "it",
            Self::Pt => "pt",
            Self::Ar => "ar",
            Self::Zh => "zh",
            Self::Ja => "ja",
            Self::Ru => "ru",
        }
    }

    /// Name shown in the language selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::Fr => "Français",
            Self::En => "Anglais",
            Self::Es => "Espagnol",
            Self::De => "Allemand",
            Self::It => "Italien",
            Self::Pt => "Portugais",
            Self::Ar => "Arabe",
            Self::Zh => "Chinois",
            Self::Ja => "Japonais",
            Self::Ru => "Russe",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| format!("unsupported language '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SummarizeRequest<'a> {
    pub text: &'a str,
    pub target_words: u32,
    pub style: SummaryStyle,
}

#[derive(Debug, Serialize)]
pub struct TranslateRequest<'a> {
    pub text: &'a str,
    pub target_language: Language,
}

#[derive(Debug, Serialize)]
pub struct TextRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CountRequest<'a> {
    pub text: &'a str,
    pub count: u32,
}

#[derive(Debug, Serialize)]
pub struct WordCloudRequest<'a> {
    pub text: &'a str,
    pub max_words: u32,
}

#[derive(Debug, Serialize)]
pub struct AskRequest<'a> {
    pub text: &'a str,
    pub question: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SectionsRequest<'a> {
    pub text: &'a str,
    pub words_per_section: u32,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: None,
        }
    }
}

/// `GET /auth/me`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    #[serde(default)]
    pub logged_in: bool,
    #[serde(default)]
    pub user: Option<User>,
}

/// `POST /auth/login` and `POST /auth/register`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResult {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Upload / summarize
// ---------------------------------------------------------------------------

/// Basic statistics returned with extracted text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStats {
    #[serde(default)]
    pub word_count: u64,
    #[serde(default)]
    pub char_count: u64,
    #[serde(default)]
    pub sentence_count: u64,
    /// Minutes; the backend names this `reading_time_minutes`.
    #[serde(default, alias = "reading_time_minutes")]
    pub reading_time: f64,
}

/// `POST /upload`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    pub text: String,
    #[serde(default)]
    pub stats: TextStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    #[serde(default)]
    pub word_count: u64,
}

/// `POST /summarize`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
    #[serde(default)]
    pub summary_stats: SummaryStats,
    #[serde(default)]
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// `POST /translate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub translation: String,
}

/// `POST /keywords`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keywords {
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// `POST /sentiment`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub sentiment: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub emotions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedWord {
    pub text: String,
    #[serde(default)]
    pub size: f64,
}

/// `POST /wordcloud`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCloud {
    #[serde(default)]
    pub words: Vec<WeightedWord>,
}

/// `POST /generate-title`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Titles {
    #[serde(default)]
    pub titles: Vec<String>,
}

/// `POST /advanced-stats`
///
/// Every tile is optional: only the values present in the payload are shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentences: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraphs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_words: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_word_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_sentence_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_time_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters_no_spaces: Option<u64>,
}

/// `POST /ask`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
}

/// `POST /summarize-sections`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sections {
    #[serde(default)]
    pub sections: Vec<Section>,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// One card in the history list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub original_words: Option<u64>,
    #[serde(default)]
    pub summary_words: Option<u64>,
    #[serde(default)]
    pub style: Option<String>,
}

/// `GET /api/history`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryList {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// Full record behind a history card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub original_text: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub summary_words: Option<u64>,
}

/// `GET /api/history/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryDetail {
    pub summary: HistoryRecord,
}

/// Record ids are integers in some deployments and strings in others.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_accept_backend_reading_time_name() {
        let stats: TextStats = serde_json::from_str(
            r#"{"word_count": 12, "char_count": 70, "sentence_count": 2, "reading_time_minutes": 0.1}"#,
        )
        .unwrap();
        assert_eq!(stats.word_count, 12);
        assert!((stats.reading_time - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn stats_default_missing_counters() {
        let stats: TextStats = serde_json::from_str("{}").unwrap();
        assert_eq!(stats, TextStats::default());
    }

    #[test]
    fn history_ids_accept_numbers_and_strings() {
        let list: HistoryList = serde_json::from_str(
            r#"{"history": [{"id": 7}, {"id": "a1b2", "filename": "cours.pdf"}]}"#,
        )
        .unwrap();
        assert_eq!(list.history[0].id, "7");
        assert_eq!(list.history[1].id, "a1b2");
        assert_eq!(list.history[1].filename.as_deref(), Some("cours.pdf"));
    }

    #[test]
    fn style_and_language_parse() {
        assert_eq!("Bullets".parse::<SummaryStyle>(), Ok(SummaryStyle::Bullets));
        assert!("haiku".parse::<SummaryStyle>().is_err());
        assert_eq!("ES".parse::<Language>(), Ok(Language::Es));
        assert!("xx".parse::<Language>().is_err());
    }

    #[test]
    fn summarize_request_serializes_style_lowercase() {
        let body = serde_json::to_value(SummarizeRequest {
            text: "abc",
            target_words: 150,
            style: SummaryStyle::Academic,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"text": "abc", "target_words": 150, "style": "academic"})
        );
    }

    #[test]
    fn advanced_stats_keep_only_present_fields() {
        let stats: AdvancedStats =
            serde_json::from_str(r#"{"words": 120, "complexity": "Moyen"}"#).unwrap();
        assert_eq!(stats.words, Some(120));
        assert_eq!(stats.complexity.as_deref(), Some("Moyen"));
        assert!(stats.paragraphs.is_none());
    }
}
