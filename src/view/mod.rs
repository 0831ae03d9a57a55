//! Renderers for the page's result containers.
//!
//! [`html`] produces the fragments a browser front end would insert, with
//! every server-provided string escaped. [`term`] produces the coloured
//! text the CLI and shell print. Both draw from the same typed payloads and
//! share the helpers below.
pub mod html;
pub mod term;

use crate::api::types::AdvancedStats;
use crate::format::format_number;

/// Emoji for a sentiment label (`positif`, `négatif`, anything else).
pub fn sentiment_emoji(sentiment: &str) -> &'static str {
    match sentiment {
        "positif" => "😊",
        "négatif" => "😔",
        _ => "😐",
    }
}

/// Word cloud sizing: font size in pixels and opacity for a weight.
pub fn word_weight(size: f64) -> (f64, f64) {
    ((size / 3.0).max(12.0), 0.5 + size / 200.0)
}

/// `(label, value)` for each advanced-statistics tile present in `stats`,
/// in display order.
pub fn stat_tiles(stats: &AdvancedStats) -> Vec<(&'static str, String)> {
    let count = |v: Option<u64>| v.map(|n| n.to_string());
    let number = |v: Option<f64>| v.map(format_number);

    [
        ("Mots", count(stats.words)),
        ("Phrases", count(stats.sentences)),
        ("Paragraphes", count(stats.paragraphs)),
        ("Mots uniques", count(stats.unique_words)),
        ("Long. moy. mot", number(stats.avg_word_length)),
        ("Mots/phrase", number(stats.avg_sentence_length)),
        (
            "Temps lecture",
            number(stats.reading_time_minutes).map(|m| format!("{m} min")),
        ),
        ("Complexité", stats.complexity.clone()),
        ("Caractères", count(stats.characters_no_spaces)),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.map(|v| (label, v)))
    .collect()
}
