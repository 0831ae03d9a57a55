//! HTML fragments for the result containers.
//!
//! Markup follows the class names of the web front end. All text coming
//! from the backend or the user goes through [`escape_html`].
use chrono::{DateTime, Utc};

use crate::api::types::{AdvancedStats, HistoryEntry, Section, Sentiment, WeightedWord};
use crate::format::{capitalize_first, format_number, preview, relative_date};
use crate::page::{HistoryView, SummaryPanel};

use super::{sentiment_emoji, stat_tiles, word_weight};

const PREVIEW_CHARS: usize = 80;

/// Escape the five characters significant in HTML text and attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn keywords(keywords: &[String]) -> String {
    keywords
        .iter()
        .map(|k| format!(r#"<span class="keyword-tag">{}</span>"#, escape_html(k)))
        .collect()
}

pub fn sentiment(result: &Sentiment) -> String {
    let emotions: String = result
        .emotions
        .iter()
        .map(|e| format!(r#"<span class="emotion-tag">{}</span>"#, escape_html(e)))
        .collect();

    let mut html = format!(
        concat!(
            r#"<div class="sentiment-emoji">{}</div>"#,
            r#"<div class="sentiment-label">{}</div>"#,
            r#"<div class="sentiment-score">Score: {}</div>"#,
            r#"<div class="sentiment-emotions">{}</div>"#,
        ),
        sentiment_emoji(&result.sentiment),
        escape_html(&capitalize_first(&result.sentiment)),
        format_number(result.score),
        emotions,
    );
    if let Some(tone) = result.tone.as_deref().filter(|t| !t.is_empty()) {
        html.push_str(&format!(
            r#"<p class="sentiment-tone">{}</p>"#,
            escape_html(tone)
        ));
    }
    html
}

pub fn word_cloud(words: &[WeightedWord]) -> String {
    words
        .iter()
        .map(|w| {
            let (font_px, opacity) = word_weight(w.size);
            format!(
                r#"<span class="word-item" style="font-size: {}px; opacity: {}">{}</span>"#,
                format_number(font_px),
                format_number(opacity),
                escape_html(&w.text)
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Numbered titles. Clicking one copies it; the index is carried in
/// `data-index` rather than inlined into a script.
pub fn titles(titles: &[String]) -> String {
    titles
        .iter()
        .enumerate()
        .map(|(i, t)| {
            format!(
                concat!(
                    r#"<div class="title-item" data-index="{}">"#,
                    r#"<span class="title-number">{}</span>"#,
                    r#"<span class="title-text">{}</span>"#,
                    "</div>"
                ),
                i,
                i + 1,
                escape_html(t)
            )
        })
        .collect()
}

pub fn advanced_stats(stats: &AdvancedStats) -> String {
    stat_tiles(stats)
        .into_iter()
        .map(|(label, value)| {
            format!(
                r#"<div class="adv-stat"><span class="adv-stat-value">{}</span><span class="adv-stat-label">{}</span></div>"#,
                escape_html(&value),
                label
            )
        })
        .collect()
}

/// Plain-text block (answers, translations).
pub fn paragraph(text: &str) -> String {
    format!("<p>{}</p>", escape_html(text))
}

pub fn sections(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|s| {
            format!(
                r#"<div class="section-item"><div class="section-title">{}</div><div class="section-summary">{}</div></div>"#,
                escape_html(&s.title),
                escape_html(&s.summary)
            )
        })
        .collect()
}

pub fn summary(panel: &SummaryPanel, text: &str) -> String {
    let mut html = format!(r#"<div class="summary-text">{}</div>"#, escape_html(text));
    html.push_str(r#"<div class="summary-stats">"#);
    for label in [
        &panel.words_label,
        &panel.compression_label,
        &panel.method_label,
    ] {
        if !label.is_empty() {
            html.push_str(&format!(
                r#"<span class="summary-stat">{}</span>"#,
                escape_html(label)
            ));
        }
    }
    html.push_str("</div>");
    html
}

pub fn history(view: &HistoryView, now: DateTime<Utc>) -> String {
    match view {
        HistoryView::Records(records) => records
            .iter()
            .map(|entry| history_card(entry, now))
            .collect(),
        other => other
            .empty_message()
            .map(|msg| format!(r#"<p class="empty-state">{msg}</p>"#))
            .unwrap_or_default(),
    }
}

fn history_card(entry: &HistoryEntry, now: DateTime<Utc>) -> String {
    let filename = entry.filename.as_deref().unwrap_or("Sans titre");
    let date = entry
        .created_at
        .as_deref()
        .map(|raw| relative_date(raw, now))
        .unwrap_or_default();
    let summary = entry
        .summary
        .as_deref()
        .map(|s| preview(s, PREVIEW_CHARS))
        .unwrap_or_default();

    format!(
        concat!(
            r#"<div class="history-item" data-id="{id}">"#,
            r#"<div class="history-item-header">"#,
            r#"<span class="history-filename">{filename}</span>"#,
            r#"<span class="history-date">{date}</span>"#,
            "</div>",
            r#"<div class="history-preview">{summary}</div>"#,
            r#"<div class="history-meta">"#,
            "<span>{original} → {summarized} mots</span>",
            r#"<span class="history-badge">{style}</span>"#,
            "</div></div>"
        ),
        id = escape_html(&entry.id),
        filename = escape_html(filename),
        date = escape_html(&date),
        summary = escape_html(&summary),
        original = entry.original_words.unwrap_or(0),
        summarized = entry.summary_words.unwrap_or(0),
        style = escape_html(entry.style.as_deref().unwrap_or("paragraph")),
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn keyword_tags_are_escaped() {
        let html = keywords(&["rust".to_string(), "<script>".to_string()]);
        assert_eq!(
            html,
            r#"<span class="keyword-tag">rust</span><span class="keyword-tag">&lt;script&gt;</span>"#
        );
    }

    #[test]
    fn sentiment_block() {
        let html = sentiment(&Sentiment {
            sentiment: "négatif".to_string(),
            score: -0.5,
            emotions: vec!["tristesse".to_string()],
            tone: None,
        });
        assert!(html.contains(r#"<div class="sentiment-emoji">😔</div>"#));
        assert!(html.contains(r#"<div class="sentiment-label">Négatif</div>"#));
        assert!(html.contains("Score: -0.5"));
        assert!(html.contains(r#"<span class="emotion-tag">tristesse</span>"#));
        assert!(!html.contains("sentiment-tone"));
    }

    #[test]
    fn word_cloud_sizes() {
        let html = word_cloud(&[
            WeightedWord {
                text: "rust".to_string(),
                size: 150.0,
            },
            WeightedWord {
                text: "api".to_string(),
                size: 0.0,
            },
        ]);
        assert_eq!(
            html,
            concat!(
                r#"<span class="word-item" style="font-size: 50px; opacity: 1.25">rust</span>"#,
                " ",
                r#"<span class="word-item" style="font-size: 12px; opacity: 0.5">api</span>"#
            )
        );
    }

    #[test]
    fn titles_are_numbered_from_one() {
        let html = titles(&["L'essentiel".to_string()]);
        assert!(html.contains(r#"data-index="0""#));
        assert!(html.contains(r#"<span class="title-number">1</span>"#));
        assert!(html.contains("L&#39;essentiel"));
    }

    #[test]
    fn stats_render_only_present_tiles() {
        let html = advanced_stats(&AdvancedStats {
            words: Some(42),
            ..AdvancedStats::default()
        });
        assert_eq!(
            html,
            r#"<div class="adv-stat"><span class="adv-stat-value">42</span><span class="adv-stat-label">Mots</span></div>"#
        );
    }

    #[test]
    fn history_card_defaults() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let entry = HistoryEntry {
            id: "4".to_string(),
            filename: None,
            created_at: Some("2025-03-10 11:30:00".to_string()),
            summary: Some("x".repeat(100)),
            original_words: Some(400),
            summary_words: None,
            style: None,
        };
        let html = history(&HistoryView::Records(vec![entry]), now);
        assert!(html.contains(r#"<span class="history-filename">Sans titre</span>"#));
        assert!(html.contains("Il y a 30 min"));
        assert!(html.contains(&format!("{}...", "x".repeat(80))));
        assert!(html.contains("<span>400 → 0 mots</span>"));
        assert!(html.contains(r#"<span class="history-badge">paragraph</span>"#));
    }

    #[test]
    fn empty_history_states() {
        let now = Utc::now();
        assert_eq!(
            history(&HistoryView::Empty, now),
            r#"<p class="empty-state">Aucun historique</p>"#
        );
        assert_eq!(history(&HistoryView::NotLoaded, now), "");
    }

    #[test]
    fn answer_paragraph() {
        assert_eq!(paragraph("a < b"), "<p>a &lt; b</p>");
    }
}
