//! Coloured terminal rendering for the CLI and the shell.
use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::api::types::{AdvancedStats, Section, Sentiment, WeightedWord};
use crate::format::{capitalize_first, format_number, preview, relative_date, truncate};
use crate::page::{AuthBar, HistoryView, SummaryPanel, Toast, ToastKind, UploadArea};

use super::{sentiment_emoji, stat_tiles, word_weight};

pub fn heading(title: &str) -> String {
    format!("{}\n{}", title.bold().cyan(), "=".repeat(title.chars().count().max(20)))
}

pub fn toast(toast: &Toast) -> String {
    match toast.kind {
        ToastKind::Success => format!("{} {}", "✓".green().bold(), toast.message),
        ToastKind::Error => format!("{} {}", "✗".red().bold(), toast.message.red()),
        ToastKind::Info => format!("{} {}", "ℹ".blue().bold(), toast.message),
    }
}

pub fn auth(auth: &AuthBar) -> String {
    let mut out = if auth.user_menu_visible {
        format!(
            "  {} [{}] {}",
            "Connecté:".bold(),
            auth.avatar.green().bold(),
            auth.user_name
        )
    } else {
        format!("  {} {}", "Session:".bold(), "invité".yellow())
    };
    if auth.guest_banner_visible {
        out.push_str(&format!(
            "\n  {}",
            "Connectez-vous pour sauvegarder votre historique.".dimmed()
        ));
    }
    out
}

pub fn upload(area: &UploadArea) -> String {
    let mut lines = Vec::new();
    if let Some(info) = &area.file_info {
        lines.push(format!("  {} {} ({})", "Fichier:".bold(), info.name, info.size));
    }
    if area.stats_visible {
        let s = &area.stats;
        lines.push(format!(
            "  {} {}  {} {}  {} {}  {} {} min",
            "Mots".dimmed(),
            s.words,
            "Caractères".dimmed(),
            s.chars,
            "Phrases".dimmed(),
            s.sentences,
            "Lecture".dimmed(),
            format_number(s.reading_time),
        ));
    }
    lines.join("\n")
}

pub fn summary(panel: &SummaryPanel, text: &str) -> String {
    let meta: Vec<&str> = [
        panel.words_label.as_str(),
        panel.compression_label.as_str(),
        panel.method_label.as_str(),
    ]
    .into_iter()
    .filter(|label| !label.is_empty())
    .collect();

    format!(
        "{}\n{}\n\n{}",
        heading("Résumé"),
        meta.join(" · ").dimmed(),
        text
    )
}

pub fn keywords(keywords: &[String]) -> String {
    keywords
        .iter()
        .map(|k| format!("#{k}").cyan().to_string())
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn sentiment(result: &Sentiment) -> String {
    let label = capitalize_first(&result.sentiment);
    let label = match result.sentiment.as_str() {
        "positif" => label.green().bold(),
        "négatif" => label.red().bold(),
        _ => label.yellow().bold(),
    };
    let mut out = format!(
        "  {} {}  {}",
        sentiment_emoji(&result.sentiment),
        label,
        format!("Score: {}", format_number(result.score)).dimmed()
    );
    if !result.emotions.is_empty() {
        out.push_str(&format!("\n  {}", result.emotions.join(", ")));
    }
    if let Some(tone) = result.tone.as_deref().filter(|t| !t.is_empty()) {
        out.push_str(&format!("\n  {}", tone.dimmed()));
    }
    out
}

/// Heavier words are bold, light ones dimmed.
pub fn word_cloud(words: &[WeightedWord]) -> String {
    words
        .iter()
        .map(|w| {
            let (font_px, _) = word_weight(w.size);
            if font_px >= 24.0 {
                w.text.bold().to_string()
            } else if font_px <= 12.0 {
                w.text.dimmed().to_string()
            } else {
                w.text.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn titles(titles: &[String]) -> String {
    titles
        .iter()
        .enumerate()
        .map(|(i, t)| format!("  {} {}", format!("{}.", i + 1).cyan().bold(), t))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn advanced_stats(stats: &AdvancedStats) -> String {
    stat_tiles(stats)
        .into_iter()
        .map(|(label, value)| format!("  {:<16} {}", label.bold(), value))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn sections(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|s| format!("  {}\n  {}", s.title.bold().cyan(), s.summary))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn history(view: &HistoryView, now: DateTime<Utc>) -> String {
    let HistoryView::Records(records) = view else {
        return view
            .empty_message()
            .map(|msg| format!("  {}", msg.dimmed()))
            .unwrap_or_default();
    };

    let mut lines = vec![format!(
        "  {:<6} {:<24} {:<14} {:<14} {}",
        "Id", "Fichier", "Date", "Mots", "Style"
    )];
    lines.push(format!("  {}", "-".repeat(70)));
    for (i, entry) in records.iter().enumerate() {
        let date = entry
            .created_at
            .as_deref()
            .map(|raw| relative_date(raw, now))
            .unwrap_or_default();
        let line = format!(
            "  {:<6} {:<24} {:<14} {:<14} {}",
            truncate(&entry.id, 6),
            truncate(entry.filename.as_deref().unwrap_or("Sans titre"), 24),
            date,
            format!(
                "{} → {}",
                entry.original_words.unwrap_or(0),
                entry.summary_words.unwrap_or(0)
            ),
            entry.style.as_deref().unwrap_or("paragraph"),
        );
        if i % 2 == 0 {
            lines.push(line);
        } else {
            lines.push(line.dimmed().to_string());
        }
        if let Some(summary) = entry.summary.as_deref().filter(|s| !s.is_empty()) {
            lines.push(format!("         {}", preview(summary, 80).dimmed()));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::HistoryEntry;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn keywords_are_hash_tags() {
        plain();
        assert_eq!(keywords(&["rust".into(), "api".into()]), "#rust  #api");
    }

    #[test]
    fn titles_are_numbered() {
        plain();
        assert_eq!(titles(&["Un".into(), "Deux".into()]), "  1. Un\n  2. Deux");
    }

    #[test]
    fn sentiment_line() {
        plain();
        let text = sentiment(&Sentiment {
            sentiment: "positif".into(),
            score: 0.9,
            emotions: vec!["joie".into(), "confiance".into()],
            tone: Some("enthousiaste".into()),
        });
        assert_eq!(
            text,
            "  😊 Positif  Score: 0.9\n  joie, confiance\n  enthousiaste"
        );
    }

    #[test]
    fn signed_out_history_message() {
        plain();
        assert_eq!(
            history(&HistoryView::SignedOut, Utc::now()),
            "  Connectez-vous pour voir votre historique"
        );
    }

    #[test]
    fn history_rows_show_counts() {
        plain();
        let entry = HistoryEntry {
            id: "3".into(),
            filename: Some("notes.txt".into()),
            created_at: None,
            summary: None,
            original_words: Some(200),
            summary_words: Some(50),
            style: Some("bullets".into()),
        };
        let text = history(&HistoryView::Records(vec![entry]), Utc::now());
        assert!(text.contains("200 → 50"));
        assert!(text.contains("bullets"));
    }
}
