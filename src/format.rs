//! Display formatting shared by the HTML and terminal renderers.
use chrono::{DateTime, Datelike, NaiveDateTime, Utc};

/// `512 B`, `2.0 KB`, `1.5 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

/// Whitespace-separated word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Percentage of words removed, rounded half up.
///
/// Negative when the summary is longer than its source.
pub fn compression_percent(source_words: usize, summary_words: u64) -> i64 {
    if source_words == 0 {
        return 0;
    }
    let ratio = 1.0 - summary_words as f64 / source_words as f64;
    (ratio * 100.0 + 0.5).floor() as i64
}

pub fn compression_label(percent: i64) -> String {
    format!("{percent}% réduit")
}

pub fn words_label(words: u64) -> String {
    format!("{words} mots")
}

/// Label for the generation method reported by `/summarize`.
pub fn method_label(method: &str) -> &'static str {
    match method {
        "openai" => "OpenAI",
        "original" => "Original",
        _ => "Extractif",
    }
}

/// Uppercase the first character.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Avatar letter for a username.
pub fn avatar_initial(username: &str) -> String {
    username
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// Print a number the way a browser would: no trailing `.0` on integers.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// First `max_chars` characters followed by `...`; empty stays empty.
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.is_empty() {
        return String::new();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{head}...")
}

const MONTHS_FR: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

/// Parse the timestamps the backend emits (RFC 3339 or SQL-style, UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Relative date shown on history cards.
///
/// Under a minute: `À l'instant`; under an hour: `Il y a N min`; under a
/// day: `Il y a Nh`; otherwise day and abbreviated French month. Values
/// that cannot be parsed are shown as-is.
pub fn relative_date(raw: &str, now: DateTime<Utc>) -> String {
    let Some(date) = parse_timestamp(raw) else {
        return raw.to_string();
    };
    let elapsed = (now - date).num_seconds();

    if elapsed < 60 {
        "À l'instant".to_string()
    } else if elapsed < 3600 {
        format!("Il y a {} min", elapsed / 60)
    } else if elapsed < 86_400 {
        format!("Il y a {}h", elapsed / 3600)
    } else {
        format!("{} {}", date.day(), MONTHS_FR[date.month0() as usize])
    }
}

/// Truncate to `max_len` characters with a trailing ellipsis.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(1536 * 1024), "1.5 MB");
    }

    #[test]
    fn compression_from_word_counts() {
        assert_eq!(compression_label(compression_percent(100, 30)), "70% réduit");
        assert_eq!(compression_percent(3, 1), 67);
        assert_eq!(compression_percent(200, 2), 99);
        assert_eq!(compression_percent(10, 20), -100);
        assert_eq!(compression_percent(0, 5), 0);
    }

    #[test]
    fn labels() {
        assert_eq!(words_label(42), "42 mots");
        assert_eq!(method_label("openai"), "OpenAI");
        assert_eq!(method_label("extractive"), "Extractif");
        assert_eq!(method_label("original"), "Original");
    }

    #[test]
    fn capitalization_handles_accents() {
        assert_eq!(capitalize_first("négatif"), "Négatif");
        assert_eq!(capitalize_first("élan"), "Élan");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(avatar_initial("bob"), "B");
        assert_eq!(avatar_initial(""), "");
    }

    #[test]
    fn numbers_print_like_javascript() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.75), "0.75");
        assert_eq!(format_number(-0.5), "-0.5");
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        assert_eq!(preview("", 80), "");
        assert_eq!(preview("éàü", 2), "éà...");
    }

    #[test]
    fn relative_dates() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(relative_date("2025-03-10T11:59:30Z", now), "À l'instant");
        assert_eq!(relative_date("2025-03-10 11:15:00", now), "Il y a 45 min");
        assert_eq!(relative_date("2025-03-10T07:00:00+00:00", now), "Il y a 5h");
        assert_eq!(relative_date("2025-02-01 08:00:00", now), "1 févr.");
        assert_eq!(relative_date("hier", now), "hier");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hell…");
    }
}
