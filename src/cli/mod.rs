//! CLI command implementations.
//!
//! Every one-shot command builds a fresh [`App`] (one command = one tab
//! session), feeds it the input, runs a single coordinator action and
//! prints the container that action fills:
//! - `nectar status | login | register | logout`: session gate
//! - `nectar upload | summarize`: documents and summaries
//! - `nectar keywords | sentiment | wordcloud | titles | stats | sections |
//!   ask | translate`: analysis
//! - `nectar history`: past summaries
//! - `nectar theme | activity | config`: local state
//!
//! Toasts go to stderr so `--format json` output stays parseable.

use std::fs;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use colored::Colorize;
use serde_json::json;

use crate::activity::{self, ActivityLog, EndpointSummary};
use crate::api::types::{Language, SummaryStyle};
use crate::api::{ApiClient, FilePart, HttpTransport, Transport};
use crate::app::{App, Outcome};
use crate::config::{self, NectarConfig};
use crate::page::ToastKind;
use crate::prefs::Prefs;
use crate::view::{html, term};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
    /// Only meaningful for `nectar activity`; elsewhere printed as text.
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("html") => Self::Html,
            Some("csv") => Self::Csv,
            _ => Self::Text,
        }
    }
}

/// Where the text for a command comes from. At most one source is used,
/// in this order; with none, piped stdin is read.
#[derive(Debug, Clone, Default)]
pub struct Input {
    /// Document sent through `/upload` first.
    pub doc: Option<PathBuf>,
    pub text: Option<String>,
    /// Local plain-text file.
    pub file: Option<PathBuf>,
}

/// The page container a command fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Auth,
    Upload,
    Summary,
    SummaryTranslation,
    Keywords,
    Sentiment,
    WordCloud,
    Titles,
    AdvancedStats,
    Answer,
    Translation,
    Sections,
    History,
}

// ---------------------------------------------------------------------------
// App construction and shared plumbing
// ---------------------------------------------------------------------------

/// Build a session against the configured backend.
pub fn build_app(config: NectarConfig) -> App<HttpTransport> {
    let cookie = Some(config.server.session_cookie.clone());
    let transport = HttpTransport::new(
        &config.server.base_url,
        config::request_timeout(&config),
        cookie,
    )
    .with_body_limit(config.upload.max_bytes.saturating_mul(4));
    let api = ApiClient::new(transport, ActivityLog::from_config(&config.logging));
    App::new(api, config, Prefs::load())
}

/// Load the command's input into the editor.
pub fn load_input<T: Transport>(app: &mut App<T>, input: &Input) -> Result<()> {
    if let Some(doc) = &input.doc {
        let outcome = app.upload(read_file_part(doc)?);
        flush_toasts(app);
        if !outcome.is_done() {
            bail!("could not extract text from {}", doc.display());
        }
    } else if let Some(text) = &input.text {
        app.set_text(text.as_str());
    } else if let Some(path) = &input.file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        app.set_text(text);
    } else if !std::io::stdin().is_terminal() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        app.set_text(text);
    }
    Ok(())
}

pub fn read_file_part(path: &Path) -> Result<FilePart> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(FilePart::new(name, bytes))
}

/// Print and clear pending toasts on stderr.
pub fn flush_toasts<T: Transport>(app: &mut App<T>) {
    for toast in app.drain_toasts() {
        eprintln!("{}", term::toast(&toast));
    }
}

/// Report the outcome of one action: toasts to stderr, the filled container
/// to stdout, and an error exit when the action did not complete.
fn finish<T: Transport>(
    app: &mut App<T>,
    outcome: Outcome,
    output: Output,
    format: OutputFormat,
) -> Result<()> {
    let last_error = app
        .page()
        .toasts()
        .iter()
        .rev()
        .find(|t| t.kind == ToastKind::Error)
        .map(|t| t.message.clone());
    flush_toasts(app);

    match outcome {
        Outcome::Done => {
            let rendered = render(app, output, format)?;
            if !rendered.is_empty() {
                println!("{rendered}");
            }
            Ok(())
        }
        Outcome::Rejected | Outcome::Failed => {
            bail!(last_error.unwrap_or_else(|| "action failed".to_string()))
        }
    }
}

/// Render one container of the page in the requested format.
///
/// `Auth` and `Upload` have no HTML fragment and print as text. Hidden
/// containers render as an empty string.
pub fn render<T: Transport>(app: &App<T>, output: Output, format: OutputFormat) -> Result<String> {
    let page = app.page();
    let panels = &page.panels;

    let text = match format {
        OutputFormat::Json => {
            let value = match output {
                Output::Auth => json!({
                    "logged_in": app.state().is_authenticated(),
                    "user": app.state().current_user(),
                }),
                Output::Upload => json!({
                    "file": page.upload.file_info.as_ref().map(|f| json!({"name": f.name, "size": f.size})),
                    "word_count": page.upload.stats.words,
                    "char_count": page.upload.stats.chars,
                    "sentence_count": page.upload.stats.sentences,
                    "reading_time": page.upload.stats.reading_time,
                    "text": app.state().extracted_text(),
                }),
                Output::Summary => json!({
                    "summary": app.state().current_summary(),
                    "words": page.summary.words_label,
                    "compression": page.summary.compression_label,
                    "method": page.summary.method_label,
                }),
                Output::SummaryTranslation => json!({
                    "language": page.modal.language,
                    "translation": page.modal.translation,
                }),
                Output::Keywords => json!({ "keywords": panels.keywords }),
                Output::Sentiment => serde_json::to_value(&panels.sentiment)?,
                Output::WordCloud => json!({ "words": panels.word_cloud }),
                Output::Titles => json!({ "titles": panels.titles }),
                Output::AdvancedStats => serde_json::to_value(&panels.advanced_stats)?,
                Output::Answer => json!({ "answer": panels.answer }),
                Output::Translation => json!({ "translation": panels.translation }),
                Output::Sections => json!({ "sections": panels.sections }),
                Output::History => match &page.history {
                    crate::page::HistoryView::Records(records) => json!({ "history": records }),
                    other => json!({ "history": [], "message": other.empty_message() }),
                },
            };
            serde_json::to_string_pretty(&value)?
        }
        OutputFormat::Html => match output {
            Output::Summary => html::summary(&page.summary, app.state().current_summary()),
            Output::SummaryTranslation => page
                .modal
                .translation
                .as_deref()
                .map(html::paragraph)
                .unwrap_or_default(),
            Output::Keywords => panels.keywords.as_deref().map(html::keywords).unwrap_or_default(),
            Output::Sentiment => panels.sentiment.as_ref().map(html::sentiment).unwrap_or_default(),
            Output::WordCloud => panels.word_cloud.as_deref().map(html::word_cloud).unwrap_or_default(),
            Output::Titles => panels.titles.as_deref().map(html::titles).unwrap_or_default(),
            Output::AdvancedStats => panels
                .advanced_stats
                .as_ref()
                .map(html::advanced_stats)
                .unwrap_or_default(),
            Output::Answer => panels.answer.as_deref().map(html::paragraph).unwrap_or_default(),
            Output::Translation => panels
                .translation
                .as_deref()
                .map(html::paragraph)
                .unwrap_or_default(),
            Output::Sections => panels.sections.as_deref().map(html::sections).unwrap_or_default(),
            Output::History => html::history(&page.history, Utc::now()),
            Output::Auth | Output::Upload => render_text(app, output),
        },
        OutputFormat::Text | OutputFormat::Csv => render_text(app, output),
    };
    Ok(text)
}

fn render_text<T: Transport>(app: &App<T>, output: Output) -> String {
    let page = app.page();
    let panels = &page.panels;
    match output {
        Output::Auth => term::auth(&page.auth),
        Output::Upload => term::upload(&page.upload),
        Output::Summary => term::summary(&page.summary, app.state().current_summary()),
        Output::SummaryTranslation => page.modal.translation.clone().unwrap_or_default(),
        Output::Keywords => panels.keywords.as_deref().map(term::keywords).unwrap_or_default(),
        Output::Sentiment => panels.sentiment.as_ref().map(term::sentiment).unwrap_or_default(),
        Output::WordCloud => panels.word_cloud.as_deref().map(term::word_cloud).unwrap_or_default(),
        Output::Titles => panels.titles.as_deref().map(term::titles).unwrap_or_default(),
        Output::AdvancedStats => panels
            .advanced_stats
            .as_ref()
            .map(term::advanced_stats)
            .unwrap_or_default(),
        Output::Answer => panels.answer.clone().unwrap_or_default(),
        Output::Translation => panels.translation.clone().unwrap_or_default(),
        Output::Sections => panels.sections.as_deref().map(term::sections).unwrap_or_default(),
        Output::History => term::history(&page.history, Utc::now()),
    }
}

// ---------------------------------------------------------------------------
// nectar status | login | register | logout
// ---------------------------------------------------------------------------

pub fn run_status(config: NectarConfig, format: OutputFormat) -> Result<()> {
    let mut app = build_app(config);
    app.check_auth();
    if format == OutputFormat::Text {
        println!("{}", term::heading("Nectar"));
        println!("  {} {}", "Serveur:".bold(), app.api().transport().base_url());
    }
    finish(&mut app, Outcome::Done, Output::Auth, format)
}

pub fn run_login(config: NectarConfig, email: &str, password: &str) -> Result<()> {
    let mut app = build_app(config);
    let outcome = app.login(email, password);
    let cookie = app.api().transport().cookie_header();
    finish(&mut app, outcome, Output::Auth, OutputFormat::Text)?;
    print_session_hint(cookie);
    Ok(())
}

pub fn run_register(config: NectarConfig, username: &str, email: &str, password: &str) -> Result<()> {
    let mut app = build_app(config);
    let outcome = app.register(username, email, password);
    let cookie = app.api().transport().cookie_header();
    finish(&mut app, outcome, Output::Auth, OutputFormat::Text)?;
    print_session_hint(cookie);
    Ok(())
}

/// One-shot commands do not share a cookie jar; the session has to be
/// handed over explicitly.
fn print_session_hint(cookie: Option<String>) {
    if let Some(cookie) = cookie {
        println!();
        println!(
            "  {}",
            "To reuse this session in later commands:".dimmed()
        );
        println!("  export NECTAR_SESSION='{cookie}'");
    }
}

pub fn run_logout(config: NectarConfig) -> Result<()> {
    let mut app = build_app(config);
    app.check_auth();
    let outcome = app.logout();
    finish(&mut app, outcome, Output::Auth, OutputFormat::Text)
}

// ---------------------------------------------------------------------------
// nectar upload | summarize
// ---------------------------------------------------------------------------

pub fn run_upload(config: NectarConfig, path: &Path, format: OutputFormat) -> Result<()> {
    let mut app = build_app(config);
    let outcome = app.upload(read_file_part(path)?);
    finish(&mut app, outcome, Output::Upload, format)
}

/// Options of `nectar summarize` beyond the input.
#[derive(Debug, Clone, Default)]
pub struct SummarizeOptions {
    pub words: Option<u32>,
    pub style: Option<SummaryStyle>,
    pub copy: bool,
    pub download: Option<PathBuf>,
    pub translate: Option<Language>,
}

pub fn run_summarize(
    config: NectarConfig,
    input: &Input,
    options: &SummarizeOptions,
    format: OutputFormat,
) -> Result<()> {
    let mut app = build_app(config);
    app.check_auth();
    load_input(&mut app, input)?;
    if let Some(words) = options.words {
        app.set_target_words(words);
    }
    if let Some(style) = options.style {
        app.set_style(style);
    }

    let outcome = app.summarize();
    finish(&mut app, outcome, Output::Summary, format)?;

    if options.copy {
        app.copy_summary();
        flush_toasts(&mut app);
    }
    if let Some(dir) = &options.download
        && let Some(path) = app.download_summary(dir)
    {
        flush_toasts(&mut app);
        println!("{} {}", "Saved".green().bold(), path.display());
    }
    if let Some(language) = options.translate {
        app.open_translate_modal();
        app.set_translate_language(language);
        let outcome = app.translate_summary();
        finish(&mut app, outcome, Output::SummaryTranslation, format)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// nectar keywords | sentiment | wordcloud | titles | stats | sections | ask | translate
// ---------------------------------------------------------------------------

/// The analysis a command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analysis {
    Keywords,
    Sentiment,
    WordCloud,
    Titles,
    AdvancedStats,
    Sections,
    Ask(String),
    Translate(Language),
}

pub fn run_analysis(
    config: NectarConfig,
    input: &Input,
    analysis: &Analysis,
    format: OutputFormat,
) -> Result<()> {
    let mut app = build_app(config);
    load_input(&mut app, input)?;

    let (outcome, output) = match analysis {
        Analysis::Keywords => (app.keywords(), Output::Keywords),
        Analysis::Sentiment => (app.sentiment(), Output::Sentiment),
        Analysis::WordCloud => (app.word_cloud(), Output::WordCloud),
        Analysis::Titles => (app.titles(), Output::Titles),
        Analysis::AdvancedStats => (app.advanced_stats(), Output::AdvancedStats),
        Analysis::Sections => (app.sections(), Output::Sections),
        Analysis::Ask(question) => (app.ask(question), Output::Answer),
        Analysis::Translate(language) => (app.translate_text(*language), Output::Translation),
    };
    finish(&mut app, outcome, output, format)
}

// ---------------------------------------------------------------------------
// nectar history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryAction {
    List,
    Open(String),
    Delete(String),
    Clear,
}

pub fn run_history(config: NectarConfig, action: &HistoryAction, format: OutputFormat) -> Result<()> {
    let mut app = build_app(config);
    app.check_auth();

    match action {
        HistoryAction::List => {
            app.load_history();
            finish(&mut app, Outcome::Done, Output::History, format)
        }
        HistoryAction::Open(id) => {
            let outcome = app.open_history_item(id);
            finish(&mut app, outcome, Output::Summary, format)
        }
        HistoryAction::Delete(id) => {
            let outcome = app.delete_history_item(id);
            finish(&mut app, outcome, Output::History, format)
        }
        HistoryAction::Clear => {
            let outcome = app.clear_history();
            finish(&mut app, outcome, Output::History, format)
        }
    }
}

// ---------------------------------------------------------------------------
// nectar theme
// ---------------------------------------------------------------------------

pub fn run_theme(config: NectarConfig, toggle: bool) -> Result<()> {
    let mut app = build_app(config);
    if toggle {
        app.toggle_theme();
    }
    let theme = app.page().theme;
    let icon = if theme.icons().sun_visible { "☀" } else { "☾" };
    println!("{} {} {}", "Theme:".bold(), theme.as_str(), icon);
    Ok(())
}

// ---------------------------------------------------------------------------
// nectar activity
// ---------------------------------------------------------------------------

/// Summarise the activity log per endpoint.
pub fn run_activity(config: &NectarConfig, days: Option<u32>, format: OutputFormat) -> Result<()> {
    let log = ActivityLog::from_config(&config.logging);
    let entries = log.read_entries_since_days(days);
    let summary = activity::summarize(&entries);

    if summary.is_empty() && format != OutputFormat::Json {
        println!(
            "{}",
            "No activity yet. Run some commands against the backend first.".yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Csv => print_activity_csv(&summary),
        OutputFormat::Text | OutputFormat::Html => {
            let notes = entries.iter().filter(|e| e.kind == "note").count();
            print_activity_table(&summary, notes);
        }
    }
    Ok(())
}

fn print_activity_table(summary: &[EndpointSummary], notes: usize) {
    println!("{}", term::heading("Nectar Activity"));
    println!(
        "  {:<32} {:>6} {:>9} {:>10}",
        "Endpoint", "Calls", "Failures", "Avg ms"
    );
    println!("  {}", "-".repeat(60));

    for (i, row) in summary.iter().enumerate() {
        let failures = if row.failures > 0 {
            row.failures.to_string().red().to_string()
        } else {
            row.failures.to_string()
        };
        let line = format!(
            "  {:<32} {:>6} {:>9} {:>10.1}",
            crate::format::truncate(&row.endpoint, 32),
            row.calls,
            failures,
            row.avg_latency_ms,
        );
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
    if notes > 0 {
        println!();
        println!("  {} {}", "Diagnostics:".bold(), notes);
    }
}

fn print_activity_csv(summary: &[EndpointSummary]) {
    println!("endpoint,calls,failures,avg_latency_ms");
    for row in summary {
        println!(
            "{},{},{},{:.1}",
            row.endpoint, row.calls, row.failures, row.avg_latency_ms
        );
    }
}

// ---------------------------------------------------------------------------
// nectar config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", term::heading("Effective Nectar Configuration"));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file().is_some_and(|p| p.exists());
    let project_exists = config::project_config_file().is_some_and(|p| p.exists());
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.nectar/config.toml", global_exists);
    print_source(".nectar.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "NECTAR_* environment variables".dimmed()
    );
    Ok(())
}

fn print_source(label: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), label.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{label} (not found)").dimmed());
    }
}

pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}
