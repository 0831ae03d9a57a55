use std::io::{BufReader, IsTerminal};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use nectar::api::types::{Language, SummaryStyle};
use nectar::cli::{self, Analysis, HistoryAction, Input, OutputFormat, SummarizeOptions};
use nectar::config;

#[derive(Debug, Parser)]
#[command(name = "nectar")]
#[command(about = "Summarize and analyze documents from the terminal")]
struct App {
    /// Backend base URL (overrides config and NECTAR_URL)
    #[arg(long, global = true)]
    url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

/// Where the text comes from. Piped stdin is used when none is given.
#[derive(Debug, Args)]
struct InputArgs {
    /// Upload a document (pdf, docx, txt) and use its extracted text
    #[arg(long, conflicts_with_all = ["text", "file"])]
    doc: Option<PathBuf>,
    /// Use this text
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,
    /// Read plain text from a local file
    #[arg(long)]
    file: Option<PathBuf>,
    /// Output format: text (default), json, html
    #[arg(long, default_value = "text")]
    format: String,
}

impl InputArgs {
    fn input(&self) -> Input {
        Input {
            doc: self.doc.clone(),
            text: self.text.clone(),
            file: self.file.clone(),
        }
    }

    fn output_format(&self) -> OutputFormat {
        OutputFormat::from_str_opt(Some(&self.format))
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the backend and who is signed in
    Status {
        /// Output format: text (default), json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Sign in with email and password
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        username: String,
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out of the current session
    Logout,
    /// Extract the text of a document
    Upload {
        path: PathBuf,
        /// Output format: text (default), json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Summarize text
    Summarize {
        #[command(flatten)]
        input: InputArgs,
        /// Target length in words (clamped to the configured bounds)
        #[arg(long)]
        words: Option<u32>,
        /// paragraph, bullets, academic or simple
        #[arg(long)]
        style: Option<SummaryStyle>,
        /// Copy the summary to the clipboard
        #[arg(long)]
        copy: bool,
        /// Write the summary to DIR/resume.txt
        #[arg(long, value_name = "DIR")]
        download: Option<PathBuf>,
        /// Also translate the summary (fr, en, es, de, it, pt, ar, zh, ja, ru)
        #[arg(long, value_name = "LANG")]
        translate: Option<Language>,
    },
    /// Extract keywords
    Keywords {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        count: Option<u32>,
    },
    /// Analyze sentiment and emotions
    Sentiment {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Weighted word cloud
    Wordcloud {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        max_words: Option<u32>,
    },
    /// Suggest titles
    Titles {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        count: Option<u32>,
    },
    /// Advanced text statistics
    Stats {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Summarize section by section
    Sections {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        words_per_section: Option<u32>,
    },
    /// Ask a question about the text
    Ask {
        question: String,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Translate the text
    Translate {
        #[command(flatten)]
        input: InputArgs,
        /// Target language (fr, en, es, de, it, pt, ar, zh, ja, ru)
        #[arg(long)]
        lang: Option<Language>,
    },
    /// List, open, delete or clear past summaries
    History {
        /// Load one record
        #[arg(long, value_name = "ID", conflicts_with_all = ["delete", "clear"])]
        open: Option<String>,
        /// Delete one record
        #[arg(long, value_name = "ID", conflicts_with = "clear")]
        delete: Option<String>,
        /// Delete every record
        #[arg(long)]
        clear: bool,
        /// Output format: text (default), json, html
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show or toggle the colour theme
    Theme {
        #[arg(long)]
        toggle: bool,
    },
    /// Summarise the activity log per endpoint
    Activity {
        /// Only include the last N days
        #[arg(long)]
        days: Option<u32>,
        /// Output format: text (default), json, csv
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Interactive session
    Shell,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default ~/.nectar/config.toml
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Set a value, e.g. `summarize.default_words 200`
    Set { key: String, value: String },
    /// Reset ~/.nectar/config.toml to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let mut cfg = config::load();
    if let Some(url) = app.url {
        cfg.server.base_url = url;
    }

    match app.command {
        Commands::Status { format } => {
            cli::run_status(cfg, OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Login { email, password } => cli::run_login(cfg, &email, &password),
        Commands::Register {
            username,
            email,
            password,
        } => cli::run_register(cfg, &username, &email, &password),
        Commands::Logout => cli::run_logout(cfg),
        Commands::Upload { path, format } => {
            cli::run_upload(cfg, &path, OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Summarize {
            input,
            words,
            style,
            copy,
            download,
            translate,
        } => {
            let options = SummarizeOptions {
                words,
                style,
                copy,
                download,
                translate,
            };
            cli::run_summarize(cfg, &input.input(), &options, input.output_format())
        }
        Commands::Keywords { input, count } => {
            if let Some(count) = count {
                cfg.analysis.keyword_count = count;
            }
            analyze(cfg, &input, Analysis::Keywords)
        }
        Commands::Sentiment { input } => analyze(cfg, &input, Analysis::Sentiment),
        Commands::Wordcloud { input, max_words } => {
            if let Some(max_words) = max_words {
                cfg.analysis.wordcloud_max_words = max_words;
            }
            analyze(cfg, &input, Analysis::WordCloud)
        }
        Commands::Titles { input, count } => {
            if let Some(count) = count {
                cfg.analysis.title_count = count;
            }
            analyze(cfg, &input, Analysis::Titles)
        }
        Commands::Stats { input } => analyze(cfg, &input, Analysis::AdvancedStats),
        Commands::Sections {
            input,
            words_per_section,
        } => {
            if let Some(words) = words_per_section {
                cfg.analysis.words_per_section = words;
            }
            analyze(cfg, &input, Analysis::Sections)
        }
        Commands::Ask { question, input } => analyze(cfg, &input, Analysis::Ask(question)),
        Commands::Translate { input, lang } => {
            let language = lang.unwrap_or(cfg.analysis.target_language);
            analyze(cfg, &input, Analysis::Translate(language))
        }
        Commands::History {
            open,
            delete,
            clear,
            format,
        } => {
            let action = match (open, delete) {
                (Some(id), _) => HistoryAction::Open(id),
                (_, Some(id)) => HistoryAction::Delete(id),
                _ if clear => HistoryAction::Clear,
                _ => HistoryAction::List,
            };
            cli::run_history(cfg, &action, OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Theme { toggle } => cli::run_theme(cfg, toggle),
        Commands::Activity { days, format } => {
            cli::run_activity(&cfg, days, OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
        Commands::Shell => {
            let mut app = cli::build_app(cfg);
            let stdin = std::io::stdin();
            nectar::shell::run(&mut app, BufReader::new(stdin.lock()), &mut std::io::stdout())
        }
    }
}

fn analyze(cfg: config::NectarConfig, input: &InputArgs, analysis: Analysis) -> Result<()> {
    cli::run_analysis(cfg, &input.input(), &analysis, input.output_format())
}
