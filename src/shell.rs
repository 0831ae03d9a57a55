//! Interactive shell (`nectar shell`).
//!
//! One shell is one tab session: the login cookie, the editor text, the
//! current summary and the guest-banner flag all live until `quit`. Each
//! command maps to a single UI action and prints the toasts it raised plus
//! the container it filled.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Result;
use colored::Colorize;
use regex::Regex;

use crate::api::Transport;
use crate::api::types::{Language, SummaryStyle};
use crate::app::{App, Outcome};
use crate::cli::{Output, OutputFormat, read_file_part, render};
use crate::page::Tab;
use crate::view::term;

/// A double-quoted string or a run of non-whitespace.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"|(\S+)"#).expect("token regex must compile"));

const HELP: &str = "\
Session    status | login EMAIL PASSWORD | register USER EMAIL PASSWORD | logout | banner | menu
Editor     upload PATH | load PATH | text \"...\" | show | clear | reset
Summary    words N | style NAME | summarize | copy | download [DIR] | translate-summary LANG
Analyze    keywords | sentiment | cloud | titles | copy-title N | stats
Tools      ask QUESTION | translate LANG | sections
History    history | refresh | open ID | delete ID | clear-history
Other      tab NAME | theme | help | quit";

const NEEDS_ARGUMENT: &[&str] = &[
    "login",
    "register",
    "tab",
    "upload",
    "load",
    "text",
    "words",
    "style",
    "translate-summary",
    "copy-title",
    "translate",
    "open",
    "delete",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Split a command line into words; quotes group words and are removed.
pub fn tokenize(line: &str) -> Vec<String> {
    TOKEN_RE
        .captures_iter(line)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Run the read-eval-print loop until `quit` or end of input.
pub fn run<T: Transport>(app: &mut App<T>, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    app.check_auth();
    app.load_history();
    writeln!(out, "{}", term::heading("Nectar"))?;
    writeln!(out, "{}", term::auth(&app.page().auth))?;
    writeln!(out, "{}", "Type 'help' for commands.".dimmed())?;

    for line in input.lines() {
        if execute(app, &line?, out)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

/// Execute one command line.
pub fn execute<T: Transport>(app: &mut App<T>, line: &str, out: &mut impl Write) -> Result<Flow> {
    let tokens = tokenize(line);
    let Some((command, args)) = tokens.split_first() else {
        return Ok(Flow::Continue);
    };
    if command != "menu" {
        app.close_menus();
    }

    let step = match command.as_str() {
        "quit" | "exit" => return Ok(Flow::Quit),
        "help" => {
            writeln!(out, "{HELP}")?;
            return Ok(Flow::Continue);
        }
        _ => dispatch(app, command, args, out)?,
    };

    for toast in app.drain_toasts() {
        writeln!(out, "{}", term::toast(&toast))?;
    }
    if let Step::Show(Outcome::Done, output) = step {
        let rendered = render(app, output, OutputFormat::Text)?;
        if !rendered.is_empty() {
            writeln!(out, "{rendered}")?;
        }
    }
    Ok(Flow::Continue)
}

/// What a command leaves to print after its toasts.
enum Step {
    Show(Outcome, Output),
    Quiet,
}

fn dispatch<T: Transport>(
    app: &mut App<T>,
    command: &str,
    args: &[String],
    out: &mut impl Write,
) -> Result<Step> {
    let arg = |i: usize| args.get(i).map(String::as_str);
    let rest = args.join(" ");

    let step = match (command, arg(0), arg(1), arg(2)) {
        ("status", ..) => {
            app.check_auth();
            Step::Show(Outcome::Done, Output::Auth)
        }
        ("login", Some(email), Some(password), _) => {
            Step::Show(app.login(email, password), Output::Auth)
        }
        ("register", Some(user), Some(email), Some(password)) => {
            Step::Show(app.register(user, email, password), Output::Auth)
        }
        ("logout", ..) => Step::Show(app.logout(), Output::Auth),
        ("banner", ..) => {
            app.dismiss_banner();
            Step::Show(Outcome::Done, Output::Auth)
        }
        ("menu", ..) => {
            app.toggle_user_menu();
            let state = if app.page().auth.dropdown_open { "open" } else { "closed" };
            writeln!(out, "  menu {state}")?;
            Step::Quiet
        }
        ("theme", ..) => {
            let theme = app.toggle_theme();
            writeln!(out, "  {} {}", "Theme:".bold(), theme.as_str())?;
            Step::Quiet
        }
        ("tab", Some(name), ..) => match name.parse::<Tab>() {
            Ok(tab) => {
                app.select_tab(tab);
                Step::Quiet
            }
            Err(err) => return usage(out, &err),
        },

        // Editor
        ("upload", Some(path), ..) => match read_file_part(Path::new(path)) {
            Ok(file) => Step::Show(app.upload(file), Output::Upload),
            Err(err) => return usage(out, &format!("{err:#}")),
        },
        ("load", Some(path), ..) => match std::fs::read_to_string(path) {
            Ok(text) => {
                app.set_text(text);
                Step::Quiet
            }
            Err(err) => return usage(out, &format!("failed to read {path}: {err}")),
        },
        ("text", Some(_), ..) => {
            app.set_text(rest);
            Step::Quiet
        }
        ("show", ..) => {
            writeln!(out, "{}", app.state().extracted_text())?;
            Step::Quiet
        }
        ("clear", ..) => {
            app.clear_text();
            Step::Quiet
        }
        ("reset", ..) => {
            app.reset_file();
            Step::Quiet
        }

        // Summary
        ("words", Some(n), ..) => match n.parse::<u32>() {
            Ok(n) => {
                app.set_target_words(n);
                writeln!(out, "  {}", app.page().options.slider_label())?;
                Step::Quiet
            }
            Err(_) => return usage(out, "words N"),
        },
        ("style", Some(name), ..) => match name.parse::<SummaryStyle>() {
            Ok(style) => {
                app.set_style(style);
                Step::Quiet
            }
            Err(err) => return usage(out, &err),
        },
        ("summarize", ..) => Step::Show(app.summarize(), Output::Summary),
        ("copy", ..) => {
            app.copy_summary();
            Step::Quiet
        }
        ("download", dir, ..) => {
            let dir = dir.map_or_else(|| PathBuf::from("."), PathBuf::from);
            if let Some(path) = app.download_summary(&dir) {
                writeln!(out, "  {}", path.display())?;
            }
            Step::Quiet
        }
        ("translate-summary", Some(code), ..) => match code.parse::<Language>() {
            Ok(language) => {
                let outcome = match app.open_translate_modal() {
                    Outcome::Done => {
                        app.set_translate_language(language);
                        app.translate_summary()
                    }
                    other => other,
                };
                Step::Show(outcome, Output::SummaryTranslation)
            }
            Err(err) => return usage(out, &err),
        },

        // Analysis
        ("keywords", ..) => Step::Show(app.keywords(), Output::Keywords),
        ("sentiment", ..) => Step::Show(app.sentiment(), Output::Sentiment),
        ("cloud", ..) => Step::Show(app.word_cloud(), Output::WordCloud),
        ("titles", ..) => Step::Show(app.titles(), Output::Titles),
        ("copy-title", Some(n), ..) => match n.parse::<usize>() {
            Ok(n) if n >= 1 => {
                if app.copy_title(n - 1) == Outcome::Rejected {
                    writeln!(out, "  no title #{n}")?;
                }
                Step::Quiet
            }
            _ => return usage(out, "copy-title N"),
        },
        ("stats", ..) => Step::Show(app.advanced_stats(), Output::AdvancedStats),
        ("ask", ..) => Step::Show(app.ask(&rest), Output::Answer),
        ("translate", Some(code), ..) => match code.parse::<Language>() {
            Ok(language) => Step::Show(app.translate_text(language), Output::Translation),
            Err(err) => return usage(out, &err),
        },
        ("sections", ..) => Step::Show(app.sections(), Output::Sections),

        // History
        ("history", ..) => {
            app.load_history();
            Step::Show(Outcome::Done, Output::History)
        }
        ("refresh", ..) => {
            app.refresh_history();
            Step::Show(Outcome::Done, Output::History)
        }
        ("open", Some(id), ..) => Step::Show(app.open_history_item(id), Output::Summary),
        ("delete", Some(id), ..) => Step::Show(app.delete_history_item(id), Output::History),
        ("clear-history", ..) => Step::Show(app.clear_history(), Output::History),

        (other, ..) if NEEDS_ARGUMENT.contains(&other) => {
            return usage(out, &format!("missing argument for '{other}'"));
        }
        (other, ..) => return usage(out, &format!("unknown command '{other}', try 'help'")),
    };
    Ok(step)
}

fn usage(out: &mut impl Write, message: &str) -> Result<Step> {
    writeln!(out, "  {}", message.yellow())?;
    Ok(Step::Quiet)
}
