//! Coordinators.
//!
//! [`App`] is one browsing session: the typed client, the shared
//! [`AppState`], the [`Page`] view model and the two preference scopes.
//! Each user action is a method that reads its inputs, runs at most one
//! backend call under the loading overlay, and writes the outcome back to
//! the page. The methods live next to their concern:
//!
//! - [`session`]: session gate, login, logout, guest banner
//! - [`upload`]: document upload, file reset
//! - [`summarize`]: summarization, copy / download, translate modal
//! - [`analysis`]: keywords, sentiment, word cloud, titles, stats, Q&A,
//!   translation, section summaries
//! - [`history`]: past summaries
//!
//! Calls are synchronous, so a session only ever has one request in
//! flight and responses are applied in the order they were requested.
pub mod analysis;
pub mod history;
pub mod session;
pub mod summarize;
pub mod upload;

use crate::api::types::SummaryStyle;
use crate::api::{ApiClient, ApiError, Transport};
use crate::clipboard::{Clipboard, TerminalClipboard};
use crate::config::NectarConfig;
use crate::page::{Page, SummaryOptions, Tab, Toast, ToastKind};
use crate::prefs::{Prefs, SessionStore, Theme};
use crate::state::AppState;

/// Toast shown for any transport or decoding failure.
pub const CONNECTION_ERROR: &str = "Erreur de connexion";

/// Toast shown when an analysis is requested without text.
pub const TEXT_REQUIRED: &str = "Texte requis";

/// How a coordinator action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The response was applied to the page.
    Done,
    /// Input validation failed; no request was sent.
    Rejected,
    /// The request failed; the page kept its previous content.
    Failed,
}

impl Outcome {
    pub fn is_done(self) -> bool {
        self == Self::Done
    }
}

/// Actions that show the loading overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Upload,
    Summarize,
    Translate,
    Keywords,
    Sentiment,
    WordCloud,
    Titles,
    AdvancedStats,
    Ask,
    Sections,
}

impl Task {
    pub fn loading_message(self) -> &'static str {
        match self {
            Self::Upload => "Extraction du texte...",
            Self::Summarize => "Génération du résumé avec OpenAI...",
            Self::Translate => "Traduction en cours...",
            Self::Keywords => "Extraction des mots-clés...",
            Self::Sentiment => "Analyse du sentiment...",
            Self::WordCloud => "Génération du nuage de mots...",
            Self::Titles => "Génération des titres...",
            Self::AdvancedStats => "Calcul des statistiques...",
            Self::Ask => "Recherche de la réponse...",
            Self::Sections => "Analyse des sections...",
        }
    }

    /// Toast used when the server fails without a message of its own.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Upload => "Erreur lors de l'extraction",
            Self::Summarize => "Erreur lors du résumé",
            Self::Translate => "Erreur de traduction",
            Self::Keywords => "Erreur lors de l'extraction des mots-clés",
            Self::Sentiment => "Erreur lors de l'analyse du sentiment",
            Self::WordCloud => "Erreur lors de la génération du nuage de mots",
            Self::Titles => "Erreur lors de la génération des titres",
            Self::AdvancedStats => "Erreur lors du calcul des statistiques",
            Self::Ask => "Erreur",
            Self::Sections => "Erreur lors de l'analyse des sections",
        }
    }
}

pub struct App<T: Transport> {
    api: ApiClient<T>,
    state: AppState,
    page: Page,
    session: SessionStore,
    prefs: Prefs,
    config: NectarConfig,
    clipboard: Box<dyn Clipboard>,
}

impl<T: Transport> App<T> {
    pub fn new(api: ApiClient<T>, config: NectarConfig, prefs: Prefs) -> Self {
        let options = SummaryOptions {
            target_words: config
                .summarize
                .clamp_words(config.summarize.default_words),
            style: config.summarize.style,
        };
        let page = Page::new(prefs.theme(), options, config.analysis.target_language);
        Self {
            api,
            state: AppState::new(),
            page,
            session: SessionStore::new(),
            prefs,
            config,
            clipboard: Box::new(TerminalClipboard),
        }
    }

    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn config(&self) -> &NectarConfig {
        &self.config
    }

    pub fn prefs(&self) -> &Prefs {
        &self.prefs
    }

    pub fn drain_toasts(&mut self) -> Vec<Toast> {
        self.page.drain_toasts()
    }

    // -----------------------------------------------------------------------
    // Input surfaces
    // -----------------------------------------------------------------------

    /// Replace the editor contents, as if the user typed them.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.state.set_text(text);
    }

    /// Empty the editor.
    pub fn clear_text(&mut self) {
        self.state.clear_text();
    }

    /// Move the length slider; the value is clamped to its bounds.
    pub fn set_target_words(&mut self, words: u32) -> u32 {
        let words = self.config.summarize.clamp_words(words);
        self.page.options.target_words = words;
        words
    }

    pub fn set_style(&mut self, style: SummaryStyle) {
        self.page.options.style = style;
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.page.active_tab = tab;
    }

    /// Flip between dark and light and persist the choice on the device.
    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.page.theme.toggled();
        self.page.theme = theme;
        self.prefs.set_theme(theme);
        theme
    }

    pub fn toggle_user_menu(&mut self) {
        self.page.auth.dropdown_open = !self.page.auth.dropdown_open;
    }

    /// Any interaction outside the user menu closes it.
    pub fn close_menus(&mut self) {
        self.page.auth.dropdown_open = false;
    }

    // -----------------------------------------------------------------------
    // Shared coordinator plumbing
    // -----------------------------------------------------------------------

    /// Trimmed editor text, or a validation toast.
    fn require_text(&mut self, message: &str) -> Option<String> {
        match self.state.input_text() {
            Some(text) => Some(text.to_string()),
            None => {
                self.page.toast(ToastKind::Error, message);
                None
            }
        }
    }

    /// Idle → Loading → (Success | Failure) → Idle around one backend call.
    ///
    /// On failure the error is reported as a toast and `None` is returned;
    /// the caller leaves the page untouched.
    fn run_task<R>(
        &mut self,
        task: Task,
        call: impl FnOnce(&ApiClient<T>) -> Result<R, ApiError>,
    ) -> Option<R> {
        self.page.overlay.show(task.loading_message());
        let result = call(&self.api);
        self.page.overlay.hide();

        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.report_failure(&err, task.failure_message());
                None
            }
        }
    }

    fn report_failure(&mut self, err: &ApiError, fallback: &str) {
        let message = if err.is_connection_error() {
            CONNECTION_ERROR
        } else {
            err.server_message().unwrap_or(fallback)
        };
        self.page.toast(ToastKind::Error, message);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted transport for coordinator unit tests.
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use crate::activity::ActivityLog;
    use crate::api::{ApiClient, ApiError, Body, Method, Reply, Transport};
    use crate::clipboard::MemoryClipboard;
    use crate::config::NectarConfig;
    use crate::prefs::Prefs;

    use super::App;

    #[derive(Default)]
    pub struct Scripted {
        replies: RefCell<VecDeque<Result<Reply, ApiError>>>,
        pub calls: RefCell<Vec<(Method, String, Option<serde_json::Value>)>>,
    }

    impl Scripted {
        pub fn reply(self, status: u16, body: serde_json::Value) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Ok(Reply::new(status, body.to_string())));
            self
        }

        pub fn fail(self, err: ApiError) -> Self {
            self.replies.borrow_mut().push_back(Err(err));
            self
        }
    }

    impl Transport for Scripted {
        fn send(&self, method: Method, path: &str, body: Body<'_>) -> Result<Reply, ApiError> {
            let json = match body {
                Body::Json(value) => Some(value.clone()),
                Body::Empty | Body::Multipart { .. } => None,
            };
            self.calls
                .borrow_mut()
                .push((method, path.to_string(), json));
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport("no scripted reply".to_string())))
        }
    }

    pub fn app(transport: Scripted) -> (App<Scripted>, MemoryClipboard) {
        let clipboard = MemoryClipboard::new();
        let app = App::new(
            ApiClient::new(transport, ActivityLog::disabled()),
            NectarConfig::default(),
            Prefs::in_memory(),
        )
        .with_clipboard(clipboard.clone());
        (app, clipboard)
    }

    pub fn calls(app: &App<Scripted>) -> usize {
        app.api().transport().calls.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{Scripted, app};
    use super::*;

    #[test]
    fn double_theme_toggle_restores_icons_and_preference() {
        let (mut app, _) = app(Scripted::default());
        app.toggle_theme();
        app.toggle_theme();
        let initial_icons = app.page().theme.icons();
        let initial_pref = app.prefs().stored_theme();

        assert_eq!(app.toggle_theme(), Theme::Light);
        assert!(app.page().theme.icons().moon_visible);
        assert_eq!(app.prefs().stored_theme(), Some(Theme::Light));

        app.toggle_theme();
        assert_eq!(app.page().theme.icons(), initial_icons);
        assert_eq!(app.prefs().stored_theme(), initial_pref);
    }

    #[test]
    fn slider_is_clamped() {
        let (mut app, _) = app(Scripted::default());
        assert_eq!(app.set_target_words(5), 50);
        assert_eq!(app.set_target_words(10_000), 500);
        assert_eq!(app.page().options.slider_label(), "500 mots");
    }

    #[test]
    fn user_menu_toggles_and_closes() {
        let (mut app, _) = app(Scripted::default());
        app.toggle_user_menu();
        assert!(app.page().auth.dropdown_open);
        app.close_menus();
        assert!(!app.page().auth.dropdown_open);
    }

    #[test]
    fn failure_toast_prefers_server_message() {
        let (mut app, _) = app(Scripted::default());
        app.report_failure(
            &ApiError::Server {
                status: 500,
                message: Some("OpenAI indisponible".to_string()),
            },
            "fallback",
        );
        app.report_failure(
            &ApiError::Server {
                status: 500,
                message: None,
            },
            "fallback",
        );
        app.report_failure(&ApiError::Decode("eof".to_string()), "fallback");

        let messages: Vec<String> = app.drain_toasts().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, vec!["OpenAI indisponible", "fallback", CONNECTION_ERROR]);
    }
}
