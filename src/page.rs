//! View model of the page.
//!
//! Every visible surface the coordinators write to, as plain data. The
//! renderers in [`crate::view`] turn it into HTML fragments or terminal
//! text; nothing here knows how it is drawn.
use std::fmt;
use std::str::FromStr;

use crate::api::types::{
    AdvancedStats, HistoryEntry, Language, Section, Sentiment, SummaryStyle, TextStats,
    WeightedWord,
};
use crate::prefs::Theme;

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Summarize,
    Analyze,
    Tools,
    History,
}

impl Tab {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::Analyze => "analyze",
            Self::Tools => "tools",
            Self::History => "history",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "summarize" => Ok(Self::Summarize),
            "analyze" => Ok(Self::Analyze),
            "tools" => Ok(Self::Tools),
            "history" => Ok(Self::History),
            other => Err(format!("unknown tab '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Notifications and loading overlay
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

/// Shared loading overlay. One flag for all coordinators: the first task to
/// finish hides it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    pub visible: bool,
    pub message: String,
}

impl Overlay {
    pub fn show(&mut self, message: &str) {
        self.message = message.to_string();
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

// ---------------------------------------------------------------------------
// Header: session gate surfaces
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthBar {
    pub login_button_visible: bool,
    pub user_menu_visible: bool,
    pub dropdown_open: bool,
    pub avatar: String,
    pub user_name: String,
    pub guest_banner_visible: bool,
}

impl Default for AuthBar {
    fn default() -> Self {
        Self {
            login_button_visible: true,
            user_menu_visible: false,
            dropdown_open: false,
            avatar: String::new(),
            user_name: String::new(),
            guest_banner_visible: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Summarize tab
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: String,
}

/// The four statistic tiles under the upload box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatTiles {
    pub words: u64,
    pub chars: u64,
    pub sentences: u64,
    pub reading_time: f64,
}

impl From<TextStats> for StatTiles {
    fn from(stats: TextStats) -> Self {
        Self {
            words: stats.word_count,
            chars: stats.char_count,
            sentences: stats.sentence_count,
            reading_time: stats.reading_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadArea {
    pub upload_box_visible: bool,
    pub file_info: Option<FileInfo>,
    pub stats_visible: bool,
    pub stats: StatTiles,
}

impl Default for UploadArea {
    fn default() -> Self {
        Self {
            upload_box_visible: true,
            file_info: None,
            stats_visible: false,
            stats: StatTiles::default(),
        }
    }
}

/// Slider and style selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    pub target_words: u32,
    pub style: SummaryStyle,
}

impl SummaryOptions {
    pub fn slider_label(&self) -> String {
        format!("{} mots", self.target_words)
    }
}

/// Result panel. The summary text itself lives in
/// [`AppState::current_summary`](crate::state::AppState::current_summary).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryPanel {
    pub visible: bool,
    pub words_label: String,
    pub compression_label: String,
    pub method_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslateModal {
    pub open: bool,
    pub language: Language,
    pub translation: Option<String>,
}

// ---------------------------------------------------------------------------
// Analyze and tools tabs
// ---------------------------------------------------------------------------

/// Result containers. `None` means the container is still hidden.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Panels {
    pub keywords: Option<Vec<String>>,
    pub sentiment: Option<Sentiment>,
    pub word_cloud: Option<Vec<WeightedWord>>,
    pub titles: Option<Vec<String>>,
    pub advanced_stats: Option<AdvancedStats>,
    pub answer: Option<String>,
    pub translation: Option<String>,
    pub sections: Option<Vec<Section>>,
}

// ---------------------------------------------------------------------------
// History tab
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub enum HistoryView {
    #[default]
    NotLoaded,
    SignedOut,
    Empty,
    LoadFailed,
    Records(Vec<HistoryEntry>),
}

impl HistoryView {
    /// Text of the empty-state paragraph, when there is no list to show.
    pub fn empty_message(&self) -> Option<&'static str> {
        match self {
            Self::SignedOut => Some("Connectez-vous pour voir votre historique"),
            Self::Empty => Some("Aucun historique"),
            Self::LoadFailed => Some("Erreur de chargement"),
            Self::NotLoaded | Self::Records(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub theme: Theme,
    pub active_tab: Tab,
    pub auth: AuthBar,
    pub upload: UploadArea,
    pub options: SummaryOptions,
    pub summary: SummaryPanel,
    pub modal: TranslateModal,
    pub panels: Panels,
    pub history: HistoryView,
    pub overlay: Overlay,
    toasts: Vec<Toast>,
}

impl Page {
    pub fn new(theme: Theme, options: SummaryOptions, language: Language) -> Self {
        Self {
            theme,
            active_tab: Tab::default(),
            auth: AuthBar::default(),
            upload: UploadArea::default(),
            options,
            summary: SummaryPanel::default(),
            modal: TranslateModal {
                language,
                ..TranslateModal::default()
            },
            panels: Panels::default(),
            history: HistoryView::default(),
            overlay: Overlay::default(),
            toasts: Vec::new(),
        }
    }

    pub fn toast(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.toasts.push(Toast {
            kind,
            message: message.into(),
        });
    }

    /// Toasts raised since the last drain.
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn drain_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_names_round_trip() {
        for tab in [Tab::Summarize, Tab::Analyze, Tab::Tools, Tab::History] {
            assert_eq!(tab.as_str().parse::<Tab>(), Ok(tab));
        }
        assert!("settings".parse::<Tab>().is_err());
    }

    #[test]
    fn overlay_show_hide() {
        let mut overlay = Overlay::default();
        overlay.show("Traitement...");
        assert!(overlay.visible);
        overlay.hide();
        assert!(!overlay.visible);
        assert_eq!(overlay.message, "Traitement...");
    }

    #[test]
    fn toasts_drain_once() {
        let options = SummaryOptions {
            target_words: 150,
            style: SummaryStyle::Paragraph,
        };
        let mut page = Page::new(Theme::Dark, options, Language::En);
        page.toast(ToastKind::Info, "Historique mis à jour");
        assert_eq!(page.drain_toasts().len(), 1);
        assert!(page.toasts().is_empty());
        assert_eq!(page.options.slider_label(), "150 mots");
    }

    #[test]
    fn history_empty_messages() {
        assert_eq!(
            HistoryView::SignedOut.empty_message(),
            Some("Connectez-vous pour voir votre historique")
        );
        assert_eq!(HistoryView::Records(vec![]).empty_message(), None);
    }
}
