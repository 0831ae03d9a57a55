//! Client-persisted preferences.
//!
//! Two scopes, mirroring what a browser offers:
//!
//! - **Device** ([`Prefs`]): survives restarts. Holds the theme in
//!   `~/.nectar/prefs.json`. All file I/O is best-effort.
//! - **Tab session** ([`SessionStore`]): lives as long as the process (one
//!   shell, one one-shot command). Holds the guest-banner dismissal.
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Session key remembering that the guest banner was closed.
pub const BANNER_DISMISSED_KEY: &str = "guestBannerClosed";

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// The toggle shows a sun while dark (click for light) and a moon while
    /// light.
    pub fn icons(self) -> ThemeIcons {
        let dark = self == Self::Dark;
        ThemeIcons {
            sun_visible: dark,
            moon_visible: !dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeIcons {
    pub sun_visible: bool,
    pub moon_visible: bool,
}

// ---------------------------------------------------------------------------
// Device preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<Theme>,
}

/// Device-scoped preferences backed by a JSON file.
#[derive(Debug, Clone)]
pub struct Prefs {
    path: Option<PathBuf>,
    data: PrefsFile,
}

impl Prefs {
    /// Load from `~/.nectar/prefs.json`.
    pub fn load() -> Self {
        Self::at(dirs::home_dir().map(|home| home.join(".nectar").join("prefs.json")))
    }

    /// Load from an explicit file; `None` keeps everything in memory.
    pub fn at(path: Option<PathBuf>) -> Self {
        let data = path.as_deref().and_then(read_prefs).unwrap_or_default();
        Self { path, data }
    }

    pub fn in_memory() -> Self {
        Self::at(None)
    }

    /// The persisted theme, if one was ever chosen.
    pub fn stored_theme(&self) -> Option<Theme> {
        self.data.theme
    }

    /// The persisted theme or the dark default.
    pub fn theme(&self) -> Theme {
        self.data.theme.unwrap_or_default()
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.data.theme = Some(theme);
        let _ = self.save();
    }

    fn save(&self) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&self.data)?)?;
        Ok(())
    }
}

fn read_prefs(path: &Path) -> Option<PrefsFile> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

// ---------------------------------------------------------------------------
// Tab session storage
// ---------------------------------------------------------------------------

/// Key-value storage that dies with the session.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    entries: HashMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_prefs(name: &str) -> PathBuf {
        let path = std::env::temp_dir()
            .join(format!("nectar-prefs-{}-{name}", std::process::id()))
            .join("prefs.json");
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn theme_defaults_to_dark() {
        let prefs = Prefs::in_memory();
        assert_eq!(prefs.theme(), Theme::Dark);
        assert_eq!(prefs.stored_theme(), None);
    }

    #[test]
    fn theme_persists_across_loads() {
        let path = temp_prefs("persist");
        let mut prefs = Prefs::at(Some(path.clone()));
        prefs.set_theme(Theme::Light);

        let reloaded = Prefs::at(Some(path));
        assert_eq!(reloaded.stored_theme(), Some(Theme::Light));
    }

    #[test]
    fn corrupt_prefs_file_falls_back() {
        let path = temp_prefs("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();
        assert_eq!(Prefs::at(Some(path)).theme(), Theme::Dark);
    }

    #[test]
    fn icons_follow_theme() {
        assert_eq!(
            Theme::Dark.icons(),
            ThemeIcons {
                sun_visible: true,
                moon_visible: false
            }
        );
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[test]
    fn session_store_is_per_instance() {
        let mut tab = SessionStore::new();
        tab.set(BANNER_DISMISSED_KEY, "true");
        assert_eq!(tab.get(BANNER_DISMISSED_KEY), Some("true"));
        assert_eq!(SessionStore::new().get(BANNER_DISMISSED_KEY), None);
    }
}
