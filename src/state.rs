//! Session-scoped application state.
//!
//! The three values every coordinator shares. The editor shows
//! [`AppState::extracted_text`] and the summary panel shows
//! [`AppState::current_summary`]; all writes go through the methods below.
use crate::api::types::User;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    extracted_text: String,
    current_summary: String,
    current_user: Option<User>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extracted_text(&self) -> &str {
        &self.extracted_text
    }

    pub fn current_summary(&self) -> &str {
        &self.current_summary
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    /// Editor text with surrounding whitespace removed, if any is left.
    pub fn input_text(&self) -> Option<&str> {
        Some(self.extracted_text.trim()).filter(|t| !t.is_empty())
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.extracted_text = text.into();
    }

    pub fn clear_text(&mut self) {
        self.extracted_text.clear();
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.current_summary = summary.into();
    }

    pub fn sign_in(&mut self, user: User) {
        self.current_user = Some(user);
    }

    pub fn sign_out(&mut self) {
        self.current_user = None;
    }
}
