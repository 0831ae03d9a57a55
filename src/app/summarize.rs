//! Summarization coordinator and the actions on its result panel.
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::Transport;
use crate::api::types::Language;
use crate::format::{compression_label, compression_percent, method_label, word_count, words_label};
use crate::page::ToastKind;

use super::{App, Outcome, Task};

/// File name used by the download action.
pub const DOWNLOAD_FILE_NAME: &str = "resume.txt";

const NO_SUMMARY: &str = "Aucun résumé à traduire";

impl<T: Transport> App<T> {
    /// Summarize the editor text with the slider length and selected style.
    pub fn summarize(&mut self) -> Outcome {
        let Some(text) = self.require_text("Veuillez entrer ou uploader du texte") else {
            return Outcome::Rejected;
        };
        let options = self.page.options;

        let Some(result) = self.run_task(Task::Summarize, |api| {
            api.summarize(&text, options.target_words, options.style)
        }) else {
            return Outcome::Failed;
        };

        let summary_words = result.summary_stats.word_count;
        let percent = compression_percent(word_count(&text), summary_words);
        self.state.set_summary(result.summary);

        let panel = &mut self.page.summary;
        panel.visible = true;
        panel.words_label = words_label(summary_words);
        panel.compression_label = compression_label(percent);
        panel.method_label = method_label(&result.method).to_string();
        self.page.modal.translation = None;
        self.page
            .toast(ToastKind::Success, "Résumé généré avec succès");

        if self.state.is_authenticated() {
            self.load_history();
        }
        Outcome::Done
    }

    pub fn copy_summary(&mut self) -> Outcome {
        if self.state.current_summary().is_empty() {
            self.page.toast(ToastKind::Error, "Aucun résumé à copier");
            return Outcome::Rejected;
        }
        self.clipboard.write_text(self.state.current_summary());
        self.page
            .toast(ToastKind::Success, "Copié dans le presse-papiers");
        Outcome::Done
    }

    /// Write the current summary to `dir/resume.txt`.
    pub fn download_summary(&mut self, dir: &Path) -> Option<PathBuf> {
        if self.state.current_summary().is_empty() {
            self.page
                .toast(ToastKind::Error, "Aucun résumé à télécharger");
            return None;
        }
        let path = dir.join(DOWNLOAD_FILE_NAME);
        match fs::write(&path, self.state.current_summary()) {
            Ok(()) => {
                self.page.toast(ToastKind::Success, "Résumé téléchargé");
                Some(path)
            }
            Err(err) => {
                self.api
                    .log()
                    .note(&format!("download to {} failed: {err}", path.display()));
                self.page
                    .toast(ToastKind::Error, "Erreur lors du téléchargement");
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Translate modal
    // -----------------------------------------------------------------------

    pub fn open_translate_modal(&mut self) -> Outcome {
        if self.state.current_summary().is_empty() {
            self.page.toast(ToastKind::Error, NO_SUMMARY);
            return Outcome::Rejected;
        }
        self.page.modal.open = true;
        self.page.modal.translation = None;
        Outcome::Done
    }

    pub fn close_translate_modal(&mut self) {
        self.page.modal.open = false;
    }

    pub fn set_translate_language(&mut self, language: Language) {
        self.page.modal.language = language;
    }

    /// Translate the current summary into the modal's language.
    pub fn translate_summary(&mut self) -> Outcome {
        if self.state.current_summary().is_empty() {
            self.page.toast(ToastKind::Error, NO_SUMMARY);
            return Outcome::Rejected;
        }
        let summary = self.state.current_summary().to_string();
        let language = self.page.modal.language;

        match self.run_task(Task::Translate, |api| api.translate(&summary, language)) {
            Some(result) => {
                self.page.modal.translation = Some(result.translation);
                Outcome::Done
            }
            None => Outcome::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::testing::{Scripted, app, calls};
    use super::*;
    use crate::api::types::SummaryStyle;

    fn hundred_words() -> String {
        vec!["mot"; 100].join(" ")
    }

    #[test]
    fn empty_text_sends_nothing() {
        let (mut app, _) = app(Scripted::default());
        app.set_text("   \n");
        assert_eq!(app.summarize(), Outcome::Rejected);
        assert_eq!(calls(&app), 0);
        assert_eq!(
            app.drain_toasts()[0].message,
            "Veuillez entrer ou uploader du texte"
        );
    }

    #[test]
    fn compression_is_computed_from_word_counts() {
        let (mut app, _) = app(Scripted::default().reply(
            200,
            json!({"success": true, "summary": "court", "summary_stats": {"word_count": 30}, "method": "openai"}),
        ));
        app.set_text(hundred_words());
        app.set_style(SummaryStyle::Bullets);
        app.set_target_words(120);

        assert!(app.summarize().is_done());
        let panel = &app.page().summary;
        assert!(panel.visible);
        assert_eq!(panel.compression_label, "70% réduit");
        assert_eq!(panel.words_label, "30 mots");
        assert_eq!(panel.method_label, "OpenAI");
        assert_eq!(app.state().current_summary(), "court");

        let sent = app.api().transport().calls.borrow();
        let body = sent[0].2.as_ref().unwrap();
        assert_eq!(body["target_words"], 120);
        assert_eq!(body["style"], "bullets");
    }

    #[test]
    fn history_refresh_only_when_signed_in() {
        let (mut app, _) = app(
            Scripted::default()
                .reply(200, json!({"summary": "a", "summary_stats": {"word_count": 1}, "method": "extractive"}))
                .reply(200, json!({"logged_in": true, "user": {"username": "alice"}}))
                .reply(200, json!({"summary": "b", "summary_stats": {"word_count": 1}, "method": "extractive"}))
                .reply(200, json!({"success": true, "history": []})),
        );
        app.set_text(hundred_words());
        app.summarize();
        assert_eq!(calls(&app), 1);

        app.check_auth();
        app.summarize();
        assert_eq!(calls(&app), 4);
        assert_eq!(app.page().summary.method_label, "Extractif");
    }

    #[test]
    fn failed_summary_keeps_previous_panel() {
        let (mut app, _) = app(
            Scripted::default().reply(200, json!({"success": false, "error": "Quota dépassé"})),
        );
        app.set_text("du texte");
        app.state.set_summary("précédent");

        assert_eq!(app.summarize(), Outcome::Failed);
        assert_eq!(app.state().current_summary(), "précédent");
        assert_eq!(app.drain_toasts()[0].message, "Quota dépassé");
    }

    #[test]
    fn copy_goes_to_clipboard() {
        let (mut app, clipboard) = app(Scripted::default());
        assert_eq!(app.copy_summary(), Outcome::Rejected);

        app.state.set_summary("Résumé final");
        assert!(app.copy_summary().is_done());
        assert_eq!(clipboard.contents().as_deref(), Some("Résumé final"));
    }

    #[test]
    fn download_writes_resume_txt() {
        let dir = std::env::temp_dir().join(format!("nectar-dl-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let (mut app, _) = app(Scripted::default());
        app.state.set_summary("contenu");

        let path = app.download_summary(&dir).unwrap();
        assert!(path.ends_with("resume.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "contenu");
    }

    #[test]
    fn translate_modal_uses_selected_language() {
        let (mut app, _) = app(
            Scripted::default().reply(200, json!({"success": true, "translation": "Hola"})),
        );
        assert_eq!(app.open_translate_modal(), Outcome::Rejected);

        app.state.set_summary("Bonjour");
        assert!(app.open_translate_modal().is_done());
        app.set_translate_language(Language::Es);
        assert!(app.translate_summary().is_done());
        assert_eq!(app.page().modal.translation.as_deref(), Some("Hola"));

        let sent = app.api().transport().calls.borrow();
        assert_eq!(sent[0].2.as_ref().unwrap()["target_language"], "es");
        drop(sent);

        app.close_translate_modal();
        assert!(!app.page().modal.open);
    }
}
