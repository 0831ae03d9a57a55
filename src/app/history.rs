//! History coordinator.
use crate::api::{ApiError, Transport};
use crate::format::{word_count, words_label};
use crate::page::{HistoryView, Tab, ToastKind};

use super::{App, Outcome};

const LOGIN_REQUIRED: &str = "Veuillez vous connecter pour accéder à l'historique";

impl<T: Transport> App<T> {
    /// Fetch the signed-in user's past summaries into the history tab.
    ///
    /// Guests get the sign-in empty state without a request. The list has
    /// no overlay and never toasts; failures only reach the activity log.
    pub fn load_history(&mut self) {
        if !self.state.is_authenticated() {
            self.page.history = HistoryView::SignedOut;
            return;
        }

        self.page.history = match self.api.history() {
            Ok(list) if list.history.is_empty() => HistoryView::Empty,
            Ok(list) => HistoryView::Records(list.history),
            Err(err) => {
                self.api.log().note(&format!("history load failed: {err}"));
                if err.is_connection_error() {
                    HistoryView::LoadFailed
                } else {
                    HistoryView::Empty
                }
            }
        };
    }

    /// Reload the list on request.
    pub fn refresh_history(&mut self) {
        self.load_history();
        self.page.toast(ToastKind::Info, "Historique mis à jour");
    }

    /// Load a past record into the editor and summary panel, then switch to
    /// the summarize tab.
    pub fn open_history_item(&mut self, id: &str) -> Outcome {
        let record = match self.api.history_item(id) {
            Ok(detail) => detail.summary,
            Err(err) => {
                self.report_history_failure(&err, "Résumé non trouvé");
                return Outcome::Failed;
            }
        };

        if let Some(original) = record.original_text.filter(|t| !t.is_empty()) {
            self.page.upload.stats.words = word_count(&original) as u64;
            self.page.upload.stats.chars = original.chars().count() as u64;
            self.state.set_text(original);
        }
        self.state.set_summary(record.summary);

        let panel = &mut self.page.summary;
        panel.visible = true;
        panel.words_label = words_label(record.summary_words.unwrap_or(0));
        panel.compression_label.clear();
        panel.method_label.clear();

        self.page
            .toast(ToastKind::Success, "Résumé chargé depuis l'historique");
        self.page.active_tab = Tab::Summarize;
        Outcome::Done
    }

    pub fn delete_history_item(&mut self, id: &str) -> Outcome {
        match self.api.delete_history_item(id) {
            Ok(()) => {
                self.page.toast(ToastKind::Success, "Résumé supprimé");
                self.load_history();
                Outcome::Done
            }
            Err(err) => {
                self.report_history_failure(&err, "Erreur lors de la suppression");
                Outcome::Failed
            }
        }
    }

    pub fn clear_history(&mut self) -> Outcome {
        match self.api.clear_history() {
            Ok(()) => {
                self.page.toast(ToastKind::Success, "Historique effacé");
                self.load_history();
                Outcome::Done
            }
            Err(err) => {
                self.report_history_failure(&err, "Erreur lors de la suppression");
                Outcome::Failed
            }
        }
    }

    fn report_history_failure(&mut self, err: &ApiError, fallback: &str) {
        let message = match err {
            ApiError::Unauthorized { .. } => LOGIN_REQUIRED,
            err if err.is_connection_error() => "Erreur lors du chargement",
            err => err.server_message().unwrap_or(fallback),
        };
        self.page.toast(ToastKind::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::testing::{Scripted, app, calls};
    use super::*;
    use crate::api::Method;

    #[test]
    fn guests_see_sign_in_state_without_a_request() {
        let (mut app, _) = app(Scripted::default());
        app.load_history();
        assert_eq!(app.page().history, HistoryView::SignedOut);
        assert_eq!(calls(&app), 0);
    }

    #[test]
    fn records_are_listed() {
        let (mut app, _) = app(
            Scripted::default()
                .reply(200, json!({"logged_in": true, "user": {"username": "alice"}}))
                .reply(
                    200,
                    json!({"success": true, "history": [{"id": 7, "filename": "a.pdf", "summary": "abc"}]}),
                ),
        );
        app.check_auth();
        app.refresh_history();

        let HistoryView::Records(records) = &app.page().history else {
            panic!("expected records, got {:?}", app.page().history);
        };
        assert_eq!(records[0].id, "7");
        assert_eq!(app.drain_toasts()[0].message, "Historique mis à jour");
    }

    #[test]
    fn unreachable_backend_marks_list_failed() {
        let (mut app, _) = app(
            Scripted::default()
                .reply(200, json!({"logged_in": true, "user": {"username": "alice"}}))
                .fail(ApiError::Transport("timeout".into())),
        );
        app.check_auth();
        app.load_history();
        assert_eq!(app.page().history, HistoryView::LoadFailed);
        assert_eq!(
            app.page().history.empty_message(),
            Some("Erreur de chargement")
        );
    }

    #[test]
    fn unauthorized_detail_touches_nothing() {
        let (mut app, _) = app(
            Scripted::default().reply(401, json!({"error": "Non connecté", "success": false})),
        );
        app.set_text("mon brouillon");
        app.select_tab(Tab::Tools);

        assert_eq!(app.open_history_item("3"), Outcome::Failed);
        assert_eq!(app.state().extracted_text(), "mon brouillon");
        assert_eq!(app.state().current_summary(), "");
        assert_eq!(app.page().active_tab, Tab::Tools);
        assert!(!app.page().summary.visible);
        assert_eq!(app.drain_toasts()[0].message, LOGIN_REQUIRED);
    }

    #[test]
    fn opening_a_record_fills_editor_and_panel() {
        let (mut app, _) = app(Scripted::default().reply(
            200,
            json!({"success": true, "summary": {"original_text": "un deux trois", "summary": "un", "summary_words": 1}}),
        ));
        app.select_tab(Tab::History);

        assert!(app.open_history_item("12").is_done());
        assert_eq!(app.state().extracted_text(), "un deux trois");
        assert_eq!(app.state().current_summary(), "un");
        assert_eq!(app.page().summary.words_label, "1 mots");
        assert_eq!(app.page().upload.stats.words, 3);
        assert_eq!(app.page().active_tab, Tab::Summarize);
    }

    #[test]
    fn missing_record_uses_server_message() {
        let (mut app, _) = app(
            Scripted::default()
                .reply(404, json!({"success": false}))
                .fail(ApiError::Decode("eof".into())),
        );
        app.open_history_item("99");
        app.open_history_item("99");
        let messages: Vec<String> = app.drain_toasts().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, vec!["Résumé non trouvé", "Erreur lors du chargement"]);
    }

    #[test]
    fn delete_then_reload() {
        let (mut app, _) = app(
            Scripted::default()
                .reply(200, json!({"logged_in": true, "user": {"username": "alice"}}))
                .reply(200, json!({"success": true}))
                .reply(200, json!({"success": true, "history": []})),
        );
        app.check_auth();
        assert!(app.delete_history_item("5").is_done());
        assert_eq!(app.page().history, HistoryView::Empty);

        let sent = app.api().transport().calls.borrow();
        assert_eq!((sent[1].0, sent[1].1.as_str()), (Method::Delete, "/api/history/5"));
    }
}
