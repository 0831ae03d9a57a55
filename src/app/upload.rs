//! Upload coordinator.
use crate::api::{FilePart, Transport};
use crate::format::format_file_size;
use crate::page::{FileInfo, ToastKind, UploadArea};

use super::{App, Outcome, Task};

impl<T: Transport> App<T> {
    /// Send a document for text extraction and load the result into the
    /// editor.
    ///
    /// Files the backend would refuse (extension, size) are rejected
    /// locally. A second upload simply replaces the first one's text.
    pub fn upload(&mut self, file: FilePart) -> Outcome {
        let allowed = file
            .extension()
            .is_some_and(|ext| self.config.upload.allows_extension(&ext));
        if !allowed {
            self.page
                .toast(ToastKind::Error, "Type de fichier non autorisé");
            return Outcome::Rejected;
        }
        if file.size() > self.config.upload.max_bytes {
            let limit = format_file_size(self.config.upload.max_bytes);
            self.page.toast(
                ToastKind::Error,
                format!("Fichier trop volumineux (max {limit})"),
            );
            return Outcome::Rejected;
        }

        let Some(result) = self.run_task(Task::Upload, |api| api.upload(&file)) else {
            return Outcome::Failed;
        };

        self.state.set_text(result.text);
        let upload = &mut self.page.upload;
        upload.upload_box_visible = false;
        let size = format_file_size(file.size());
        upload.file_info = Some(FileInfo {
            name: file.filename,
            size,
        });
        upload.stats = result.stats.into();
        upload.stats_visible = true;
        self.page
            .toast(ToastKind::Success, "Document extrait avec succès");
        Outcome::Done
    }

    /// Back to an empty upload box. The editor is emptied and the summary
    /// panel hidden.
    pub fn reset_file(&mut self) {
        self.state.clear_text();
        self.page.upload = UploadArea::default();
        self.page.summary.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::testing::{Scripted, app, calls};
    use super::*;
    use crate::api::ApiError;

    #[test]
    fn upload_fills_editor_and_tiles() {
        let (mut app, _) = app(Scripted::default().reply(
            200,
            json!({
                "success": true,
                "text": "Le texte extrait.",
                "stats": {"word_count": 3, "char_count": 17, "sentence_count": 1, "reading_time_minutes": 0.1}
            }),
        ));
        let outcome = app.upload(FilePart::new("rapport.txt", vec![b'x'; 2048]));

        assert!(outcome.is_done());
        assert_eq!(app.state().extracted_text(), "Le texte extrait.");
        let upload = &app.page().upload;
        assert!(!upload.upload_box_visible);
        assert!(upload.stats_visible);
        assert_eq!(upload.stats.words, 3);
        assert_eq!(upload.stats.reading_time, 0.1);
        let info = upload.file_info.as_ref().unwrap();
        assert_eq!((info.name.as_str(), info.size.as_str()), ("rapport.txt", "2.0 KB"));
        assert!(!app.page().overlay.visible);
    }

    #[test]
    fn disallowed_extension_never_leaves_the_client() {
        let (mut app, _) = app(Scripted::default());
        assert_eq!(app.upload(FilePart::new("photo.png", vec![1, 2, 3])), Outcome::Rejected);
        assert_eq!(app.upload(FilePart::new("README", vec![1])), Outcome::Rejected);
        assert_eq!(calls(&app), 0);
    }

    #[test]
    fn oversized_file_is_rejected() {
        let (mut app, _) = app(Scripted::default());
        let big = vec![0u8; 16 * 1024 * 1024 + 1];
        assert_eq!(app.upload(FilePart::new("big.pdf", big)), Outcome::Rejected);
        let toast = app.drain_toasts().pop().unwrap();
        assert_eq!(toast.message, "Fichier trop volumineux (max 16.0 MB)");
    }

    #[test]
    fn server_error_keeps_previous_text() {
        let (mut app, _) = app(
            Scripted::default()
                .reply(400, json!({"error": "Aucun fichier sélectionné"}))
                .reply(500, json!({})),
        );
        app.set_text("ancien");

        assert_eq!(app.upload(FilePart::new("a.docx", vec![1])), Outcome::Failed);
        assert_eq!(app.upload(FilePart::new("a.docx", vec![1])), Outcome::Failed);
        assert_eq!(app.state().extracted_text(), "ancien");

        let messages: Vec<String> = app.drain_toasts().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, vec!["Aucun fichier sélectionné", "Erreur lors de l'extraction"]);
    }

    #[test]
    fn transport_error_is_a_connection_toast() {
        let (mut app, _) = app(Scripted::default().fail(ApiError::Transport("refused".into())));
        app.upload(FilePart::new("a.pdf", vec![1]));
        assert_eq!(app.drain_toasts()[0].message, "Erreur de connexion");
        assert!(!app.page().overlay.visible);
    }

    #[test]
    fn reset_restores_upload_box_and_empties_editor() {
        let (mut app, _) = app(Scripted::default());
        app.set_text("ancien texte");
        app.page.upload.upload_box_visible = false;
        app.page.summary.visible = true;
        app.reset_file();
        assert!(app.page().upload.upload_box_visible);
        assert!(!app.page().summary.visible);
        assert_eq!(app.state().extracted_text(), "");
        assert_eq!(app.summarize(), Outcome::Rejected);
        assert_eq!(calls(&app), 0);
    }
}
