//! Analysis coordinators.
//!
//! All of them send the editor text (plus a task parameter taken from the
//! `[analysis]` config) and store the typed result in its panel. A failure
//! leaves whatever the panel showed before.
use crate::api::types::Language;
use crate::api::{ApiClient, ApiError, Transport};
use crate::page::ToastKind;

use super::{App, Outcome, TEXT_REQUIRED, Task};

impl<T: Transport> App<T> {
    pub fn keywords(&mut self) -> Outcome {
        let count = self.config.analysis.keyword_count;
        match self.analyze(Task::Keywords, |api, text| api.keywords(text, count)) {
            Ok(result) => {
                self.page.panels.keywords = Some(result.keywords);
                Outcome::Done
            }
            Err(outcome) => outcome,
        }
    }

    pub fn sentiment(&mut self) -> Outcome {
        match self.analyze(Task::Sentiment, |api, text| api.sentiment(text)) {
            Ok(result) => {
                self.page.panels.sentiment = Some(result);
                Outcome::Done
            }
            Err(outcome) => outcome,
        }
    }

    pub fn word_cloud(&mut self) -> Outcome {
        let max_words = self.config.analysis.wordcloud_max_words;
        match self.analyze(Task::WordCloud, |api, text| api.word_cloud(text, max_words)) {
            Ok(result) => {
                self.page.panels.word_cloud = Some(result.words);
                Outcome::Done
            }
            Err(outcome) => outcome,
        }
    }

    pub fn titles(&mut self) -> Outcome {
        let count = self.config.analysis.title_count;
        match self.analyze(Task::Titles, |api, text| api.titles(text, count)) {
            Ok(result) => {
                self.page.panels.titles = Some(result.titles);
                Outcome::Done
            }
            Err(outcome) => outcome,
        }
    }

    /// Copy one of the generated titles (zero-based).
    pub fn copy_title(&mut self, index: usize) -> Outcome {
        let Some(title) = self
            .page
            .panels
            .titles
            .as_ref()
            .and_then(|titles| titles.get(index))
        else {
            return Outcome::Rejected;
        };
        self.clipboard.write_text(title);
        self.page.toast(ToastKind::Success, "Titre copié");
        Outcome::Done
    }

    pub fn advanced_stats(&mut self) -> Outcome {
        match self.analyze(Task::AdvancedStats, |api, text| api.advanced_stats(text)) {
            Ok(result) => {
                self.page.panels.advanced_stats = Some(result);
                Outcome::Done
            }
            Err(outcome) => outcome,
        }
    }

    /// Ask a question about the editor text.
    pub fn ask(&mut self, question: &str) -> Outcome {
        if self.state.input_text().is_none() {
            self.page.toast(ToastKind::Error, TEXT_REQUIRED);
            return Outcome::Rejected;
        }
        let question = question.trim();
        if question.is_empty() {
            self.page.toast(ToastKind::Error, "Posez une question");
            return Outcome::Rejected;
        }
        match self.analyze(Task::Ask, |api, text| api.ask(text, question)) {
            Ok(result) => {
                self.page.panels.answer = Some(result.answer);
                Outcome::Done
            }
            Err(outcome) => outcome,
        }
    }

    /// Translate the editor text (not the summary; see
    /// [`App::translate_summary`]).
    pub fn translate_text(&mut self, language: Language) -> Outcome {
        match self.analyze(Task::Translate, |api, text| api.translate(text, language)) {
            Ok(result) => {
                self.page.panels.translation = Some(result.translation);
                Outcome::Done
            }
            Err(outcome) => outcome,
        }
    }

    pub fn sections(&mut self) -> Outcome {
        let words_per_section = self.config.analysis.words_per_section;
        match self.analyze(Task::Sections, |api, text| {
            api.sections(text, words_per_section)
        }) {
            Ok(result) => {
                self.page.panels.sections = Some(result.sections);
                Outcome::Done
            }
            Err(outcome) => outcome,
        }
    }

    /// Validate the editor text, then run `call` under the overlay.
    fn analyze<R>(
        &mut self,
        task: Task,
        call: impl FnOnce(&ApiClient<T>, &str) -> Result<R, ApiError>,
    ) -> Result<R, Outcome> {
        let Some(text) = self.require_text(TEXT_REQUIRED) else {
            return Err(Outcome::Rejected);
        };
        self.run_task(task, |api| call(api, &text))
            .ok_or(Outcome::Failed)
    }
}
