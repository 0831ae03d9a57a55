use std::time::Instant;

use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;

use super::transport::{Body, FilePart, Method, Reply, Transport};
use super::types::*;
use super::ApiError;
use crate::activity::ActivityLog;

/// Typed client for the summarization backend.
///
/// One method per endpoint. Each call is logged to the activity log with
/// its route template, HTTP status, outcome and latency.
pub struct ApiClient<T: Transport> {
    transport: T,
    log: ActivityLog,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, log: ActivityLog) -> Self {
        Self { transport, log }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    // -- session ------------------------------------------------------------

    pub fn session(&self) -> Result<SessionInfo, ApiError> {
        self.call(Method::Get, "/auth/me", "/auth/me", Body::Empty)
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.call::<IgnoredAny>(Method::Post, "/auth/logout", "/auth/logout", Body::Empty)
            .map(|_| ())
    }

    pub fn login(&self, email: &str, password: &str) -> Result<AuthResult, ApiError> {
        self.post_json("/auth/login", &LoginRequest { email, password })
    }

    pub fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResult, ApiError> {
        self.post_json(
            "/auth/register",
            &RegisterRequest {
                username,
                email,
                password,
            },
        )
    }

    // -- documents ------------------------------------------------------------

    pub fn upload(&self, file: &FilePart) -> Result<UploadResult, ApiError> {
        self.call(
            Method::Post,
            "/upload",
            "/upload",
            Body::Multipart {
                field: "file",
                file,
            },
        )
    }

    pub fn summarize(
        &self,
        text: &str,
        target_words: u32,
        style: SummaryStyle,
    ) -> Result<SummaryResult, ApiError> {
        self.post_json(
            "/summarize",
            &SummarizeRequest {
                text,
                target_words,
                style,
            },
        )
    }

    pub fn translate(&self, text: &str, target_language: Language) -> Result<Translation, ApiError> {
        self.post_json(
            "/translate",
            &TranslateRequest {
                text,
                target_language,
            },
        )
    }

    // -- analysis -------------------------------------------------------------

    pub fn keywords(&self, text: &str, count: u32) -> Result<Keywords, ApiError> {
        self.post_json("/keywords", &CountRequest { text, count })
    }

    pub fn sentiment(&self, text: &str) -> Result<Sentiment, ApiError> {
        self.post_json("/sentiment", &TextRequest { text })
    }

    pub fn word_cloud(&self, text: &str, max_words: u32) -> Result<WordCloud, ApiError> {
        self.post_json("/wordcloud", &WordCloudRequest { text, max_words })
    }

    pub fn titles(&self, text: &str, count: u32) -> Result<Titles, ApiError> {
        self.post_json("/generate-title", &CountRequest { text, count })
    }

    pub fn advanced_stats(&self, text: &str) -> Result<AdvancedStats, ApiError> {
        self.post_json("/advanced-stats", &TextRequest { text })
    }

    pub fn ask(&self, text: &str, question: &str) -> Result<Answer, ApiError> {
        self.post_json("/ask", &AskRequest { text, question })
    }

    pub fn sections(&self, text: &str, words_per_section: u32) -> Result<Sections, ApiError> {
        self.post_json(
            "/summarize-sections",
            &SectionsRequest {
                text,
                words_per_section,
            },
        )
    }

    // -- history --------------------------------------------------------------

    pub fn history(&self) -> Result<HistoryList, ApiError> {
        self.call(Method::Get, "/api/history", "/api/history", Body::Empty)
    }

    pub fn history_item(&self, id: &str) -> Result<HistoryDetail, ApiError> {
        let path = history_path(id);
        self.call(Method::Get, &path, "/api/history/{id}", Body::Empty)
    }

    pub fn delete_history_item(&self, id: &str) -> Result<(), ApiError> {
        let path = history_path(id);
        self.call::<IgnoredAny>(Method::Delete, &path, "/api/history/{id}", Body::Empty)
            .map(|_| ())
    }

    pub fn clear_history(&self) -> Result<(), ApiError> {
        self.call::<IgnoredAny>(
            Method::Post,
            "/api/history/clear",
            "/api/history/clear",
            Body::Empty,
        )
        .map(|_| ())
    }

    // -- plumbing -------------------------------------------------------------

    fn post_json<R: DeserializeOwned>(
        &self,
        path: &str,
        payload: &impl Serialize,
    ) -> Result<R, ApiError> {
        let value = serde_json::to_value(payload)
            .map_err(|e| ApiError::Decode(format!("failed to encode request: {e}")))?;
        self.call(Method::Post, path, path, Body::Json(&value))
    }

    fn call<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        route: &str,
        body: Body<'_>,
    ) -> Result<R, ApiError> {
        let started = Instant::now();
        let sent = self.transport.send(method, path, body);
        let status = sent.as_ref().ok().map(|reply| reply.status);
        let result = sent.and_then(|reply| decode(&reply));
        let latency_ms = started.elapsed().as_millis() as u64;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.outcome(),
        };
        self.log
            .record_call(method.as_str(), route, status, outcome, latency_ms);

        result
    }
}

/// Turn a raw reply into a typed payload or an [`ApiError`].
///
/// A 401 is always `Unauthorized`. Any other non-2xx status, or a body with
/// `"success": false`, is a server-reported failure carrying the body's
/// `error` string. An empty body decodes as JSON `null`.
pub fn decode<R: DeserializeOwned>(reply: &Reply) -> Result<R, ApiError> {
    let value: Value = if reply.body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&reply.body).map_err(|e| ApiError::Decode(e.to_string()))?
    };

    let message = value
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string);

    if reply.status == 401 {
        return Err(ApiError::Unauthorized { message });
    }

    let reported_failure = value.get("success").and_then(Value::as_bool) == Some(false);
    if !(200..300).contains(&reply.status) || reported_failure {
        return Err(ApiError::Server {
            status: reply.status,
            message,
        });
    }

    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// `/api/history/{id}` with the id percent-encoded as one path segment.
fn history_path(id: &str) -> String {
    format!("/api/history/{}", urlencoding::encode(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_success_payload() {
        let reply = Reply::new(200, r#"{"success": true, "keywords": ["rust", "api"]}"#);
        let keywords: Keywords = decode(&reply).unwrap();
        assert_eq!(keywords.keywords, vec!["rust", "api"]);
    }

    #[test]
    fn decode_reported_failure_keeps_message() {
        let reply = Reply::new(200, r#"{"success": false, "error": "Quota dépassé"}"#);
        let err = decode::<Keywords>(&reply).unwrap_err();
        assert_eq!(
            err,
            ApiError::Server {
                status: 200,
                message: Some("Quota dépassé".to_string())
            }
        );
    }

    #[test]
    fn decode_non_2xx_without_success_flag() {
        let reply = Reply::new(400, r#"{"error": "Type de fichier non autorisé"}"#);
        let err = decode::<UploadResult>(&reply).unwrap_err();
        assert_eq!(err.server_message(), Some("Type de fichier non autorisé"));
    }

    #[test]
    fn decode_401_is_unauthorized() {
        let reply = Reply::new(401, r#"{"error": "Non connecté", "success": false}"#);
        let err = decode::<HistoryDetail>(&reply).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { .. }));
    }

    #[test]
    fn decode_html_error_page_is_decode_error() {
        let reply = Reply::new(502, "<html>Bad Gateway</html>");
        let err = decode::<Keywords>(&reply).unwrap_err();
        assert!(err.is_connection_error());
    }

    #[test]
    fn decode_empty_body_as_ignored() {
        let reply = Reply::new(200, "");
        assert!(decode::<IgnoredAny>(&reply).is_ok());
    }

    #[test]
    fn history_path_escapes_reserved_bytes() {
        assert_eq!(history_path("42"), "/api/history/42");
        assert_eq!(history_path("a/b c"), "/api/history/a%2Fb%20c");
    }
}
