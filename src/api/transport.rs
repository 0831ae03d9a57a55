//! HTTP plumbing underneath [`ApiClient`](super::ApiClient).
//!
//! The [`Transport`] trait is the seam between coordinators and the
//! network: production code uses [`HttpTransport`] (synchronous `ureq`
//! agent with a cookie jar), tests substitute an in-memory recorder.
use std::io::Read;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::ApiError;

/// HTTP verbs used by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// Build a part, inferring the content type from the file extension.
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = content_type_for(&filename).to_string();
        Self {
            filename,
            content_type,
            bytes,
        }
    }

    /// Lower-cased extension without the dot, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

fn content_type_for(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Request payload.
#[derive(Debug, Clone, Copy)]
pub enum Body<'a> {
    Empty,
    Json(&'a serde_json::Value),
    Multipart { field: &'a str, file: &'a FilePart },
}

/// Raw HTTP answer: status plus the undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends one request and returns whatever the server answered.
///
/// Non-2xx statuses are a [`Reply`], not an error: the backend puts its
/// error message in the body. Only failures to obtain a response at all
/// are reported as [`ApiError::Transport`].
pub trait Transport {
    fn send(&self, method: Method, path: &str, body: Body<'_>) -> Result<Reply, ApiError>;
}

// ---------------------------------------------------------------------------
// ureq transport
// ---------------------------------------------------------------------------

/// Default cap on a response body, four times the default upload limit.
pub const DEFAULT_BODY_LIMIT: u64 = 4 * 16 * 1024 * 1024;

/// Synchronous transport over a shared `ureq` agent.
///
/// The agent keeps cookies for its whole lifetime, so a login performed
/// through it is visible to every later request of the same process.
pub struct HttpTransport {
    agent: ureq::Agent,
    base_url: String,
    session_cookie: Option<String>,
    body_limit: u64,
}

impl HttpTransport {
    /// `timeout` of `None` means requests may wait indefinitely.
    pub fn new(base_url: &str, timeout: Option<Duration>, session_cookie: Option<String>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        // "localhost" may resolve to ::1 first while dev servers bind IPv4 only.
        let base_url = base_url
            .trim_end_matches('/')
            .replace("://localhost", "://127.0.0.1");
        Self {
            agent: builder.build(),
            base_url,
            session_cookie: session_cookie.filter(|c| !c.is_empty()),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Largest response body accepted, in bytes.
    pub fn with_body_limit(mut self, bytes: u64) -> Self {
        self.body_limit = bytes;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Cookies the agent currently holds, as a `Cookie` header value.
    pub fn cookie_header(&self) -> Option<String> {
        let store = self.agent.cookie_store();
        let pairs: Vec<String> = store
            .iter_unexpired()
            .map(|cookie| format!("{}={}", cookie.name(), cookie.value()))
            .collect();
        (!pairs.is_empty()).then(|| pairs.join("; "))
    }
}

impl Transport for HttpTransport {
    fn send(&self, method: Method, path: &str, body: Body<'_>) -> Result<Reply, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.agent.request(method.as_str(), &url);
        if let Some(cookie) = &self.session_cookie {
            request = request.set("Cookie", cookie);
        }

        let result = match body {
            Body::Empty => request.call(),
            Body::Json(value) => request.send_json(value),
            Body::Multipart { field, file } => {
                let boundary = multipart_boundary();
                let payload = encode_multipart(&boundary, field, file);
                request
                    .set(
                        "Content-Type",
                        &format!("multipart/form-data; boundary={boundary}"),
                    )
                    .send_bytes(&payload)
            }
        };

        match result {
            Ok(response) | Err(ureq::Error::Status(_, response)) => {
                read_reply(response, self.body_limit)
            }
            Err(ureq::Error::Transport(err)) => Err(ApiError::Transport(err.to_string())),
        }
    }
}

/// Read the whole body, up to `limit` bytes.
fn read_reply(response: ureq::Response, limit: u64) -> Result<Reply, ApiError> {
    let status = response.status();
    let mut body = String::new();
    response
        .into_reader()
        .take(limit.saturating_add(1))
        .read_to_string(&mut body)
        .map_err(|e| ApiError::Transport(format!("failed to read response body: {e}")))?;
    if body.len() as u64 > limit {
        return Err(ApiError::Transport(format!(
            "response body exceeds {limit} bytes"
        )));
    }
    Ok(Reply { status, body })
}

fn multipart_boundary() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("----nectar{nanos:x}")
}

/// Encode a single-file `multipart/form-data` body.
pub fn encode_multipart(boundary: &str, field: &str, file: &FilePart) -> Vec<u8> {
    let filename = file.filename.replace('"', "%22");
    let mut out = Vec::with_capacity(file.bytes.len() + 256);
    out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    out.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    out.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
    out.extend_from_slice(&file.bytes);
    out.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(FilePart::new("a.PDF", vec![]).content_type, "application/pdf");
        assert_eq!(FilePart::new("notes.txt", vec![]).content_type, "text/plain");
        assert_eq!(
            FilePart::new("archive.zip", vec![]).content_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(FilePart::new("Report.DOCX", vec![]).extension().as_deref(), Some("docx"));
        assert_eq!(FilePart::new("README", vec![]).extension(), None);
    }

    #[test]
    fn multipart_body_wraps_file_bytes() {
        let file = FilePart::new("a \"b\".txt", b"hello".to_vec());
        let body = String::from_utf8(encode_multipart("XYZ", "file", &file)).unwrap();
        assert!(body.starts_with("--XYZ\r\n"));
        assert!(body.contains("name=\"file\"; filename=\"a %22b%22.txt\""));
        assert!(body.contains("Content-Type: text/plain\r\n\r\nhello\r\n--XYZ--\r\n"));
    }

    #[test]
    fn base_url_is_normalized() {
        let transport = HttpTransport::new("http://localhost:5000/", None, Some(String::new()));
        assert_eq!(transport.base_url(), "http://127.0.0.1:5000");
        assert!(transport.session_cookie.is_none());
        assert_eq!(transport.body_limit, DEFAULT_BODY_LIMIT);
        assert_eq!(transport.with_body_limit(10).body_limit, 10);
    }
}
