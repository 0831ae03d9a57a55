use thiserror::Error;

/// Failure of a single backend call.
///
/// Input validation never reaches the client; coordinators reject empty
/// input before a request is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The backend answered with `success: false` or a non-2xx JSON body.
    #[error("server error ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },

    /// The backend answered 401.
    #[error("unauthorized: {}", message.as_deref().unwrap_or("no message"))]
    Unauthorized { message: Option<String> },

    /// The request never produced a response (DNS, refused, reset, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not the JSON we expected.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message supplied by the backend payload, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } | Self::Unauthorized { message } => message.as_deref(),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    /// Whether the failure happened below the application protocol.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Decode(_))
    }

    /// Short label used in the activity log.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Server { .. } => "server_error",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Transport(_) => "transport_error",
            Self::Decode(_) => "decode_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_only_for_protocol_errors() {
        let err = ApiError::Server {
            status: 400,
            message: Some("Texte manquant".to_string()),
        };
        assert_eq!(err.server_message(), Some("Texte manquant"));
        assert!(!err.is_connection_error());

        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.server_message(), None);
        assert!(err.is_connection_error());
    }

    #[test]
    fn display_includes_status() {
        let err = ApiError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "server error (500): no message");
    }
}
