//! Client error types.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Service returned {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// FastAPI-style error body: `{"detail": "..."}` or `{"detail": [{"msg": ...}]}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Value,
}

impl ClientError {
    /// Build an API error from a non-success response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::Api {
            status,
            detail: extract_detail(body),
        }
    }

    /// Message suitable for showing to the user.
    ///
    /// Uses the service-provided detail when there is one, otherwise a
    /// generic message for the error kind.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { detail: Some(detail), .. } => detail.clone(),
            ClientError::Api { status, detail: None } => {
                format!("Request failed with status {}", status)
            }
            ClientError::Network(e) if e.is_connect() => {
                "Could not reach the try-on service".to_string()
            }
            ClientError::Network(e) if e.is_timeout() => {
                "The try-on service did not respond in time".to_string()
            }
            ClientError::Network(_) => "Network error while contacting the try-on service".to_string(),
            ClientError::InvalidResponse(_) | ClientError::Json(_) => {
                "Unexpected response from the try-on service".to_string()
            }
            ClientError::Io(e) => format!("Could not read image: {}", e),
            ClientError::InvalidUrl(e) => format!("Invalid service URL: {}", e),
        }
    }

    /// HTTP status, when the service answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .map(str::to_string)
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_detail() {
        let err = ClientError::from_response(400, r#"{"detail": "Invalid person image type"}"#);
        assert_eq!(err.user_message(), "Invalid person image type");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_validation_detail_list() {
        let body = r#"{"detail": [
            {"loc": ["body", "person_image"], "msg": "field required", "type": "value_error.missing"},
            {"loc": ["body", "pose"], "msg": "value is not a valid enumeration member", "type": "type_error.enum"}
        ]}"#;
        let err = ClientError::from_response(422, body);
        assert_eq!(
            err.user_message(),
            "field required; value is not a valid enumeration member"
        );
    }

    #[test]
    fn test_missing_detail_falls_back() {
        let err = ClientError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.user_message(), "Request failed with status 502");
        assert!(!err.is_not_found());

        let err = ClientError::from_response(404, r#"{"detail": "Try-on request not found"}"#);
        assert!(err.is_not_found());
    }
}
