//! Error types for the taskmaster client.
//!
//! # Design
//! Every failure a service can report collapses into `ApiError`, and every
//! variant carries a human-readable message (`ApiError::message`) that views
//! show verbatim. `NotFound` keeps a dedicated variant because callers treat a
//! missing resource on delete as "already gone". A non-2xx response with a
//! structured JSON body is a `Validation` error; without one it is a `Server`
//! error carrying the per-operation fallback text.

use serde_json::Value;

/// Errors returned by `ApiClient` parse methods and the services built on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// The server returned 404.
    #[error("{0}")]
    NotFound(String),

    /// Non-2xx response whose body explained what was wrong.
    #[error("{message}")]
    Validation { status: u16, message: String },

    /// Non-2xx response without a usable body.
    #[error("{message} (HTTP {status})")]
    Server { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// The text shown to the user, without status decoration.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Network(msg)
            | ApiError::NotFound(msg)
            | ApiError::Deserialization(msg)
            | ApiError::Serialization(msg) => msg,
            ApiError::Validation { message, .. } | ApiError::Server { message, .. } => message,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// Classify a non-2xx response. `fallback` is used when the body carries
    /// no message of its own.
    pub(crate) fn from_status(status: u16, body: &str, fallback: &str) -> Self {
        let extracted = extract_message(body);
        if status == 404 {
            return ApiError::NotFound(extracted.unwrap_or_else(|| fallback.to_string()));
        }
        match extracted {
            Some(message) => ApiError::Validation { status, message },
            None => ApiError::Server {
                status,
                message: fallback.to_string(),
            },
        }
    }
}

/// Pull a message out of an error body.
///
/// `error`, `detail` and `message` are tried in that order. Failing those, a
/// Django REST Framework field-error object (`{"name": ["may not be blank"]}`)
/// is flattened to `name: may not be blank`.
pub(crate) fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    for key in ["error", "detail", "message"] {
        if let Some(text) = object.get(key).and_then(text_of) {
            return Some(text);
        }
    }

    let fields: Vec<String> = object
        .iter()
        .filter_map(|(field, errors)| text_of(errors).map(|text| format!("{field}: {text}")))
        .collect();
    if fields.is_empty() {
        None
    } else {
        Some(fields.join("; "))
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(text_of).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(" "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_field_wins_over_detail() {
        let body = r#"{"detail":"second","error":"first"}"#;
        assert_eq!(extract_message(body).as_deref(), Some("first"));
    }

    #[test]
    fn detail_used_when_error_missing() {
        let body = r#"{"detail":"Not found."}"#;
        assert_eq!(extract_message(body).as_deref(), Some("Not found."));
    }

    #[test]
    fn message_field_is_last_resort_key() {
        let body = r#"{"message":"bad input"}"#;
        assert_eq!(extract_message(body).as_deref(), Some("bad input"));
    }

    #[test]
    fn field_errors_are_flattened() {
        let body = r#"{"name":["This field may not be blank."]}"#;
        assert_eq!(
            extract_message(body).as_deref(),
            Some("name: This field may not be blank.")
        );
    }

    #[test]
    fn non_json_body_has_no_message() {
        assert!(extract_message("<html>boom</html>").is_none());
        assert!(extract_message("").is_none());
    }

    #[test]
    fn status_404_is_not_found_with_fallback() {
        let err = ApiError::from_status(404, "", "task not found");
        assert_eq!(err, ApiError::NotFound("task not found".to_string()));
        assert!(err.is_not_found());
    }

    #[test]
    fn structured_400_is_validation() {
        let err = ApiError::from_status(400, r#"{"error":"Nom déjà utilisé"}"#, "failed");
        assert!(matches!(err, ApiError::Validation { status: 400, .. }));
        assert_eq!(err.message(), "Nom déjà utilisé");
    }

    #[test]
    fn unstructured_500_is_server_with_fallback() {
        let err = ApiError::from_status(500, "internal error", "failed to load tasks");
        assert_eq!(err.message(), "failed to load tasks");
        assert_eq!(err.to_string(), "failed to load tasks (HTTP 500)");
    }
}
