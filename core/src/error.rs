//! Error types for the todo API client.
//!
//! # Design
//! Every non-2xx response collapses into `RequestFailed` carrying a single
//! human-readable message, so the state controller can surface it verbatim.
//! The message comes from a `{"detail": "..."}` body when present, else the
//! serialized JSON body, else the status line text.

use crate::http::HttpResponse;

/// Errors returned by `TodoClient` parse methods and `Transport`s.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// No HTTP response was obtained (connection refused, DNS, I/O).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Build a `RequestFailed` from an unsuccessful response.
    pub fn from_response(response: &HttpResponse) -> Self {
        ApiError::RequestFailed {
            status: response.status,
            message: error_message(response),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

fn error_message(response: &HttpResponse) -> String {
    match serde_json::from_str::<serde_json::Value>(&response.body) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail") {
            Some(serde_json::Value::String(detail)) => detail.clone(),
            _ => serde_json::Value::Object(map).to_string(),
        },
        Ok(other) => other.to_string(),
        Err(_) => response.status_text(),
    }
}
