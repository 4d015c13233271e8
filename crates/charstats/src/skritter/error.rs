//! Error types for Skritter API operations and record normalization.

use thiserror::Error;

use crate::http::HttpError;

/// Errors that can occur when talking to the Skritter API.
#[derive(Debug, Error)]
pub enum SkritterError {
    /// The request never produced a response (network, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// API returned a non-success status. `message` carries the body text.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid client configuration (bad base URL, transport setup).
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// A fetched record that cannot be mapped to the local schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// The item lists no owning vocab.
    #[error("item {item_id} has no associated vocab")]
    MissingVocab { item_id: String },

    /// An epoch field is outside the representable date range.
    #[error("item {item_id} has out-of-range {field} timestamp {value}")]
    InvalidTimestamp {
        item_id: String,
        field: &'static str,
        value: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_includes_status_and_body() {
        let err = SkritterError::Api {
            status: 401,
            message: "bad token".to_string(),
        };
        assert_eq!(err.to_string(), "API error (401): bad token");
    }

    #[test]
    fn http_error_converts_via_from() {
        let err: SkritterError = HttpError::Transport {
            url: "https://skritter.test/api/v0/items".to_string(),
            message: "connection reset".to_string(),
        }
        .into();
        assert!(matches!(err, SkritterError::Http(_)));
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn convert_error_names_the_item() {
        let err = ConvertError::InvalidTimestamp {
            item_id: "it-1".to_string(),
            field: "next",
            value: i64::MAX,
        };
        let msg = err.to_string();
        assert!(msg.contains("it-1"));
        assert!(msg.contains("next"));
    }
}
