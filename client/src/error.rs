//! Client error types and result alias.

use std::collections::HashMap;

use reqwest::StatusCode;
use thiserror::Error;

/// Client result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client error types.
///
/// Precondition violations (a bug in the calling code) are not represented
/// here; they panic with a `BUG:` message instead.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Local input was malformed. Raised before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The account has hit a billing gate.
    #[error("payment required")]
    PaymentRequired,

    /// An upload collided with an existing package of the same filename.
    #[error("package already exists")]
    AlreadyExists,

    #[error("api responded with error ({status}): {body}")]
    Api { status: StatusCode, body: String },

    #[error("failed to unmarshal {context}: {source}")]
    Unmarshal {
        context: &'static str,
        #[source]
        source: serde_json::Error,
        body: Vec<u8>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request cancelled")]
    Cancelled,

    /// A recoverable error annotated with the workflow step that failed.
    #[error("{operation} failed: {source}")]
    Operation {
        operation: &'static str,
        #[source]
        source: Box<ClientError>,
    },
}

impl ClientError {
    /// The innermost error, looking through operation annotations.
    pub fn root(&self) -> &ClientError {
        match self {
            Self::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_payment_required(&self) -> bool {
        matches!(self.root(), Self::PaymentRequired)
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self.root(), Self::AlreadyExists)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.root(), Self::Validation(_))
    }

    pub(crate) fn unmarshal(context: &'static str, source: serde_json::Error, body: &[u8]) -> Self {
        Self::Unmarshal {
            context,
            source,
            body: body.to_vec(),
        }
    }
}

/// Annotates a result with the workflow step it belongs to.
pub(crate) trait ResultExt<T> {
    fn during(self, operation: &'static str) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn during(self, operation: &'static str) -> Result<T> {
        self.map_err(|e| match e {
            // Already annotated by an inner workflow.
            e @ ClientError::Operation { .. } => e,
            e => ClientError::Operation {
                operation,
                source: Box::new(e),
            },
        })
    }
}

/// A known error phrase the API returns for a given status.
///
/// The service replies with `{"<key>": ["<message>"]}`; a response is only
/// classified when the object has exactly that one key holding exactly one
/// message that contains `phrase`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ErrorPhrase {
    pub status: StatusCode,
    pub key: &'static str,
    pub phrase: &'static str,
    pub kind: KnownError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KnownError {
    PaymentRequired,
    AlreadyExists,
}

impl KnownError {
    fn into_error(self) -> ClientError {
        match self {
            Self::PaymentRequired => ClientError::PaymentRequired,
            Self::AlreadyExists => ClientError::AlreadyExists,
        }
    }
}

/// Billing gate, reported by every endpoint.
pub(crate) const PAYMENT_REQUIRED: ErrorPhrase = ErrorPhrase {
    status: StatusCode::PAYMENT_REQUIRED,
    key: "error",
    phrase: "payment required",
    kind: KnownError::PaymentRequired,
};

/// Duplicate filename on upload.
pub(crate) const FILENAME_TAKEN: ErrorPhrase = ErrorPhrase {
    status: StatusCode::UNPROCESSABLE_ENTITY,
    key: "filename",
    phrase: "has already been taken",
    kind: KnownError::AlreadyExists,
};

impl ErrorPhrase {
    fn matches(&self, status: StatusCode, body: &[u8]) -> bool {
        if status != self.status {
            return false;
        }
        let Ok(errors) = serde_json::from_slice::<HashMap<String, Vec<String>>>(body) else {
            return false;
        };
        if errors.len() != 1 {
            return false;
        }
        match errors.get(self.key) {
            Some(messages) => messages.len() == 1 && messages[0].contains(self.phrase),
            None => false,
        }
    }
}

/// Map a non-2xx response to an error, checking the endpoint's known phrases
/// first and falling back to a generic failure carrying the raw body.
pub(crate) fn classify_response(status: StatusCode, body: &[u8], known: &[ErrorPhrase]) -> ClientError {
    for phrase in known {
        if phrase.matches(status, body) {
            return phrase.kind.into_error();
        }
    }
    ClientError::Api {
        status,
        body: String::from_utf8_lossy(body).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Response classification
    // -----------------------------------------------------------------------

    #[test]
    fn test_filename_taken_is_already_exists() {
        let body = br#"{"filename": ["has already been taken"]}"#;
        let err = classify_response(StatusCode::UNPROCESSABLE_ENTITY, body, &[FILENAME_TAKEN]);
        assert!(matches!(err, ClientError::AlreadyExists));
    }

    #[test]
    fn test_filename_taken_substring_match() {
        let body = br#"{"filename": ["'my-package_0.1.0_amd64.deb' has already been taken"]}"#;
        let err = classify_response(StatusCode::UNPROCESSABLE_ENTITY, body, &[FILENAME_TAKEN]);
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_other_422_message_is_generic() {
        let body = br#"{"filename": ["is invalid"]}"#;
        let err = classify_response(StatusCode::UNPROCESSABLE_ENTITY, body, &[FILENAME_TAKEN]);
        match err {
            ClientError::Api { status, body } => {
                assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
                assert!(body.contains("is invalid"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_keys_are_generic() {
        let body = br#"{"filename": ["has already been taken"], "distro": ["bad"]}"#;
        let err = classify_response(StatusCode::UNPROCESSABLE_ENTITY, body, &[FILENAME_TAKEN]);
        assert!(!err.is_already_exists());
    }

    #[test]
    fn test_multiple_messages_are_generic() {
        let body = br#"{"filename": ["has already been taken", "again"]}"#;
        let err = classify_response(StatusCode::UNPROCESSABLE_ENTITY, body, &[FILENAME_TAKEN]);
        assert!(!err.is_already_exists());
    }

    #[test]
    fn test_payment_required() {
        let body = br#"{"error": ["payment required"]}"#;
        let err = classify_response(StatusCode::PAYMENT_REQUIRED, body, &[PAYMENT_REQUIRED]);
        assert!(err.is_payment_required());
    }

    #[test]
    fn test_phrase_requires_matching_status() {
        let body = br#"{"error": ["payment required"]}"#;
        let err = classify_response(StatusCode::FORBIDDEN, body, &[PAYMENT_REQUIRED]);
        assert!(!err.is_payment_required());
    }

    #[test]
    fn test_non_json_body_is_generic() {
        let err = classify_response(StatusCode::BAD_GATEWAY, b"<html>oops</html>", &[PAYMENT_REQUIRED]);
        match err {
            ClientError::Api { body, .. } => assert_eq!(body, "<html>oops</html>"),
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    // -----------------------------------------------------------------------
    // Annotation
    // -----------------------------------------------------------------------

    #[test]
    fn test_during_annotates_once() {
        let result: Result<()> = Err(ClientError::PaymentRequired);
        let err = result.during("search").during("promote by search").unwrap_err();
        assert_eq!(err.to_string(), "search failed: payment required");
        assert!(err.is_payment_required());
    }

    #[test]
    fn test_root_of_plain_error() {
        let err = ClientError::Validation("name is required".into());
        assert!(err.is_validation());
        assert!(matches!(err.root(), ClientError::Validation(_)));
    }
}
