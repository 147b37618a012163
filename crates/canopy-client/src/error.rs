//! Client error types and failure normalization.
//!
//! Every failure an API call can produce (transport errors, gateway error
//! pages, content-type mismatches, structured validation errors, undecodable
//! bodies) is collapsed into the single [`Error`] type, so callers only ever
//! match on a status code.

use std::error::Error as StdError;
use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::response::RawResponse;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The code space of a normalized error.
///
/// Real HTTP statuses live in `Status`; the remaining variants are sentinel
/// codes identifying the origin of errors that never had a status. Sentinels
/// occupy 0–3 and a real status is never below 100, so the two ranges cannot
/// collide in the numeric space exposed by [`ErrorCode::as_u16`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The origin of the failure could not be determined.
    Unsupported,
    /// Normalized from a plain string.
    FromString,
    /// Normalized from an error value.
    FromError,
    /// Normalized from a value with only a textual rendering.
    FromDisplay,
    /// A real HTTP status reported by the API.
    Status(u16),
}

impl ErrorCode {
    /// Collapse to the numeric code space shared with HTTP statuses.
    pub fn as_u16(self) -> u16 {
        match self {
            ErrorCode::Unsupported => 0,
            ErrorCode::FromString => 1,
            ErrorCode::FromError => 2,
            ErrorCode::FromDisplay => 3,
            ErrorCode::Status(status) => status,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_u16(), f)
    }
}

/// Canonical client error.
///
/// Constructed once per failure event and immutable thereafter. The
/// originating response is attached when the error was built from one, so
/// callers that need the raw exchange can still reach it.
#[derive(Debug, Error)]
#[error("[{code:03}] {message}")]
pub struct Error {
    pub(crate) code: ErrorCode,
    pub(crate) message: String,
    pub(crate) response: Option<RawResponse>,
}

impl Error {
    /// The discriminated error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The numeric code: an HTTP status, or a sentinel below 100.
    pub fn status_code(&self) -> u16 {
        self.code.as_u16()
    }

    /// Human-readable description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The HTTP response this error was built from, if any.
    pub fn response(&self) -> Option<&RawResponse> {
        self.response.as_ref()
    }

    /// Build an error from a plain string.
    pub fn from_string(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::FromString,
            message: message.into(),
            response: None,
        }
    }

    /// Build an error from another error value.
    pub fn from_error<E: StdError + ?Sized>(err: &E) -> Self {
        Self {
            code: ErrorCode::FromError,
            message: err.to_string(),
            response: None,
        }
    }

    /// Build an error from a value that only has a textual rendering.
    pub fn from_display<D: fmt::Display + ?Sized>(value: &D) -> Self {
        Self {
            code: ErrorCode::FromDisplay,
            message: value.to_string(),
            response: None,
        }
    }

    /// Build an error from a completed HTTP response.
    ///
    /// The body must decode as the API's error envelope; a response that
    /// does not carry one yields an [`ErrorCode::Unsupported`] error.
    pub fn from_response(response: RawResponse) -> Self {
        match serde_json::from_slice::<ErrorEnvelope>(response.body()) {
            Ok(envelope) => Self {
                code: ErrorCode::Status(response.status().as_u16()),
                message: envelope.to_string(),
                response: Some(response),
            },
            Err(_) => Self {
                code: ErrorCode::Unsupported,
                message: "Unexpected HTTP Error Response, no error".to_string(),
                response: None,
            },
        }
    }

    /// Internal invariant violation, reported as a wrapped error.
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::FromError,
            message: message.into(),
            response: None,
        }
    }

    fn unsupported(type_name: &str) -> Self {
        Self {
            code: ErrorCode::Unsupported,
            message: format!("Unsupported type to normalize: {}", type_name),
            response: None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::from_error(&err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::from_error(&err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::from_error(&err)
    }
}

/// An individual invalid-request message reported by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorReason {
    /// What went wrong.
    pub reason: String,
    /// The offending request field, when the reason concerns one.
    pub field: Option<String>,
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field.as_deref() {
            Some(field) if !field.is_empty() => write!(f, "[{}] {}", field, self.reason),
            _ => f.write_str(&self.reason),
        }
    }
}

/// The error body returned by the API for an invalid request.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    /// Reported reasons, in the order the API listed them.
    pub errors: Vec<ErrorReason>,
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join("; "))
    }
}

/// A failure value of unknown origin, awaiting normalization.
///
/// The variants form a closed set, listed in dispatch priority order. A
/// value that implements both `std::error::Error` and `Display` belongs in
/// `Wrapped`: error semantics carry more information than a bare rendering.
#[derive(Debug)]
pub enum Failure {
    /// Already canonical; normalization passes it through unchanged.
    Canonical(Error),
    /// A completed HTTP exchange carrying an error body.
    Response(RawResponse),
    /// Any error value.
    Wrapped(Box<dyn StdError + Send + Sync>),
    /// A plain string.
    Text(String),
    /// The rendering of a value that only implements `Display`.
    Rendered(String),
    /// A value of the named type, which no other variant accepts.
    Unsupported(&'static str),
}

impl Failure {
    /// An already-canonical error.
    pub fn canonical(err: Error) -> Self {
        Failure::Canonical(err)
    }

    /// A buffered HTTP response.
    pub fn response(response: RawResponse) -> Self {
        Failure::Response(response)
    }

    /// An arbitrary error value.
    pub fn wrapped(err: impl StdError + Send + Sync + 'static) -> Self {
        Failure::Wrapped(Box::new(err))
    }

    /// A plain string.
    pub fn text(text: impl Into<String>) -> Self {
        Failure::Text(text.into())
    }

    /// A display-only value, rendered at construction.
    pub fn rendered(value: impl fmt::Display) -> Self {
        Failure::Rendered(value.to_string())
    }

    /// A value of type `T` that none of the other variants accept.
    pub fn unsupported<T: ?Sized>() -> Self {
        Failure::Unsupported(std::any::type_name::<T>())
    }

    /// Normalize into the canonical [`Error`].
    pub fn normalize(self) -> Error {
        match self {
            Failure::Canonical(err) => err,
            Failure::Response(response) => Error::from_response(response),
            Failure::Wrapped(err) => Error::from_error(err.as_ref()),
            Failure::Text(text) => Error::from_string(text),
            Failure::Rendered(rendered) => Error::from_display(&rendered),
            Failure::Unsupported(type_name) => Error::unsupported(type_name),
        }
    }
}

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        Failure::Canonical(err)
    }
}

impl From<RawResponse> for Failure {
    fn from(response: RawResponse) -> Self {
        Failure::Response(response)
    }
}

impl From<String> for Failure {
    fn from(text: String) -> Self {
        Failure::Text(text)
    }
}

impl From<&str> for Failure {
    fn from(text: &str) -> Self {
        Failure::Text(text.to_string())
    }
}

impl From<reqwest::Error> for Failure {
    fn from(err: reqwest::Error) -> Self {
        Failure::wrapped(err)
    }
}

/// Normalize any failure value into the canonical [`Error`].
///
/// Normalizing is idempotent: feeding an already-canonical error back in
/// returns it unchanged.
pub fn normalize(failure: impl Into<Failure>) -> Error {
    failure.into().normalize()
}

/// Check whether `err` resolves to a canonical [`Error`] carrying any of the
/// given codes.
///
/// The error's `source()` chain is walked, so the canonical error is found
/// even when wrapped inside another error type. Returns false when `codes`
/// is empty or no canonical error is present in the chain.
pub fn has_status(err: &(dyn StdError + 'static), codes: &[u16]) -> bool {
    if codes.is_empty() {
        return false;
    }

    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(source) = current {
        if let Some(canonical) = source.downcast_ref::<Error>() {
            return codes.contains(&canonical.status_code());
        }
        current = source.source();
    }

    false
}

/// Check whether `err` is a 404 Not Found reported by the API.
pub fn is_not_found(err: &(dyn StdError + 'static)) -> bool {
    has_status(err, &[StatusCode::NOT_FOUND.as_u16()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, CONTENT_TYPE};

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "application/json".parse().unwrap());
        headers
    }

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse::new(
            StatusCode::from_u16(status).unwrap(),
            json_headers(),
            "application/json",
            body.to_string(),
        )
    }

    #[test]
    fn test_reason_display_with_field() {
        let reason = ErrorReason {
            reason: "Entity ID is required".to_string(),
            field: Some("entity_ids".to_string()),
        };
        assert_eq!(reason.to_string(), "[entity_ids] Entity ID is required");
    }

    #[test]
    fn test_reason_display_without_field() {
        let reason = ErrorReason {
            reason: "Not found".to_string(),
            field: None,
        };
        assert_eq!(reason.to_string(), "Not found");
    }

    #[test]
    fn test_envelope_joins_reasons() {
        let envelope = ErrorEnvelope {
            errors: vec![
                ErrorReason {
                    reason: "Not found".to_string(),
                    field: None,
                },
                ErrorReason {
                    reason: "Entity ID is required".to_string(),
                    field: Some("entity_ids".to_string()),
                },
            ],
        };
        assert_eq!(
            envelope.to_string(),
            "Not found; [entity_ids] Entity ID is required"
        );
    }

    #[test]
    fn test_normalize_string() {
        let err = normalize("disk full");
        assert_eq!(err.code(), ErrorCode::FromString);
        assert_eq!(err.status_code(), 1);
        assert_eq!(err.message(), "disk full");
    }

    #[test]
    fn test_normalize_wrapped_error() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
        let err = normalize(Failure::wrapped(io));
        assert_eq!(err.code(), ErrorCode::FromError);
        assert_eq!(err.message(), "connection reset");
    }

    #[test]
    fn test_normalize_rendered_value() {
        let err = normalize(Failure::rendered(StatusCode::NOT_FOUND));
        assert_eq!(err.code(), ErrorCode::FromDisplay);
        assert_eq!(err.message(), "404 Not Found");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize("disk full");
        let twice = normalize(once);
        assert_eq!(twice.code(), ErrorCode::FromString);
        assert_eq!(twice.message(), "disk full");
    }

    #[test]
    fn test_normalize_response_with_envelope() {
        let body = r#"{"errors":[{"reason":"Entity ID is required","field":"entity_ids"}]}"#;
        let err = normalize(Failure::response(raw(400, body)));
        assert_eq!(err.code(), ErrorCode::Status(400));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "[entity_ids] Entity ID is required");
        assert!(err.response().is_some());
    }

    #[test]
    fn test_normalize_response_without_envelope() {
        let err = normalize(Failure::response(raw(500, "not json")));
        assert_eq!(err.code(), ErrorCode::Unsupported);
        assert_eq!(err.status_code(), 0);
        assert_eq!(err.message(), "Unexpected HTTP Error Response, no error");
        assert!(err.response().is_none());
    }

    #[test]
    fn test_normalize_unsupported_type() {
        let err = normalize(Failure::unsupported::<Vec<u8>>());
        assert_eq!(err.code(), ErrorCode::Unsupported);
        assert!(err.message().starts_with("Unsupported type to normalize:"));
        assert!(err.message().contains("Vec<u8>"));
    }

    #[test]
    fn test_display_pads_sentinel_codes() {
        assert_eq!(normalize("disk full").to_string(), "[001] disk full");
        let body = r#"{"errors":[{"reason":"Not found"}]}"#;
        let err = normalize(Failure::response(raw(404, body)));
        assert_eq!(err.to_string(), "[404] Not found");
    }

    #[test]
    fn test_has_status_empty_codes() {
        let err = normalize(Failure::response(raw(
            404,
            r#"{"errors":[{"reason":"Not found"}]}"#,
        )));
        assert!(!has_status(&err, &[]));
    }

    #[test]
    fn test_has_status_matches_any_code() {
        let err = normalize(Failure::response(raw(
            404,
            r#"{"errors":[{"reason":"Not found"}]}"#,
        )));
        assert!(has_status(&err, &[500, 404]));
        assert!(!has_status(&err, &[500, 418]));
    }

    #[test]
    fn test_has_status_matches_sentinel_codes() {
        let err = normalize("disk full");
        assert!(has_status(&err, &[1]));
        assert!(!has_status(&err, &[2]));
    }

    #[test]
    fn test_has_status_walks_source_chain() {
        #[derive(Debug, thiserror::Error)]
        #[error("token creation failed: {source}")]
        struct TokenError {
            #[source]
            source: Error,
        }

        let wrapper = TokenError {
            source: normalize(Failure::response(raw(
                404,
                r#"{"errors":[{"reason":"Not found"}]}"#,
            ))),
        };
        assert!(has_status(&wrapper, &[404]));
        assert!(is_not_found(&wrapper));
    }

    #[test]
    fn test_has_status_ignores_foreign_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        assert!(!has_status(&io, &[404]));
        assert!(!is_not_found(&io));
    }

    #[test]
    fn test_is_not_found() {
        let not_found = normalize(Failure::response(raw(
            404,
            r#"{"errors":[{"reason":"Not found"}]}"#,
        )));
        assert!(is_not_found(&not_found));

        let bad_request = normalize(Failure::response(raw(
            400,
            r#"{"errors":[{"reason":"Entity ID is required","field":"entity_ids"}]}"#,
        )));
        assert!(!is_not_found(&bad_request));
    }
}
