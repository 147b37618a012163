//! Buffered HTTP exchanges and failure classification.
//!
//! Responses are snapshotted into [`RawResponse`] before classification: the
//! body is read once into an owned buffer, so classification can quote it in
//! a diagnostic while the caller still decodes the same bytes afterwards.

use bytes::Bytes;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::{normalize, Error, ErrorCode, ErrorEnvelope, Failure, Result};

/// A completed HTTP exchange with the body buffered into memory.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    accept: String,
    body: Bytes,
}

impl RawResponse {
    /// Build a snapshot from parts.
    ///
    /// `accept` is the content type the originating request declared it
    /// expects, empty when it declared none.
    pub fn new(
        status: StatusCode,
        headers: HeaderMap,
        accept: impl Into<String>,
        body: impl Into<Bytes>,
    ) -> Self {
        Self {
            status,
            headers,
            accept: accept.into(),
            body: body.into(),
        }
    }

    /// Buffer a live response into a snapshot.
    pub async fn capture(response: reqwest::Response, accept: impl Into<String>) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|err| Error::internal(format!("failed to read response body: {err}")))?;

        Ok(Self {
            status,
            headers,
            accept: accept.into(),
            body,
        })
    }

    /// HTTP status of the exchange.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Content type declared by the response, empty when the header is
    /// missing or unreadable.
    pub fn content_type(&self) -> &str {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
    }

    /// Content type the originating request declared it expects.
    pub fn accept(&self) -> &str {
        &self.accept
    }

    /// The buffered body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Decode the buffered body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Error::from)
    }
}

/// Couple the outcome of an HTTP exchange into a usable response or the
/// canonical error.
///
/// A transport error short-circuits through normalization without any
/// response to inspect; a live response is buffered and classified.
pub async fn classify(
    outcome: reqwest::Result<reqwest::Response>,
    accept: &str,
) -> Result<RawResponse> {
    let response = match outcome {
        Ok(response) => response,
        Err(err) => return Err(Error::from_error(&err)),
    };

    let status = response.status();
    match classify_response(RawResponse::capture(response, accept).await?) {
        Ok(raw) => Ok(raw),
        Err(err) => {
            tracing::warn!(status = %status, error = %err, "request failed");
            Err(err)
        }
    }
}

/// Classify a buffered response as a successful exchange or a canonical
/// error.
///
/// A non-2xx response whose decoded error list is empty is returned as a
/// success: the API is reporting "no error" even though the status says
/// otherwise, and that must not be misreported as a failure.
pub fn classify_response(response: RawResponse) -> Result<RawResponse> {
    if response.status().is_success() {
        return Ok(response);
    }

    let content_type = response.content_type().to_string();

    // An upstream gateway that could not reach the API answers with its own
    // HTML error page; there is no JSON envelope to decode.
    if response.status() == StatusCode::BAD_GATEWAY && content_type == "text/html" {
        return Err(Error {
            code: ErrorCode::Status(StatusCode::BAD_GATEWAY.as_u16()),
            message: StatusCode::BAD_GATEWAY
                .canonical_reason()
                .unwrap_or("Bad Gateway")
                .to_string(),
            response: Some(response),
        });
    }

    if content_type != response.accept() {
        let message = format!(
            "Unexpected Content-Type: Expected: {}, Received: {}\nResponse body: {}",
            response.accept(),
            content_type,
            String::from_utf8_lossy(response.body()),
        );
        return Err(Error {
            code: ErrorCode::Status(response.status().as_u16()),
            message,
            response: None,
        });
    }

    let envelope: ErrorEnvelope = match serde_json::from_slice(response.body()) {
        Ok(envelope) => envelope,
        Err(err) => {
            return Err(Error::internal(format!(
                "failed to decode response body: {err}"
            )))
        }
    };

    if envelope.errors.is_empty() {
        return Ok(response);
    }

    Err(normalize(Failure::Response(response)))
}
