//! Error taxonomy for JAM API operations.

use reqwest::StatusCode;
use thiserror::Error;

/// Classification of a failed API operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The resource does not exist at the expected URL (HTTP 404). The only
    /// kind the get-or-create resolvers treat as safe to proceed to
    /// creation.
    NotFound,
    /// The backend rejected a creation because the resource already exists,
    /// or a patch violated a constraint (HTTP 409).
    Conflict,
    /// Malformed patch or attribute payload rejected by the backend
    /// (HTTP 400 or 422).
    Validation,
    /// Network-level failure, an unparseable response, or any other non-2xx
    /// status.
    Transport,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Validation => "validation",
            ErrorKind::Transport => "transport",
        })
    }
}

/// A failed API operation: what went wrong, and against which URL.
///
/// Carries a human-readable detail string (the capped error body for HTTP
/// failures, the underlying error text otherwise). The client never
/// recovers or retries; every `JamError` propagates to the caller.
#[derive(Debug, Clone, Error)]
#[error("{kind} error for {url}: {detail}")]
pub struct JamError {
    kind: ErrorKind,
    url: String,
    detail: String,
}

impl JamError {
    /// Classify a non-2xx HTTP status.
    pub(crate) fn from_status(url: &str, status: StatusCode, detail: String) -> Self {
        let kind = match status.as_u16() {
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            400 | 422 => ErrorKind::Validation,
            _ => ErrorKind::Transport,
        };
        let detail = if detail.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {detail}")
        };
        Self {
            kind,
            url: url.to_string(),
            detail,
        }
    }

    pub(crate) fn transport(url: &str, source: &dyn std::fmt::Display) -> Self {
        Self {
            kind: ErrorKind::Transport,
            url: url.to_string(),
            detail: format!("request failed: {source}"),
        }
    }

    pub(crate) fn unparseable(url: &str, source: &dyn std::fmt::Display) -> Self {
        Self {
            kind: ErrorKind::Transport,
            url: url.to_string(),
            detail: format!("unparseable response: {source}"),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// True for the one error the get-or-create resolvers may absorb.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}
