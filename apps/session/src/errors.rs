use thiserror::Error;

/// Fallback message used when the auth backend fails without a readable body.
pub const GENERIC_FAILURE: &str = "Request failed";

/// Transport-level error returned by every `AuthApi` call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the backend's own message when it sent one.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// True when the backend answered 401/403, i.e. the session credential is not accepted.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }
}

/// Sign-in and sign-up failures. Always surfaced to the caller for display.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Rejected(#[source] ApiError),

    /// Credentials were accepted but the canonical principal could not be loaded.
    #[error("Signed in, but the session could not be loaded: {0}")]
    SessionUnavailable(#[source] ApiError),
}

/// Profile completion failures.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("{0}")]
    Api(#[from] ApiError),
}

/// Raised by an explicit token refresh; the local principal has already been cleared.
#[derive(Debug, Error)]
#[error("Session expired: {0}")]
pub struct SessionExpired(#[source] pub ApiError);

/// Role strings outside the closed enumeration, or a role required but absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    Unknown(String),

    #[error("Principal has no role assigned")]
    Missing,
}
