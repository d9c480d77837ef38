use thiserror::Error;

/// Comment fragments the upstream uses when a caller exceeds its request quota.
const RATE_LIMIT_MARKERS: &[&str] = &["Call limit exceeded", "limit exceeded"];

/// Failure of a single upstream API call.
///
/// The client never retries; each variant tells the caller which recovery applies.
/// Transport-class failures (`Transport`, `Timeout`, `HttpStatus`, `Decode`) mean the
/// upstream could not be reached or understood, `Upstream` means it answered and refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Connection-level failure (DNS, refused connection, proxy failure, reset).
    #[error("Request to {method} failed: {message}")]
    Transport { method: String, message: String },

    /// The request exceeded the configured timeout.
    #[error("Request to {method} timed out")]
    Timeout { method: String },

    /// Non-2xx HTTP response without a recognizable envelope.
    #[error("Request to {method} returned HTTP {status}")]
    HttpStatus { method: String, status: u16 },

    /// The upstream answered with `status: "FAILED"`.
    ///
    /// Displays the upstream comment verbatim; callers match on its text.
    #[error("{comment}")]
    Upstream { method: String, comment: String },

    /// The response body is not a valid envelope or the result does not have the
    /// expected shape.
    #[error("Failed to decode response from {method}: {message}")]
    Decode { method: String, message: String },
}

impl ApiError {
    /// The API method the failed call targeted.
    pub fn method(&self) -> &str {
        match self {
            Self::Transport { method, .. }
            | Self::Timeout { method }
            | Self::HttpStatus { method, .. }
            | Self::Upstream { method, .. }
            | Self::Decode { method, .. } => method,
        }
    }

    /// Whether the upstream could not be reached or understood.
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::Upstream { .. })
    }

    /// The upstream's comment for a `FAILED` envelope.
    pub fn comment(&self) -> Option<&str> {
        match self {
            Self::Upstream { comment, .. } => Some(comment),
            _ => None,
        }
    }

    /// Whether the upstream rejected the call for exceeding its rate limit.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::Upstream { comment, .. } => {
                RATE_LIMIT_MARKERS.iter().any(|marker| comment.contains(marker))
            }
            Self::HttpStatus { status, .. } => *status == 429,
            _ => false,
        }
    }
}
