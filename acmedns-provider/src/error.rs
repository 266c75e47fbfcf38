use serde::{Deserialize, Serialize};

/// Error type for all acme-dns API operations.
///
/// Each variant carries the `server` that produced it plus variant-specific
/// context. All variants are serializable for structured error reporting.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on retry:
/// - [`NetworkError`](Self::NetworkError) — network connectivity issues
/// - [`Timeout`](Self::Timeout) — request timed out
/// - [`RateLimited`](Self::RateLimited) — HTTP 429
///
/// Only idempotent calls (TXT updates) are retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Server that produced the error.
        server: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Server that produced the error.
        server: String,
        /// Error details.
        detail: String,
    },

    /// The API rate limit has been exceeded.
    RateLimited {
        /// Server that produced the error.
        server: String,
        /// Suggested wait time in seconds, if the server sent one.
        retry_after: Option<u64>,
    },

    /// The server URL is not usable.
    InvalidServerUrl {
        /// The rejected URL.
        server: String,
        /// Why it was rejected.
        detail: String,
    },

    /// The account credentials were rejected, or the client address is not
    /// in the account's allow list.
    Unauthorized {
        /// Server that produced the error.
        server: String,
        /// Error message returned by acme-dns, if any.
        raw_message: Option<String>,
    },

    /// A request parameter was rejected (`bad_txt`, `bad_subdomain`,
    /// `bad_allowfrom`, ...).
    InvalidParameter {
        /// Server that produced the error.
        server: String,
        /// Name of the rejected parameter.
        param: String,
        /// Error message returned by acme-dns.
        detail: String,
    },

    /// The server answered with a status code the call does not expect.
    UnexpectedStatus {
        /// Server that produced the error.
        server: String,
        /// HTTP status code.
        status: u16,
        /// Response body.
        raw_message: String,
    },

    /// Failed to parse the server's response.
    ParseError {
        /// Server that produced the error.
        server: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// The HTTP client could not be constructed.
    ClientInit {
        /// Error details.
        detail: String,
    },
}

impl ProviderError {
    /// Whether this is expected behavior (bad input, rejected credentials),
    /// used to pick the log level.
    ///
    /// `true` should log at `warn`, `false` at `error`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidServerUrl { .. }
                | Self::Unauthorized { .. }
                | Self::InvalidParameter { .. }
        )
    }

    /// Whether retrying the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { server, detail } => {
                write!(f, "[{server}] Network error: {detail}")
            }
            Self::Timeout { server, detail } => {
                write!(f, "[{server}] Request timeout: {detail}")
            }
            Self::RateLimited {
                server,
                retry_after,
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{server}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{server}] Rate limited")
                }
            }
            Self::InvalidServerUrl { server, detail } => {
                write!(f, "Invalid acme-dns server URL '{server}': {detail}")
            }
            Self::Unauthorized {
                server,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{server}] Unauthorized: {msg}")
                } else {
                    write!(f, "[{server}] Unauthorized")
                }
            }
            Self::InvalidParameter {
                server,
                param,
                detail,
            } => {
                write!(f, "[{server}] Invalid parameter '{param}': {detail}")
            }
            Self::UnexpectedStatus {
                server,
                status,
                raw_message,
            } => {
                write!(f, "[{server}] Unexpected HTTP status {status}: {raw_message}")
            }
            Self::ParseError { server, detail } => {
                write!(f, "[{server}] Parse error: {detail}")
            }
            Self::ClientInit { detail } => {
                write!(f, "Could not create HTTP client: {detail}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
