//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error types
pub use acmedns_dns::DnsError;
pub use acmedns_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// No acme-dns account is stored for the domain
    #[error("Domain {0} does not have acme-dns account registered for it")]
    AccountNotFound(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error (missing token, bad input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// ACME account URI cannot be turned into a CAA record value
    #[error("Encountered an error while trying to determine issuer domain from account URI: {0}")]
    InvalidAccountUri(String),

    /// A monitor gave up before the record appeared
    #[error("Gave up waiting for {record} record of {domain} after {waited_secs}s")]
    MonitorDeadlineExceeded {
        record: String,
        domain: String,
        waited_secs: u64,
    },

    /// A reconciliation sub-query failed and strict mode was requested
    #[error("Could not determine configuration state of {domain}: {detail}")]
    Reconciliation { domain: String, detail: String },

    /// DNS error (converted from library)
    #[error("{0}")]
    Dns(#[from] DnsError),

    /// acme-dns API error (converted from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Update this method when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::AccountNotFound(_)
            | Self::ValidationError(_)
            | Self::InvalidConfig(_)
            | Self::InvalidAccountUri(_)
            | Self::MonitorDeadlineExceeded { .. } => true,
            Self::Dns(e) => e.is_not_found(),
            Self::Provider(e) => e.is_expected(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
