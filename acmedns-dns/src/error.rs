//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// DNS lookup error type
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum DnsError {
    /// No NS record was found for any suffix of the domain
    #[error("No nameservers found for domain {0}")]
    NoAuthoritativeServerFound(String),

    /// The `_acme-challenge` name has no CNAME record
    #[error("No CNAME record found for {0}")]
    CnameNotFound(String),

    /// The domain has no CAA record
    #[error("No CAA record found for {0}")]
    CaaNotFound(String),

    /// The answer section carried a record of a type other than the one queried
    #[error("Unexpected {found} record returned with {expected} query to domain {domain}")]
    UnexpectedRecordType {
        expected: String,
        found: String,
        domain: String,
    },

    /// A CAA record could not be parsed
    #[error("Encountered an error while trying to parse CAA record: {0}")]
    InvalidCaaRecord(String),

    /// The nameserver address is not usable
    #[error("Invalid nameserver address: {0}")]
    InvalidServerAddress(String),

    /// Stub resolver lookup failed
    #[error("Lookup of {name} failed: {detail}")]
    LookupFailed { name: String, detail: String },

    /// Query sent directly to a nameserver failed
    #[error("Query for {name} at {server} failed: {detail}")]
    ExchangeFailed {
        server: String,
        name: String,
        detail: String,
    },
}

impl DnsError {
    /// Whether the error is one of the "record absent" sentinels.
    ///
    /// Callers branch on these instead of treating them as failures.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CnameNotFound(_) | Self::CaaNotFound(_))
    }
}

/// DNS Result type alias
pub type DnsResult<T> = std::result::Result<T, DnsError>;
