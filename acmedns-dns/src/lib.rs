//! DNS checks for acme-dns clients.
//!
//! Locates the authoritative nameserver of a zone and queries it directly for
//! the `_acme-challenge` CNAME and the CAA records of a domain. All lookups go
//! through a [`DnsTransport`] so they can be scripted in tests.

mod error;
mod services;
mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{DnsError, DnsResult};
pub use services::{
    parse_caa_record, parse_caa_value, DnsClient, DnsTransport, HickoryTransport,
    DEFAULT_QUERY_TIMEOUT,
};
pub use types::{
    fqdn, CaaCheckResult, CaaRecord, CnameRecord, NameServer, QueryType, RawRecord,
    ACME_CHALLENGE_LABEL, DNS_PORT,
};
