//! Public types returned by DNS operations.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DnsError;

/// Label prepended to a domain to form the ACME DNS-01 validation name.
pub const ACME_CHALLENGE_LABEL: &str = "_acme-challenge";

/// Default DNS port.
pub const DNS_PORT: u16 = 53;

/// Return `name` in fully qualified form (with a trailing root dot).
///
/// Idempotent: `fqdn(&fqdn(x)) == fqdn(x)`.
pub fn fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

/// Record types this crate queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryType {
    /// Name server record.
    Ns,
    /// Canonical name (alias) record.
    Cname,
    /// Certificate Authority Authorization record.
    Caa,
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ns => write!(f, "NS"),
            Self::Cname => write!(f, "CNAME"),
            Self::Caa => write!(f, "CAA"),
        }
    }
}

/// Address of a nameserver to query directly.
///
/// `host` is either an IP address or a host name as returned by an NS lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameServer {
    pub host: String,
    pub port: u16,
}

impl NameServer {
    /// Nameserver on the standard DNS port.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into().trim_end_matches('.').to_string(),
            port: DNS_PORT,
        }
    }

    /// The host as an IP address, if it is one.
    pub fn ip(&self) -> Option<IpAddr> {
        self.host.parse().ok()
    }
}

impl fmt::Display for NameServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ip() {
            Some(IpAddr::V6(ip)) => write!(f, "[{ip}]:{}", self.port),
            _ => write!(f, "{}:{}", self.host, self.port),
        }
    }
}

impl FromStr for NameServer {
    type Err = DnsError;

    /// Accepts `host`, `host:port`, `ipv4:port`, `ipv6` and `[ipv6]:port`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || DnsError::InvalidServerAddress(s.to_string());
        if s.is_empty() {
            return Err(invalid());
        }
        if let Ok(addr) = s.parse::<std::net::SocketAddr>() {
            return Ok(Self {
                host: addr.ip().to_string(),
                port: addr.port(),
            });
        }
        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(Self::new(ip.to_string()));
        }
        match s.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| invalid())?;
                if host.is_empty() || host.contains(':') {
                    return Err(invalid());
                }
                Ok(Self {
                    host: host.trim_end_matches('.').to_string(),
                    port,
                })
            }
            None => Ok(Self::new(s)),
        }
    }
}

/// A single answer record as seen on the wire, reduced to what the checkers need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRecord {
    /// CNAME answer carrying its target name.
    Cname(String),
    /// CAA answer with the raw property value bytes.
    Caa {
        issuer_critical: bool,
        tag: String,
        value: Vec<u8>,
    },
    /// Any other record type, by mnemonic.
    Other(String),
}

impl RawRecord {
    /// Record type mnemonic.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Cname(_) => "CNAME",
            Self::Caa { .. } => "CAA",
            Self::Other(name) => name,
        }
    }
}

/// CNAME state of the `_acme-challenge` name of a domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CnameRecord {
    /// Queried name, `_acme-challenge.<domain>.`
    pub domain: String,
    /// Whether a CNAME answer was found. Always equals `!target.is_empty()`.
    pub has_cname: bool,
    /// CNAME target in FQDN form, empty when absent
    pub target: String,
}

impl CnameRecord {
    /// A found record; `target` is normalized to FQDN.
    pub fn found(domain: &str, target: &str) -> Self {
        let target = if target.is_empty() {
            String::new()
        } else {
            fqdn(target)
        };
        Self {
            domain: fqdn(domain),
            has_cname: !target.is_empty(),
            target,
        }
    }

    /// Whether the record points at `delegated_domain`.
    ///
    /// Both sides are compared in FQDN form. An absent record never matches.
    pub fn correct_target(&self, delegated_domain: &str) -> bool {
        if self.target.is_empty() || delegated_domain.is_empty() {
            return false;
        }
        fqdn(delegated_domain).eq_ignore_ascii_case(&fqdn(&self.target))
    }
}

/// Parsed `issue` / `issuewild` CAA record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaaRecord {
    /// `issue` or `issuewild`; empty for any other property tag
    pub tag: String,
    /// Issuer domain, the first `;`-separated field of the value
    pub issuer: String,
    /// Methods listed in the `validationmethods` parameter
    pub validation_methods: Vec<String>,
    /// Value of the `accounturi` parameter
    pub account_uri: String,
    /// Presentation form of the record, for display
    pub data: String,
    /// Parameters that could not be parsed as `key=value`
    pub field_errors: Vec<String>,
}

impl CaaRecord {
    /// Whether the record restricts issuance, i.e. has an issuer.
    pub fn is_set(&self) -> bool {
        !self.issuer.is_empty()
    }

    /// Whether the record carries an `accounturi` parameter.
    pub fn has_account_uri(&self) -> bool {
        !self.account_uri.is_empty()
    }
}

/// Summary of the CAA state of a domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaaCheckResult {
    pub has_caa: bool,
    pub has_account_uri: bool,
}
