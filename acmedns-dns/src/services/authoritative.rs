//! Authoritative nameserver discovery.

use crate::error::{DnsError, DnsResult};
use crate::types::NameServer;

use super::resolver::DnsTransport;

/// Return the first authoritative nameserver of the closest enclosing zone.
///
/// Walks from the full name towards the TLD, stopping one label short of it,
/// and returns the first NS host found on port 53.
pub(crate) async fn authoritative_server(
    transport: &dyn DnsTransport,
    domain: &str,
) -> DnsResult<NameServer> {
    for zone in candidate_zones(domain) {
        match transport.lookup_ns(&zone).await {
            Ok(hosts) => {
                if let Some(host) = hosts.into_iter().find(|h| !h.is_empty()) {
                    log::debug!("Authoritative nameserver for {domain}: {host} (zone {zone})");
                    return Ok(NameServer::new(host));
                }
            }
            Err(e) => log::debug!("NS lookup for {zone} failed: {e}"),
        }
    }
    Err(DnsError::NoAuthoritativeServerFound(domain.to_string()))
}

/// Suffixes of `domain` to try, longest first, excluding the bare TLD.
fn candidate_zones(domain: &str) -> Vec<String> {
    let labels: Vec<&str> = domain
        .trim_end_matches('.')
        .split('.')
        .filter(|l| !l.is_empty())
        .collect();
    (0..labels.len().saturating_sub(1))
        .map(|i| labels[i..].join("."))
        .collect()
}
