//! Service façade exposing the DNS checks.

mod authoritative;
mod caa;
mod cname;
mod resolver;

pub use caa::{parse_caa_record, parse_caa_value};
pub use resolver::{DnsTransport, HickoryTransport, DEFAULT_QUERY_TIMEOUT};

use std::sync::Arc;
use std::time::Duration;

use crate::error::DnsResult;
use crate::types::{CaaCheckResult, CaaRecord, CnameRecord, NameServer};

/// Entry point for all DNS checks.
///
/// Queries go straight to the authoritative nameserver of the zone so that
/// changes are seen as soon as they are published, bypassing recursive caches.
/// When no authoritative server can be found, `fallback` is queried instead.
///
/// ```rust,no_run
/// use acmedns_dns::{DnsClient, NameServer};
/// # async fn demo() -> acmedns_dns::DnsResult<()> {
/// let fallback: NameServer = "1.1.1.1:53".parse()?;
/// let client = DnsClient::hickory(fallback, std::time::Duration::from_secs(5));
/// let cname = client.get_cname("example.org").await?;
/// println!("{}", cname.target);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DnsClient {
    transport: Arc<dyn DnsTransport>,
    fallback: NameServer,
}

impl DnsClient {
    pub fn new(transport: Arc<dyn DnsTransport>, fallback: NameServer) -> Self {
        Self {
            transport,
            fallback,
        }
    }

    /// Client using hickory with the given per-query timeout.
    pub fn hickory(fallback: NameServer, timeout: Duration) -> Self {
        Self::new(Arc::new(HickoryTransport::new(timeout)), fallback)
    }

    /// Find the first authoritative nameserver for `domain`.
    ///
    /// Does not fall back to the configured nameserver.
    pub async fn authoritative_server(&self, domain: &str) -> DnsResult<NameServer> {
        authoritative::authoritative_server(self.transport.as_ref(), domain).await
    }

    /// Authoritative server for `name`, or the fallback server.
    async fn server_for(&self, name: &str) -> NameServer {
        match self.authoritative_server(name).await {
            Ok(server) => server,
            Err(e) => {
                log::debug!("{e}, using fallback nameserver {}", self.fallback);
                self.fallback.clone()
            }
        }
    }

    /// Fetch the CNAME of `_acme-challenge.<domain>`.
    ///
    /// Returns [`DnsError::CnameNotFound`](crate::DnsError::CnameNotFound) when
    /// the name has no CNAME.
    pub async fn get_cname(&self, domain: &str) -> DnsResult<CnameRecord> {
        let domain = domain.trim_end_matches('.');
        let server = self.server_for(&cname::challenge_name(domain)).await;
        cname::get_cname(self.transport.as_ref(), &server, domain).await
    }

    /// Fetch and parse the CAA records of `domain`.
    ///
    /// Returns [`DnsError::CaaNotFound`](crate::DnsError::CaaNotFound) when the
    /// domain has no CAA record.
    pub async fn get_caa(&self, domain: &str) -> DnsResult<Vec<CaaRecord>> {
        let domain = domain.trim_end_matches('.');
        let server = self.server_for(domain).await;
        caa::get_caa(self.transport.as_ref(), &server, domain).await
    }

    /// Whether `domain` has a CAA record, and whether any names an account.
    pub async fn check_caa(&self, domain: &str) -> DnsResult<CaaCheckResult> {
        let records = match self.get_caa(domain).await {
            Ok(records) => records,
            Err(e) if e.is_not_found() => return Ok(CaaCheckResult::default()),
            Err(e) => return Err(e),
        };
        Ok(CaaCheckResult {
            has_caa: records.iter().any(CaaRecord::is_set),
            has_account_uri: records.iter().any(CaaRecord::has_account_uri),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::DnsError;
    use crate::test_utils::ScriptedTransport;
    use crate::types::{QueryType, RawRecord};

    fn caa(tag: &str, value: &str) -> RawRecord {
        RawRecord::Caa {
            issuer_critical: false,
            tag: tag.to_string(),
            value: value.as_bytes().to_vec(),
        }
    }

    fn fallback() -> NameServer {
        "1.1.1.1:53".parse().unwrap()
    }

    #[tokio::test]
    async fn test_get_cname_queries_authoritative_server() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .with_ns("example.org", &["ns1.example.org."])
                .with_answer(
                    "_acme-challenge.example.org",
                    QueryType::Cname,
                    Ok(vec![RawRecord::Cname("foo.auth.example.com.".to_string())]),
                ),
        );
        let client = DnsClient::new(transport.clone(), fallback());

        let record = client.get_cname("example.org").await.unwrap();
        assert_eq!(record.target, "foo.auth.example.com.");
        assert_eq!(
            transport.ns_queries(),
            vec!["_acme-challenge.example.org", "example.org"]
        );
        let (server, name, _) = transport.exchanges().remove(0);
        assert_eq!(server, NameServer::new("ns1.example.org"));
        assert_eq!(name, "_acme-challenge.example.org.");
    }

    #[tokio::test]
    async fn test_falls_back_without_authoritative_server() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = DnsClient::new(transport.clone(), fallback());

        let err = client.get_cname("example.org").await.unwrap_err();
        assert!(err.is_not_found());
        let (server, _, _) = transport.exchanges().remove(0);
        assert_eq!(server, fallback());
    }

    #[tokio::test]
    async fn test_caa_queries_domain_itself() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .with_ns("example.org", &["ns1.example.org"])
                .with_answer("example.org", QueryType::Caa, Ok(vec![caa("issue", "ca.example")])),
        );
        let client = DnsClient::new(transport.clone(), fallback());

        let records = client.get_caa("example.org.").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(transport.ns_queries(), vec!["example.org"]);
    }

    #[tokio::test]
    async fn test_check_caa_not_found() {
        let client = DnsClient::new(Arc::new(ScriptedTransport::new()), fallback());
        let result = client.check_caa("example.org").await.unwrap();
        assert!(!result.has_caa);
        assert!(!result.has_account_uri);
    }

    #[tokio::test]
    async fn test_check_caa_flags() {
        let transport = ScriptedTransport::new().with_answer(
            "example.org",
            QueryType::Caa,
            Ok(vec![caa("issue", "letsencrypt.org")]),
        );
        let client = DnsClient::new(Arc::new(transport), fallback());
        let result = client.check_caa("example.org").await.unwrap();
        assert!(result.has_caa);
        assert!(!result.has_account_uri);

        let transport = ScriptedTransport::new().with_answer(
            "example.org",
            QueryType::Caa,
            Ok(vec![
                caa("iodef", "mailto:a@example.org"),
                caa("issuewild", "letsencrypt.org; accounturi=https://x/y"),
            ]),
        );
        let client = DnsClient::new(Arc::new(transport), fallback());
        let result = client.check_caa("example.org").await.unwrap();
        assert!(result.has_caa);
        assert!(result.has_account_uri);
    }

    #[tokio::test]
    async fn test_check_caa_propagates_errors() {
        let transport = ScriptedTransport::new().with_answer(
            "example.org",
            QueryType::Caa,
            Ok(vec![RawRecord::Other("A".to_string())]),
        );
        let client = DnsClient::new(Arc::new(transport), fallback());
        let err = client.check_caa("example.org").await.unwrap_err();
        assert!(matches!(err, DnsError::UnexpectedRecordType { .. }));
    }
}
