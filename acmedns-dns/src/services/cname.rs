//! `_acme-challenge` CNAME lookup.

use crate::error::{DnsError, DnsResult};
use crate::types::{fqdn, CnameRecord, NameServer, QueryType, RawRecord, ACME_CHALLENGE_LABEL};

use super::resolver::DnsTransport;

/// Query the CNAME of `_acme-challenge.<domain>` at `server`.
///
/// Only the first answer is consulted.
pub(crate) async fn get_cname(
    transport: &dyn DnsTransport,
    server: &NameServer,
    domain: &str,
) -> DnsResult<CnameRecord> {
    let name = challenge_name(domain);
    let answers = transport.exchange(server, &name, QueryType::Cname).await?;

    match answers.first() {
        Some(RawRecord::Cname(target)) => Ok(CnameRecord::found(&name, target)),
        Some(other) => Err(DnsError::UnexpectedRecordType {
            expected: QueryType::Cname.to_string(),
            found: other.type_name().to_string(),
            domain: name,
        }),
        None => Err(DnsError::CnameNotFound(name)),
    }
}

/// `_acme-challenge.<domain>.`
pub(crate) fn challenge_name(domain: &str) -> String {
    fqdn(&format!("{ACME_CHALLENGE_LABEL}.{}", domain.trim_end_matches('.')))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedTransport;

    fn server() -> NameServer {
        NameServer::new("ns1.example.org")
    }

    #[test]
    fn test_challenge_name() {
        assert_eq!(challenge_name("example.org"), "_acme-challenge.example.org.");
        assert_eq!(challenge_name("example.org."), "_acme-challenge.example.org.");
    }

    #[tokio::test]
    async fn test_get_cname_found() {
        let transport = ScriptedTransport::new().with_answer(
            "_acme-challenge.example.org",
            QueryType::Cname,
            Ok(vec![
                RawRecord::Cname("foo.auth.example.com".to_string()),
                RawRecord::Cname("ignored.example.com.".to_string()),
            ]),
        );

        let record = get_cname(&transport, &server(), "example.org").await.unwrap();
        assert!(record.has_cname);
        assert_eq!(record.domain, "_acme-challenge.example.org.");
        assert_eq!(record.target, "foo.auth.example.com.");
        assert!(record.correct_target("foo.auth.example.com"));
    }

    #[tokio::test]
    async fn test_get_cname_not_found() {
        let transport = ScriptedTransport::new();
        let err = get_cname(&transport, &server(), "example.org").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            err,
            DnsError::CnameNotFound("_acme-challenge.example.org.".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_cname_unexpected_record() {
        let transport = ScriptedTransport::new().with_answer(
            "_acme-challenge.example.org",
            QueryType::Cname,
            Ok(vec![RawRecord::Other("TXT".to_string())]),
        );
        let err = get_cname(&transport, &server(), "example.org").await.unwrap_err();
        assert!(matches!(err, DnsError::UnexpectedRecordType { ref found, .. } if found == "TXT"));
        assert!(!err.is_not_found());
        assert_eq!(transport.exchange_count(QueryType::Cname), 1);
    }

    #[tokio::test]
    async fn test_get_cname_transport_error() {
        let transport = ScriptedTransport::new().with_answer(
            "_acme-challenge.example.org",
            QueryType::Cname,
            Err(DnsError::ExchangeFailed {
                server: "ns1.example.org:53".to_string(),
                name: "_acme-challenge.example.org.".to_string(),
                detail: "timed out".to_string(),
            }),
        );
        let err = get_cname(&transport, &server(), "example.org").await.unwrap_err();
        assert!(matches!(err, DnsError::ExchangeFailed { .. }));
    }
}
