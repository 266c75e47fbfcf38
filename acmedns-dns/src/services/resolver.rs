//! DNS transport: the seam between the checkers and the network.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::{
    config::{NameServerConfigGroup, ResolverConfig, ResolverOpts},
    name_server::TokioConnectionProvider,
    proto::rr::{RData, Record, RecordType},
    TokioResolver,
};

use crate::error::{DnsError, DnsResult};
use crate::types::{NameServer, QueryType, RawRecord};

/// Default per-query timeout.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Network operations the checkers depend on.
///
/// The production implementation is [`HickoryTransport`]; tests script answers
/// through their own implementations.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// Look up the NS host names of `zone` through the system stub resolver.
    ///
    /// An empty vector means the zone exists but has no NS records.
    async fn lookup_ns(&self, zone: &str) -> DnsResult<Vec<String>>;

    /// Send one recursion-desired query for `name` directly to `server` and
    /// return the answer section. An empty answer is `Ok(vec![])`.
    async fn exchange(
        &self,
        server: &NameServer,
        name: &str,
        query_type: QueryType,
    ) -> DnsResult<Vec<RawRecord>>;
}

/// [`DnsTransport`] backed by hickory.
///
/// Every query builds a fresh resolver so nothing is answered from a cache.
pub struct HickoryTransport {
    timeout: Duration,
}

impl HickoryTransport {
    pub fn new(timeout: Duration) -> Self {
        log::debug!(
            "DNS transport with {}s query timeout, one attempt",
            timeout.as_secs()
        );
        Self { timeout }
    }

    fn options(&self) -> ResolverOpts {
        let mut opts = ResolverOpts::default();
        opts.timeout = self.timeout;
        opts.attempts = 1;
        opts
    }

    /// Resolve the nameserver host to an address to send queries to.
    async fn server_ip(&self, server: &NameServer) -> DnsResult<IpAddr> {
        if let Some(ip) = server.ip() {
            return Ok(ip);
        }
        let resolver = build_system_resolver(self.options());
        let response =
            resolver
                .lookup_ip(server.host.as_str())
                .await
                .map_err(|e| DnsError::LookupFailed {
                    name: server.host.clone(),
                    detail: e.to_string(),
                })?;
        response
            .iter()
            .next()
            .ok_or_else(|| DnsError::LookupFailed {
                name: server.host.clone(),
                detail: "no addresses".to_string(),
            })
    }
}

impl Default for HickoryTransport {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY_TIMEOUT)
    }
}

#[async_trait]
impl DnsTransport for HickoryTransport {
    async fn lookup_ns(&self, zone: &str) -> DnsResult<Vec<String>> {
        let resolver = build_system_resolver(self.options());
        match resolver.ns_lookup(zone).await {
            Ok(response) => Ok(response
                .iter()
                .map(|ns| ns.to_string().trim_end_matches('.').to_string())
                .collect()),
            Err(e) if e.is_no_records_found() => Ok(Vec::new()),
            Err(e) => Err(DnsError::LookupFailed {
                name: zone.to_string(),
                detail: e.to_string(),
            }),
        }
    }

    async fn exchange(
        &self,
        server: &NameServer,
        name: &str,
        query_type: QueryType,
    ) -> DnsResult<Vec<RawRecord>> {
        let ip = self.server_ip(server).await?;
        let resolver = build_resolver_for_ns(ip, server.port, self.options());
        log::debug!("Querying {server} ({ip}) for {query_type} {name}");

        match resolver.lookup(name, record_type(query_type)).await {
            Ok(response) => Ok(response.record_iter().map(raw_record).collect()),
            Err(e) if e.is_no_records_found() => Ok(Vec::new()),
            Err(e) => Err(DnsError::ExchangeFailed {
                server: server.to_string(),
                name: name.to_string(),
                detail: e.to_string(),
            }),
        }
    }
}

fn record_type(query_type: QueryType) -> RecordType {
    match query_type {
        QueryType::Ns => RecordType::NS,
        QueryType::Cname => RecordType::CNAME,
        QueryType::Caa => RecordType::CAA,
    }
}

fn raw_record(record: &Record) -> RawRecord {
    match record.data() {
        RData::CNAME(cname) => RawRecord::Cname(cname.0.to_string()),
        RData::CAA(caa) => RawRecord::Caa {
            issuer_critical: caa.issuer_critical(),
            tag: caa.tag().as_str().to_string(),
            value: caa.raw_value().to_vec(),
        },
        other => RawRecord::Other(other.record_type().to_string()),
    }
}

/// Build a resolver that sends every query to `ns_ip:port`.
fn build_resolver_for_ns(ns_ip: IpAddr, port: u16, opts: ResolverOpts) -> TokioResolver {
    let config = ResolverConfig::from_parts(
        None,
        vec![],
        NameServerConfigGroup::from_ips_clear(&[ns_ip], port, true),
    );
    TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
        .with_options(opts)
        .build()
}

/// Build a resolver using the host system DNS configuration (with fallback).
fn build_system_resolver(opts: ResolverOpts) -> TokioResolver {
    #[cfg(any(unix, target_os = "windows"))]
    {
        match TokioResolver::builder_tokio() {
            Ok(mut builder) => {
                builder.options_mut().timeout = opts.timeout;
                builder.options_mut().attempts = opts.attempts;
                return builder.build();
            }
            Err(e) => {
                log::warn!(
                    "Failed to load system DNS configuration, falling back to defaults: {e}"
                );
            }
        }
    }

    TokioResolver::builder_with_config(ResolverConfig::default(), TokioConnectionProvider::default())
        .with_options(opts)
        .build()
}
