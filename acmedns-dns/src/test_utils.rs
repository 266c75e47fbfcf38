//! Scripted [`DnsTransport`] for tests.
//!
//! NS answers are keyed by zone; exchange answers are queued per
//! `(name, query type)` and the last queued answer repeats once the queue is
//! drained, so a polling loop keeps seeing the final state.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{DnsError, DnsResult};
use crate::services::DnsTransport;
use crate::types::{fqdn, NameServer, QueryType, RawRecord};

type AnswerQueue = VecDeque<DnsResult<Vec<RawRecord>>>;

/// Transport answering from a script instead of the network.
#[derive(Default)]
pub struct ScriptedTransport {
    ns: HashMap<String, Vec<String>>,
    answers: Mutex<HashMap<(String, QueryType), AnswerQueue>>,
    ns_queries: Mutex<Vec<String>>,
    exchanges: Mutex<Vec<(NameServer, String, QueryType)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// NS hosts returned for `zone`. Zones without an entry fail the lookup.
    #[must_use]
    pub fn with_ns(mut self, zone: &str, hosts: &[&str]) -> Self {
        self.ns.insert(
            zone.trim_end_matches('.').to_string(),
            hosts.iter().map(ToString::to_string).collect(),
        );
        self
    }

    /// Queue an answer for a query of `query_type` on `name`.
    #[must_use]
    pub fn with_answer(
        self,
        name: &str,
        query_type: QueryType,
        answer: DnsResult<Vec<RawRecord>>,
    ) -> Self {
        self.push_answer(name, query_type, answer);
        self
    }

    /// Queue an answer on an existing transport.
    pub fn push_answer(&self, name: &str, query_type: QueryType, answer: DnsResult<Vec<RawRecord>>) {
        self.answers
            .lock()
            .unwrap()
            .entry((fqdn(name), query_type))
            .or_default()
            .push_back(answer);
    }

    /// Zones passed to [`DnsTransport::lookup_ns`], in call order.
    pub fn ns_queries(&self) -> Vec<String> {
        self.ns_queries.lock().unwrap().clone()
    }

    /// Queries passed to [`DnsTransport::exchange`], in call order.
    pub fn exchanges(&self) -> Vec<(NameServer, String, QueryType)> {
        self.exchanges.lock().unwrap().clone()
    }

    /// Number of exchanges for `query_type`.
    pub fn exchange_count(&self, query_type: QueryType) -> usize {
        self.exchanges
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, _, t)| *t == query_type)
            .count()
    }
}

#[async_trait]
impl DnsTransport for ScriptedTransport {
    async fn lookup_ns(&self, zone: &str) -> DnsResult<Vec<String>> {
        let zone = zone.trim_end_matches('.').to_string();
        self.ns_queries.lock().unwrap().push(zone.clone());
        self.ns.get(&zone).cloned().ok_or(DnsError::LookupFailed {
            name: zone,
            detail: "NXDOMAIN".to_string(),
        })
    }

    async fn exchange(
        &self,
        server: &NameServer,
        name: &str,
        query_type: QueryType,
    ) -> DnsResult<Vec<RawRecord>> {
        self.exchanges
            .lock()
            .unwrap()
            .push((server.clone(), name.to_string(), query_type));

        let mut answers = self.answers.lock().unwrap();
        match answers.get_mut(&(fqdn(name), query_type)) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or(Ok(Vec::new())),
            None => Ok(Vec::new()),
        }
    }
}
