//! Runtime configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use acmedns_dns::{NameServer, DEFAULT_QUERY_TIMEOUT};

/// Public acme-dns instance. Registering there requires explicit consent.
pub const PUBLIC_ACME_DNS: &str = "https://auth.acme-dns.io";

/// Fallback nameserver when no authoritative server is found.
pub const DEFAULT_DNS_SERVER: &str = "1.1.1.1:53";

/// Default location of the acme-dns account storage.
pub const DEFAULT_STORAGE_PATH: &str = "/etc/acmedns/clientstorage.json";

/// Delay between two monitor polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Polling behavior of the change monitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorOptions {
    pub interval: Duration,
    /// Give up after this long. `None` polls until cancelled.
    pub deadline: Option<Duration>,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            deadline: None,
        }
    }
}

/// Settings shared by all commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Nameserver queried when authoritative discovery fails.
    pub dns_server: NameServer,
    /// acme-dns server used for new registrations.
    pub server: String,
    /// CIDR ranges allowed to update TXT records of new accounts.
    pub allow_list: Vec<String>,
    /// Allow registering with the public instance.
    pub dangerous: bool,
    pub storage_path: PathBuf,
    pub query_timeout: Duration,
    pub monitor: MonitorOptions,
    pub verbose: bool,
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            dns_server: NameServer::new("1.1.1.1"),
            server: PUBLIC_ACME_DNS.to_string(),
            allow_list: Vec::new(),
            dangerous: false,
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            monitor: MonitorOptions::default(),
            verbose: false,
            debug: false,
        }
    }
}

impl ClientConfig {
    /// Registration against the public instance without consent.
    pub fn is_refused_public_registration(&self) -> bool {
        !self.dangerous && self.server.trim_end_matches('/') == PUBLIC_ACME_DNS
    }
}
