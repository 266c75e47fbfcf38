//! Type definitions

mod acme_account;
mod config;
mod state;

pub use acme_account::AcmeAccount;
pub use config::{
    ClientConfig, MonitorOptions, DEFAULT_DNS_SERVER, DEFAULT_POLL_INTERVAL, DEFAULT_STORAGE_PATH,
    PUBLIC_ACME_DNS,
};
pub use state::{ConfigurationState, Diagnostic, DiagnosticSource};

// Re-export library types
pub use acmedns_dns::{CaaCheckResult, CaaRecord, CnameRecord, NameServer};
pub use acmedns_provider::Account;
