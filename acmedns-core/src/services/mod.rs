//! Business logic service layer

mod configuration_service;
mod list_service;
mod monitor_service;
mod registration_service;
mod validation_service;

pub use configuration_service::{CaaSuggestion, ConfigurationService};
pub use list_service::{DelegationCheck, DelegationStatus, ListService};
pub use monitor_service::{MonitorObserver, MonitorOutcome, MonitorService, NoopObserver};
pub use registration_service::{RegistrationOutcome, RegistrationService};
pub use validation_service::ValidationService;

use std::sync::Arc;

use acmedns_dns::DnsClient;

use crate::error::CoreResult;
use crate::traits::{AccountStore, AcmeClientRegistry, RegistrationClient};
use crate::types::{Account, ClientConfig};

/// Service context - holds all dependencies
///
/// The binary creates this context and injects the platform-specific
/// storage, HTTP and scanner implementations.
pub struct ServiceContext {
    /// DNS lookups
    pub dns: DnsClient,
    /// acme-dns account storage
    pub account_store: Arc<dyn AccountStore>,
    /// acme-dns API client
    pub registration_client: Arc<dyn RegistrationClient>,
    /// Local ACME client scanners
    pub acme_clients: AcmeClientRegistry,
    pub config: ClientConfig,
}

impl ServiceContext {
    /// Create a service context
    #[must_use]
    pub fn new(
        dns: DnsClient,
        account_store: Arc<dyn AccountStore>,
        registration_client: Arc<dyn RegistrationClient>,
        acme_clients: AcmeClientRegistry,
        config: ClientConfig,
    ) -> Self {
        Self {
            dns,
            account_store,
            registration_client,
            acme_clients,
            config,
        }
    }

    /// Stored account for `domain`, if any.
    pub async fn account_for(&self, domain: &str) -> CoreResult<Option<Account>> {
        self.account_store.fetch(domain).await
    }
}
