//! Command implementations

pub mod check;
pub mod list;
pub mod register;
pub mod validate;
pub mod wizard;

use std::sync::Arc;

use acmedns_core::services::ServiceContext;
use acmedns_core::traits::AcmeClientRegistry;
use acmedns_core::types::ClientConfig;
use acmedns_dns::DnsClient;
use acmedns_provider::AcmeDnsClient;

use crate::adapters::{CertbotScanner, FileAccountStore};

/// Wire the system adapters into a service context.
pub fn build_context(config: ClientConfig) -> anyhow::Result<Arc<ServiceContext>> {
    let dns = DnsClient::hickory(config.dns_server.clone(), config.query_timeout);
    let account_store = Arc::new(FileAccountStore::new(config.storage_path.clone()));
    let registration_client = Arc::new(AcmeDnsClient::new()?);
    let acme_clients = AcmeClientRegistry::new().with(Arc::new(CertbotScanner::new()));

    Ok(Arc::new(ServiceContext::new(
        dns,
        account_store,
        registration_client,
        acme_clients,
        config,
    )))
}
