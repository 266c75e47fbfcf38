//! Local ACME client integration abstraction

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::AcmeAccount;

/// An ACME client installation that can be inspected.
///
/// Implementations:
/// - `CertbotScanner` (binary crate)
#[async_trait]
pub trait AcmeClientScanner: Send + Sync {
    /// Client name, e.g. `certbot`.
    fn name(&self) -> &str;

    /// Whether the client is installed on this system.
    async fn found(&self) -> bool;

    /// ACME accounts configured in the client.
    async fn find_accounts(&self) -> CoreResult<Vec<AcmeAccount>>;

    /// DNS-01 token the client asks to publish, when running as its hook.
    async fn find_validation_token(&self) -> CoreResult<String>;

    /// Domain being validated, when running as the client's hook.
    async fn find_validation_domain(&self) -> CoreResult<String>;
}

/// Ordered set of known ACME client scanners.
#[derive(Clone, Default)]
pub struct AcmeClientRegistry {
    scanners: Vec<Arc<dyn AcmeClientScanner>>,
}

impl AcmeClientRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scanner; scanners are consulted in registration order.
    #[must_use]
    pub fn with(mut self, scanner: Arc<dyn AcmeClientScanner>) -> Self {
        self.scanners.push(scanner);
        self
    }

    /// Accounts of every installed client. Scanner failures are logged and skipped.
    pub async fn find_accounts(&self) -> Vec<AcmeAccount> {
        let mut accounts = Vec::new();
        for scanner in &self.scanners {
            if !scanner.found().await {
                log::debug!("ACME client {} not installed", scanner.name());
                continue;
            }
            log::info!(
                "Installation of ACME client {} found, looking for accounts",
                scanner.name()
            );
            match scanner.find_accounts().await {
                Ok(found) => {
                    log::info!("Found {} account(s)", found.len());
                    accounts.extend(found);
                }
                Err(e) => log::debug!(
                    "Error while looking for {} ACME accounts: {e}",
                    scanner.name()
                ),
            }
        }
        accounts
    }

    /// First non-empty validation token offered by a scanner.
    pub async fn find_validation_token(&self) -> Option<String> {
        for scanner in &self.scanners {
            match scanner.find_validation_token().await {
                Ok(token) if !token.is_empty() => return Some(token),
                Ok(_) => {}
                Err(e) => log::debug!("{}: {e}", scanner.name()),
            }
        }
        None
    }

    /// First non-empty validation domain offered by a scanner.
    pub async fn find_validation_domain(&self) -> Option<String> {
        for scanner in &self.scanners {
            match scanner.find_validation_domain().await {
                Ok(domain) if !domain.is_empty() => return Some(domain),
                Ok(_) => {}
                Err(e) => log::debug!("{}: {e}", scanner.name()),
            }
        }
        None
    }
}
