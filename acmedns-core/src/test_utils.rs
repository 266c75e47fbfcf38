//! Test helper module
//!
//! Mock collaborators and factory methods for service tests.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::Arc;

use acmedns_dns::test_utils::ScriptedTransport;
use acmedns_dns::{DnsClient, NameServer};
use acmedns_provider::{ProviderError, RegistrationClient};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::{AccountStore, AcmeClientRegistry, AcmeClientScanner};
use crate::types::{Account, AcmeAccount, ClientConfig};

// ===== MockAccountStore =====

#[derive(Default)]
pub struct MockAccountStore {
    staged: RwLock<BTreeMap<String, Account>>,
    saved: RwLock<BTreeMap<String, Account>>,
    /// If Some, `save` returns this error
    save_error: RwLock<Option<String>>,
}

impl MockAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `account` as if it had been saved earlier.
    pub async fn insert(&self, domain: &str, account: Account) {
        self.staged
            .write()
            .await
            .insert(domain.to_string(), account.clone());
        self.saved.write().await.insert(domain.to_string(), account);
    }

    pub async fn set_save_error(&self, err: Option<String>) {
        *self.save_error.write().await = err;
    }

    /// Accounts persisted by `save`.
    pub async fn saved(&self) -> BTreeMap<String, Account> {
        self.saved.read().await.clone()
    }
}

#[async_trait]
impl AccountStore for MockAccountStore {
    async fn fetch(&self, domain: &str) -> CoreResult<Option<Account>> {
        Ok(self.staged.read().await.get(domain).cloned())
    }

    async fn fetch_all(&self) -> CoreResult<BTreeMap<String, Account>> {
        Ok(self.staged.read().await.clone())
    }

    async fn put(&self, domain: &str, account: Account) -> CoreResult<()> {
        self.staged.write().await.insert(domain.to_string(), account);
        Ok(())
    }

    async fn save(&self) -> CoreResult<()> {
        if let Some(ref msg) = *self.save_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        *self.saved.write().await = self.staged.read().await.clone();
        Ok(())
    }
}

// ===== MockRegistrationClient =====

#[derive(Default)]
pub struct MockRegistrationClient {
    /// Account handed out by `register_account`
    account: RwLock<Option<Account>>,
    /// If Some, every call fails with this error
    error: RwLock<Option<ProviderError>>,
    registrations: RwLock<Vec<(String, Vec<String>)>>,
    updates: RwLock<Vec<(Account, String)>>,
}

impl MockRegistrationClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_account(&self, account: Account) {
        *self.account.write().await = Some(account);
    }

    pub async fn set_error(&self, err: ProviderError) {
        *self.error.write().await = Some(err);
    }

    /// `(server, allow_from)` of every registration call
    pub async fn registrations(&self) -> Vec<(String, Vec<String>)> {
        self.registrations.read().await.clone()
    }

    /// `(account, token)` of every update call
    pub async fn updates(&self) -> Vec<(Account, String)> {
        self.updates.read().await.clone()
    }
}

#[async_trait]
impl RegistrationClient for MockRegistrationClient {
    async fn register_account(
        &self,
        server_url: &str,
        allow_from: &[String],
    ) -> acmedns_provider::Result<Account> {
        self.registrations
            .write()
            .await
            .push((server_url.to_string(), allow_from.to_vec()));
        if let Some(e) = self.error.read().await.clone() {
            return Err(e);
        }
        let mut account = self.account.read().await.clone().unwrap_or_default();
        account.server_url = server_url.to_string();
        account.allow_from = allow_from.to_vec();
        Ok(account)
    }

    async fn update_txt_record(
        &self,
        account: &Account,
        token: &str,
    ) -> acmedns_provider::Result<()> {
        if let Some(e) = self.error.read().await.clone() {
            return Err(e);
        }
        self.updates
            .write()
            .await
            .push((account.clone(), token.to_string()));
        Ok(())
    }
}

// ===== MockScanner =====

pub struct MockScanner {
    name: String,
    installed: bool,
    accounts: Vec<AcmeAccount>,
    validation: Option<(String, String)>,
}

impl MockScanner {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            installed: true,
            accounts: Vec::new(),
            validation: None,
        }
    }

    #[must_use]
    pub fn not_installed(mut self) -> Self {
        self.installed = false;
        self
    }

    #[must_use]
    pub fn with_account(mut self, uri: &str) -> Self {
        self.accounts.push(AcmeAccount {
            uri: uri.to_string(),
            contact: "mailto:admin@example.org".to_string(),
            file_path: format!("/etc/{}/regr.json", self.name),
            client: self.name.clone(),
        });
        self
    }

    /// Token and domain reported as the running validation.
    #[must_use]
    pub fn with_validation(mut self, token: &str, domain: &str) -> Self {
        self.validation = Some((token.to_string(), domain.to_string()));
        self
    }
}

#[async_trait]
impl AcmeClientScanner for MockScanner {
    fn name(&self) -> &str {
        &self.name
    }

    async fn found(&self) -> bool {
        self.installed
    }

    async fn find_accounts(&self) -> CoreResult<Vec<AcmeAccount>> {
        Ok(self.accounts.clone())
    }

    async fn find_validation_token(&self) -> CoreResult<String> {
        self.validation
            .as_ref()
            .map(|(token, _)| token.clone())
            .ok_or_else(|| CoreError::ValidationError("no validation token".to_string()))
    }

    async fn find_validation_domain(&self) -> CoreResult<String> {
        self.validation
            .as_ref()
            .map(|(_, domain)| domain.clone())
            .ok_or_else(|| CoreError::ValidationError("no validation domain".to_string()))
    }
}

// ===== Factory methods =====

/// Account with the given delegation target.
pub fn test_account(full_domain: &str) -> Account {
    Account {
        full_domain: full_domain.to_string(),
        sub_domain: full_domain.split('.').next().unwrap_or_default().to_string(),
        username: "c36f50e8-4632-44f0-83fe-e070fef28a10".to_string(),
        password: "htB9mR9DYgcu9bX_afHF62erXaH2TS7bg9KW3F7Z".to_string(),
        server_url: "https://acme-dns.example.com".to_string(),
        allow_from: Vec::new(),
    }
}

/// Configuration pointing at a private acme-dns server.
pub fn test_config() -> ClientConfig {
    ClientConfig {
        server: "https://acme-dns.example.com".to_string(),
        ..ClientConfig::default()
    }
}

/// Mocks behind a `ServiceContext`.
pub struct TestContext {
    pub ctx: Arc<ServiceContext>,
    pub transport: Arc<ScriptedTransport>,
    pub store: Arc<MockAccountStore>,
    pub registration: Arc<MockRegistrationClient>,
}

/// Create a `ServiceContext` for tests
pub fn create_test_context(
    transport: ScriptedTransport,
    config: ClientConfig,
    acme_clients: AcmeClientRegistry,
) -> TestContext {
    let transport = Arc::new(transport);
    let store = Arc::new(MockAccountStore::new());
    let registration = Arc::new(MockRegistrationClient::new());
    let dns = DnsClient::new(transport.clone(), NameServer::new("1.1.1.1"));

    let ctx = Arc::new(ServiceContext::new(
        dns,
        store.clone(),
        registration.clone(),
        acme_clients,
        config,
    ));

    TestContext {
        ctx,
        transport,
        store,
        registration,
    }
}
