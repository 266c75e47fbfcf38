//! acme-dns account registration

use std::sync::Arc;

use crate::error::CoreResult;
use crate::services::{ConfigurationService, ServiceContext};
use crate::types::ConfigurationState;
use crate::utils::normalize_domain;

/// Result of a registration run. Every variant carries the state after the run.
#[derive(Debug, Clone)]
pub enum RegistrationOutcome {
    /// The public instance was selected without consent; nothing was changed.
    Refused(ConfigurationState),
    /// An account for the domain was already stored.
    AlreadyRegistered(ConfigurationState),
    /// A new account was registered and saved.
    Registered(ConfigurationState),
}

impl RegistrationOutcome {
    pub fn state(&self) -> &ConfigurationState {
        match self {
            Self::Refused(s) | Self::AlreadyRegistered(s) | Self::Registered(s) => s,
        }
    }
}

/// Registration service
pub struct RegistrationService {
    ctx: Arc<ServiceContext>,
    configuration: ConfigurationService,
}

impl RegistrationService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            configuration: ConfigurationService::new(ctx.clone()),
            ctx,
        }
    }

    /// Register an acme-dns account for `domain` unless one is stored.
    ///
    /// Flow: build state -> public instance guard -> register -> put + save.
    /// Any API or storage error aborts the run.
    pub async fn register(&self, domain: &str) -> CoreResult<RegistrationOutcome> {
        let domain = normalize_domain(domain);
        let mut state = self.configuration.build_configuration_state(&domain).await;
        let config = &self.ctx.config;

        if state.has_acmedns_account() {
            log::debug!("Acme-dns account already registered for domain {domain}");
            return Ok(RegistrationOutcome::AlreadyRegistered(state));
        }

        if config.is_refused_public_registration() {
            log::debug!("Refusing to register with public instance {}", config.server);
            return Ok(RegistrationOutcome::Refused(state));
        }

        let allow_from: Vec<String> = config
            .allow_list
            .iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();

        log::debug!("Registering new account with the acme-dns server");
        let account = self
            .ctx
            .registration_client
            .register_account(&config.server, &allow_from)
            .await?;

        log::debug!("Adding the registered acme-dns account to storage state");
        self.ctx.account_store.put(&domain, account.clone()).await?;
        log::debug!("Saving the acme-dns account storage to disk");
        self.ctx.account_store.save().await?;

        log::info!(
            "New acme-dns account for domain {domain} registered: {}",
            account.full_domain
        );
        state.account = Some(account);
        Ok(RegistrationOutcome::Registered(state))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::test_utils::{create_test_context, test_account, test_config, TestContext};
    use crate::traits::AcmeClientRegistry;
    use crate::types::{ClientConfig, PUBLIC_ACME_DNS};
    use acmedns_dns::test_utils::ScriptedTransport;
    use acmedns_dns::{QueryType, RawRecord};
    use acmedns_provider::ProviderError;

    fn setup(transport: ScriptedTransport, config: ClientConfig) -> (RegistrationService, TestContext) {
        let t = create_test_context(transport, config, AcmeClientRegistry::new());
        (RegistrationService::new(t.ctx.clone()), t)
    }

    #[tokio::test]
    async fn test_registration_makes_existing_cname_correct() {
        let transport = ScriptedTransport::new().with_answer(
            "_acme-challenge.example.org",
            QueryType::Cname,
            Ok(vec![RawRecord::Cname("foo.auth.example.com.".to_string())]),
        );
        let (service, t) = setup(transport, test_config());
        t.registration
            .set_account(test_account("foo.auth.example.com"))
            .await;

        let outcome = service.register("example.org").await.unwrap();
        assert!(matches!(outcome, RegistrationOutcome::Registered(_)));
        assert!(outcome.state().correct_cname());
        assert_eq!(t.transport.exchange_count(QueryType::Cname), 1);

        let saved = t.store.saved().await;
        assert_eq!(saved["example.org"].full_domain, "foo.auth.example.com");
        assert_eq!(saved["example.org"].server_url, "https://acme-dns.example.com");
    }

    #[tokio::test]
    async fn test_public_instance_refused_without_consent() {
        let config = ClientConfig {
            server: PUBLIC_ACME_DNS.to_string(),
            ..ClientConfig::default()
        };
        let (service, t) = setup(ScriptedTransport::new(), config);

        let outcome = service.register("example.org").await.unwrap();
        assert!(matches!(outcome, RegistrationOutcome::Refused(_)));
        assert!(t.registration.registrations().await.is_empty());
        assert!(t.store.saved().await.is_empty());
    }

    #[tokio::test]
    async fn test_public_instance_allowed_when_dangerous() {
        let config = ClientConfig {
            server: PUBLIC_ACME_DNS.to_string(),
            dangerous: true,
            allow_list: vec![" 192.168.0.0/24".to_string(), String::new()],
            ..ClientConfig::default()
        };
        let (service, t) = setup(ScriptedTransport::new(), config);

        let outcome = service.register("*.example.org").await.unwrap();
        assert!(matches!(outcome, RegistrationOutcome::Registered(_)));
        assert_eq!(
            t.registration.registrations().await,
            vec![(
                PUBLIC_ACME_DNS.to_string(),
                vec!["192.168.0.0/24".to_string()]
            )]
        );
        assert!(t.store.saved().await.contains_key("example.org"));
    }

    #[tokio::test]
    async fn test_existing_account_not_registered_again() {
        let config = ClientConfig {
            server: PUBLIC_ACME_DNS.to_string(),
            ..ClientConfig::default()
        };
        let (service, t) = setup(ScriptedTransport::new(), config);
        t.store
            .insert("example.org", test_account("foo.auth.example.com"))
            .await;

        let outcome = service.register("example.org").await.unwrap();
        assert!(matches!(outcome, RegistrationOutcome::AlreadyRegistered(_)));
        assert!(outcome.state().has_acmedns_account());
        assert!(t.registration.registrations().await.is_empty());
    }

    #[tokio::test]
    async fn test_api_error_aborts_without_storing() {
        let (service, t) = setup(ScriptedTransport::new(), test_config());
        t.registration
            .set_error(ProviderError::NetworkError {
                server: "https://acme-dns.example.com".into(),
                detail: "connection refused".into(),
            })
            .await;

        let err = service.register("example.org").await.unwrap_err();
        assert!(matches!(err, CoreError::Provider(_)));
        assert!(t.store.saved().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_error_aborts() {
        let (service, t) = setup(ScriptedTransport::new(), test_config());
        t.store.set_save_error(Some("read-only file system".into())).await;

        let err = service.register("example.org").await.unwrap_err();
        assert!(matches!(err, CoreError::StorageError(_)));
    }
}
