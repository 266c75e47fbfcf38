//! Certbot manual-auth hook: submit the validation token to acme-dns

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::utils::normalize_domain;

/// Validation hook service
pub struct ValidationService {
    ctx: Arc<ServiceContext>,
}

impl ValidationService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Push the running validation's token to the domain's acme-dns account.
    ///
    /// Returns the domain the token was published for.
    pub async fn validate(&self) -> CoreResult<String> {
        let scanners = &self.ctx.acme_clients;
        let token = scanners.find_validation_token().await.ok_or_else(|| {
            CoreError::ValidationError("No validation token found from ACME clients".to_string())
        })?;
        let domain = scanners.find_validation_domain().await.ok_or_else(|| {
            CoreError::ValidationError("No validation domain found from ACME clients".to_string())
        })?;
        let domain = normalize_domain(&domain);

        let account = self
            .ctx
            .account_store
            .fetch(&domain)
            .await?
            .ok_or_else(|| CoreError::AccountNotFound(domain.clone()))?;

        log::debug!("Updating TXT record of {} for domain {domain}", account.full_domain);
        self.ctx
            .registration_client
            .update_txt_record(&account, &token)
            .await?;
        log::info!("Validation token published for domain {domain}");
        Ok(domain)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_context, test_account, test_config, MockScanner, TestContext};
    use crate::traits::AcmeClientRegistry;
    use acmedns_dns::test_utils::ScriptedTransport;
    use acmedns_provider::ProviderError;

    const TOKEN: &str = "___validation_token_received_from_the_ca___";

    fn setup(scanners: AcmeClientRegistry) -> (ValidationService, TestContext) {
        let t = create_test_context(ScriptedTransport::new(), test_config(), scanners);
        (ValidationService::new(t.ctx.clone()), t)
    }

    fn certbot() -> AcmeClientRegistry {
        AcmeClientRegistry::new()
            .with(Arc::new(MockScanner::new("other").not_installed()))
            .with(Arc::new(
                MockScanner::new("certbot").with_validation(TOKEN, "*.example.org"),
            ))
    }

    #[tokio::test]
    async fn test_token_submitted_for_stored_account() {
        let (service, t) = setup(certbot());
        t.store
            .insert("example.org", test_account("foo.auth.example.com"))
            .await;

        let domain = service.validate().await.unwrap();
        assert_eq!(domain, "example.org");

        let updates = t.registration.updates().await;
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0.full_domain, "foo.auth.example.com");
        assert_eq!(updates[0].1, TOKEN);
    }

    #[tokio::test]
    async fn test_missing_account() {
        let (service, t) = setup(certbot());
        let err = service.validate().await.unwrap_err();
        assert!(matches!(err, CoreError::AccountNotFound(ref d) if d == "example.org"));
        assert!(t.registration.updates().await.is_empty());
    }

    #[tokio::test]
    async fn test_no_validation_in_progress() {
        let scanners = AcmeClientRegistry::new().with(Arc::new(MockScanner::new("certbot")));
        let (service, _t) = setup(scanners);
        let err = service.validate().await.unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_update_error_propagates() {
        let (service, t) = setup(certbot());
        t.store
            .insert("example.org", test_account("foo.auth.example.com"))
            .await;
        t.registration
            .set_error(ProviderError::Unauthorized {
                server: "https://acme-dns.example.com".into(),
                raw_message: Some("forbidden".into()),
            })
            .await;

        let err = service.validate().await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Provider(ProviderError::Unauthorized { .. })
        ));
    }
}
