//! Reconciliation of stored accounts with live DNS state

use std::sync::Arc;

use serde::Serialize;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::types::{AcmeAccount, ConfigurationState, Diagnostic, DiagnosticSource};
use crate::utils::normalize_domain;

/// Suggested CAA record value for a local ACME account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaaSuggestion {
    pub account: AcmeAccount,
    /// Property value for `issue` / `issuewild`, when it could be derived.
    pub value: Option<String>,
}

/// Configuration check service
pub struct ConfigurationService {
    ctx: Arc<ServiceContext>,
}

impl ConfigurationService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Gather the CNAME, CAA and stored account state of `domain`.
    ///
    /// Never fails; sub-query errors end up in
    /// [`ConfigurationState::diagnostics`].
    pub async fn build_configuration_state(&self, domain: &str) -> ConfigurationState {
        let mut state = ConfigurationState::new(domain);

        match self.ctx.dns.get_cname(domain).await {
            Ok(cname) => state.cname = cname,
            Err(e) => {
                log::debug!("{e}");
                state
                    .diagnostics
                    .push(Diagnostic::from_dns(DiagnosticSource::Cname, &e));
            }
        }

        match self.ctx.dns.get_caa(domain).await {
            Ok(caa) => state.caa = caa,
            Err(e) => {
                log::debug!("{e}");
                state
                    .diagnostics
                    .push(Diagnostic::from_dns(DiagnosticSource::Caa, &e));
            }
        }

        match self.ctx.account_for(domain).await {
            Ok(account) => state.account = account,
            Err(e) => {
                log::debug!("{e}");
                state
                    .diagnostics
                    .push(Diagnostic::from_core(DiagnosticSource::Account, &e));
            }
        }

        state
    }

    /// Domains to check: the requested ones, or every stored domain when
    /// none were requested.
    pub async fn domains_to_check(&self, requested: &[String]) -> CoreResult<Vec<String>> {
        let requested: Vec<String> = requested
            .iter()
            .map(|d| normalize_domain(d))
            .filter(|d| !d.is_empty())
            .collect();
        if !requested.is_empty() {
            return Ok(requested);
        }
        Ok(self
            .ctx
            .account_store
            .fetch_all()
            .await?
            .into_keys()
            .collect())
    }

    /// Configuration state of each domain, in order.
    pub async fn check(&self, requested: &[String]) -> CoreResult<Vec<ConfigurationState>> {
        let mut states = Vec::new();
        for domain in self.domains_to_check(requested).await? {
            states.push(self.build_configuration_state(&domain).await);
        }
        Ok(states)
    }

    /// Like [`check`](Self::check), but fails on the first sub-query error
    /// that is not an absent record.
    pub async fn check_strict(&self, requested: &[String]) -> CoreResult<Vec<ConfigurationState>> {
        self.check(requested)
            .await?
            .into_iter()
            .map(ConfigurationState::into_strict)
            .collect()
    }

    /// CAA record values for every ACME account found on this system.
    pub async fn caa_suggestions(&self) -> Vec<CaaSuggestion> {
        self.ctx
            .acme_clients
            .find_accounts()
            .await
            .into_iter()
            .map(|account| {
                let value = match account.caa_record_value() {
                    Ok(value) => Some(value),
                    Err(e) => {
                        log::info!("Error while generating CAA record string: {e}");
                        None
                    }
                };
                CaaSuggestion { account, value }
            })
            .collect()
    }
}
