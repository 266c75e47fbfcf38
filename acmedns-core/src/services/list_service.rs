//! Delegation status of every stored account

use std::sync::Arc;

use serde::Serialize;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::types::Account;

/// Classification of a stored delegation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "camelCase")]
pub enum DelegationStatus {
    /// The CNAME points at the account's delegated domain.
    Working,
    /// A CNAME exists but points elsewhere.
    Dysfunctional { target: String },
    /// The CNAME query failed, including when no record exists.
    Errored(String),
}

/// One stored account and its delegation status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationCheck {
    pub domain: String,
    pub account: Account,
    pub status: DelegationStatus,
}

/// Account listing service
pub struct ListService {
    ctx: Arc<ServiceContext>,
}

impl ListService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Check the CNAME of every stored domain, in storage order.
    pub async fn list(&self) -> CoreResult<Vec<DelegationCheck>> {
        let accounts = self.ctx.account_store.fetch_all().await?;
        let mut checks = Vec::with_capacity(accounts.len());

        for (domain, account) in accounts {
            let status = match self.ctx.dns.get_cname(&domain).await {
                Ok(cname) if cname.correct_target(&account.full_domain) => DelegationStatus::Working,
                Ok(cname) => DelegationStatus::Dysfunctional {
                    target: cname.target,
                },
                Err(e) => {
                    log::debug!("CNAME lookup for {domain} failed: {e}");
                    DelegationStatus::Errored(e.to_string())
                }
            };
            checks.push(DelegationCheck {
                domain,
                account,
                status,
            });
        }

        Ok(checks)
    }
}
