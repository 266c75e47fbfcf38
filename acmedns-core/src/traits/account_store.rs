//! acme-dns account storage abstraction

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::Account;

/// Domain → acme-dns account storage.
///
/// `put` only stages a change; `save` persists all staged changes.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Account for `domain`, or `None` when none is stored.
    async fn fetch(&self, domain: &str) -> CoreResult<Option<Account>>;

    /// All stored accounts, keyed by domain.
    async fn fetch_all(&self) -> CoreResult<BTreeMap<String, Account>>;

    /// Stage `account` for `domain`.
    async fn put(&self, domain: &str, account: Account) -> CoreResult<()>;

    /// Persist staged changes.
    async fn save(&self) -> CoreResult<()>;
}
