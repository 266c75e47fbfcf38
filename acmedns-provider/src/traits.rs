use async_trait::async_trait;

use crate::error::Result;
use crate::types::Account;

/// Raw API error (internal use)
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// HTTP status code
    pub status: u16,
    /// Error code from the `{"error": ...}` body, if the body had one
    pub code: Option<String>,
    /// Raw response body
    pub body: String,
}

/// Error mapping trait (internal use)
///
/// Maps raw API failures onto [`ProviderError`](crate::ProviderError).
pub(crate) trait ProviderErrorMapper {
    /// Server identifier used in errors
    fn server_name(&self, server_url: &str) -> String {
        server_url.trim_end_matches('/').to_string()
    }

    /// Map a raw API error to the unified error type
    fn map_error(&self, server_url: &str, raw: RawApiError) -> crate::error::ProviderError;
}

/// Operations against an acme-dns server.
#[async_trait]
pub trait RegistrationClient: Send + Sync {
    /// Register a new account at `server_url`.
    ///
    /// `allow_from` restricts which source addresses may update the TXT
    /// record; an empty list allows any source.
    async fn register_account(&self, server_url: &str, allow_from: &[String]) -> Result<Account>;

    /// Publish `token` as the TXT record of `account`, at the server the
    /// account was registered with.
    async fn update_txt_record(&self, account: &Account, token: &str) -> Result<()>;
}
