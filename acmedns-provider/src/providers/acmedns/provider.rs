//! `RegistrationClient` implementation

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ProviderErrorMapper, RegistrationClient};
use crate::types::{Account, RegisterRequest, RegisterResponse, UpdateRequest};
use crate::utils::log_sanitizer::mask_secret;

use super::{AcmeDnsClient, UPDATE_MAX_RETRIES};

const HEADER_API_USER: &str = "x-api-user";
const HEADER_API_KEY: &str = "x-api-key";

/// HTTP status of a successful registration
const STATUS_CREATED: u16 = 201;
/// HTTP status of a successful update
const STATUS_OK: u16 = 200;

impl AcmeDnsClient {
    fn auth_headers(&self, account: &Account) -> Result<HeaderMap> {
        let value = |v: &str, what: &str| {
            HeaderValue::from_str(v).map_err(|e| ProviderError::InvalidParameter {
                server: self.server_name(&account.server_url),
                param: what.to_string(),
                detail: e.to_string(),
            })
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(HEADER_API_USER),
            value(&account.username, "username")?,
        );
        let mut key = value(&account.password, "password")?;
        key.set_sensitive(true);
        headers.insert(HeaderName::from_static(HEADER_API_KEY), key);
        Ok(headers)
    }
}

#[async_trait]
impl RegistrationClient for AcmeDnsClient {
    async fn register_account(&self, server_url: &str, allow_from: &[String]) -> Result<Account> {
        log::info!("Registering new acme-dns account at {server_url}");
        let body = RegisterRequest { allow_from };
        // Not idempotent: a retried request could create a second account.
        let text = self
            .post(server_url, "register", HeaderMap::new(), &body, STATUS_CREATED, 0)
            .await?;

        let response: RegisterResponse =
            HttpUtils::parse_json(&text, &self.server_name(server_url))?;
        let account = response.into_account(server_url);
        log::debug!(
            "Registered account {} (password {}) for {}",
            account.username,
            mask_secret(&account.password),
            account.full_domain
        );
        Ok(account)
    }

    async fn update_txt_record(&self, account: &Account, token: &str) -> Result<()> {
        log::info!("Updating TXT record of {}", account.full_domain);
        let headers = self.auth_headers(account)?;
        let body = UpdateRequest {
            subdomain: &account.sub_domain,
            txt: token,
        };
        self.post(
            &account.server_url,
            "update",
            headers,
            &body,
            STATUS_OK,
            UPDATE_MAX_RETRIES,
        )
        .await?;
        Ok(())
    }
}
