//! acme-dns REST client

mod error;
mod http;
mod provider;

use reqwest::Client;

use crate::error::Result;
use crate::http_client::create_http_client;

/// Retries for the idempotent `/update` call
pub(crate) const UPDATE_MAX_RETRIES: u32 = 2;

/// HTTP client for acme-dns servers.
///
/// Stateless apart from the connection pool; the server is passed per call
/// (registration) or taken from the account (updates).
#[derive(Clone, Debug)]
pub struct AcmeDnsClient {
    pub(crate) client: Client,
}

impl AcmeDnsClient {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: create_http_client()?,
        })
    }

    /// Use a preconfigured `reqwest` client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}
