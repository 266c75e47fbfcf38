//! acme-dns account and wire types.

use serde::{Deserialize, Serialize};

/// Credentials of an acme-dns account, bound to one domain.
///
/// Field names follow the JSON storage format shared with other acme-dns
/// clients, so existing storage files can be read as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Delegation target, e.g. `d420c923-bbd7-4056-ab64-c3ca54c9b3cf.auth.example.org`.
    #[serde(rename = "fulldomain")]
    pub full_domain: String,
    /// Subdomain part of `full_domain`, used when updating the TXT record.
    #[serde(rename = "subdomain")]
    pub sub_domain: String,
    pub username: String,
    pub password: String,
    /// acme-dns server the account was registered with.
    #[serde(rename = "server_url", default)]
    pub server_url: String,
    /// CIDR ranges allowed to update the TXT record. Empty allows any source.
    #[serde(rename = "allowfrom", default)]
    pub allow_from: Vec<String>,
}

/// Body of `POST /register`.
#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    #[serde(rename = "allowfrom", skip_serializing_if = "no_entries")]
    pub allow_from: &'a [String],
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn no_entries(list: &&[String]) -> bool {
    list.is_empty()
}

/// Successful `POST /register` response.
#[derive(Debug, Deserialize)]
pub(crate) struct RegisterResponse {
    pub username: String,
    pub password: String,
    #[serde(rename = "fulldomain")]
    pub full_domain: String,
    #[serde(rename = "subdomain")]
    pub sub_domain: String,
    #[serde(rename = "allowfrom", default)]
    pub allow_from: Vec<String>,
}

impl RegisterResponse {
    pub(crate) fn into_account(self, server_url: &str) -> Account {
        Account {
            full_domain: self.full_domain,
            sub_domain: self.sub_domain,
            username: self.username,
            password: self.password,
            server_url: server_url.to_string(),
            allow_from: self.allow_from,
        }
    }
}

/// Body of `POST /update`.
#[derive(Debug, Serialize)]
pub(crate) struct UpdateRequest<'a> {
    pub subdomain: &'a str,
    pub txt: &'a str,
}

/// Error body returned by acme-dns, e.g. `{"error": "bad_txt"}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: String,
}
