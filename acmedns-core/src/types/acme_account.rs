//! ACME accounts found in local ACME client installations.

use serde::Serialize;
use url::Url;

use crate::error::{CoreError, CoreResult};

/// An ACME (certificate authority) account of a local ACME client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcmeAccount {
    /// Account URI at the CA.
    pub uri: String,
    /// First contact address, if any.
    pub contact: String,
    /// File the account was read from.
    pub file_path: String,
    /// Name of the ACME client that owns the account.
    pub client: String,
}

impl AcmeAccount {
    /// CAA property value binding issuance to this account and to DNS-01.
    ///
    /// The issuer domain is the last two labels of the account URI host, e.g.
    /// `letsencrypt.org` for `https://acme-v02.api.letsencrypt.org/acme/acct/1`.
    pub fn caa_record_value(&self) -> CoreResult<String> {
        let url = Url::parse(&self.uri)
            .map_err(|e| CoreError::InvalidAccountUri(format!("{}: {e}", self.uri)))?;
        let host = url.host_str().unwrap_or_default();
        let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
        if labels.len() < 2 {
            return Err(CoreError::InvalidAccountUri(host.to_string()));
        }
        let ca_domain = labels[labels.len() - 2..].join(".");
        Ok(format!(
            "{ca_domain}; validationmethods=dns-01; accounturi={}",
            self.uri
        ))
    }
}
