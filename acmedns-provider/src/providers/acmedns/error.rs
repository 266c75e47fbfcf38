//! acme-dns error mapping

use crate::error::ProviderError;
use crate::traits::{ProviderErrorMapper, RawApiError};

use super::AcmeDnsClient;

/// acme-dns error codes
/// Reference: <https://github.com/joohoi/acme-dns#api>
impl ProviderErrorMapper for AcmeDnsClient {
    fn map_error(&self, server_url: &str, raw: RawApiError) -> ProviderError {
        let server = self.server_name(server_url);
        let RawApiError { status, code, body } = raw;
        match (status, code.as_deref()) {
            // Bad request parameters
            (
                400,
                Some(code @ ("bad_txt" | "bad_subdomain" | "bad_allowfrom" | "malformed_json_payload")),
            ) => {
                let param = match code {
                    "bad_txt" => "txt",
                    "bad_subdomain" => "subdomain",
                    "bad_allowfrom" => "allowfrom",
                    _ => "body",
                };
                ProviderError::InvalidParameter {
                    server,
                    param: param.to_string(),
                    detail: code.to_string(),
                }
            }

            // Credentials rejected, or source address outside allowfrom
            (401 | 403, code) => ProviderError::Unauthorized {
                server,
                raw_message: code.map(str::to_string),
            },

            (status, Some(code)) => ProviderError::UnexpectedStatus {
                server,
                status,
                raw_message: code.to_string(),
            },
            (status, None) => ProviderError::UnexpectedStatus {
                server,
                status,
                raw_message: body,
            },
        }
    }
}
