//! acme-dns HTTP request methods

use reqwest::header::HeaderMap;
use serde::Serialize;
use url::Url;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ProviderErrorMapper, RawApiError};
use crate::types::ApiErrorBody;

use super::AcmeDnsClient;

impl AcmeDnsClient {
    /// Build `<server_url>/<action>`, keeping any path prefix of the server.
    pub(crate) fn endpoint(server_url: &str, action: &str) -> Result<Url> {
        let invalid = |detail: String| ProviderError::InvalidServerUrl {
            server: server_url.to_string(),
            detail,
        };

        let mut url = Url::parse(server_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        url.path_segments_mut()
            .map_err(|()| invalid("URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push(action);
        Ok(url)
    }

    /// POST a JSON body and return the response text if the status matches
    /// `expected_status`.
    pub(crate) async fn post<B: Serialize + Sync>(
        &self,
        server_url: &str,
        action: &str,
        headers: HeaderMap,
        body: &B,
        expected_status: u16,
        max_retries: u32,
    ) -> Result<String> {
        let url = Self::endpoint(server_url, action)?;
        let server = self.server_name(server_url);

        let request = self.client.post(url.clone()).headers(headers).json(body);
        let (status, text) = if max_retries == 0 {
            HttpUtils::execute_request(request, &server, "POST", url.as_str()).await?
        } else {
            HttpUtils::execute_request_with_retry(
                request,
                &server,
                "POST",
                url.as_str(),
                max_retries,
            )
            .await?
        };

        if status == expected_status {
            return Ok(text);
        }

        let code = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .map(|b| b.error);
        log::debug!("[{server}] {action} failed with HTTP {status}");
        Err(self.map_error(
            server_url,
            RawApiError {
                status,
                code,
                body: text,
            },
        ))
    }
}
