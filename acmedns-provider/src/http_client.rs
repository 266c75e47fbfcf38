//! HTTP plumbing shared by the acme-dns calls
//!
//! Sending requests, logging, mapping transport failures and reading the
//! response body. Status code interpretation is left to the caller.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::sanitize_body;

/// Default connect timeout (seconds)
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds)
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Upper bound for a server-provided `Retry-After`
const MAX_RETRY_AFTER_SECS: u64 = 30;

/// Create an HTTP client with the default timeouts.
pub fn create_http_client() -> Result<Client, ProviderError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .user_agent(concat!("acme-dns-client/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProviderError::ClientInit {
            detail: e.to_string(),
        })
}

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Perform an HTTP request and return the status code and response text.
    ///
    /// # Arguments
    /// * `request_builder` - configured request (URL, headers, body)
    /// * `server` - acme-dns server (for logging and errors)
    /// * `method_name` - request method name, for logs
    /// * `url` - full request URL, for logs
    pub async fn execute_request(
        request_builder: RequestBuilder,
        server: &str,
        method_name: &str,
        url: &str,
    ) -> Result<(u16, String), ProviderError> {
        log::debug!("{method_name} {url}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    server: server.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    server: server.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{server}] Response Status: {status_code}");

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status_code == 429 {
            log::warn!("[{server}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(ProviderError::RateLimited {
                server: server.to_string(),
                retry_after,
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{server}] Server error (HTTP {status_code})");
            return Err(ProviderError::NetworkError {
                server: server.to_string(),
                detail: format!("HTTP {status_code}: {body}"),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                server: server.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!("[{server}] Response Body: {}", sanitize_body(&response_text));

        Ok((status_code, response_text))
    }

    /// Parse a JSON response body.
    pub fn parse_json<T>(response_text: &str, server: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{server}] JSON parse failed: {e}");
            log::error!("[{server}] Raw response: {}", sanitize_body(response_text));
            ProviderError::ParseError {
                server: server.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// Perform an HTTP request, retrying transient failures.
    ///
    /// Only use for idempotent requests. Retries network errors, timeouts and
    /// rate limiting with exponential backoff (100ms, 200ms, ... capped at
    /// 10s), or the server's `Retry-After` when present.
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        server: &str,
        method_name: &str,
        url: &str,
        max_retries: u32,
    ) -> Result<(u16, String), ProviderError> {
        let mut attempt = 0;
        loop {
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[{server}] Cannot clone request, disabling retry");
                return Self::execute_request(request_builder, server, method_name, url).await;
            };

            match Self::execute_request(req, server, method_name, url).await {
                Err(e) if attempt < max_retries && e.is_retryable() => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "[{}] Request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        server,
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

/// Delay before the next attempt.
fn retry_delay(error: &ProviderError, attempt: u32) -> Duration {
    if let ProviderError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(MAX_RETRY_AFTER_SECS))
    } else {
        backoff_delay(attempt)
    }
}

/// Exponential backoff: 100ms, 200ms, 400ms, ... capped at 10 seconds.
fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20);
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(10_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff_delay(0), Duration::from_millis(100));
        assert_eq!(backoff_delay(1), Duration::from_millis(200));
        assert_eq!(backoff_delay(3), Duration::from_millis(800));
    }

    #[test]
    fn backoff_capped_at_10s() {
        assert_eq!(backoff_delay(7), Duration::from_millis(10_000));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_millis(10_000));
    }

    #[test]
    fn retry_after_respected_and_capped() {
        let e = ProviderError::RateLimited {
            server: "s".into(),
            retry_after: Some(5),
        };
        assert_eq!(retry_delay(&e, 0), Duration::from_secs(5));
        let e = ProviderError::RateLimited {
            server: "s".into(),
            retry_after: Some(600),
        };
        assert_eq!(retry_delay(&e, 0), Duration::from_secs(30));
    }

    #[test]
    fn parse_json_invalid() {
        #[derive(serde::Deserialize, Debug)]
        #[allow(dead_code)]
        struct Foo {
            x: i32,
        }
        let result: Result<Foo, ProviderError> = HttpUtils::parse_json("not json", "s");
        assert!(
            matches!(&result, Err(ProviderError::ParseError { .. })),
            "unexpected parse result: {result:?}"
        );
    }
}
