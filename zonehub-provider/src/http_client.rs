//! Single-attempt HTTP execution shared by the provider clients.
//!
//! Each provider builds its own `RequestBuilder` (headers, signature, body);
//! this module sends it once, classifies transport failures and parses the
//! response body. Retrying is the caller's job, see [`crate::retry`].

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Send a request and return `(status_code, response_text)`.
    ///
    /// * connect/TLS/body failures -> [`ProviderError::Network`]
    /// * client-side timeout -> [`ProviderError::Timeout`]
    /// * HTTP 429 -> [`ProviderError::UpstreamApi`] with code `RequestLimitExceeded`
    /// * HTTP 502/503/504 -> [`ProviderError::Network`]
    ///
    /// Any other status is returned with its body, since both APIs report
    /// failures inside the JSON envelope.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url_or_action: &str,
    ) -> Result<(u16, String), ProviderError> {
        log::debug!("[{provider_name}] {method_name} {url_or_action}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ProviderError::Network {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{provider_name}] Response Status: {status_code}");

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Rate limited (HTTP 429)");
            return Err(ProviderError::UpstreamApi {
                provider: provider_name.to_string(),
                code: "RequestLimitExceeded".to_string(),
                message: format!("HTTP 429: {}", truncate_for_log(&body)),
                request_id: None,
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Server error (HTTP {status_code})");
            return Err(ProviderError::Network {
                provider: provider_name.to_string(),
                detail: format!("HTTP {status_code}: {}", truncate_for_log(&body)),
            });
        }

        let response_text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    provider: provider_name.to_string(),
                    detail: format!("Timed out reading response body: {e}"),
                }
            } else {
                ProviderError::Network {
                    provider: provider_name.to_string(),
                    detail: format!("Failed to read response body: {e}"),
                }
            }
        })?;

        log::debug!(
            "[{provider_name}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parse a JSON response body into `T`.
    pub fn parse_json<T>(response_text: &str, provider_name: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{provider_name}] JSON parse failed: {e}");
            log::error!(
                "[{provider_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            ProviderError::Parse {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        })
    }
}
