//! 腾讯云 `DNSPod` API 3.0 Provider（TC3-HMAC-SHA256 签名）

mod error;
mod http;
mod provider;
mod types;

use std::time::Duration;

use reqwest::{Client, Url};
use tokio_util::sync::CancellationToken;

use crate::error::{ProviderError, Result};
use crate::providers::common::create_http_client;
use crate::retry::{RetryController, RetryPolicy};
use crate::sign::Tc3Signer;
use crate::types::{ProviderCredentials, ProviderOptions};
use crate::validation::ValidationOptions;

pub(crate) use types::{
    CreateRecordResponse, DescribeRecordResponse, DomainListResponse, EmptyResponse,
    RecordListResponse, TencentEnvelope,
};

pub(crate) const DNSPOD_API_HOST: &str = "dnspod.tencentcloudapi.com";
pub(crate) const DNSPOD_SERVICE: &str = "dnspod";
pub(crate) const DNSPOD_VERSION: &str = "2021-03-23";
pub(crate) const DNSPOD_LANGUAGE: &str = "zh-CN";
pub(crate) const PROVIDER_NAME: &str = "dnspod_v3";
/// `DNSPod` API 单页最大条数
pub(crate) const MAX_PAGE_SIZE: u32 = 3000;

/// 腾讯云 `DNSPod` API 3.0 Provider
pub struct DnspodV3Provider {
    pub(crate) client: Client,
    pub(crate) signer: Tc3Signer,
    pub(crate) base_url: String,
    pub(crate) region: Option<String>,
    pub(crate) retry: RetryController,
    pub(crate) validation: ValidationOptions,
}

/// `DnspodV3Provider` Builder
pub struct DnspodV3ProviderBuilder {
    secret_id: String,
    secret_key: String,
    region: Option<String>,
    options: ProviderOptions,
    cancel: CancellationToken,
}

impl DnspodV3ProviderBuilder {
    fn new(secret_id: String, secret_key: String) -> Self {
        Self {
            secret_id,
            secret_key,
            region: None,
            options: ProviderOptions::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Region code such as `ap-guangzhou`; also selects the regional endpoint.
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        let region = region.into();
        self.region = (!region.trim().is_empty()).then(|| region.trim().to_string());
        self
    }

    /// Replace all tunables at once.
    #[must_use]
    pub fn options(mut self, options: ProviderOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.options.max_retries = retries;
        self
    }

    #[must_use]
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.options.base_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.options.max_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Override the API base URL (`https://host[:port]`).
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.options.endpoint = Some(endpoint.into());
        self
    }

    #[must_use]
    pub fn allow_private_ips(mut self, allow: bool) -> Self {
        self.options.allow_private_ips = allow;
        self
    }

    #[must_use]
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Validate the key pair and region, resolve the endpoint and build the provider.
    pub fn build(self) -> Result<DnspodV3Provider> {
        ProviderCredentials::DnspodV3 {
            secret_id: self.secret_id.clone(),
            secret_key: self.secret_key.clone(),
            region: self.region.clone(),
        }
        .validate()?;

        let base_url = match (&self.options.endpoint, &self.region) {
            (Some(endpoint), _) => endpoint.trim_end_matches('/').to_string(),
            (None, Some(region)) => format!("https://{DNSPOD_SERVICE}.{region}.tencentcloudapi.com"),
            (None, None) => format!("https://{DNSPOD_API_HOST}"),
        };
        let host = host_header(&base_url)?;

        Ok(DnspodV3Provider {
            client: create_http_client(PROVIDER_NAME, &self.options)?,
            signer: Tc3Signer::new(self.secret_id, self.secret_key, DNSPOD_SERVICE, host),
            base_url,
            region: self.region,
            retry: RetryController::new(
                PROVIDER_NAME,
                RetryPolicy::from_options(&self.options),
                self.cancel,
            ),
            validation: ValidationOptions {
                allow_private_ips: self.options.allow_private_ips,
            },
        })
    }
}

/// `Host` 头（签名内容之一），非默认端口时带端口
fn host_header(base_url: &str) -> Result<String> {
    let endpoint_error = |detail: String| ProviderError::Configuration {
        provider: PROVIDER_NAME.to_string(),
        field: "endpoint".to_string(),
        detail,
    };

    let url = Url::parse(base_url).map_err(|e| endpoint_error(format!("'{base_url}': {e}")))?;
    let host = url
        .host_str()
        .ok_or_else(|| endpoint_error(format!("'{base_url}' has no host")))?;

    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

impl DnspodV3Provider {
    pub fn new(secret_id: String, secret_key: String) -> Result<Self> {
        Self::builder(secret_id, secret_key).build()
    }

    pub fn builder(secret_id: String, secret_key: String) -> DnspodV3ProviderBuilder {
        DnspodV3ProviderBuilder::new(secret_id, secret_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET_ID: &str = "AKIDz8krbsJ5yKBZQpn74WFkmLPx3EXAMPLE";
    const SECRET_KEY: &str = "Gu5t9xGARNpq86cd98joQYCN3EXAMPLE";

    fn builder() -> DnspodV3ProviderBuilder {
        DnspodV3Provider::builder(SECRET_ID.to_string(), SECRET_KEY.to_string())
    }

    #[test]
    fn default_endpoint() {
        let p = builder().build().unwrap();
        assert_eq!(p.base_url, "https://dnspod.tencentcloudapi.com");
        assert_eq!(p.signer.host(), "dnspod.tencentcloudapi.com");
        assert!(p.region.is_none());
    }

    #[test]
    fn regional_endpoint() {
        let p = builder().region("ap-guangzhou").build().unwrap();
        assert_eq!(p.base_url, "https://dnspod.ap-guangzhou.tencentcloudapi.com");
        assert_eq!(p.signer.host(), "dnspod.ap-guangzhou.tencentcloudapi.com");
        assert_eq!(p.region.as_deref(), Some("ap-guangzhou"));
    }

    #[test]
    fn endpoint_override_keeps_port_in_host() {
        let p = builder().endpoint("http://127.0.0.1:18080/").build().unwrap();
        assert_eq!(p.base_url, "http://127.0.0.1:18080");
        assert_eq!(p.signer.host(), "127.0.0.1:18080");
    }

    #[test]
    fn blank_region_is_ignored() {
        let p = builder().region("  ").build().unwrap();
        assert!(p.region.is_none());
    }

    #[test]
    fn rejects_bad_credentials_and_endpoint() {
        let err = DnspodV3Provider::new("AKIDshort".to_string(), SECRET_KEY.to_string()).err();
        assert!(matches!(err, Some(ProviderError::Configuration { ref field, .. }) if field == "secretId"));

        let err = builder().region("mars-north-1").build().err();
        assert!(matches!(err, Some(ProviderError::Configuration { ref field, .. }) if field == "region"));

        let err = builder().endpoint("not a url").build().err();
        assert!(matches!(err, Some(ProviderError::Configuration { ref field, .. }) if field == "endpoint"));
    }
}
