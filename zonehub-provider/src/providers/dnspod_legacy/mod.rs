//! `DNSPod` 旧版 Token API Provider（`dnsapi.cn`）
//!
//! Form-POST API authenticated by a `login_token` field. Records are
//! addressed through a numeric domain id, so domain-scoped operations first
//! resolve the domain name with `Domain.List`.

mod error;
mod http;
mod provider;
mod types;

use std::time::Duration;

use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::providers::common::create_http_client;
use crate::retry::{RetryController, RetryPolicy};
use crate::types::{ProviderCredentials, ProviderOptions};
use crate::validation::ValidationOptions;

pub(crate) use types::{LegacyRecord, LegacyResponse};

pub(crate) const LEGACY_API_BASE: &str = "https://dnsapi.cn";
pub(crate) const PROVIDER_NAME: &str = "dnspod";
/// 上游成功状态码
pub(crate) const STATUS_OK: &str = "1";
/// `Record.List` 空列表状态码
pub(crate) const STATUS_NO_RECORDS: &str = "10";
/// `Domain.List` 账户下无域名
pub(crate) const STATUS_NO_DOMAINS: &str = "9";
/// `Record.List` 单次最大条数
pub(crate) const MAX_RECORD_LIST_LENGTH: u32 = 3000;

/// `DNSPod` 旧版 API Provider
pub struct DnspodLegacyProvider {
    pub(crate) client: Client,
    pub(crate) token: String,
    pub(crate) base_url: String,
    pub(crate) retry: RetryController,
    pub(crate) validation: ValidationOptions,
}

/// `DnspodLegacyProvider` Builder
pub struct DnspodLegacyProviderBuilder {
    token: String,
    options: ProviderOptions,
    cancel: CancellationToken,
}

impl DnspodLegacyProviderBuilder {
    fn new(token: String) -> Self {
        Self {
            token,
            options: ProviderOptions::default(),
            cancel: CancellationToken::new(),
        }
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

    /// Override `https://dnsapi.cn`.
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

    /// Token checked before every attempt and every backoff sleep.
    #[must_use]
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Validate the token format and build the provider.
    pub fn build(self) -> Result<DnspodLegacyProvider> {
        ProviderCredentials::DnspodLegacy {
            token: self.token.clone(),
        }
        .validate()?;

        let base_url = self
            .options
            .endpoint
            .as_deref()
            .unwrap_or(LEGACY_API_BASE)
            .trim_end_matches('/')
            .to_string();

        Ok(DnspodLegacyProvider {
            client: create_http_client(PROVIDER_NAME, &self.options)?,
            token: self.token,
            base_url,
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

impl DnspodLegacyProvider {
    pub fn new(token: String) -> Result<Self> {
        Self::builder(token).build()
    }

    pub fn builder(token: String) -> DnspodLegacyProviderBuilder {
        DnspodLegacyProviderBuilder::new(token)
    }
}
