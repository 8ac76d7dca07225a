//! Provider factory functions and metadata.

use std::sync::Arc;

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::error::{ProviderError, Result};
use crate::traits::DnsProvider;
use crate::types::{ProviderCredentials, ProviderMetadata, ProviderOptions, ProviderType};

#[cfg(feature = "dnspod-legacy")]
use crate::providers::DnspodLegacyProvider;
#[cfg(feature = "dnspod-v3")]
use crate::providers::DnspodV3Provider;

/// Creates a [`DnsProvider`] instance from the given credentials.
///
/// The concrete provider type is determined by the [`ProviderCredentials`] variant.
/// The returned provider is wrapped in `Arc<dyn DnsProvider>` for easy sharing
/// across async tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use zonehub_provider::{create_provider, ProviderCredentials};
///
/// let provider = create_provider(ProviderCredentials::DnspodLegacy {
///     token: "12345,your-token".to_string(),
/// }).unwrap();
/// ```
pub fn create_provider(credentials: ProviderCredentials) -> Result<Arc<dyn DnsProvider>> {
    create_provider_with_options(credentials, ProviderOptions::default(), CancellationToken::new())
}

/// Same as [`create_provider`] with explicit tunables and a cancellation token
/// shared by every call the provider makes.
pub fn create_provider_with_options(
    credentials: ProviderCredentials,
    options: ProviderOptions,
    cancel: CancellationToken,
) -> Result<Arc<dyn DnsProvider>> {
    log::debug!("creating provider {:?}", credentials);
    match credentials {
        #[cfg(feature = "dnspod-legacy")]
        ProviderCredentials::DnspodLegacy { token } => Ok(Arc::new(
            DnspodLegacyProvider::builder(token)
                .options(options)
                .cancellation_token(cancel)
                .build()?,
        )),
        #[cfg(feature = "dnspod-v3")]
        ProviderCredentials::DnspodV3 {
            secret_id,
            secret_key,
            region,
        } => {
            let mut builder = DnspodV3Provider::builder(secret_id, secret_key)
                .options(options)
                .cancellation_token(cancel);
            if let Some(region) = region {
                builder = builder.region(region);
            }
            Ok(Arc::new(builder.build()?))
        }
    }
}

#[cfg(feature = "dnspod-legacy")]
#[derive(Deserialize)]
struct LegacyConfig {
    token: String,
}

#[cfg(feature = "dnspod-v3")]
#[derive(Deserialize)]
struct V3Config {
    secret_id: String,
    secret_key: String,
    #[serde(default)]
    region: Option<String>,
}

/// Creates a provider from a provider type string and its JSON configuration.
///
/// | type | configuration |
/// |------|---------------|
/// | `dnspod` | `{"token": "ID,Token"}` |
/// | `dnspod_v3` | `{"secret_id": "...", "secret_key": "...", "region": "..."}` (`region` optional) |
pub fn create_provider_from_config(
    provider_type: &str,
    config_json: &str,
) -> Result<Arc<dyn DnsProvider>> {
    let provider: ProviderType = provider_type.parse()?;

    let config_error = |e: serde_json::Error| ProviderError::Configuration {
        provider: provider.to_string(),
        field: "config".to_string(),
        detail: e.to_string(),
    };

    let credentials = match provider {
        #[cfg(feature = "dnspod-legacy")]
        ProviderType::DnspodLegacy => {
            let config: LegacyConfig = serde_json::from_str(config_json).map_err(config_error)?;
            ProviderCredentials::DnspodLegacy {
                token: config.token.trim().to_string(),
            }
        }
        #[cfg(feature = "dnspod-v3")]
        ProviderType::DnspodV3 => {
            let config: V3Config = serde_json::from_str(config_json).map_err(config_error)?;
            ProviderCredentials::DnspodV3 {
                secret_id: config.secret_id.trim().to_string(),
                secret_key: config.secret_key.trim().to_string(),
                region: config
                    .region
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty()),
            }
        }
    };

    credentials.validate()?;
    create_provider(credentials)
}

/// Returns metadata for all providers enabled via feature flags.
///
/// Useful for building dynamic UIs that enumerate available providers
/// and their required credential fields.
pub fn get_all_provider_metadata() -> Vec<ProviderMetadata> {
    vec![
        #[cfg(feature = "dnspod-legacy")]
        DnspodLegacyProvider::metadata(),
        #[cfg(feature = "dnspod-v3")]
        DnspodV3Provider::metadata(),
    ]
}
