//! # zonehub-provider
//!
//! DNS provider client layer for `DNSPod`: one capability trait, two wire
//! protocols, and the validation, marshalling, signing and retry machinery
//! that makes calling an unreliable remote API safe from a multi-tenant
//! backend.
//!
//! ## Supported Providers
//!
//! | Provider | Feature Flag | Auth Method |
//! |----------|-------------|-------------|
//! | `DNSPod` legacy API (`dnsapi.cn`) | `dnspod-legacy` | `login_token` form field |
//! | Tencent Cloud `DNSPod` API 3.0 | `dnspod-v3` | TC3-HMAC-SHA256 |
//!
//! ## Feature Flags
//!
//! - **`all-providers`** *(default)* : Enable both providers.
//! - **`dnspod-legacy`** / **`dnspod-v3`** : Enable a single provider.
//! - **`native-tls`** *(default)* / **`rustls`** : TLS backend for `reqwest`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use zonehub_provider::{create_provider, DnsProvider, DnsRecordType, ProviderCredentials, RecordRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = create_provider(ProviderCredentials::DnspodV3 {
//!         secret_id: "AKID...".to_string(),
//!         secret_key: "...".to_string(),
//!         region: None,
//!     })?;
//!
//!     let request = RecordRequest::new("example.com", "www", DnsRecordType::A, "203.0.113.5", 600);
//!     let id = provider.create_record(&request).await?;
//!
//!     for record in provider.get_records("example.com").await? {
//!         println!("{} {} {} -> {}", record.id, record.name, record.record_type, record.value);
//!     }
//!     provider.delete_record("example.com", &id).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::Validation`] / [`ProviderError::Marshalling`] /
//!   [`ProviderError::Configuration`] are raised locally; nothing is sent.
//! - [`ProviderError::Network`] / [`ProviderError::Timeout`] and upstream codes
//!   in [`RETRYABLE_API_CODES`] are retried with `n²` backoff.
//! - [`ProviderError::RetriesExhausted`] wraps the last retryable failure.

mod error;
mod factory;
mod http_client;
mod providers;
mod retry;
mod sign;
mod traits;
mod types;
mod utils;
mod validation;
mod wire;

// Re-export error types
pub use error::{ProviderError, RETRYABLE_API_CODES, Result};

// Re-export factory functions
pub use factory::{
    create_provider, create_provider_from_config, create_provider_with_options,
    get_all_provider_metadata,
};

// Re-export core trait only (internal traits are not exported)
pub use traits::DnsProvider;

// Re-export types
pub use types::{
    BatchCreateFailure, BatchCreateResult, DnsRecord, DnsRecordType, Domain, FieldType,
    MAX_BATCH_SIZE, ProviderCredentialField, ProviderCredentials, ProviderMetadata,
    ProviderOptions, ProviderType, RecordRequest, RecordStatus, SUPPORTED_REGIONS,
};

// Building blocks usable on their own
pub use retry::{RetryAttempt, RetryController, RetryPolicy};
pub use sign::{MAX_CLOCK_SKEW_SECS, SignError, SignedRequest, Tc3Signer};
pub use validation::{
    ValidationOptions, validate_domain_name, validate_record, validate_record_value,
    validate_subdomain, validate_ttl,
};
pub use wire::{WireParams, WireValue};

// Re-export utils module
pub use utils::datetime;

// Cancellation token accepted by the builders and the retry controller
pub use tokio_util::sync::CancellationToken;

// Re-export concrete providers (behind feature flags)
#[cfg(feature = "dnspod-legacy")]
pub use providers::{DnspodLegacyProvider, DnspodLegacyProviderBuilder};

#[cfg(feature = "dnspod-v3")]
pub use providers::{DnspodV3Provider, DnspodV3ProviderBuilder};
