use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upstream error codes that indicate a transient failure on the provider side.
///
/// Only these codes are retried; every other upstream code is terminal.
pub const RETRYABLE_API_CODES: &[&str] =
    &["InternalError", "RequestLimitExceeded", "ResourceUnavailable"];

/// Unified error type for all DNS provider operations.
///
/// The variants fall into three groups:
///
/// - **Local, never sent**: [`Configuration`](Self::Configuration),
///   [`Validation`](Self::Validation), [`Marshalling`](Self::Marshalling),
///   [`Signature`](Self::Signature). These are returned before any network attempt.
/// - **Transport**: [`Network`](Self::Network) and [`Timeout`](Self::Timeout).
///   Always retryable.
/// - **Upstream**: [`UpstreamApi`](Self::UpstreamApi), retryable only when its code is in
///   [`RETRYABLE_API_CODES`].
///
/// All variants are serializable for structured error reporting.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// Credentials or provider options are malformed (wrong length, prefix, region...).
    #[error("[{provider}] Invalid configuration '{field}': {detail}")]
    Configuration {
        /// Provider that rejected the configuration.
        provider: String,
        /// Offending configuration field.
        field: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// A domain, subdomain, record type, value or TTL failed validation.
    #[error("Invalid {field}: {detail}")]
    Validation {
        /// Name of the invalid input.
        field: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// A request parameter cannot be represented with the type the remote schema expects.
    #[error("Cannot marshal parameter '{key}': {detail}")]
    Marshalling {
        /// Parameter key.
        key: String,
        /// Description of the type problem.
        detail: String,
    },

    /// Connection, DNS resolution, TLS or body read failure.
    #[error("[{provider}] Network error: {detail}")]
    Network {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    #[error("[{provider}] Request timeout: {detail}")]
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The remote API answered with an error code.
    ///
    /// `message` is the translated, user-facing text when the code is known,
    /// otherwise the raw upstream message.
    #[error("[{provider}] API error [{code}]: {message}")]
    UpstreamApi {
        /// Provider that produced the error.
        provider: String,
        /// Upstream error code (`"AuthFailure.SignatureFailure"`, `"-1"`, ...).
        #[serde(rename = "api_code")]
        code: String,
        /// Human-readable message.
        message: String,
        /// Upstream request id, when the API returns one.
        request_id: Option<String>,
    },

    /// The request could not be signed (for example the clock is skewed).
    #[error("[{provider}] Signature error: {detail}")]
    Signature {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// A retryable failure persisted through every retry.
    #[error("[{provider}] Request failed after {retries} retries: {last}")]
    RetriesExhausted {
        /// Provider that produced the error.
        provider: String,
        /// Number of retries performed (attempts minus one).
        retries: u32,
        /// The error observed on the final attempt.
        last: Box<ProviderError>,
    },

    /// The operation was cancelled before it completed.
    #[error("[{provider}] Operation cancelled")]
    Cancelled {
        /// Provider that produced the error.
        provider: String,
    },

    /// The domain is not managed by the account behind the credentials.
    #[error("[{provider}] Domain '{domain}' not found")]
    DomainNotFound {
        /// Provider that produced the error.
        provider: String,
        /// Domain name that was looked up.
        domain: String,
    },

    /// The provider's response could not be parsed.
    #[error("[{provider}] Parse error: {detail}")]
    Parse {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },
}

impl ProviderError {
    pub(crate) fn validation(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            detail: detail.into(),
        }
    }

    pub(crate) fn marshalling(key: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Marshalling {
            key: key.into(),
            detail: detail.into(),
        }
    }

    /// 是否为传输层错误（网络、超时）
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }

    /// Whether a fresh attempt of the same request may succeed.
    ///
    /// Transport errors are retryable. Upstream errors are retryable only when
    /// their code is in [`RETRYABLE_API_CODES`]. Local errors never are.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => true,
            Self::UpstreamApi { code, .. } => RETRYABLE_API_CODES.contains(&code.as_str()),
            _ => false,
        }
    }

    /// Upstream error code, looking through [`RetriesExhausted`](Self::RetriesExhausted).
    pub fn upstream_code(&self) -> Option<&str> {
        match self {
            Self::UpstreamApi { code, .. } => Some(code),
            Self::RetriesExhausted { last, .. } => last.upstream_code(),
            _ => None,
        }
    }

    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Configuration { .. }
            | Self::Validation { .. }
            | Self::Marshalling { .. }
            | Self::Cancelled { .. }
            | Self::DomainNotFound { .. } => true,
            Self::UpstreamApi { code, .. } => !RETRYABLE_API_CODES.contains(&code.as_str()),
            Self::Network { .. }
            | Self::Timeout { .. }
            | Self::Signature { .. }
            | Self::RetriesExhausted { .. }
            | Self::Parse { .. } => false,
        }
    }
}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
