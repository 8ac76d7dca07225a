use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};
use crate::utils::log_sanitizer::mask_secret;

// ============ Provider Types ============

/// Identifies which DNS provider implementation to use.
///
/// Each variant is gated behind its corresponding feature flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProviderType {
    /// Legacy `DNSPod` token API (`dnsapi.cn`). Requires feature `dnspod-legacy`.
    #[cfg(feature = "dnspod-legacy")]
    #[serde(rename = "dnspod")]
    DnspodLegacy,
    /// Tencent Cloud `DNSPod` API 3.0 (TC3 signed). Requires feature `dnspod-v3`.
    #[cfg(feature = "dnspod-v3")]
    #[serde(rename = "dnspod_v3")]
    DnspodV3,
}

impl ProviderType {
    /// Stable identifier used in configuration and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            #[cfg(feature = "dnspod-legacy")]
            Self::DnspodLegacy => "dnspod",
            #[cfg(feature = "dnspod-v3")]
            Self::DnspodV3 => "dnspod_v3",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            #[cfg(feature = "dnspod-legacy")]
            "dnspod" => Ok(Self::DnspodLegacy),
            #[cfg(feature = "dnspod-v3")]
            "dnspod_v3" => Ok(Self::DnspodV3),
            other => Err(ProviderError::Configuration {
                provider: other.to_string(),
                field: "provider".to_string(),
                detail: format!(
                    "Provider '{other}' is not supported or its feature is not enabled"
                ),
            }),
        }
    }
}

// ============ Domain Types ============

/// A zone known to the upstream provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Upstream domain identifier.
    pub id: String,
    /// Domain name (e.g., `"example.com"`).
    pub name: String,
    /// Upstream status string (e.g., `"enable"`, `"ENABLE"`, `"pause"`).
    pub status: String,
}

// ============ DNS Record Types ============

/// DNS resource record type.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"CNAME"`, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Mail exchange record.
    Mx,
    /// Text record.
    Txt,
    /// Name server record.
    Ns,
    /// Reverse pointer record.
    Ptr,
    /// Service locator record.
    Srv,
    /// Certificate Authority Authorization record.
    Caa,
}

impl DnsRecordType {
    /// All supported record types.
    pub const ALL: [Self; 9] = [
        Self::A,
        Self::Aaaa,
        Self::Cname,
        Self::Mx,
        Self::Txt,
        Self::Ns,
        Self::Ptr,
        Self::Srv,
        Self::Caa,
    ];

    /// Uppercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Ns => "NS",
            Self::Ptr => "PTR",
            Self::Srv => "SRV",
            Self::Caa => "CAA",
        }
    }

    /// TTL used when a request leaves it unset (`0`).
    pub fn default_ttl(self) -> u32 {
        match self {
            Self::Mx | Self::Ns | Self::Caa => 3600,
            Self::A | Self::Aaaa | Self::Cname | Self::Txt | Self::Ptr | Self::Srv => 600,
        }
    }
}

impl fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DnsRecordType {
    type Err = ProviderError;

    /// 大小写不敏感；未知类型返回校验错误
    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| {
                ProviderError::validation("record_type", format!("unsupported record type: {s}"))
            })
    }
}

/// A DNS record as returned by a provider.
///
/// For MX records `value` carries the priority in front of the exchange
/// (`"10 mail.example.com"`), the same format accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Upstream-assigned record identifier (external ID).
    pub id: String,
    /// Fully-qualified record name (e.g., `"www.example.com"`).
    pub name: String,
    /// Relative name (`"www"`, `"@"` for the apex).
    pub subdomain: String,
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    /// Record value.
    pub value: String,
    /// Time to live in seconds.
    pub ttl: u32,
    /// Upstream status string (`"ENABLE"`, `"enable"`, `"DISABLE"`...).
    pub status: String,
    /// Last modification time reported upstream, if any.
    #[serde(
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub updated_on: Option<NaiveDateTime>,
}

/// Input for creating or updating a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    /// Zone name (e.g., `"example.com"`).
    pub domain: String,
    /// Relative record name (e.g., `"www"`, `"@"`, `"*"`).
    pub subdomain: String,
    /// Record type.
    pub record_type: DnsRecordType,
    /// Record value in presentation format.
    pub value: String,
    /// Time to live in seconds; `0` selects [`DnsRecordType::default_ttl`].
    pub ttl: u32,
}

impl RecordRequest {
    pub fn new(
        domain: impl Into<String>,
        subdomain: impl Into<String>,
        record_type: DnsRecordType,
        value: impl Into<String>,
        ttl: u32,
    ) -> Self {
        Self {
            domain: domain.into(),
            subdomain: subdomain.into(),
            record_type,
            value: value.into(),
            ttl,
        }
    }

    /// TTL actually sent upstream.
    pub fn effective_ttl(&self) -> u32 {
        if self.ttl == 0 {
            self.record_type.default_ttl()
        } else {
            self.ttl
        }
    }
}

/// Record enable/disable switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordStatus {
    Enable,
    Disable,
}

impl RecordStatus {
    /// `"ENABLE"` / `"DISABLE"`
    pub fn as_upper(self) -> &'static str {
        match self {
            Self::Enable => "ENABLE",
            Self::Disable => "DISABLE",
        }
    }

    /// `"enable"` / `"disable"`
    pub fn as_lower(self) -> &'static str {
        match self {
            Self::Enable => "enable",
            Self::Disable => "disable",
        }
    }
}

// ============ Batch Operation Types ============

/// Maximum number of records accepted by one batch create call.
pub const MAX_BATCH_SIZE: usize = 20;

/// Result of a batch create operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateResult {
    /// External IDs of the records that were created, in request order.
    pub created_ids: Vec<String>,
    /// Items that failed validation or creation.
    pub failures: Vec<BatchCreateFailure>,
}

/// One failed item of a batch create operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateFailure {
    /// Index of the item in the request slice.
    pub request_index: usize,
    /// Subdomain of the failed item.
    pub subdomain: String,
    /// Failure description.
    pub reason: String,
}

// ============ Provider Metadata Types ============

/// Input type hint for a credential field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Plain text input.
    Text,
    /// Masked input.
    Password,
}

/// Describes one credential field a provider requires.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredentialField {
    /// Machine-readable key used by [`ProviderCredentials::from_map`].
    pub key: String,
    /// Human-readable label.
    pub label: String,
    /// Input type hint.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the field may be omitted.
    pub optional: bool,
    /// Placeholder text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// Static description of a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    /// Provider type.
    pub id: ProviderType,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Credential fields.
    pub required_fields: Vec<ProviderCredentialField>,
}

// ============ Credentials ============

/// Tencent Cloud regions accepted for the API 3.0 endpoint.
pub const SUPPORTED_REGIONS: &[&str] = &[
    "ap-guangzhou",
    "ap-shanghai",
    "ap-nanjing",
    "ap-beijing",
    "ap-chengdu",
    "ap-chongqing",
    "ap-hongkong",
    "ap-singapore",
    "ap-jakarta",
    "ap-bangkok",
    "ap-seoul",
    "ap-tokyo",
    "na-ashburn",
    "na-siliconvalley",
    "sa-saopaulo",
    "eu-frankfurt",
];

const SECRET_ID_PREFIX: &str = "AKID";
const SECRET_ID_LEN: usize = 36;
const SECRET_KEY_LEN: usize = 32;

/// Type-safe credential container for all supported providers.
///
/// Serialized as a tagged enum with `"provider"` as the tag and `"credentials"` as the content:
///
/// ```json
/// { "provider": "dnspod_v3", "credentials": { "secret_id": "...", "secret_key": "..." } }
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", content = "credentials")]
pub enum ProviderCredentials {
    /// Legacy `DNSPod` API token. Requires feature `dnspod-legacy`.
    #[cfg(feature = "dnspod-legacy")]
    #[serde(rename = "dnspod")]
    DnspodLegacy {
        /// Login token in `id,token` form.
        token: String,
    },

    /// Tencent Cloud API key pair. Requires feature `dnspod-v3`.
    #[cfg(feature = "dnspod-v3")]
    #[serde(rename = "dnspod_v3")]
    DnspodV3 {
        /// `SecretId` (starts with `AKID`).
        secret_id: String,
        /// `SecretKey`.
        secret_key: String,
        /// Optional region; empty means nearest access point.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        region: Option<String>,
    },
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "dnspod-legacy")]
            Self::DnspodLegacy { token } => f
                .debug_struct("DnspodLegacy")
                .field("token", &mask_secret(token))
                .finish(),
            #[cfg(feature = "dnspod-v3")]
            Self::DnspodV3 {
                secret_id,
                region,
                ..
            } => f
                .debug_struct("DnspodV3")
                .field("secret_id", &mask_secret(secret_id))
                .field("secret_key", &"***")
                .field("region", region)
                .finish(),
        }
    }
}

impl ProviderCredentials {
    /// Construct credentials from a flat key-value map and validate them.
    pub fn from_map(provider: ProviderType, map: &HashMap<String, String>) -> Result<Self> {
        let credentials = match provider {
            #[cfg(feature = "dnspod-legacy")]
            ProviderType::DnspodLegacy => Self::DnspodLegacy {
                token: Self::get_required_field(provider, map, "token")?,
            },
            #[cfg(feature = "dnspod-v3")]
            ProviderType::DnspodV3 => Self::DnspodV3 {
                secret_id: Self::get_required_field(provider, map, "secretId")?,
                secret_key: Self::get_required_field(provider, map, "secretKey")?,
                region: map
                    .get("region")
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty()),
            },
        };
        credentials.validate()?;
        Ok(credentials)
    }

    fn get_required_field(
        provider: ProviderType,
        map: &HashMap<String, String>,
        key: &str,
    ) -> Result<String> {
        match map.get(key) {
            None => Err(config_error(provider, key, "missing required field")),
            Some(v) if v.trim().is_empty() => {
                Err(config_error(provider, key, "field must not be empty"))
            }
            Some(v) => Ok(v.trim().to_string()),
        }
    }

    /// Convert credentials to a flat key-value map.
    pub fn to_map(&self) -> HashMap<String, String> {
        match self {
            #[cfg(feature = "dnspod-legacy")]
            Self::DnspodLegacy { token } => [("token".to_string(), token.clone())].into(),
            #[cfg(feature = "dnspod-v3")]
            Self::DnspodV3 {
                secret_id,
                secret_key,
                region,
            } => {
                let mut map: HashMap<String, String> = [
                    ("secretId".to_string(), secret_id.clone()),
                    ("secretKey".to_string(), secret_key.clone()),
                ]
                .into();
                if let Some(region) = region {
                    map.insert("region".to_string(), region.clone());
                }
                map
            }
        }
    }

    /// Returns the [`ProviderType`] corresponding to this credential variant.
    pub fn provider_type(&self) -> ProviderType {
        match self {
            #[cfg(feature = "dnspod-legacy")]
            Self::DnspodLegacy { .. } => ProviderType::DnspodLegacy,
            #[cfg(feature = "dnspod-v3")]
            Self::DnspodV3 { .. } => ProviderType::DnspodV3,
        }
    }

    /// Check the credential format without contacting the provider.
    pub fn validate(&self) -> Result<()> {
        let provider = self.provider_type();
        match self {
            #[cfg(feature = "dnspod-legacy")]
            Self::DnspodLegacy { token } => {
                let Some((id, secret)) = token.split_once(',') else {
                    return Err(config_error(provider, "token", "expected 'ID,Token' format"));
                };
                if id.trim().is_empty() || secret.trim().is_empty() || secret.contains(',') {
                    return Err(config_error(
                        provider,
                        "token",
                        "both the ID and the Token part must be present",
                    ));
                }
                Ok(())
            }
            #[cfg(feature = "dnspod-v3")]
            Self::DnspodV3 {
                secret_id,
                secret_key,
                region,
            } => {
                if !secret_id.starts_with(SECRET_ID_PREFIX) {
                    return Err(config_error(
                        provider,
                        "secretId",
                        format!("must start with {SECRET_ID_PREFIX}"),
                    ));
                }
                if secret_id.len() != SECRET_ID_LEN {
                    return Err(config_error(
                        provider,
                        "secretId",
                        format!("must be {SECRET_ID_LEN} characters long"),
                    ));
                }
                if secret_key.len() != SECRET_KEY_LEN {
                    return Err(config_error(
                        provider,
                        "secretKey",
                        format!("must be {SECRET_KEY_LEN} characters long"),
                    ));
                }
                if let Some(region) = region.as_deref().filter(|r| !r.is_empty()) {
                    if !SUPPORTED_REGIONS.contains(&region) {
                        return Err(config_error(
                            provider,
                            "region",
                            format!("unsupported region: {region}"),
                        ));
                    }
                }
                Ok(())
            }
        }
    }
}

fn config_error(provider: ProviderType, field: &str, detail: impl Into<String>) -> ProviderError {
    ProviderError::Configuration {
        provider: provider.to_string(),
        field: field.to_string(),
        detail: detail.into(),
    }
}

// ============ Options ============

/// Tunables shared by every provider client.
///
/// Deserializable with every field defaulted, so an empty JSON object is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderOptions {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Backoff unit; retry `n` waits `base_delay * n²`.
    pub base_delay_ms: u64,
    /// Upper bound for a single backoff delay.
    pub max_delay_ms: u64,
    /// Whole-request timeout.
    pub request_timeout_secs: u64,
    /// TCP/TLS connect timeout.
    pub connect_timeout_secs: u64,
    /// Accept private-range IPv4 values in A records.
    pub allow_private_ips: bool,
    /// Base URL override (`https://host[:port]`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 60_000,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            allow_private_ips: false,
            endpoint: None,
        }
    }
}

impl ProviderOptions {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
