//! `DNSPod` 旧版 API 类型定义
//!
//! The legacy API is loose about JSON types: ids, TTLs and MX priorities come
//! back as strings on some endpoints and numbers on others.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

/// Accept a JSON string or number and keep it as a string.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        String(String),
        U64(u64),
        I64(i64),
        Null(()),
    }

    Ok(match Loose::deserialize(deserializer)? {
        Loose::String(s) => s,
        Loose::U64(n) => n.to_string(),
        Loose::I64(n) => n.to_string(),
        Loose::Null(()) => String::new(),
    })
}

// ============ 响应信封 ============

/// Common response envelope of every legacy endpoint.
#[derive(Debug, Deserialize)]
pub struct LegacyResponse {
    pub status: LegacyStatus,
    #[serde(default)]
    pub domains: Vec<LegacyDomain>,
    #[serde(default)]
    pub record: Option<LegacyRecord>,
    #[serde(default)]
    pub records: Vec<LegacyRecord>,
}

/// `status` block; `code == "1"` means success.
#[derive(Debug, Deserialize)]
pub struct LegacyStatus {
    #[serde(deserialize_with = "string_or_number")]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

// ============ 域名 ============

#[derive(Debug, Deserialize)]
pub struct LegacyDomain {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
}

// ============ 记录 ============

/// Record item from `Record.List`, `Record.Info` or `Record.Create`.
///
/// `Record.Info` names its fields `sub_domain`/`record_type` and reports
/// `enabled` instead of `status`; `Record.Create` only returns `id`.
#[derive(Debug, Deserialize)]
pub struct LegacyRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, alias = "sub_domain")]
    pub name: String,
    #[serde(default, rename = "type", alias = "record_type")]
    pub record_type: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub ttl: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub mx: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub enabled: String,
    #[serde(default, with = "crate::utils::datetime")]
    pub updated_on: Option<NaiveDateTime>,
}

impl LegacyRecord {
    /// `"enable"` / `"disable"`, derived from `enabled` when `status` is absent.
    pub fn effective_status(&self) -> String {
        if !self.status.is_empty() {
            return self.status.clone();
        }
        match self.enabled.as_str() {
            "1" => "enable".to_string(),
            "0" => "disable".to_string(),
            _ => String::new(),
        }
    }
}
