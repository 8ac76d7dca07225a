//! Tencent Cloud `DNSPod` API 3.0 type definition

use chrono::NaiveDateTime;
use serde::Deserialize;

// ============ Tencent Cloud API response structure ============

/// Outer envelope; `Response` is decoded in a second step once `Error` is ruled out.
#[derive(Debug, Deserialize)]
pub struct TencentEnvelope {
    #[serde(rename = "Response")]
    pub response: serde_json::Value,
}

/// Fields present on every `Response`, successful or not.
#[derive(Debug, Deserialize)]
pub struct ResponseMeta {
    #[serde(rename = "Error")]
    pub error: Option<TencentError>,
    #[serde(rename = "RequestId")]
    pub request_id: Option<String>,
}

/// Error payload nested inside Tencent Cloud responses.
#[derive(Debug, Deserialize)]
pub struct TencentError {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Message", default)]
    pub message: String,
}

/// Actions that return nothing besides `RequestId`.
#[derive(Debug, Deserialize)]
pub struct EmptyResponse {}

// ============ DNSPod domain name related structure ============

/// Response payload for `DescribeDomainList`.
#[derive(Debug, Deserialize)]
pub struct DomainListResponse {
    #[serde(rename = "DomainList", default)]
    pub domain_list: Vec<V3Domain>,
    #[serde(rename = "DomainCountInfo")]
    pub domain_count_info: Option<DomainCountInfo>,
}

/// Domain count metadata from `DescribeDomainList`.
#[derive(Debug, Deserialize)]
pub struct DomainCountInfo {
    #[serde(rename = "AllTotal")]
    pub all_total: Option<u64>,
    #[serde(rename = "DomainTotal")]
    pub domain_total: Option<u64>,
}

impl DomainCountInfo {
    pub fn total(&self) -> Option<u64> {
        self.all_total.or(self.domain_total)
    }
}

#[derive(Debug, Deserialize)]
pub struct V3Domain {
    #[serde(rename = "DomainId")]
    pub domain_id: u64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Status", default)]
    pub status: String,
}

// ============ DNSPod record related structure ============

/// Response payload for `DescribeRecordList`.
#[derive(Debug, Deserialize)]
pub struct RecordListResponse {
    #[serde(rename = "RecordList", default)]
    pub record_list: Vec<V3Record>,
    #[serde(rename = "RecordCountInfo")]
    pub record_count_info: Option<RecordCountInfo>,
}

/// Record count metadata from `DescribeRecordList`.
#[derive(Debug, Deserialize)]
pub struct RecordCountInfo {
    #[serde(rename = "TotalCount")]
    pub total_count: Option<u64>,
}

/// DNS record item returned by `DescribeRecordList`.
#[derive(Debug, Deserialize)]
pub struct V3Record {
    #[serde(rename = "RecordId")]
    pub record_id: u64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "TTL")]
    pub ttl: u32,
    #[serde(rename = "MX", default)]
    pub mx: Option<u16>,
    #[serde(rename = "Status", default)]
    pub status: String,
    #[serde(rename = "UpdatedOn", default, with = "crate::utils::datetime")]
    pub updated_on: Option<NaiveDateTime>,
}

/// Response payload for `DescribeRecord`.
#[derive(Debug, Deserialize)]
pub struct DescribeRecordResponse {
    #[serde(rename = "RecordInfo")]
    pub record_info: RecordInfo,
}

/// `DescribeRecord` uses different field names than the list item and
/// reports `Enabled` (1/0) instead of `Status`.
#[derive(Debug, Deserialize)]
pub struct RecordInfo {
    #[serde(rename = "Id", alias = "RecordId")]
    pub id: u64,
    #[serde(rename = "SubDomain", alias = "Name")]
    pub sub_domain: String,
    #[serde(rename = "RecordType", alias = "Type")]
    pub record_type: String,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "TTL")]
    pub ttl: u32,
    #[serde(rename = "MX", default)]
    pub mx: Option<u16>,
    #[serde(rename = "Enabled", default)]
    pub enabled: Option<u8>,
    #[serde(rename = "UpdatedOn", default, with = "crate::utils::datetime")]
    pub updated_on: Option<NaiveDateTime>,
}

impl RecordInfo {
    pub fn status(&self) -> &'static str {
        match self.enabled {
            Some(0) => "DISABLE",
            _ => "ENABLE",
        }
    }
}

/// Response payload for `CreateRecord`.
#[derive(Debug, Deserialize)]
pub struct CreateRecordResponse {
    #[serde(rename = "RecordId")]
    pub record_id: u64,
}
