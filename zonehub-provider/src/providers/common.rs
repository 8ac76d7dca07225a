//! Provider 公共工具函数

use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;

use crate::error::{ProviderError, Result};
use crate::types::{DnsRecordType, ProviderOptions};

type HmacSha256 = Hmac<Sha256>;

/// 默认线路
pub const DEFAULT_RECORD_LINE: &str = "默认";

// ============ HTTP Client ============

/// 按 `ProviderOptions` 的超时配置创建 HTTP Client
pub fn create_http_client(provider: &str, options: &ProviderOptions) -> Result<Client> {
    Client::builder()
        .connect_timeout(options.connect_timeout())
        .timeout(options.request_timeout())
        .build()
        .map_err(|e| ProviderError::Configuration {
            provider: provider.to_string(),
            field: "http_client".to_string(),
            detail: e.to_string(),
        })
}

// ============ HMAC-SHA256 ============

/// HMAC-SHA256 计算
pub fn hmac_sha256(
    key: &[u8],
    data: &[u8],
) -> std::result::Result<Vec<u8>, hmac::digest::InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(key)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

// ============ 记录类型 ============

/// 解析上游返回的记录类型；不支持的类型（如 "显性URL"）返回 `None`
pub fn parse_upstream_record_type(record_type: &str) -> Option<DnsRecordType> {
    record_type.parse().ok()
}

// ============ 记录 ID ============

/// 两套 API 的记录 ID 均为无符号整数
pub fn parse_record_id(external_id: &str) -> Result<u64> {
    let id = external_id.trim();
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProviderError::validation(
            "record_id",
            format!("'{external_id}' is not a numeric record id"),
        ));
    }
    id.parse().map_err(|_| {
        ProviderError::validation("record_id", format!("'{external_id}' is out of range"))
    })
}

// ============ MX 优先级 ============

/// 拆分 `"10 mail.example.com"` 为 (10, "mail.example.com")
///
/// 调用前值已通过校验；无优先级时返回 `None`。
pub fn split_mx(value: &str) -> Option<(u16, &str)> {
    let (priority, exchange) = value.trim().split_once(char::is_whitespace)?;
    Some((priority.parse().ok()?, exchange.trim()))
}

/// 合并优先级与交换主机
pub fn join_mx(priority: u16, exchange: &str) -> String {
    format!("{priority} {exchange}")
}

// ============ 域名名称处理 ============

/// 去掉域名末尾的点
pub fn normalize_domain_name(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

/// 将相对名称转换为完整域名
/// 如: "www" + "example.com" -> "www.example.com"
/// 如: "@" + "example.com" -> "example.com"
pub fn relative_to_full_name(relative_name: &str, zone_name: &str) -> String {
    let zone = normalize_domain_name(zone_name);

    if relative_name == "@" || relative_name.is_empty() {
        zone
    } else {
        format!("{relative_name}.{zone}")
    }
}
