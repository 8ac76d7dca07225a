//! `DNSPod` 旧版 DnsProvider trait 实现

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::providers::common::{
    DEFAULT_RECORD_LINE, join_mx, normalize_domain_name, parse_record_id,
    parse_upstream_record_type, relative_to_full_name, split_mx,
};
use crate::traits::{DnsProvider, ProviderErrorMapper};
use crate::types::{
    DnsRecord, DnsRecordType, Domain, FieldType, ProviderCredentialField, ProviderMetadata,
    ProviderType, RecordRequest, RecordStatus,
};
use crate::validation::{TTL_RANGE, validate_domain_name, validate_record};
use crate::wire::WireParams;

use super::error::is_credential_rejection;
use super::{
    DnspodLegacyProvider, LegacyRecord, MAX_RECORD_LIST_LENGTH, STATUS_NO_DOMAINS,
    STATUS_NO_RECORDS,
};

impl DnspodLegacyProvider {
    /// 域名 -> 上游数字 ID（`Domain.List` + 关键字过滤）
    ///
    /// 调用方传入的域名末尾可以带点，匹配与发送前统一去掉。
    pub(crate) async fn resolve_domain_id(&self, domain: &str) -> Result<String> {
        let domain = normalize_domain_name(domain);
        let params = WireParams::new()
            .with("type", "all")
            .with("keyword", domain.as_str());

        let domains = match self.request("Domain.List", params).await {
            Ok(response) => response.domains,
            Err(e) if e.upstream_code() == Some(STATUS_NO_DOMAINS) => Vec::new(),
            Err(e) => return Err(e),
        };

        domains
            .into_iter()
            .find(|d| normalize_domain_name(&d.name).eq_ignore_ascii_case(&domain))
            .map(|d| d.id)
            .ok_or_else(|| ProviderError::DomainNotFound {
                provider: self.provider_name().to_string(),
                domain,
            })
    }

    /// `Record.Create` / `Record.Modify` 共用的记录字段
    fn record_params(domain_id: String, req: &RecordRequest) -> Result<WireParams> {
        let params = WireParams::new()
            .with("domain_id", domain_id)
            .with("sub_domain", req.subdomain.as_str())
            .with("record_type", req.record_type.as_str())
            .with("record_line", DEFAULT_RECORD_LINE)
            .with("ttl", req.effective_ttl());

        if req.record_type == DnsRecordType::Mx {
            let (priority, exchange) = split_mx(&req.value).ok_or_else(|| {
                ProviderError::validation("value", "MX value must be '<priority> <exchange>'")
            })?;
            Ok(params.with("value", exchange).with("mx", priority))
        } else {
            Ok(params.with("value", req.value.as_str()))
        }
    }

    /// 上游记录 -> `DnsRecord`；不支持的记录类型返回 `None`
    pub(crate) fn convert_record(record: LegacyRecord, zone: &str) -> Option<DnsRecord> {
        let Some(record_type) = parse_upstream_record_type(&record.record_type) else {
            log::debug!(
                "[{}] skipping record {} with unsupported type '{}'",
                super::PROVIDER_NAME,
                record.id,
                record.record_type
            );
            return None;
        };

        let ttl = match record.ttl.parse::<u32>() {
            Ok(ttl) if TTL_RANGE.contains(&ttl) => ttl,
            _ => {
                log::debug!(
                    "[{}] record {} has TTL '{}', using default {}",
                    super::PROVIDER_NAME,
                    record.id,
                    record.ttl,
                    record_type.default_ttl()
                );
                record_type.default_ttl()
            }
        };
        let status = record.effective_status();
        let value = match (record_type, record.mx.parse::<u16>()) {
            (DnsRecordType::Mx, Ok(priority)) => join_mx(priority, &record.value),
            _ => record.value,
        };

        Some(DnsRecord {
            id: record.id,
            name: relative_to_full_name(&record.name, zone),
            subdomain: record.name,
            record_type,
            value,
            ttl,
            status,
            updated_on: record.updated_on,
        })
    }
}

#[async_trait]
impl DnsProvider for DnspodLegacyProvider {
    fn id(&self) -> &'static str {
        "dnspod"
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::DnspodLegacy,
            name: "DNSPod（旧版 Token）".to_string(),
            description: "DNSPod 旧版 API，使用 ID,Token 鉴权".to_string(),
            required_fields: vec![ProviderCredentialField {
                key: "token".to_string(),
                label: "API Token".to_string(),
                field_type: FieldType::Password,
                optional: false,
                placeholder: Some("ID,Token".to_string()),
            }],
        }
    }

    async fn validate_credentials(&self) -> Result<bool> {
        let params = WireParams::new()
            .with("type", "all")
            .with("length", 1_u32);

        match self.request("Domain.List", params).await {
            Ok(_) => Ok(true),
            Err(e) => match e.upstream_code() {
                Some(code) if is_credential_rejection(code) => {
                    log::warn!("凭证验证失败: {e}");
                    Ok(false)
                }
                Some(STATUS_NO_DOMAINS) => Ok(true),
                _ => Err(e),
            },
        }
    }

    async fn create_record(&self, req: &RecordRequest) -> Result<String> {
        validate_record(req, self.validation)?;

        let domain_id = self.resolve_domain_id(&req.domain).await?;
        let params = Self::record_params(domain_id, req)?;

        let response = self.request("Record.Create", params).await?;
        response
            .record
            .map(|r| r.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| self.parse_error("Record.Create response has no record id"))
    }

    async fn update_record(&self, external_id: &str, req: &RecordRequest) -> Result<()> {
        validate_record(req, self.validation)?;
        let record_id = parse_record_id(external_id)?;

        let domain_id = self.resolve_domain_id(&req.domain).await?;
        let params = Self::record_params(domain_id, req)?.with("record_id", record_id);

        self.request("Record.Modify", params).await?;
        Ok(())
    }

    async fn delete_record(&self, domain: &str, external_id: &str) -> Result<()> {
        validate_domain_name(domain)?;
        let record_id = parse_record_id(external_id)?;

        let domain_id = self.resolve_domain_id(domain).await?;
        let params = WireParams::new()
            .with("domain_id", domain_id)
            .with("record_id", record_id);

        self.request("Record.Remove", params).await?;
        Ok(())
    }

    async fn get_records(&self, domain: &str) -> Result<Vec<DnsRecord>> {
        validate_domain_name(domain)?;

        let domain_id = self.resolve_domain_id(domain).await?;
        let params = WireParams::new()
            .with("domain_id", domain_id)
            .with("length", MAX_RECORD_LIST_LENGTH);

        let records = match self.request("Record.List", params).await {
            Ok(response) => response.records,
            // 域名下没有记录
            Err(e) if e.upstream_code() == Some(STATUS_NO_RECORDS) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        Ok(records
            .into_iter()
            .filter_map(|r| Self::convert_record(r, domain))
            .collect())
    }

    async fn get_domains(&self) -> Result<Vec<Domain>> {
        let params = WireParams::new().with("type", "all");

        let domains = match self.request("Domain.List", params).await {
            Ok(response) => response.domains,
            Err(e) if e.upstream_code() == Some(STATUS_NO_DOMAINS) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        Ok(domains
            .into_iter()
            .map(|d| Domain {
                id: d.id,
                name: d.name,
                status: d.status,
            })
            .collect())
    }

    async fn get_record(&self, domain: &str, external_id: &str) -> Result<DnsRecord> {
        validate_domain_name(domain)?;
        let record_id = parse_record_id(external_id)?;

        let domain_id = self.resolve_domain_id(domain).await?;
        let params = WireParams::new()
            .with("domain_id", domain_id)
            .with("record_id", record_id);

        let response = self.request("Record.Info", params).await?;
        let record = response
            .record
            .ok_or_else(|| self.parse_error("Record.Info response has no record"))?;
        let record_type = record.record_type.clone();

        Self::convert_record(record, domain)
            .ok_or_else(|| self.parse_error(format!("unsupported record type '{record_type}'")))
    }

    async fn set_record_status(
        &self,
        domain: &str,
        external_id: &str,
        status: RecordStatus,
    ) -> Result<()> {
        validate_domain_name(domain)?;
        let record_id = parse_record_id(external_id)?;

        let domain_id = self.resolve_domain_id(domain).await?;
        let params = WireParams::new()
            .with("domain_id", domain_id)
            .with("record_id", record_id)
            .with("status", status.as_lower());

        self.request("Record.Status", params).await?;
        Ok(())
    }
}
