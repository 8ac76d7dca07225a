//! `DNSPod` API 3.0 DnsProvider trait 实现

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
use crate::validation::{validate_domain_name, validate_record};
use crate::wire::WireParams;

use super::error::{NO_DATA_OF_DOMAIN, NO_DATA_OF_RECORD, is_credential_rejection};
use super::types::{RecordInfo, V3Record};
use super::{
    CreateRecordResponse, DescribeRecordResponse, DnspodV3Provider, DomainListResponse,
    EmptyResponse, MAX_PAGE_SIZE, PROVIDER_NAME, RecordListResponse,
};

impl DnspodV3Provider {
    /// `CreateRecord` / `ModifyRecord` 共用的记录字段
    fn record_params(req: &RecordRequest) -> Result<WireParams> {
        let params = WireParams::new()
            .with("Domain", normalize_domain_name(&req.domain))
            .with("SubDomain", req.subdomain.as_str())
            .with("RecordType", req.record_type.as_str())
            .with("RecordLine", DEFAULT_RECORD_LINE)
            .with("TTL", req.effective_ttl());

        if req.record_type == DnsRecordType::Mx {
            let (priority, exchange) = split_mx(&req.value).ok_or_else(|| {
                ProviderError::validation("value", "MX value must be '<priority> <exchange>'")
            })?;
            Ok(params.with("Value", exchange).with("MX", priority))
        } else {
            Ok(params.with("Value", req.value.as_str()))
        }
    }

    fn record_value(record_type: DnsRecordType, value: String, mx: Option<u16>) -> String {
        match (record_type, mx) {
            (DnsRecordType::Mx, Some(priority)) => join_mx(priority, &value),
            _ => value,
        }
    }

    /// 列表项 -> `DnsRecord`；不支持的记录类型返回 `None`
    pub(crate) fn convert_record(record: V3Record, zone: &str) -> Option<DnsRecord> {
        let Some(record_type) = parse_upstream_record_type(&record.record_type) else {
            log::debug!(
                "[{PROVIDER_NAME}] skipping record {} with unsupported type '{}'",
                record.record_id,
                record.record_type
            );
            return None;
        };

        Some(DnsRecord {
            id: record.record_id.to_string(),
            name: relative_to_full_name(&record.name, zone),
            subdomain: record.name,
            record_type,
            value: Self::record_value(record_type, record.value, record.mx),
            ttl: record.ttl,
            status: record.status,
            updated_on: record.updated_on,
        })
    }

    fn convert_record_info(&self, info: RecordInfo, zone: &str) -> Result<DnsRecord> {
        let record_type = parse_upstream_record_type(&info.record_type).ok_or_else(|| {
            self.parse_error(format!("unsupported record type '{}'", info.record_type))
        })?;
        let status = info.status().to_string();

        Ok(DnsRecord {
            id: info.id.to_string(),
            name: relative_to_full_name(&info.sub_domain, zone),
            subdomain: info.sub_domain,
            record_type,
            value: Self::record_value(record_type, info.value, info.mx),
            ttl: info.ttl,
            status,
            updated_on: info.updated_on,
        })
    }

    /// 请求下一页的条件：本页非空且累计数量小于上游报告的总数
    fn has_more(received: usize, page_len: usize, total: Option<u64>) -> bool {
        page_len > 0 && total.is_some_and(|t| (received as u64) < t)
    }
}

#[async_trait]
impl DnsProvider for DnspodV3Provider {
    fn id(&self) -> &'static str {
        "dnspod_v3"
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::DnspodV3,
            name: "腾讯云 DNSPod".to_string(),
            description: "腾讯云 DNS 解析服务（API 3.0）".to_string(),
            required_fields: vec![
                ProviderCredentialField {
                    key: "secretId".to_string(),
                    label: "SecretId".to_string(),
                    field_type: FieldType::Text,
                    optional: false,
                    placeholder: Some("输入 SecretId".to_string()),
                },
                ProviderCredentialField {
                    key: "secretKey".to_string(),
                    label: "SecretKey".to_string(),
                    field_type: FieldType::Password,
                    optional: false,
                    placeholder: Some("输入 SecretKey".to_string()),
                },
                ProviderCredentialField {
                    key: "region".to_string(),
                    label: "Region".to_string(),
                    field_type: FieldType::Text,
                    optional: true,
                    placeholder: Some("ap-guangzhou".to_string()),
                },
            ],
        }
    }

    async fn validate_credentials(&self) -> Result<bool> {
        let params = WireParams::new().with("Offset", 0_u32).with("Limit", 1_u32);

        match self
            .request::<DomainListResponse>("DescribeDomainList", &params)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => match e.upstream_code() {
                Some(code) if is_credential_rejection(code) => {
                    log::warn!("凭证验证失败: {e}");
                    Ok(false)
                }
                Some(NO_DATA_OF_DOMAIN) => Ok(true),
                _ => Err(e),
            },
        }
    }

    async fn create_record(&self, req: &RecordRequest) -> Result<String> {
        validate_record(req, self.validation)?;
        let params = Self::record_params(req)?;

        let response: CreateRecordResponse = self.request("CreateRecord", &params).await?;
        Ok(response.record_id.to_string())
    }

    async fn update_record(&self, external_id: &str, req: &RecordRequest) -> Result<()> {
        validate_record(req, self.validation)?;
        let record_id = parse_record_id(external_id)?;
        let params = Self::record_params(req)?.with("RecordId", record_id);

        let _response: EmptyResponse = self.request("ModifyRecord", &params).await?;
        Ok(())
    }

    async fn delete_record(&self, domain: &str, external_id: &str) -> Result<()> {
        validate_domain_name(domain)?;
        let domain = normalize_domain_name(domain);
        let record_id = parse_record_id(external_id)?;
        let params = WireParams::new()
            .with("Domain", domain.as_str())
            .with("RecordId", record_id);

        let _response: EmptyResponse = self.request("DeleteRecord", &params).await?;
        Ok(())
    }

    async fn get_records(&self, domain: &str) -> Result<Vec<DnsRecord>> {
        validate_domain_name(domain)?;
        let domain = normalize_domain_name(domain);

        let mut upstream: Vec<V3Record> = Vec::new();
        loop {
            let params = WireParams::new()
                .with("Domain", domain.as_str())
                .with("Offset", upstream.len() as u64)
                .with("Limit", MAX_PAGE_SIZE);

            let page: RecordListResponse = match self.request("DescribeRecordList", &params).await
            {
                Ok(page) => page,
                // 域名下没有记录
                Err(e) if e.upstream_code() == Some(NO_DATA_OF_RECORD) => break,
                Err(e) => return Err(e),
            };

            let total = page.record_count_info.and_then(|c| c.total_count);
            let page_len = page.record_list.len();
            upstream.extend(page.record_list);

            if !Self::has_more(upstream.len(), page_len, total) {
                break;
            }
        }

        Ok(upstream
            .into_iter()
            .filter_map(|r| Self::convert_record(r, &domain))
            .collect())
    }

    async fn get_domains(&self) -> Result<Vec<Domain>> {
        let mut domains = Vec::new();
        loop {
            let params = WireParams::new()
                .with("Offset", domains.len() as u64)
                .with("Limit", MAX_PAGE_SIZE);

            let page: DomainListResponse = match self.request("DescribeDomainList", &params).await
            {
                Ok(page) => page,
                Err(e) if e.upstream_code() == Some(NO_DATA_OF_DOMAIN) => break,
                Err(e) => return Err(e),
            };

            let total = page.domain_count_info.as_ref().and_then(|c| c.total());
            let page_len = page.domain_list.len();
            domains.extend(page.domain_list.into_iter().map(|d| Domain {
                id: d.domain_id.to_string(),
                name: d.name,
                status: d.status,
            }));

            if !Self::has_more(domains.len(), page_len, total) {
                break;
            }
        }
        Ok(domains)
    }

    async fn get_record(&self, domain: &str, external_id: &str) -> Result<DnsRecord> {
        validate_domain_name(domain)?;
        let domain = normalize_domain_name(domain);
        let record_id = parse_record_id(external_id)?;
        let params = WireParams::new()
            .with("Domain", domain.as_str())
            .with("RecordId", record_id);

        let response: DescribeRecordResponse = self.request("DescribeRecord", &params).await?;
        self.convert_record_info(response.record_info, &domain)
    }

    async fn set_record_status(
        &self,
        domain: &str,
        external_id: &str,
        status: RecordStatus,
    ) -> Result<()> {
        validate_domain_name(domain)?;
        let domain = normalize_domain_name(domain);
        let record_id = parse_record_id(external_id)?;
        let params = WireParams::new()
            .with("Domain", domain.as_str())
            .with("RecordId", record_id)
            .with("Status", status.as_upper());

        let _response: EmptyResponse = self.request("ModifyRecordStatus", &params).await?;
        Ok(())
    }
}
