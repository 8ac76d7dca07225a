use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    BatchCreateFailure, BatchCreateResult, DnsRecord, Domain, MAX_BATCH_SIZE, ProviderMetadata,
    RecordRequest, RecordStatus,
};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（旧版 API 为数字字符串，3.0 API 为 `Category.Detail`）
    pub code: String,
    /// 原始错误消息
    pub message: String,
    /// 上游请求 ID
    pub request_id: Option<String>,
}

impl RawApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            request_id: None,
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}

/// Provider 错误映射 Trait（内部使用）
/// 各 Provider 实现此 trait，将上游错误码翻译为面向用户的消息
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 错误码 -> 友好消息（静态表）；未收录的错误码返回 `None`
    fn friendly_message(&self, code: &str) -> Option<&'static str>;

    /// 将原始 API 错误映射到统一错误类型，未收录的错误码保留原始消息
    fn map_error(&self, raw: RawApiError) -> ProviderError {
        let message = self
            .friendly_message(&raw.code)
            .map_or(raw.message, str::to_string);
        ProviderError::UpstreamApi {
            provider: self.provider_name().to_string(),
            code: raw.code,
            message,
            request_id: raw.request_id,
        }
    }

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::Parse {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }
}

/// DNS 提供商 Trait
///
/// Implementations hold only immutable configuration and are safe to share
/// across tasks (`Arc<dyn DnsProvider>`). Every method validates its inputs
/// before any network traffic; reads always go to the provider.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// 获取 Provider 元数据（类型级别）
    ///
    /// 此方法不需要实例，可以在创建 Provider 之前调用。
    fn metadata() -> ProviderMetadata
    where
        Self: Sized;

    /// 验证凭证是否有效
    ///
    /// Returns `Ok(false)` when the provider rejects the credentials and
    /// `Err` for any other failure.
    async fn validate_credentials(&self) -> Result<bool>;

    /// 创建 DNS 记录，返回上游分配的记录 ID
    ///
    /// Not idempotent: a retried create may have succeeded upstream before a
    /// transport failure was observed.
    async fn create_record(&self, req: &RecordRequest) -> Result<String>;

    /// 更新 DNS 记录
    async fn update_record(&self, external_id: &str, req: &RecordRequest) -> Result<()>;

    /// 删除 DNS 记录
    async fn delete_record(&self, domain: &str, external_id: &str) -> Result<()>;

    /// 获取域名下全部 DNS 记录；空域名返回空列表
    async fn get_records(&self, domain: &str) -> Result<Vec<DnsRecord>>;

    /// 获取账号下全部域名
    async fn get_domains(&self) -> Result<Vec<Domain>>;

    /// 获取单条记录
    async fn get_record(&self, domain: &str, external_id: &str) -> Result<DnsRecord>;

    /// 启用/暂停记录
    async fn set_record_status(
        &self,
        domain: &str,
        external_id: &str,
        status: RecordStatus,
    ) -> Result<()>;

    /// 批量创建 DNS 记录
    ///
    /// 最多 [`MAX_BATCH_SIZE`] 条，按顺序逐条调用 `create_record()`，
    /// 收集成功 ID 与失败原因；单条失败不影响后续记录。
    async fn batch_create_records(&self, requests: &[RecordRequest]) -> Result<BatchCreateResult> {
        if requests.len() > MAX_BATCH_SIZE {
            return Err(ProviderError::validation(
                "records",
                format!(
                    "at most {MAX_BATCH_SIZE} records per batch (got {})",
                    requests.len()
                ),
            ));
        }

        let mut outcome = BatchCreateResult::default();
        for (i, req) in requests.iter().enumerate() {
            match self.create_record(req).await {
                Ok(id) => outcome.created_ids.push(id),
                Err(e) => outcome.failures.push(BatchCreateFailure {
                    request_index: i,
                    subdomain: req.subdomain.clone(),
                    reason: e.to_string(),
                }),
            }
        }
        Ok(outcome)
    }
}
