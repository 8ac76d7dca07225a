//! `DNSPod` API 3.0 HTTP 请求

use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::sign::TC3_CONTENT_TYPE;
use crate::traits::{ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;
use crate::wire::WireParams;

use super::types::ResponseMeta;
use super::{DNSPOD_LANGUAGE, DNSPOD_VERSION, DnspodV3Provider, PROVIDER_NAME, TencentEnvelope};

impl DnspodV3Provider {
    /// 执行腾讯云 API 请求
    ///
    /// The payload is marshalled once; each attempt gets a fresh timestamp and
    /// signature.
    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        action: &str,
        params: &WireParams,
    ) -> Result<T> {
        // 1. 序列化请求体（类型不符时不发送）
        let payload = params.marshal()?;
        log::debug!("[{PROVIDER_NAME}] {action} payload: {}", truncate_for_log(&payload));

        let url = format!("{}/", self.base_url);
        let target = format!("Action: {action}");

        self.retry
            .run(action, |_| {
                let payload = payload.clone();
                let url = &url;
                let target = &target;
                async move {
                    // 2. 生成签名
                    let timestamp = Utc::now().timestamp();
                    let signed = self.signer.sign(action, &payload, timestamp).map_err(|e| {
                        ProviderError::Signature {
                            provider: PROVIDER_NAME.to_string(),
                            detail: e.to_string(),
                        }
                    })?;

                    // 3. 发送请求
                    let mut request = self
                        .client
                        .post(url)
                        .header(CONTENT_TYPE, TC3_CONTENT_TYPE)
                        .header(HOST, self.signer.host())
                        .header("X-TC-Action", action)
                        .header("X-TC-Version", DNSPOD_VERSION)
                        .header("X-TC-Timestamp", signed.timestamp.to_string())
                        .header("X-TC-Language", DNSPOD_LANGUAGE)
                        .header(AUTHORIZATION, signed.authorization);
                    if let Some(region) = &self.region {
                        request = request.header("X-TC-Region", region);
                    }

                    let (_status, response_text) =
                        HttpUtils::execute_request(request.body(payload), PROVIDER_NAME, "POST", target)
                            .await?;

                    // 4. 解析响应
                    self.parse_response(action, &response_text)
                }
            })
            .await
    }

    /// `Response.Error` 存在即失败，与 HTTP 状态码无关
    pub(crate) fn parse_response<T: DeserializeOwned>(
        &self,
        action: &str,
        response_text: &str,
    ) -> Result<T> {
        let envelope: TencentEnvelope = HttpUtils::parse_json(response_text, PROVIDER_NAME)?;
        let meta = ResponseMeta::deserialize(&envelope.response)
            .map_err(|e| self.parse_error(format!("{action}: {e}")))?;

        if let Some(error) = meta.error {
            let err = self.map_error(
                RawApiError::new(error.code, error.message).with_request_id(meta.request_id),
            );
            if err.is_expected() {
                log::warn!("[{PROVIDER_NAME}] {action}: {err}");
            } else {
                log::error!("[{PROVIDER_NAME}] {action}: {err}");
            }
            return Err(err);
        }

        log::debug!(
            "[{PROVIDER_NAME}] {action} ok, RequestId: {}",
            meta.request_id.as_deref().unwrap_or("-")
        );

        T::deserialize(envelope.response).map_err(|e| self.parse_error(format!("{action}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::dnspod_v3::{CreateRecordResponse, EmptyResponse};

    fn provider() -> DnspodV3Provider {
        DnspodV3Provider::new(
            "AKIDz8krbsJ5yKBZQpn74WFkmLPx3EXAMPLE".to_string(),
            "Gu5t9xGARNpq86cd98joQYCN3EXAMPLE".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn parses_success_payload() {
        let resp: CreateRecordResponse = provider()
            .parse_response(
                "CreateRecord",
                r#"{"Response":{"RecordId":12345,"RequestId":"r1"}}"#,
            )
            .unwrap();
        assert_eq!(resp.record_id, 12345);
    }

    #[test]
    fn error_block_wins_over_payload() {
        let err = provider()
            .parse_response::<EmptyResponse>(
                "DeleteRecord",
                r#"{"Response":{"Error":{"Code":"InternalError","Message":"boom"},"RequestId":"r2"}}"#,
            )
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(
            err,
            ProviderError::UpstreamApi { ref request_id, .. } if request_id.as_deref() == Some("r2")
        ));
    }

    #[test]
    fn missing_fields_are_parse_errors() {
        let err = provider()
            .parse_response::<CreateRecordResponse>("CreateRecord", r#"{"Response":{"RequestId":"r3"}}"#)
            .unwrap_err();
        assert!(matches!(err, ProviderError::Parse { .. }));

        let err = provider()
            .parse_response::<EmptyResponse>("DeleteRecord", "<html>bad gateway</html>")
            .unwrap_err();
        assert!(matches!(err, ProviderError::Parse { .. }));
    }
}
