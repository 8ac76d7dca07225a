//! `DNSPod` 旧版 API HTTP 请求

use reqwest::header::{CONTENT_TYPE, USER_AGENT};

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::redact_form_body;
use crate::wire::WireParams;

use super::{DnspodLegacyProvider, LegacyResponse, PROVIDER_NAME, STATUS_OK};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const CLIENT_USER_AGENT: &str = concat!("zonehub-provider/", env!("CARGO_PKG_VERSION"));

impl DnspodLegacyProvider {
    /// POST `params` to `/<endpoint>` and return the envelope of a successful call.
    ///
    /// `login_token` and `format=json` are added here. A non-`"1"` status is
    /// mapped through the error table.
    pub(crate) async fn request(&self, endpoint: &str, params: WireParams) -> Result<LegacyResponse> {
        // 1. 表单编码（失败时不发送请求）
        let body = params
            .with("login_token", self.token.as_str())
            .with("format", "json")
            .to_form_body()?;
        log::debug!("[{PROVIDER_NAME}] {endpoint} body: {}", redact_form_body(&body));

        let url = format!("{}/{endpoint}", self.base_url);

        // 2. 发送（含重试）
        self.retry
            .run(endpoint, |_| {
                let request = self
                    .client
                    .post(&url)
                    .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                    .header(USER_AGENT, CLIENT_USER_AGENT)
                    .body(body.clone());
                async move {
                    let (_status, text) =
                        HttpUtils::execute_request(request, PROVIDER_NAME, "POST", endpoint).await?;

                    // 3. 解析并检查状态码
                    let response: LegacyResponse = HttpUtils::parse_json(&text, PROVIDER_NAME)?;
                    if response.status.code == STATUS_OK {
                        Ok(response)
                    } else {
                        let err = self.map_error(RawApiError::new(
                            response.status.code,
                            response.status.message,
                        ));
                        if err.is_expected() {
                            log::warn!("{err}");
                        } else {
                            log::error!("{err}");
                        }
                        Err(err)
                    }
                }
            })
            .await
    }
}
