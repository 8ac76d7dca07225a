//! `DNSPod` API 3.0 错误映射

use crate::traits::ProviderErrorMapper;

use super::{DnspodV3Provider, PROVIDER_NAME};

/// 域名下没有记录
pub(crate) const NO_DATA_OF_RECORD: &str = "ResourceNotFound.NoDataOfRecord";
/// 账号下没有域名
pub(crate) const NO_DATA_OF_DOMAIN: &str = "ResourceNotFound.NoDataOfDomain";

/// 错误码 -> 友好消息
pub(crate) fn v3_friendly_message(code: &str) -> Option<&'static str> {
    Some(match code {
        // ============ 认证 ============
        "AuthFailure.SignatureExpire" => "签名已过期，请检查系统时间是否同步（误差不能超过5分钟）",
        "AuthFailure.SignatureFailure" => "签名验证失败，请检查SecretKey是否正确",
        "AuthFailure.SecretIdNotFound" => "SecretId不存在或已被禁用，请检查控制台中的密钥状态",
        "AuthFailure.InvalidSecretId" => "SecretId格式无效，请确认使用的是云API密钥",
        "AuthFailure.TokenFailure" => "临时凭证Token无效或已过期",

        // ============ 通用 ============
        "InvalidParameter" => "请求参数错误，请检查参数格式和取值范围",
        "ResourceNotFound" => "请求的资源不存在",
        "ResourceUnavailable" => "资源不可用",
        "UnauthorizedOperation" => "未授权的操作，请检查账户权限",
        "RequestLimitExceeded" => "请求频率超过限制，请稍后重试",
        "InternalError" => "内部错误，请稍后重试",

        _ => return None,
    })
}

/// `AuthFailure` 及其子错误码
pub(crate) fn is_credential_rejection(code: &str) -> bool {
    code == "AuthFailure" || code.starts_with("AuthFailure.")
}

impl ProviderErrorMapper for DnspodV3Provider {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn friendly_message(&self, code: &str) -> Option<&'static str> {
        v3_friendly_message(code)
    }
}
