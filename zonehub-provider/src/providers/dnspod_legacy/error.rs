//! `DNSPod` 旧版 API 错误映射

use crate::traits::ProviderErrorMapper;

use super::{DnspodLegacyProvider, PROVIDER_NAME};

/// 状态码 -> 友好消息（公共返回码 + 记录相关返回码）
pub(crate) fn legacy_friendly_message(code: &str) -> Option<&'static str> {
    Some(match code {
        // ============ 账号 / 认证 ============
        "-1" => "登录失败，请检查Token是否正确",
        "-2" => "API使用超出限制，请稍后重试",
        "-3" => "不是域名所有者或没有权限",
        "-4" => "记录不存在",
        "-7" => "您的账户已被禁用",
        "-8" => "登录失败次数过多，账户被暂时禁用",

        // ============ 域名 ============
        "6" => "域名ID错误",
        "7" => "域名被锁定",
        "21" => "域名不存在或不属于当前账户",

        // ============ 记录参数 ============
        "22" => "子域名不合法",
        "23" => "记录类型不正确",
        "24" => "记录线路不正确",
        "25" => "记录值不正确",
        "26" => "记录权重不正确",
        "27" => "记录的TTL值不正确",

        _ => return None,
    })
}

/// 凭证被拒绝的状态码（登录失败、账户禁用、登录锁定）
pub(crate) fn is_credential_rejection(code: &str) -> bool {
    matches!(code, "-1" | "-7" | "-8")
}

impl ProviderErrorMapper for DnspodLegacyProvider {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn friendly_message(&self, code: &str) -> Option<&'static str> {
        legacy_friendly_message(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::traits::RawApiError;

    fn provider() -> DnspodLegacyProvider {
        DnspodLegacyProvider::new("1,abc".to_string()).unwrap()
    }

    #[test]
    fn every_documented_code_is_translated() {
        for code in [
            "-1", "-2", "-3", "-4", "-7", "-8", "6", "7", "21", "22", "23", "24", "25", "26", "27",
        ] {
            assert!(legacy_friendly_message(code).is_some(), "{code}");
        }
    }

    #[test]
    fn known_code_uses_friendly_message() {
        let err = provider().map_error(RawApiError::new("-1", "Login failed"));
        match err {
            ProviderError::UpstreamApi {
                provider,
                code,
                message,
                request_id,
            } => {
                assert_eq!(provider, "dnspod");
                assert_eq!(code, "-1");
                assert_eq!(message, "登录失败，请检查Token是否正确");
                assert!(request_id.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_code_keeps_raw_message() {
        let err = provider().map_error(RawApiError::new("83", "Account is locked."));
        assert!(
            matches!(err, ProviderError::UpstreamApi { ref message, .. } if message == "Account is locked."),
            "{err:?}"
        );
    }

    #[test]
    fn legacy_codes_are_never_retryable() {
        let err = provider().map_error(RawApiError::new("-2", "API usage limit"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn credential_rejection_codes() {
        assert!(is_credential_rejection("-1"));
        assert!(is_credential_rejection("-8"));
        assert!(!is_credential_rejection("21"));
    }
}
