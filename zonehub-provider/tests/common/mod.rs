//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use wiremock::MockServer;
use zonehub_provider::{
    DnsProvider, DnsRecordType, DnspodLegacyProvider, DnspodV3Provider, ProviderCredentials,
    RecordRequest, create_provider,
};

pub const SECRET_ID: &str = "AKIDz8krbsJ5yKBZQpn74WFkmLPx3EXAMPLE";
pub const SECRET_KEY: &str = "Gu5t9xGARNpq86cd98joQYCN3EXAMPLE";
pub const LEGACY_TOKEN: &str = "12345,0123456789abcdef0123456789abcdef";

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

// ============ Mock 服务器 ============

/// 指向 mock 服务器的旧版 Provider（重试间隔缩短为毫秒级）
pub fn legacy_provider(server: &MockServer, max_retries: u32) -> DnspodLegacyProvider {
    DnspodLegacyProvider::builder(LEGACY_TOKEN.to_string())
        .endpoint(server.uri())
        .max_retries(max_retries)
        .base_delay(Duration::from_millis(1))
        .build()
        .expect("legacy provider")
}

/// 指向 mock 服务器的 3.0 Provider（重试间隔缩短为毫秒级）
pub fn v3_provider(server: &MockServer, max_retries: u32) -> DnspodV3Provider {
    DnspodV3Provider::builder(SECRET_ID.to_string(), SECRET_KEY.to_string())
        .endpoint(server.uri())
        .max_retries(max_retries)
        .base_delay(Duration::from_millis(1))
        .build()
        .expect("v3 provider")
}

/// mock 服务器的 `Host` 头
pub fn mock_host(server: &MockServer) -> String {
    let addr = server.address();
    format!("{}:{}", addr.ip(), addr.port())
}

/// 旧版 API 成功信封
pub fn legacy_ok(extra: serde_json::Value) -> serde_json::Value {
    let mut body = serde_json::json!({
        "status": {"code": "1", "message": "Action completed successful"}
    });
    if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        body.extend(extra.clone());
    }
    body
}

/// 旧版 API 错误信封
pub fn legacy_status(code: &str, message: &str) -> serde_json::Value {
    serde_json::json!({"status": {"code": code, "message": message}})
}

/// 3.0 API 成功信封
pub fn v3_ok(mut response: serde_json::Value) -> serde_json::Value {
    if let Some(obj) = response.as_object_mut() {
        obj.insert("RequestId".into(), "req-ok".into());
    }
    serde_json::json!({ "Response": response })
}

/// 3.0 API 错误信封
pub fn v3_error(code: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "Response": {
            "Error": {"Code": code, "Message": message},
            "RequestId": "req-err"
        }
    })
}

// ============ 测试数据 ============

/// 生成唯一的测试记录名称
pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}

/// 支持测试的记录类型
#[derive(Debug, Clone, Copy)]
pub enum TestRecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Srv,
    Caa,
}

impl TestRecordType {
    pub fn record_type(self) -> DnsRecordType {
        match self {
            Self::A => DnsRecordType::A,
            Self::Aaaa => DnsRecordType::Aaaa,
            Self::Cname => DnsRecordType::Cname,
            Self::Mx => DnsRecordType::Mx,
            Self::Txt => DnsRecordType::Txt,
            Self::Srv => DnsRecordType::Srv,
            Self::Caa => DnsRecordType::Caa,
        }
    }
}

/// 获取测试记录值（创建和更新）
pub fn get_test_record_values(record_type: TestRecordType) -> (&'static str, &'static str) {
    match record_type {
        TestRecordType::A => ("192.0.2.1", "192.0.2.2"),
        TestRecordType::Aaaa => ("2001:db8::1", "2001:db8::2"),
        TestRecordType::Cname => ("target1.example.com", "target2.example.com"),
        TestRecordType::Mx => ("10 mail1.example.com", "20 mail2.example.com"),
        TestRecordType::Txt => ("test-value-1", "test-value-2"),
        TestRecordType::Srv => ("0 5 443 srv1.example.com", "10 10 8443 srv2.example.com"),
        TestRecordType::Caa => ("0 issue \"letsencrypt.org\"", "0 issue \"digicert.com\""),
    }
}

// ============ 真实环境 ============

/// 测试上下文 - 封装 Provider 和测试域名
pub struct TestContext {
    pub provider: Arc<dyn DnsProvider>,
    pub domain: String,
}

impl TestContext {
    /// 创建 `DNSPod` 旧版测试上下文
    pub fn dnspod_legacy() -> Option<Self> {
        let token = env::var("DNSPOD_TOKEN").ok()?;
        let domain = env::var("TEST_DOMAIN").ok()?;

        let provider = create_provider(ProviderCredentials::DnspodLegacy { token }).ok()?;
        Some(Self { provider, domain })
    }

    /// 创建 `DNSPod` 3.0 测试上下文
    pub fn dnspod_v3() -> Option<Self> {
        let secret_id = env::var("DNSPOD_SECRET_ID").ok()?;
        let secret_key = env::var("DNSPOD_SECRET_KEY").ok()?;
        let domain = env::var("TEST_DOMAIN").ok()?;
        let region = env::var("DNSPOD_REGION").ok();

        let provider = create_provider(ProviderCredentials::DnspodV3 {
            secret_id,
            secret_key,
            region,
        })
        .ok()?;
        Some(Self { provider, domain })
    }

    pub fn request(&self, subdomain: &str, record_type: TestRecordType, value: &str) -> RecordRequest {
        RecordRequest::new(&self.domain, subdomain, record_type.record_type(), value, 600)
    }

    /// 创建 TXT 测试记录，返回 (子域名, 记录 ID)
    pub async fn create_test_record(&self) -> Option<(String, String)> {
        let subdomain = generate_test_record_name();
        let request = self.request(&subdomain, TestRecordType::Txt, "integration-test");
        let id = self.provider.create_record(&request).await.ok()?;
        Some((subdomain, id))
    }

    /// 清理测试记录
    pub async fn cleanup_record(&self, record_id: &str) {
        let _ = self.provider.delete_record(&self.domain, record_id).await;
    }

    /// 查找并清理所有测试记录（以 _test- 开头的记录）
    pub async fn cleanup_all_test_records(&self) {
        if let Ok(records) = self.provider.get_records(&self.domain).await {
            for record in records {
                if record.subdomain.starts_with("_test-") {
                    let _ = self.provider.delete_record(&self.domain, &record.id).await;
                }
            }
        }
    }
}
