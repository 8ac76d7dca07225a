//! 真实环境集成测试
//!
//! 运行方式:
//! ```bash
//! DNSPOD_SECRET_ID=xxx DNSPOD_SECRET_KEY=xxx TEST_DOMAIN=example.com \
//!     cargo test -p zonehub-provider --test live_test -- --ignored --nocapture --test-threads=1
//!
//! DNSPOD_TOKEN=12345,xxx TEST_DOMAIN=example.com \
//!     cargo test -p zonehub-provider --test live_test legacy -- --ignored --nocapture --test-threads=1
//! ```

mod common;

use common::{TestContext, TestRecordType, generate_test_record_name, get_test_record_values};
use zonehub_provider::RecordStatus;

// ============ 基础测试 ============

macro_rules! basic_tests {
    ($module:ident, $ctx:ident, $($env:expr),+) => {
        mod $module {
            use super::*;

            #[tokio::test]
            #[ignore]
            async fn validate_credentials() {
                skip_if_no_credentials!($($env),+);

                let ctx = TestContext::$ctx().expect("创建测试上下文失败");
                let valid = require_ok!(ctx.provider.validate_credentials().await);
                assert!(valid, "凭证应该有效");

                println!("✓ validate_credentials 测试通过");
            }

            #[tokio::test]
            #[ignore]
            async fn get_domains_contains_test_domain() {
                skip_if_no_credentials!($($env),+);

                let ctx = TestContext::$ctx().expect("创建测试上下文失败");
                let domains = require_ok!(ctx.provider.get_domains().await);
                assert!(
                    domains.iter().any(|d| d.name.eq_ignore_ascii_case(&ctx.domain)),
                    "域名列表中没有 {}",
                    ctx.domain
                );

                println!("✓ get_domains 测试通过，共 {} 个域名", domains.len());
            }

            #[tokio::test]
            #[ignore]
            async fn get_records() {
                skip_if_no_credentials!($($env),+);

                let ctx = TestContext::$ctx().expect("创建测试上下文失败");
                let records = require_ok!(ctx.provider.get_records(&ctx.domain).await);

                println!("✓ get_records 测试通过，共 {} 条记录", records.len());
            }

            #[tokio::test]
            #[ignore]
            async fn toggle_record_status() {
                skip_if_no_credentials!($($env),+);

                let ctx = TestContext::$ctx().expect("创建测试上下文失败");
                let (_, record_id) = ctx.create_test_record().await.expect("创建测试记录失败");

                let disabled = ctx
                    .provider
                    .set_record_status(&ctx.domain, &record_id, RecordStatus::Disable)
                    .await;
                let enabled = ctx
                    .provider
                    .set_record_status(&ctx.domain, &record_id, RecordStatus::Enable)
                    .await;
                ctx.cleanup_record(&record_id).await;

                require_ok!(disabled, "禁用记录失败");
                require_ok!(enabled, "启用记录失败");
                println!("✓ set_record_status 测试通过");
            }

            /// 清理所有残留的测试记录（手动运行）
            #[tokio::test]
            #[ignore]
            async fn cleanup_test_records() {
                skip_if_no_credentials!($($env),+);

                let ctx = TestContext::$ctx().expect("创建测试上下文失败");
                ctx.cleanup_all_test_records().await;
                println!("✓ 清理完成");
            }
        }
    };
}

basic_tests!(legacy, dnspod_legacy, "DNSPOD_TOKEN", "TEST_DOMAIN");
basic_tests!(v3, dnspod_v3, "DNSPOD_SECRET_ID", "DNSPOD_SECRET_KEY", "TEST_DOMAIN");

// ============ CRUD 测试宏 ============

macro_rules! crud_test {
    ($test_name:ident, $ctx:ident, $record_type:expr, $($env:expr),+) => {
        #[tokio::test]
        #[ignore]
        async fn $test_name() {
            skip_if_no_credentials!($($env),+);

            let ctx = TestContext::$ctx().expect("创建测试上下文失败");
            let subdomain = generate_test_record_name();
            let (create_value, update_value) = get_test_record_values($record_type);

            // 1. 创建
            let create_req = ctx.request(&subdomain, $record_type, create_value);
            let record_id = require_ok!(
                ctx.provider.create_record(&create_req).await,
                "创建 {:?} 记录失败",
                $record_type
            );
            println!("  创建 {:?} 记录: {subdomain} -> {record_id}", $record_type);

            // 2. 读取
            let fetched = ctx.provider.get_record(&ctx.domain, &record_id).await;
            if fetched.is_err() {
                ctx.cleanup_record(&record_id).await;
            }
            let fetched = require_ok!(fetched, "读取记录失败");
            assert_eq!(fetched.subdomain, subdomain);
            assert_eq!(fetched.record_type, $record_type.record_type());

            // 3. 更新
            let update_req = ctx.request(&subdomain, $record_type, update_value);
            let updated = ctx.provider.update_record(&record_id, &update_req).await;
            if updated.is_err() {
                ctx.cleanup_record(&record_id).await;
            }
            require_ok!(updated, "更新记录失败");

            // 4. 删除
            require_ok!(
                ctx.provider.delete_record(&ctx.domain, &record_id).await,
                "删除记录失败"
            );

            println!("✓ {:?} CRUD 测试通过", $record_type);
        }
    };
}

macro_rules! crud_tests {
    ($module:ident, $ctx:ident, $($env:expr),+) => {
        mod $module {
            use super::*;

            crud_test!(crud_a, $ctx, TestRecordType::A, $($env),+);
            crud_test!(crud_aaaa, $ctx, TestRecordType::Aaaa, $($env),+);
            crud_test!(crud_cname, $ctx, TestRecordType::Cname, $($env),+);
            crud_test!(crud_mx, $ctx, TestRecordType::Mx, $($env),+);
            crud_test!(crud_txt, $ctx, TestRecordType::Txt, $($env),+);
            crud_test!(crud_srv, $ctx, TestRecordType::Srv, $($env),+);
            crud_test!(crud_caa, $ctx, TestRecordType::Caa, $($env),+);
        }
    };
}

crud_tests!(legacy_crud, dnspod_legacy, "DNSPOD_TOKEN", "TEST_DOMAIN");
crud_tests!(v3_crud, dnspod_v3, "DNSPOD_SECRET_ID", "DNSPOD_SECRET_KEY", "TEST_DOMAIN");
