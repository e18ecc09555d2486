//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use cdn_orchestrator_provider::{
    CdnApi, ClientConfig, DomainRequest, ValidationMode, create_client,
};

/// Service the live tests may attach temporary domains to.
pub const ENV_TEST_SERVICE_ID: &str = "CACHEFLY_TEST_SERVICE_ID";

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping test: environment variable {} is not set", $var);
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

/// 生成唯一的测试域名
pub fn generate_test_domain_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("test-{}.example.com", &uuid.to_string()[..8])
}

/// 测试上下文 - 封装 API 客户端和测试服务
pub struct TestContext {
    pub api: Arc<dyn CdnApi>,
    pub service_id: Option<String>,
}

impl TestContext {
    /// Builds a client from `CACHEFLY_TOKEN` (and optional `CACHEFLY_API_URL`).
    pub fn from_env() -> Option<Self> {
        let config = ClientConfig::from_env().ok()?;
        let api = create_client(config).ok()?;
        Some(Self {
            api,
            service_id: env::var(ENV_TEST_SERVICE_ID).ok(),
        })
    }

    /// Attaches a temporary domain and returns its name.
    pub async fn create_test_domain(&self, service_id: &str) -> Option<String> {
        let name = generate_test_domain_name();
        let request = DomainRequest {
            name: name.clone(),
            description: "integration-test".to_string(),
            validation_mode: ValidationMode::None,
        };
        self.api.create_domain(service_id, &request).await.ok()?;
        Some(name)
    }

    /// 查找并清理所有测试域名（以 test- 开头、example.com 结尾）
    pub async fn cleanup_test_domains(&self, service_id: &str) {
        if let Ok(domains) = self.api.list_all_domains(service_id).await {
            for domain in domains {
                if domain.name.starts_with("test-") && domain.name.ends_with(".example.com") {
                    let _ = self.api.delete_domain(service_id, &domain.id).await;
                }
            }
        }
    }
}
