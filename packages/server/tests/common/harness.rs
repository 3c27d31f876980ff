//! Test harness wiring the router to in-memory dependencies.

use api_core::domains::sync::{SyncQueueConfig, SyncWorkerHandle};
use api_core::kernel::test_dependencies::TEST_ADMIN_PASSWORD;
use api_core::kernel::TestDependencies;
use api_core::server::{build_app, AppOptions};
use serde_json::json;

use super::HttpClient;

pub struct TestHarness {
    pub deps: TestDependencies,
    pub client: HttpClient,
    worker: Option<SyncWorkerHandle>,
}

impl TestHarness {
    /// Router with background sync switched off.
    pub fn new() -> Self {
        let deps = TestDependencies::new();
        let app = build_app(deps.server_deps(), AppOptions { rate_limit_enabled: false });
        Self {
            deps,
            client: HttpClient::new(app),
            worker: None,
        }
    }

    /// Router whose write paths feed a running sync worker.
    pub fn with_sync(config: SyncQueueConfig) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let deps = TestDependencies::new();
        let (server_deps, worker) = deps.server_deps_with_sync(config);
        let app = build_app(server_deps, AppOptions { rate_limit_enabled: false });
        Self {
            deps,
            client: HttpClient::new(app),
            worker: Some(worker),
        }
    }

    pub async fn admin_token(&self) -> String {
        let response = self
            .client
            .post("/api/admin/login", json!({ "password": TEST_ADMIN_PASSWORD }))
            .await;
        assert_eq!(response.status, 200, "admin login failed: {}", response.body);
        response.body["token"]
            .as_str()
            .expect("token in admin login response")
            .to_string()
    }

    /// Registers a user and returns (token, user id).
    pub async fn user_token(&self, email: &str) -> (String, String) {
        let response = self
            .client
            .post(
                "/api/auth/register",
                json!({ "email": email, "password": "password123", "name": "Test User" }),
            )
            .await;
        assert_eq!(response.status, 200, "register failed: {}", response.body);
        (
            response.body["token"].as_str().unwrap().to_string(),
            response.body["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    pub async fn shutdown(self) {
        if let Some(worker) = self.worker {
            worker.close().await;
        }
    }
}
