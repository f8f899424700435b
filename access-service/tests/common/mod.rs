//! Test helper module for access-service integration tests.
//!
//! Provides a router wired with in-memory ports so tests can drive the
//! authorization pipelines without PostgreSQL or a live identity provider.

#![allow(dead_code)]

use std::sync::Arc;

use access_service::{
    build_router,
    config::{AccessConfig, DatabaseConfig, Environment, IdentityConfig, SecurityConfig},
    models::AccessRecord,
    services::{MockAccessStore, MockIdentityClient},
    AppState,
};
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use uuid::Uuid;

pub const OPERATOR_DOMAIN: &str = "tryequipped.com";

/// Test application with mock ports the tests can mutate directly.
pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MockAccessStore>,
    pub identity: Arc<MockIdentityClient>,
    pub router: Router,
}

impl TestApp {
    pub fn spawn() -> Self {
        let store = Arc::new(MockAccessStore::new());
        let identity = Arc::new(MockIdentityClient::new());

        let state = AppState {
            config: create_test_config(),
            store: store.clone() as Arc<dyn access_service::services::AccessStore>,
            identity: identity.clone() as Arc<dyn access_service::services::IdentityClient>,
        };
        let router = build_router(state.clone());

        TestApp {
            state,
            store,
            identity,
            router,
        }
    }

    /// Register a session and give the caller a role within an account.
    pub fn grant_access(&self, token: &str, caller_id: &str, account_id: Uuid, role: &str) {
        self.identity.add_session(token, caller_id, "session-1");
        self.store.insert(access_record(caller_id, account_id, role));
    }
}

pub fn create_test_config() -> AccessConfig {
    AccessConfig {
        common: service_core::config::Config {
            port: 0,
            log_level: "error".to_string(),
        },
        environment: Environment::Dev,
        service_name: "access-service-test".to_string(),
        service_version: "0.0.0".to_string(),
        database: DatabaseConfig {
            url: "postgres://localhost:5432/access_test".to_string(),
            max_connections: 5,
            min_connections: 1,
        },
        identity: IdentityConfig {
            base_url: "http://localhost:9090".to_string(),
            timeout_seconds: 1,
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            sys_admin_domains: vec![
                OPERATOR_DOMAIN.to_string(),
                "equipped-ops.com".to_string(),
            ],
        },
    }
}

pub fn access_record(caller_id: &str, account_id: Uuid, role: &str) -> AccessRecord {
    AccessRecord {
        access_id: Uuid::new_v4(),
        caller_id: caller_id.to_string(),
        account_id,
        role: role.to_string(),
        email: format!("{}@company.com", caller_id),
        first_name: "Test".to_string(),
        last_name: "Caller".to_string(),
        created_utc: Utc::now(),
    }
}

/// GET request with optional bearer token and account header.
pub fn get_request(uri: &str, token: Option<&str>, account_id: Option<Uuid>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    if let Some(account_id) = account_id {
        builder = builder.header("x-account-id", account_id.to_string());
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<axum::body::Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read response body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("response body was not valid JSON")
}
