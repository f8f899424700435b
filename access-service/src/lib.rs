pub mod authz;
pub mod config;
pub mod context;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::{from_fn, from_fn_with_state, Next},
    routing::get,
    Json, Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    security_headers::security_headers_middleware, tracing::request_id_middleware,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AccessConfig;
use crate::middleware::{account_context_middleware, require_account_role, require_sys_admin};
use crate::models::Role;
use crate::services::{AccessStore, IdentityClient};

#[derive(Clone)]
pub struct AppState {
    pub config: AccessConfig,
    pub store: Arc<dyn AccessStore>,
    pub identity: Arc<dyn IdentityClient>,
}

pub fn build_router(state: AppState) -> Router {
    // Tenant-scoped routes. The account context is bound by the outer
    // middleware; the pipeline layers enforce the role floor per route.
    let context_routes = Router::new()
        .route("/access/context", get(handlers::context::get_access_context))
        .layer(from_fn_with_state(
            state.clone(),
            |state: State<AppState>, req: Request, next: Next| {
                require_account_role(state, Role::Viewer, req, next)
            },
        ));

    let manage_routes = Router::new()
        .route("/access/manage", get(handlers::context::get_management_context))
        .layer(from_fn_with_state(
            state.clone(),
            |state: State<AppState>, req: Request, next: Next| {
                require_account_role(state, Role::Admin, req, next)
            },
        ));

    // Platform-operator routes on the independent sys-admin pipeline.
    let admin_routes = Router::new()
        .route("/admin/overview", get(handlers::admin::platform_overview))
        .layer(from_fn_with_state(state.clone(), require_sys_admin));

    Router::new()
        .route("/health", get(health_check))
        .merge(context_routes)
        .merge(manage_routes)
        .merge(admin_routes)
        .with_state(state.clone())
        // Bind the upstream-resolved account id before any pipeline runs
        .layer(from_fn(account_context_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(
                    state
                        .config
                        .security
                        .allowed_origins
                        .iter()
                        .map(|o| {
                            o.parse::<axum::http::HeaderValue>().unwrap_or_else(|e| {
                                tracing::error!(
                                    "Invalid CORS origin '{}': {}. Using fallback.",
                                    o,
                                    e
                                );
                                axum::http::HeaderValue::from_static("*")
                            })
                        })
                        .collect::<Vec<axum::http::HeaderValue>>(),
                )
                .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::HeaderName::from_static("x-account-id"),
                    axum::http::header::HeaderName::from_static("x-request-id"),
                ]),
        )
}

/// Service health check: pings the access store and confirms the identity
/// client has an endpoint to talk to.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.store.is_configured() {
        tracing::error!("Access store is not configured");
        return Err(AppError::ServiceUnavailable);
    }

    if let Err(e) = state.store.ping().await {
        tracing::error!(error = %e, "Access store ping failed");
        return Err(AppError::ServiceUnavailable);
    }

    if state.config.identity.base_url.is_empty() {
        tracing::error!("Identity client has no base URL configured");
        return Err(AppError::ServiceUnavailable);
    }

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
        "checks": {
            "access_store": "up",
            "identity_client": "configured"
        }
    })))
}
