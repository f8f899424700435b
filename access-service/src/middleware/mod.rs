//! Axum adapters for the gate pipelines.
//!
//! Each adapter extracts the raw credentials from the request, runs a
//! pipeline, and on success inserts the trusted [`RequestContext`] into the
//! request extensions for handlers to read.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::authz::{account_pipeline, sys_admin_pipeline, AuthzRequest, Decision};
use crate::context::{AccountContext, RequestContext};
use crate::models::Role;
use crate::AppState;

/// Header carrying the account id resolved by the upstream tenant resolver
/// (subdomain lookup at the edge). Resolution itself is not this service's
/// concern; we only bind the already-resolved id into the seed context.
pub const ACCOUNT_ID_HEADER: &str = "x-account-id";

/// Bearer token from the Authorization header, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

/// Bind the upstream-resolved account id into request extensions.
///
/// A malformed id is treated as absent; the account access gate then fails
/// the request with 400 before any store call.
pub async fn account_context_middleware(mut req: Request, next: Next) -> Response {
    if let Some(raw) = req
        .headers()
        .get(ACCOUNT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        match Uuid::parse_str(raw) {
            Ok(account_id) => {
                req.extensions_mut().insert(AccountContext(account_id));
            }
            Err(_) => {
                tracing::warn!(value = %raw, "Malformed account id header, treating as absent");
            }
        }
    }

    next.run(req).await
}

/// Run the tenant-scoped pipeline with the given role floor.
pub async fn require_account_role(
    State(state): State<AppState>,
    min_role: Role,
    mut req: Request,
    next: Next,
) -> Result<Response, Decision> {
    let input = AuthzRequest {
        session_token: session_token(req.headers()),
    };
    let seed = RequestContext::for_account(
        req.extensions().get::<AccountContext>().map(|a| a.0),
    );

    let ctx = account_pipeline(&state, min_role).run(&input, seed).await?;

    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

/// Run the independent platform-operator pipeline.
pub async fn require_sys_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Decision> {
    let input = AuthzRequest {
        session_token: session_token(req.headers()),
    };

    let ctx = sys_admin_pipeline(&state)
        .run(&input, RequestContext::default())
        .await?;

    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}
