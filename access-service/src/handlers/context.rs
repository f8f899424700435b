//! Access context handlers.
//!
//! These return the trusted authorization facts to the frontend so the CRUD
//! screens can branch on role and operator status without re-deriving them.

use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::authz::is_sys_admin;
use crate::context::AuthorizedContext;
use crate::middleware::session_token;
use crate::models::{has_role, CallerProfile, Role};
use crate::AppState;

/// Trusted context for the current request.
#[derive(Debug, Serialize)]
pub struct AccessContextResponse {
    pub caller_id: Option<String>,
    pub session_id: Option<String>,
    pub account_id: Option<Uuid>,
    pub access_id: Option<Uuid>,
    pub role: Option<String>,
    pub caller_profile: Option<CallerProfile>,
    /// Advisory flag for UI branching only; computed by the non-blocking
    /// sys-admin check, never by the tenant pipeline.
    pub sys_admin: bool,
}

/// Get the authorization context for the current caller.
///
/// GET /access/context (minimum role: viewer)
pub async fn get_access_context(
    State(state): State<AppState>,
    headers: HeaderMap,
    AuthorizedContext(ctx): AuthorizedContext,
) -> Json<AccessContextResponse> {
    let token = session_token(&headers);
    let sys_admin = is_sys_admin(
        &state.identity,
        &state.config.security.sys_admin_domains,
        token.as_deref(),
    )
    .await;

    Json(AccessContextResponse {
        caller_id: ctx.caller_id,
        session_id: ctx.session_id,
        account_id: ctx.account_id,
        access_id: ctx.access_id,
        role: ctx.role,
        caller_profile: ctx.caller_profile,
        sys_admin,
    })
}

/// Management view of the account, for admin-and-above screens.
#[derive(Debug, Serialize)]
pub struct ManagementContextResponse {
    pub account_id: Option<Uuid>,
    pub role: Option<String>,
    pub can_manage: bool,
}

/// Confirm management privileges for the current account.
///
/// GET /access/manage (minimum role: admin)
pub async fn get_management_context(
    AuthorizedContext(ctx): AuthorizedContext,
) -> Json<ManagementContextResponse> {
    // Derived from the trusted role rather than assumed from the route's
    // pipeline, so the response stays honest if the floor changes.
    let can_manage = ctx
        .role
        .as_deref()
        .map(|role| has_role(role, Role::Admin))
        .unwrap_or(false);

    Json(ManagementContextResponse {
        account_id: ctx.account_id,
        role: ctx.role,
        can_manage,
    })
}
