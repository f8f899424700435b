//! Platform-operator handlers. Routes here sit behind the sys-admin
//! pipeline and never consult any tenant's access records.

use axum::Json;
use serde::Serialize;

use crate::context::AuthorizedContext;
use crate::models::CallerProfile;

#[derive(Debug, Serialize)]
pub struct PlatformOverviewResponse {
    pub sys_admin: bool,
    pub operator: Option<CallerProfile>,
}

/// Operator landing data.
///
/// GET /admin/overview (sys-admin only)
pub async fn platform_overview(
    AuthorizedContext(ctx): AuthorizedContext,
) -> Json<PlatformOverviewResponse> {
    Json(PlatformOverviewResponse {
        sys_admin: ctx.sys_admin,
        operator: ctx.caller_profile,
    })
}
