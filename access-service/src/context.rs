//! Request-scoped authorization context.
//!
//! The context is an explicit value built up by the gate pipeline and handed
//! to handlers through request extensions. Once a gate has written a field,
//! downstream gates and handlers treat it as trusted for the remainder of
//! the request; nothing re-validates it. The context dies with the request.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use serde::Serialize;
use uuid::Uuid;

use crate::models::CallerProfile;
use service_core::error::AppError;

/// Accumulated authorization facts for one request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestContext {
    pub caller_id: Option<String>,
    pub session_id: Option<String>,
    pub account_id: Option<Uuid>,
    pub access_id: Option<Uuid>,
    pub role: Option<String>,
    pub caller_profile: Option<CallerProfile>,
    pub sys_admin: bool,
}

impl RequestContext {
    /// Seed context for a request whose account id has already been bound
    /// by the upstream tenant resolver.
    pub fn for_account(account_id: Option<Uuid>) -> Self {
        Self {
            account_id,
            ..Self::default()
        }
    }
}

/// Account id bound by the external tenant resolver, carried in request
/// extensions until the pipeline seeds its context from it.
#[derive(Debug, Clone, Copy)]
pub struct AccountContext(pub Uuid);

/// Extractor handing the trusted context to route handlers.
///
/// Only available on routes behind an authorization pipeline; anywhere else
/// the extension is absent and extraction fails with a 500, which signals a
/// route wired without its gates.
pub struct AuthorizedContext(pub RequestContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthorizedContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts.extensions.get::<RequestContext>().cloned().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "Authorization context missing from request extensions"
            ))
        })?;

        Ok(AuthorizedContext(ctx))
    }
}
