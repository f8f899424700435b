//! Denial taxonomy for the authorization pipeline.
//!
//! Every external-call failure inside a gate is caught and classified into
//! one of these variants; nothing escapes a gate as a raw error. The four
//! 403 causes share a status code and are distinguished by message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Decision {
    #[error("authentication required")]
    Unauthenticated,

    #[error("an account context is required for this request")]
    TenantContextMissing,

    #[error("no access to this account.")]
    NoAccess,

    #[error("access to this account has been revoked.")]
    AccessRevoked,

    #[error("role not determined")]
    RoleUndetermined,

    #[error("this action requires the {required_role} role or higher (your role: {your_role})")]
    InsufficientRole {
        required_role: String,
        your_role: String,
    },

    #[error("system administrator access required.")]
    SysAdminRequired,

    #[error("{0} is unavailable")]
    Unavailable(&'static str),

    #[error("access verification failed")]
    VerificationFailed,
}

impl Decision {
    pub fn status(&self) -> StatusCode {
        match self {
            Decision::Unauthenticated => StatusCode::UNAUTHORIZED,
            Decision::TenantContextMissing => StatusCode::BAD_REQUEST,
            Decision::NoAccess
            | Decision::AccessRevoked
            | Decision::RoleUndetermined
            | Decision::InsufficientRole { .. }
            | Decision::SysAdminRequired => StatusCode::FORBIDDEN,
            Decision::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Decision::VerificationFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-readable error code for the wire body.
    pub fn code(&self) -> &'static str {
        match self {
            Decision::Unauthenticated => "unauthenticated",
            Decision::TenantContextMissing => "tenant_context_missing",
            Decision::NoAccess
            | Decision::AccessRevoked
            | Decision::RoleUndetermined
            | Decision::InsufficientRole { .. }
            | Decision::SysAdminRequired => "forbidden",
            Decision::Unavailable(_) => "service_unavailable",
            Decision::VerificationFailed => "verification_failed",
        }
    }
}

impl IntoResponse for Decision {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct DenialBody {
            error: &'static str,
            message: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            required_role: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            your_role: Option<String>,
        }

        let status = self.status();
        let code = self.code();
        let message = self.to_string();

        let (required_role, your_role) = match self {
            Decision::InsufficientRole {
                required_role,
                your_role,
            } => (Some(required_role), Some(your_role)),
            _ => (None, None),
        };

        (
            status,
            Json(DenialBody {
                error: code,
                message,
                required_role,
                your_role,
            }),
        )
            .into_response()
    }
}
