//! Role hierarchy enforcer: gates a route behind a minimum role.

use async_trait::async_trait;

use super::{AuthzRequest, Decision, Gate};
use crate::context::RequestContext;
use crate::models::{level_of, Role};

/// Pure, stateless level comparison. No I/O; safe to unit test alone.
pub struct RoleGate {
    min_role: Role,
}

impl RoleGate {
    pub fn new(min_role: Role) -> Self {
        Self { min_role }
    }
}

#[async_trait]
impl Gate for RoleGate {
    fn name(&self) -> &'static str {
        "role_hierarchy"
    }

    async fn authorize(
        &self,
        _request: &AuthzRequest,
        ctx: RequestContext,
    ) -> Result<RequestContext, Decision> {
        // An unset role means the account access gate never ran; that is a
        // pipeline-ordering bug, not a caller mistake.
        let role = match ctx.role.as_deref() {
            Some(role) => role,
            None => {
                tracing::error!("Role gate ran with no role in context");
                return Err(Decision::RoleUndetermined);
            }
        };

        if level_of(role) < self.min_role.level() {
            return Err(Decision::InsufficientRole {
                required_role: self.min_role.as_str().to_string(),
                your_role: role.to_string(),
            });
        }

        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with_role(role: Option<&str>) -> RequestContext {
        RequestContext {
            caller_id: Some("u1".to_string()),
            session_id: Some("s1".to_string()),
            role: role.map(str::to_string),
            ..RequestContext::default()
        }
    }

    #[tokio::test]
    async fn test_admits_at_or_above_minimum() {
        let gate = RoleGate::new(Role::Member);
        let req = AuthzRequest::default();
        for role in ["owner", "admin", "member"] {
            assert!(gate.authorize(&req, ctx_with_role(Some(role))).await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_denies_below_minimum_with_role_payload() {
        let gate = RoleGate::new(Role::Admin);
        let req = AuthzRequest::default();
        let denied = gate
            .authorize(&req, ctx_with_role(Some("member")))
            .await
            .unwrap_err();
        assert_eq!(
            denied,
            Decision::InsufficientRole {
                required_role: "admin".to_string(),
                your_role: "member".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_unset_role_is_an_ordering_bug() {
        let gate = RoleGate::new(Role::Viewer);
        let req = AuthzRequest::default();
        let denied = gate.authorize(&req, ctx_with_role(None)).await.unwrap_err();
        assert_eq!(denied, Decision::RoleUndetermined);
    }

    #[tokio::test]
    async fn test_unknown_role_is_lowest_privilege() {
        let gate = RoleGate::new(Role::Viewer);
        let req = AuthzRequest::default();
        let denied = gate
            .authorize(&req, ctx_with_role(Some("superduper")))
            .await
            .unwrap_err();
        assert!(matches!(denied, Decision::InsufficientRole { .. }));
    }
}
