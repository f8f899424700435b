//! Request-scoped authorization pipeline.
//!
//! Gates are data: each pipeline is an ordered list of [`Gate`] values run
//! sequentially by [`Pipeline`]. A gate either extends the context or
//! terminates the request with a classified [`Decision`]. Ordering matters;
//! each gate's precondition is the previous gate's postcondition, and the
//! constructors below declare the only two valid orders.
//!
//! The tenant-scoped pipeline and the sys-admin pipeline are deliberately
//! independent: a sys-admin match never satisfies a tenant role check, and
//! a tenant role never grants platform-operator capability.

pub mod account_access;
pub mod auth_gate;
pub mod decision;
pub mod role_gate;
pub mod sysadmin;

pub use account_access::AccountAccessGate;
pub use auth_gate::AuthenticationGate;
pub use decision::Decision;
pub use role_gate::RoleGate;
pub use sysadmin::{is_sys_admin, SysAdminGate};

use async_trait::async_trait;
use std::sync::Arc;

use crate::context::RequestContext;
use crate::models::Role;
use crate::AppState;

/// Raw credentials extracted from the inbound request, before any gate has
/// validated them. Gates read from this; only the context carries trusted
/// facts.
#[derive(Debug, Clone, Default)]
pub struct AuthzRequest {
    pub session_token: Option<String>,
}

/// One authorization check. Extends the trusted context or denies.
#[async_trait]
pub trait Gate: Send + Sync {
    fn name(&self) -> &'static str;

    async fn authorize(
        &self,
        request: &AuthzRequest,
        ctx: RequestContext,
    ) -> Result<RequestContext, Decision>;
}

/// Sequential, single-pass gate runner.
pub struct Pipeline {
    gates: Vec<Arc<dyn Gate>>,
}

impl Pipeline {
    pub fn new(gates: Vec<Arc<dyn Gate>>) -> Self {
        Self { gates }
    }

    /// Run every gate in declared order. The first denial wins and the
    /// remaining gates never run.
    pub async fn run(
        &self,
        request: &AuthzRequest,
        seed: RequestContext,
    ) -> Result<RequestContext, Decision> {
        let mut ctx = seed;
        for gate in &self.gates {
            ctx = match gate.authorize(request, ctx).await {
                Ok(ctx) => ctx,
                Err(decision) => {
                    tracing::debug!(
                        gate = gate.name(),
                        decision = decision.code(),
                        "Request denied"
                    );
                    return Err(decision);
                }
            };
        }
        Ok(ctx)
    }
}

/// Tenant-scoped pipeline: authentication, account access resolution, then
/// the role floor for the route.
pub fn account_pipeline(state: &AppState, min_role: Role) -> Pipeline {
    Pipeline::new(vec![
        Arc::new(AuthenticationGate::new(state.identity.clone())),
        Arc::new(AccountAccessGate::new(state.store.clone())),
        Arc::new(RoleGate::new(min_role)),
    ])
}

/// Platform-operator pipeline. Ignores any bound account id entirely.
pub fn sys_admin_pipeline(state: &AppState) -> Pipeline {
    Pipeline::new(vec![Arc::new(SysAdminGate::new(
        state.identity.clone(),
        state.config.security.sys_admin_domains.clone(),
    ))])
}
