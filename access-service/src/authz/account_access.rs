//! Account access validator: resolves the caller's role within the account.

use async_trait::async_trait;
use std::sync::Arc;

use super::{AuthzRequest, Decision, Gate};
use crate::context::RequestContext;
use crate::models::Role;
use crate::services::AccessStore;

/// Second gate of the tenant-scoped pipeline.
///
/// Preconditions: the authentication gate has populated `caller_id`, and the
/// upstream tenant resolver has bound `account_id` into the seed context.
/// The account check runs before any store call so a missing tenant context
/// is always a 400, never a 403.
pub struct AccountAccessGate {
    store: Arc<dyn AccessStore>,
}

impl AccountAccessGate {
    pub fn new(store: Arc<dyn AccessStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Gate for AccountAccessGate {
    fn name(&self) -> &'static str {
        "account_access"
    }

    async fn authorize(
        &self,
        _request: &AuthzRequest,
        mut ctx: RequestContext,
    ) -> Result<RequestContext, Decision> {
        let caller_id = match ctx.caller_id.as_deref() {
            Some(id) => id.to_string(),
            None => {
                // Pipeline ordering bug: this gate ran before authentication.
                tracing::error!("Account access gate ran without an authenticated caller");
                return Err(Decision::VerificationFailed);
            }
        };

        let account_id = match ctx.account_id {
            Some(id) => id,
            None => return Err(Decision::TenantContextMissing),
        };

        if !self.store.is_configured() {
            tracing::error!("Access store is not configured");
            return Err(Decision::Unavailable("access store"));
        }

        let record = match self.store.find_access(&caller_id, account_id).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(
                    caller_id = %caller_id,
                    account_id = %account_id,
                    error = %e,
                    "Access record lookup failed"
                );
                return Err(Decision::VerificationFailed);
            }
        };

        let record = match record {
            Some(record) => record,
            None => return Err(Decision::NoAccess),
        };

        if record.role == Role::NoAccess.as_str() {
            return Err(Decision::AccessRevoked);
        }

        ctx.caller_profile = Some(record.profile());
        ctx.access_id = Some(record.access_id);
        ctx.role = Some(record.role);
        Ok(ctx)
    }
}
