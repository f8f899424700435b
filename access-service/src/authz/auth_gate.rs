//! Authentication gate: confirms a verified session exists.

use async_trait::async_trait;
use std::sync::Arc;

use super::{AuthzRequest, Decision, Gate};
use crate::context::RequestContext;
use crate::services::{IdentityClient, IdentityError};

/// First gate of the tenant-scoped pipeline. Writes `caller_id` and
/// `session_id` into the context; no other side effects.
pub struct AuthenticationGate {
    identity: Arc<dyn IdentityClient>,
}

impl AuthenticationGate {
    pub fn new(identity: Arc<dyn IdentityClient>) -> Self {
        Self { identity }
    }
}

#[async_trait]
impl Gate for AuthenticationGate {
    fn name(&self) -> &'static str {
        "authentication"
    }

    async fn authorize(
        &self,
        request: &AuthzRequest,
        mut ctx: RequestContext,
    ) -> Result<RequestContext, Decision> {
        let token = match request.session_token.as_deref() {
            Some(token) => token,
            None => return Err(Decision::Unauthenticated),
        };

        let session = match self.identity.verify_session(token).await {
            Ok(Some(session)) => session,
            Ok(None) => return Err(Decision::Unauthenticated),
            Err(IdentityError::Unavailable(e)) => {
                tracing::error!(error = %e, "Identity provider unreachable during authentication");
                return Err(Decision::Unavailable("identity provider"));
            }
            Err(IdentityError::Lookup(e)) => {
                tracing::error!(error = %e, "Session verification failed unexpectedly");
                return Err(Decision::VerificationFailed);
            }
        };

        if session.caller_id.is_empty() {
            return Err(Decision::Unauthenticated);
        }

        ctx.caller_id = Some(session.caller_id);
        ctx.session_id = Some(session.session_id);
        Ok(ctx)
    }
}
