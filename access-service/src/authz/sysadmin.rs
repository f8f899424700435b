//! Sys-admin override: platform-operator access keyed on email domain.
//!
//! This is an alternate pipeline for operator-only routes. It never chains
//! after the tenant-scoped gates and ignores any bound account id.

use async_trait::async_trait;
use std::sync::Arc;

use super::{AuthzRequest, Decision, Gate};
use crate::context::RequestContext;
use crate::models::CallerProfile;
use crate::services::{IdentityClient, IdentityError, IdentityProfile};

/// Blocking variant: denies the request unless the caller's email domain is
/// on the operator allowlist.
pub struct SysAdminGate {
    identity: Arc<dyn IdentityClient>,
    allowed_domains: Vec<String>,
}

impl SysAdminGate {
    pub fn new(identity: Arc<dyn IdentityClient>, allowed_domains: Vec<String>) -> Self {
        Self {
            identity,
            allowed_domains,
        }
    }
}

#[async_trait]
impl Gate for SysAdminGate {
    fn name(&self) -> &'static str {
        "sys_admin"
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
                tracing::error!(error = %e, "Identity provider unreachable during sys-admin check");
                return Err(Decision::Unavailable("identity provider"));
            }
            Err(IdentityError::Lookup(e)) => {
                tracing::error!(error = %e, "Session verification failed during sys-admin check");
                return Err(Decision::VerificationFailed);
            }
        };

        let profile = match self.identity.get_profile(&session.caller_id).await {
            Ok(profile) => profile,
            Err(IdentityError::Unavailable(e)) => {
                tracing::error!(error = %e, "Identity provider unreachable during profile lookup");
                return Err(Decision::Unavailable("identity provider"));
            }
            Err(IdentityError::Lookup(e)) => {
                tracing::error!(
                    caller_id = %session.caller_id,
                    error = %e,
                    "Profile lookup failed during sys-admin check"
                );
                return Err(Decision::VerificationFailed);
            }
        };

        let email = match operator_email(&profile, &self.allowed_domains) {
            Some(email) => email,
            None => {
                tracing::warn!(
                    caller_id = %session.caller_id,
                    "Caller is not a platform operator"
                );
                return Err(Decision::SysAdminRequired);
            }
        };

        ctx.caller_profile = Some(CallerProfile {
            id: session.caller_id.clone(),
            email,
            first_name: profile.first_name,
            last_name: profile.last_name,
        });
        ctx.caller_id = Some(session.caller_id);
        ctx.session_id = Some(session.session_id);
        ctx.sys_admin = true;
        Ok(ctx)
    }
}

/// Non-blocking variant for conditional logic inside handlers.
///
/// Performs the same check as [`SysAdminGate`] but never denies the request:
/// every failure mode (no session, unreachable identity provider, lookup
/// error, empty email list) degrades to `false`. Must not be used as a gate.
pub async fn is_sys_admin(
    identity: &Arc<dyn IdentityClient>,
    allowed_domains: &[String],
    session_token: Option<&str>,
) -> bool {
    let token = match session_token {
        Some(token) => token,
        None => return false,
    };

    let session = match identity.verify_session(token).await {
        Ok(Some(session)) => session,
        _ => return false,
    };

    let profile = match identity.get_profile(&session.caller_id).await {
        Ok(profile) => profile,
        Err(_) => return false,
    };

    operator_email(&profile, allowed_domains).is_some()
}

/// First email whose domain is on the allowlist.
///
/// The match is case-insensitive but exact on the text after `@`:
/// "staff@evil-tryequipped.com" never matches "tryequipped.com".
fn operator_email(profile: &IdentityProfile, allowed_domains: &[String]) -> Option<String> {
    for email in &profile.emails {
        if let Some((_, domain)) = email.rsplit_once('@') {
            if allowed_domains
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(domain))
            {
                return Some(email.clone());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(emails: &[&str]) -> IdentityProfile {
        IdentityProfile {
            emails: emails.iter().map(|e| e.to_string()).collect(),
            first_name: "Pat".to_string(),
            last_name: "Ng".to_string(),
        }
    }

    fn domains() -> Vec<String> {
        vec!["tryequipped.com".to_string(), "equipped-ops.com".to_string()]
    }

    #[test]
    fn test_exact_domain_match() {
        assert!(operator_email(&profile(&["staff@tryequipped.com"]), &domains()).is_some());
        assert!(operator_email(&profile(&["user@company.com"]), &domains()).is_none());
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert!(operator_email(&profile(&["ADMIN@TRYEQUIPPED.COM"]), &domains()).is_some());
    }

    #[test]
    fn test_suffix_domains_do_not_match() {
        assert!(operator_email(&profile(&["staff@evil-tryequipped.com"]), &domains()).is_none());
        assert!(operator_email(&profile(&["staff@tryequipped.com.evil"]), &domains()).is_none());
    }

    #[test]
    fn test_empty_email_list() {
        assert!(operator_email(&profile(&[]), &domains()).is_none());
    }

    #[test]
    fn test_malformed_email() {
        assert!(operator_email(&profile(&["not-an-email"]), &domains()).is_none());
    }
}
