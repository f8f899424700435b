//! Identity provider client.
//!
//! Session issuance and verification internals live in the external identity
//! provider; this service only consumes its HTTP API through the
//! [`IdentityClient`] port.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::IdentityConfig;
use service_core::error::AppError;

/// A verified session as reported by the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub caller_id: String,
    pub session_id: String,
}

/// Caller profile as reported by the identity provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityProfile {
    pub emails: Vec<String>,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider could not be reached at all.
    #[error("identity provider unreachable: {0}")]
    Unavailable(anyhow::Error),
    /// The provider answered, but the lookup failed unexpectedly.
    #[error("identity lookup failed: {0}")]
    Lookup(anyhow::Error),
}

#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Verify the caller's session token. `Ok(None)` means no valid session.
    async fn verify_session(&self, token: &str) -> Result<Option<Session>, IdentityError>;

    /// Fetch the caller's profile (emails, name).
    async fn get_profile(&self, caller_id: &str) -> Result<IdentityProfile, IdentityError>;
}

/// HTTP implementation backed by the identity provider's REST API.
#[derive(Clone)]
pub struct HttpIdentityClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpIdentityClient {
    pub fn new(config: &IdentityConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn classify(err: reqwest::Error) -> IdentityError {
        if err.is_connect() || err.is_timeout() {
            IdentityError::Unavailable(anyhow::anyhow!(err))
        } else {
            IdentityError::Lookup(anyhow::anyhow!(err))
        }
    }
}

#[async_trait]
impl IdentityClient for HttpIdentityClient {
    async fn verify_session(&self, token: &str) -> Result<Option<Session>, IdentityError> {
        let url = format!("{}/v1/sessions/verify", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(Self::classify)?;

        match response.status() {
            reqwest::StatusCode::OK => {
                let session = response
                    .json::<Session>()
                    .await
                    .map_err(|e| IdentityError::Lookup(anyhow::anyhow!(e)))?;
                Ok(Some(session))
            }
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::NOT_FOUND => Ok(None),
            status => Err(IdentityError::Lookup(anyhow::anyhow!(
                "unexpected status {} from session verification",
                status
            ))),
        }
    }

    async fn get_profile(&self, caller_id: &str) -> Result<IdentityProfile, IdentityError> {
        let url = format!("{}/v1/users/{}", self.base_url, caller_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::classify)?;

        if !response.status().is_success() {
            return Err(IdentityError::Lookup(anyhow::anyhow!(
                "unexpected status {} from profile lookup",
                response.status()
            )));
        }

        response
            .json::<IdentityProfile>()
            .await
            .map_err(|e| IdentityError::Lookup(anyhow::anyhow!(e)))
    }
}

/// In-memory identity client for tests.
#[derive(Default)]
pub struct MockIdentityClient {
    pub sessions: std::sync::Mutex<std::collections::HashMap<String, Session>>,
    pub profiles: std::sync::Mutex<std::collections::HashMap<String, IdentityProfile>>,
    pub unavailable: std::sync::atomic::AtomicBool,
    pub fail_lookups: std::sync::atomic::AtomicBool,
}

impl MockIdentityClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_session(&self, token: &str, caller_id: &str, session_id: &str) {
        self.sessions
            .lock()
            .expect("mock sessions mutex poisoned")
            .insert(
                token.to_string(),
                Session {
                    caller_id: caller_id.to_string(),
                    session_id: session_id.to_string(),
                },
            );
    }

    pub fn add_profile(&self, caller_id: &str, emails: &[&str], first_name: &str, last_name: &str) {
        self.profiles
            .lock()
            .expect("mock profiles mutex poisoned")
            .insert(
                caller_id.to_string(),
                IdentityProfile {
                    emails: emails.iter().map(|e| e.to_string()).collect(),
                    first_name: first_name.to_string(),
                    last_name: last_name.to_string(),
                },
            );
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable
            .store(unavailable, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set_fail_lookups(&self, fail: bool) {
        self.fail_lookups
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityClient for MockIdentityClient {
    async fn verify_session(&self, token: &str) -> Result<Option<Session>, IdentityError> {
        if self.unavailable.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(IdentityError::Unavailable(anyhow::anyhow!(
                "mock identity provider down"
            )));
        }
        if self.fail_lookups.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(IdentityError::Lookup(anyhow::anyhow!(
                "mock identity lookup failure"
            )));
        }
        Ok(self
            .sessions
            .lock()
            .expect("mock sessions mutex poisoned")
            .get(token)
            .cloned())
    }

    async fn get_profile(&self, caller_id: &str) -> Result<IdentityProfile, IdentityError> {
        if self.unavailable.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(IdentityError::Unavailable(anyhow::anyhow!(
                "mock identity provider down"
            )));
        }
        if self.fail_lookups.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(IdentityError::Lookup(anyhow::anyhow!(
                "mock identity lookup failure"
            )));
        }
        self.profiles
            .lock()
            .expect("mock profiles mutex poisoned")
            .get(caller_id)
            .cloned()
            .ok_or_else(|| IdentityError::Lookup(anyhow::anyhow!("no such user: {}", caller_id)))
    }
}
