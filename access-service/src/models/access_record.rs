//! Access record - the join entity binding one caller to one account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row per (caller, account) pair, enforced by a uniqueness constraint.
///
/// Created and mutated by the invitation/management flows; this service only
/// reads it per request.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccessRecord {
    pub access_id: Uuid,
    pub caller_id: String,
    pub account_id: Uuid,
    pub role: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_utc: DateTime<Utc>,
}

/// Normalized caller profile exposed to route handlers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallerProfile {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl AccessRecord {
    /// Profile view of this record.
    pub fn profile(&self) -> CallerProfile {
        CallerProfile {
            id: self.caller_id.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}
