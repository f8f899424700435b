//! Access store port.
//!
//! Reads the single access-control table. This service never writes to it;
//! invitation and management flows own the rows.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::AccessRecord;

#[async_trait]
pub trait AccessStore: Send + Sync {
    /// Find the unique access record for a (caller, account) pair.
    async fn find_access(
        &self,
        caller_id: &str,
        account_id: Uuid,
    ) -> Result<Option<AccessRecord>, anyhow::Error>;

    /// Whether the store is wired up and reachable enough to ask.
    fn is_configured(&self) -> bool;

    /// Round-trip liveness check against the backing store.
    async fn ping(&self) -> Result<(), anyhow::Error>;
}

/// PostgreSQL-backed store. Uniqueness of (caller_id, account_id) is
/// enforced by the table's constraint, so `fetch_optional` is sufficient.
#[derive(Clone)]
pub struct PgAccessStore {
    pool: PgPool,
}

impl PgAccessStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessStore for PgAccessStore {
    async fn find_access(
        &self,
        caller_id: &str,
        account_id: Uuid,
    ) -> Result<Option<AccessRecord>, anyhow::Error> {
        let record = sqlx::query_as::<_, AccessRecord>(
            r#"
            SELECT access_id, caller_id, account_id, role, email,
                   first_name, last_name, created_utc
            FROM account_access
            WHERE caller_id = $1 AND account_id = $2
            "#,
        )
        .bind(caller_id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    fn is_configured(&self) -> bool {
        !self.pool.is_closed()
    }

    async fn ping(&self) -> Result<(), anyhow::Error> {
        crate::db::health_check(&self.pool).await?;
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MockAccessStore {
    pub records: std::sync::Mutex<Vec<AccessRecord>>,
    pub configured: std::sync::atomic::AtomicBool,
    pub fail_lookups: std::sync::atomic::AtomicBool,
    pub fail_ping: std::sync::atomic::AtomicBool,
}

impl MockAccessStore {
    pub fn new() -> Self {
        Self {
            records: std::sync::Mutex::new(Vec::new()),
            configured: std::sync::atomic::AtomicBool::new(true),
            fail_lookups: std::sync::atomic::AtomicBool::new(false),
            fail_ping: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn insert(&self, record: AccessRecord) {
        self.records
            .lock()
            .expect("mock records mutex poisoned")
            .push(record);
    }

    pub fn set_configured(&self, configured: bool) {
        self.configured
            .store(configured, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set_fail_lookups(&self, fail: bool) {
        self.fail_lookups
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set_fail_ping(&self, fail: bool) {
        self.fail_ping
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }
}

#[async_trait]
impl AccessStore for MockAccessStore {
    async fn find_access(
        &self,
        caller_id: &str,
        account_id: Uuid,
    ) -> Result<Option<AccessRecord>, anyhow::Error> {
        if self.fail_lookups.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(anyhow::anyhow!("mock store lookup failure"));
        }
        let record = self
            .records
            .lock()
            .expect("mock records mutex poisoned")
            .iter()
            .find(|r| r.caller_id == caller_id && r.account_id == account_id)
            .cloned();
        Ok(record)
    }

    fn is_configured(&self) -> bool {
        self.configured.load(std::sync::atomic::Ordering::SeqCst)
    }

    async fn ping(&self) -> Result<(), anyhow::Error> {
        if self.fail_ping.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(anyhow::anyhow!("mock store ping failure"));
        }
        Ok(())
    }
}
