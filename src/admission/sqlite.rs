use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::OnceCell;

use super::store::{CounterStore, StoreFuture};
use crate::error::StoreError;

const COUNTER_TABLE: &str = "
CREATE TABLE IF NOT EXISTS admission_counters (
    key           TEXT PRIMARY KEY,
    count         INTEGER NOT NULL,
    expires_at_ms INTEGER NOT NULL
)";

const READ_COUNT: &str = "
SELECT count FROM admission_counters
 WHERE key = ?1 AND expires_at_ms > ?2";

// One statement, so the check, increment and expiry move together. A row whose
// expiry has passed restarts at 1; a live row at the limit is left untouched
// and RETURNING yields nothing.
const INCREMENT_WITHIN: &str = "
INSERT INTO admission_counters (key, count, expires_at_ms)
VALUES (?1, 1, ?2)
ON CONFLICT(key) DO UPDATE SET
    count = CASE
        WHEN admission_counters.expires_at_ms <= ?3 THEN 1
        ELSE admission_counters.count + 1
    END,
    expires_at_ms = excluded.expires_at_ms
WHERE admission_counters.expires_at_ms <= ?3
   OR admission_counters.count < ?4
RETURNING count";

const PURGE_EXPIRED: &str = "DELETE FROM admission_counters WHERE expires_at_ms <= ?1";

/// Counter store shared by every process pointed at the same SQLite file.
///
/// Nothing touches the disk until the first store call. The database
/// directory and counter table are prepared then, and a failed attempt is
/// retried by the next call.
pub struct SqliteCounterStore {
    pool: SqlitePool,
    parent_dir: Option<PathBuf>,
    schema: OnceCell<()>,
}

impl SqliteCounterStore {
    /// Wrap an existing pool. The counter table is created on first use.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            parent_dir: None,
            schema: OnceCell::new(),
        }
    }

    /// Point a lazy pool at the database at `path`. `timeout` bounds both
    /// pool acquisition and waits on SQLite's write lock.
    pub fn connect_lazy(path: &Path, timeout: Duration) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(timeout);
        let pool = SqlitePoolOptions::new()
            .acquire_timeout(timeout)
            .connect_lazy_with(options);
        Self {
            pool,
            parent_dir: path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf),
            schema: OnceCell::new(),
        }
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn purge_expired(&self) -> Result<u64, StoreError> {
        self.ready().await?;
        let result = sqlx::query(PURGE_EXPIRED)
            .bind(Utc::now().timestamp_millis())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ready(&self) -> Result<(), StoreError> {
        self.schema
            .get_or_try_init(|| async {
                if let Some(parent) = &self.parent_dir {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        StoreError::Unavailable(format!("{}: {e}", parent.display()))
                    })?;
                }
                sqlx::query(COUNTER_TABLE).execute(&self.pool).await?;
                tracing::debug!("sqlite counter table ready");
                Ok::<_, StoreError>(())
            })
            .await?;
        Ok(())
    }
}

fn duration_millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}

fn stored_count(raw: i64) -> Result<u64, StoreError> {
    u64::try_from(raw).map_err(|_| StoreError::Query(format!("negative counter value {raw}")))
}

impl CounterStore for SqliteCounterStore {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, u64> {
        Box::pin(async move {
            self.ready().await?;
            let row: Option<(i64,)> = sqlx::query_as(READ_COUNT)
                .bind(key)
                .bind(Utc::now().timestamp_millis())
                .fetch_optional(&self.pool)
                .await?;
            row.map_or(Ok(0), |(count,)| stored_count(count))
        })
    }

    fn increment_within<'a>(
        &'a self,
        key: &'a str,
        limit: u64,
        ttl: Duration,
    ) -> StoreFuture<'a, Option<u64>> {
        Box::pin(async move {
            if limit == 0 {
                return Ok(None);
            }
            self.ready().await?;
            let now = Utc::now().timestamp_millis();
            let row: Option<(i64,)> = sqlx::query_as(INCREMENT_WITHIN)
                .bind(key)
                .bind(now.saturating_add(duration_millis(ttl)))
                .bind(now)
                .bind(i64::try_from(limit).unwrap_or(i64::MAX))
                .fetch_optional(&self.pool)
                .await?;
            row.map(|(count,)| stored_count(count)).transpose()
        })
    }
}
