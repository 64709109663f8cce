use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::error::StoreError;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Shared, possibly remote, expiring counter store.
///
/// Implementations provide the atomicity the admission controller relies on;
/// the controller itself never locks.
pub trait CounterStore: Send + Sync {
    /// Current unexpired count for `key`; 0 when absent or expired.
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, u64>;

    /// Atomically increment `key` and set its expiry to now + `ttl`, provided
    /// the unexpired count is still below `limit`.
    ///
    /// Returns the new count, or `None` (state untouched) when the limit had
    /// already been reached.
    fn increment_within<'a>(
        &'a self,
        key: &'a str,
        limit: u64,
        ttl: Duration,
    ) -> StoreFuture<'a, Option<u64>>;
}
