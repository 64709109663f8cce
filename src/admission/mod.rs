//! Per-client admission control over a shared expiring counter.
//!
//! Each client gets a counter under `ratelimit:{client_id}` that lives for
//! [`ADMISSION_WINDOW`] after its latest increment. Once the counter reaches
//! the client's limit, requests are refused until the key expires; the limit
//! then becomes fully available again.
//!
//! Store failures never block traffic: [`AdmissionController::admit`] admits
//! whenever the store cannot answer.

mod factory;
mod memory;
mod sqlite;
mod store;

pub use factory::{create_admission_controller, create_counter_store};
pub use memory::MemoryCounterStore;
pub use sqlite::SqliteCounterStore;
pub use store::{CounterStore, StoreFuture};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// TTL applied on every admitted increment.
pub const ADMISSION_WINDOW: Duration = Duration::from_secs(3600);

const KEY_PREFIX: &str = "ratelimit:";

pub fn counter_key(client_id: &str) -> String {
    format!("{KEY_PREFIX}{client_id}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionLimits {
    pub anon: u64,
    pub authed: u64,
}

impl AdmissionLimits {
    pub const fn new(anon: u64, authed: u64) -> Self {
        Self { anon, authed }
    }

    pub const fn for_client(&self, is_authenticated: bool) -> u64 {
        if is_authenticated {
            self.authed
        } else {
            self.anon
        }
    }
}

impl Default for AdmissionLimits {
    fn default() -> Self {
        Self::new(10, 100)
    }
}

pub struct AdmissionController {
    store: Arc<dyn CounterStore>,
    limits: AdmissionLimits,
}

impl fmt::Debug for AdmissionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdmissionController")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl AdmissionController {
    pub fn new(store: Arc<dyn CounterStore>, limits: AdmissionLimits) -> Self {
        if limits.authed < limits.anon {
            tracing::warn!(
                anon = limits.anon,
                authed = limits.authed,
                "authenticated admission limit is below the anonymous limit"
            );
        }
        Self { store, limits }
    }

    pub fn limits(&self) -> AdmissionLimits {
        self.limits
    }

    /// Decide whether `client_id` may proceed.
    ///
    /// Reads the counter, refuses without touching it when the limit is
    /// reached, otherwise asks the store for a conditional increment. Any store
    /// error admits the request.
    pub async fn admit(&self, client_id: &str, is_authenticated: bool) -> bool {
        let key = counter_key(client_id);
        let limit = self.limits.for_client(is_authenticated);

        let current = match self.store.get(&key).await {
            Ok(count) => count,
            Err(error) => {
                tracing::warn!(client_id, %error, "counter store read failed; admitting request");
                return true;
            }
        };
        if current >= limit {
            tracing::debug!(client_id, current, limit, "admission refused");
            return false;
        }

        match self
            .store
            .increment_within(&key, limit, ADMISSION_WINDOW)
            .await
        {
            Ok(Some(count)) => {
                tracing::debug!(client_id, count, limit, "admission granted");
                true
            }
            Ok(None) => {
                tracing::debug!(client_id, limit, "admission refused: last slot taken concurrently");
                false
            }
            Err(error) => {
                tracing::warn!(client_id, %error, "counter store increment failed; admitting request");
                true
            }
        }
    }
}
