use crate::config::{AdmissionConfig, CounterStoreKind};

use super::{AdmissionController, CounterStore, MemoryCounterStore, SqliteCounterStore};

use std::sync::Arc;

/// Build the configured store. Store I/O waits for the first admission
/// check, so an unreachable store never stops construction.
pub fn create_counter_store(config: &AdmissionConfig) -> Arc<dyn CounterStore> {
    match config.store {
        CounterStoreKind::Memory => Arc::new(MemoryCounterStore::new()),
        CounterStoreKind::Sqlite => {
            let path = config.resolved_sqlite_path();
            tracing::debug!(path = %path.display(), "using sqlite counter store");
            Arc::new(SqliteCounterStore::connect_lazy(&path, config.store_timeout()))
        }
    }
}

pub fn create_admission_controller(config: &AdmissionConfig) -> AdmissionController {
    AdmissionController::new(create_counter_store(config), config.limits())
}
