use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::admission::AdmissionLimits;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CounterStoreKind {
    /// Per-process counters; reset on restart
    #[default]
    Memory,
    /// Counters shared through a SQLite file
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Calls per window for anonymous clients (default: 10)
    #[serde(default = "default_anon_limit")]
    pub anon_limit: u64,
    /// Calls per window for authenticated clients (default: 100)
    #[serde(default = "default_authed_limit")]
    pub authed_limit: u64,
    #[serde(default)]
    pub store: CounterStoreKind,
    /// SQLite counter file; `~` is expanded (default: `~/.aaas/admission.db`)
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
    /// Connect/busy timeout for the counter store (default: 5)
    #[serde(default = "default_store_timeout_secs")]
    pub store_timeout_secs: u64,
}

fn default_anon_limit() -> u64 {
    10
}

fn default_authed_limit() -> u64 {
    100
}

fn default_sqlite_path() -> String {
    "~/.aaas/admission.db".into()
}

fn default_store_timeout_secs() -> u64 {
    5
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            anon_limit: default_anon_limit(),
            authed_limit: default_authed_limit(),
            store: CounterStoreKind::default(),
            sqlite_path: default_sqlite_path(),
            store_timeout_secs: default_store_timeout_secs(),
        }
    }
}

impl AdmissionConfig {
    pub fn limits(&self) -> AdmissionLimits {
        AdmissionLimits::new(self.anon_limit, self.authed_limit)
    }

    pub fn resolved_sqlite_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.sqlite_path).into_owned())
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}
