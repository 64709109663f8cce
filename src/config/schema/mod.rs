mod admission;
mod core;
mod generation;

pub use admission::{AdmissionConfig, CounterStoreKind};
pub use self::core::Config;
pub use generation::GenerationConfig;
