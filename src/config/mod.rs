pub mod schema;

pub use schema::{AdmissionConfig, Config, CounterStoreKind, GenerationConfig};
