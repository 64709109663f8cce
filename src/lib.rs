#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod admission;
pub mod config;
pub mod error;
pub mod generation;
pub mod guardrail;
pub mod moderation;
pub mod prompt;
pub mod request;
pub mod service;

pub use config::Config;
pub use error::{
    AaasError, ConfigError, GenerationError, PromptError, Result, StoreError, ValidationError,
};
pub use guardrail::{GuardrailEngine, GuardrailOutcome};
pub use service::{ApologyService, ClientIdentity};
