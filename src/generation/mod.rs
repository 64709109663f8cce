//! Seam to the external text-generation capability.
//!
//! The crate never talks to a model itself. A [`GenerationBackend`] receives
//! the assembled prompt and returns the model's raw JSON text, which is parsed
//! here into [`GenerateResponse`] / [`InterpretResponse`].

mod types;

pub use types::{
    ChannelDraft, Detectors, GenerateResponse, InterpretResponse, Metrics, parse_output,
};

use std::future::Future;
use std::pin::Pin;

use crate::error::GenerationError;
use crate::prompt::GenerationPrompt;

pub type BackendFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, GenerationError>> + Send + 'a>>;

/// One completion call. Backends must ask the model for a JSON object.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub temperature: f64,
    pub prompt: &'a GenerationPrompt,
}

pub trait GenerationBackend: Send + Sync {
    /// Return the model's raw JSON output for `request`.
    fn complete<'a>(&'a self, request: CompletionRequest<'a>) -> BackendFuture<'a, String>;
}
