use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `aaas`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide how to answer the client; binary code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum AaasError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Request validation ──────────────────────────────────────────────
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    // ── Admission ───────────────────────────────────────────────────────
    #[error("rate limit exceeded for client {client_id}")]
    RateLimited { client_id: String },

    // ── Counter store ───────────────────────────────────────────────────
    #[error("counter store: {0}")]
    Store(#[from] StoreError),

    // ── Prompt / Template ───────────────────────────────────────────────
    #[error("prompt: {0}")]
    Prompt(#[from] PromptError),

    // ── Generation backend ──────────────────────────────────────────────
    #[error("generation: {0}")]
    Generation(#[from] GenerationError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Validation errors ──────────────────────────────────────────────────────

/// Malformed input entities, rejected before guardrail evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be within 0..=100 (got {value})")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("responsibility_split.{field} must be a finite value within 0.0..=1.0 (got {value})")]
    SplitComponent { field: &'static str, value: f64 },

    #[error("responsibility_split brand + external must equal 1.0 (got {brand} + {external})")]
    SplitSum { brand: f64, external: f64 },

    #[error("at least one channel is required")]
    NoChannels,

    #[error("invalid incident timestamp {0:?}: expected ISO-8601 or \"unknown\"")]
    Timestamp(String),

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("malformed payload: {0}")]
    Malformed(String),
}

// ─── Counter store errors ───────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store query failed: {0}")]
    Query(String),

    #[error("sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
}

// ─── Prompt / Template errors ───────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("template render failed: {0}")]
    Render(String),

    #[error("serialize prompt section {section}: {message}")]
    Serialize {
        section: &'static str,
        message: String,
    },
}

// ─── Generation backend errors ──────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("backend request failed: {0}")]
    Backend(String),

    #[error("empty response from backend")]
    EmptyResponse,

    #[error("backend returned invalid output: {0}")]
    InvalidOutput(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, AaasError>;
