use std::error::Error as StdError;
use tera::{Context, Tera};

use crate::error::PromptError;

/// Tera-backed template engine for building structured prompts.
pub struct PromptEngine {
    tera: Tera,
}

impl PromptEngine {
    /// Create an empty engine (no filesystem templates).
    pub fn empty() -> Self {
        Self {
            tera: Tera::default(),
        }
    }

    /// Register a template from a string, replacing any with the same name.
    pub fn add_template(&mut self, name: &str, content: &str) -> Result<(), PromptError> {
        self.tera
            .add_raw_template(name, content)
            .map_err(|e| PromptError::Render(render_chain(&e)))
    }

    /// Render a named template with the given context.
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String, PromptError> {
        self.tera
            .render(template_name, context)
            .map_err(|e| PromptError::Render(render_chain(&e)))
    }
}

// Tera nests the useful message (e.g. the missing variable) in `source()`.
fn render_chain(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = StdError::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
