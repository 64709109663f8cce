mod builder;
mod engine;

pub use builder::{GenerationPrompt, build_generate_prompt, build_interpret_prompt};
pub use engine::PromptEngine;
