use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model name handed to the generation backend
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_generate_temperature")]
    pub generate_temperature: f64,
    #[serde(default = "default_interpret_temperature")]
    pub interpret_temperature: f64,
}

fn default_model() -> String {
    "gpt-4-turbo-preview".into()
}

fn default_generate_temperature() -> f64 {
    0.7
}

fn default_interpret_temperature() -> f64 {
    0.3
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            generate_temperature: default_generate_temperature(),
            interpret_temperature: default_interpret_temperature(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_generation_config() {
        let config = GenerationConfig::default();

        assert_eq!(config.model, "gpt-4-turbo-preview");
        assert!((config.generate_temperature - 0.7).abs() < f64::EPSILON);
        assert!((config.interpret_temperature - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: GenerationConfig = toml::from_str("model = \"local-llm\"").unwrap();

        assert_eq!(config.model, "local-llm");
        assert!((config.generate_temperature - 0.7).abs() < f64::EPSILON);
    }
}
