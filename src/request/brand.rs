use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingLevel {
    Middle,
    #[default]
    HighSchool,
    College,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Short,
    #[default]
    Balanced,
    Long,
}

/// Brand voice characteristics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceTraits {
    #[serde(default)]
    pub reading_level: ReadingLevel,
    #[serde(default)]
    pub cadence: Cadence,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Brand-specific configuration passed through to prompt assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandProfile {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub taboo_topics: Vec<String>,
    #[serde(default)]
    pub legal_boilerplate: String,
    #[serde(default)]
    pub voice_traits: VoiceTraits,
    #[serde(default)]
    pub exemplar_paragraphs: Vec<String>,
}
