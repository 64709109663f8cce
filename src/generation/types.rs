use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::GenerationError;
use crate::request::{Channel, Incident};

/// Apology draft for a specific channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDraft {
    pub useful: String,
    pub pointless: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub redlines: Vec<String>,
}

/// Risk and quality scores, each within `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub pr_risk: f64,
    pub legal_risk: f64,
    pub ethics_score: f64,
    pub clarity_score: f64,
    pub sincerity_score: f64,
}

impl Metrics {
    pub fn validate(&self) -> Result<(), GenerationError> {
        let scores = [
            ("pr_risk", self.pr_risk),
            ("legal_risk", self.legal_risk),
            ("ethics_score", self.ethics_score),
            ("clarity_score", self.clarity_score),
            ("sincerity_score", self.sincerity_score),
        ];
        for (name, value) in scores {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(GenerationError::InvalidOutput(format!(
                    "metrics.{name} must be within 0.0..=1.0 (got {value})"
                )));
            }
        }
        Ok(())
    }
}

fn default_scapegoat_flag() -> String {
    "none".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detectors {
    #[serde(default)]
    pub non_apology: bool,
    #[serde(default = "default_scapegoat_flag")]
    pub scapegoat_flag: String,
    #[serde(default)]
    pub unverifiable_claims: Vec<String>,
}

impl Default for Detectors {
    fn default() -> Self {
        Self {
            non_apology: false,
            scapegoat_flag: default_scapegoat_flag(),
            unverifiable_claims: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub drafts: BTreeMap<Channel, ChannelDraft>,
    pub metrics: Metrics,
    #[serde(default)]
    pub detectors: Detectors,
    /// Backend-reported adjustments first, guardrail notes appended after.
    #[serde(default)]
    pub adjustments: Vec<String>,
    #[serde(default)]
    pub rationales: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretResponse {
    pub incident: Incident,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub extractions: BTreeMap<String, Vec<String>>,
}

/// Parse a backend's JSON output into a typed response.
pub fn parse_output<T: for<'de> Deserialize<'de>>(raw: &str) -> Result<T, GenerationError> {
    if raw.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    serde_json::from_str(raw).map_err(|e| GenerationError::InvalidOutput(e.to_string()))
}
