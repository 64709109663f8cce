//! Generation request data model.
//!
//! Everything here is built from external JSON immediately before guardrail
//! evaluation and lives for one request. Range and invariant checks run while
//! deserializing, so a value that reaches [`crate::guardrail`] is in range.

mod brand;
mod incident;
mod interpret;
mod percent;
mod sliders;
mod strategy;

pub use brand::{BrandProfile, Cadence, ReadingLevel, VoiceTraits};
pub use incident::{Incident, IncidentTime, RiskLevel, Severity};
pub use interpret::{IncidentInput, InterpretRequest};
pub use percent::Percent;
pub use sliders::Sliders;
pub use strategy::{
    Distraction, DistractionType, ResponsibilitySplit, SPLIT_TOLERANCE, Scapegoat, ScapegoatType,
    Strategy,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumIter, EnumString};

use crate::error::ValidationError;

const GENERATE_MODE: &str = "generate";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tone {
    #[default]
    Earnest,
    Warm,
    Dry,
    Stoic,
    Cheeky,
}

/// Communication channel a draft is produced for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Channel {
    Twitter,
    Linkedin,
    PressRelease,
    CeoLetter,
    CustomerEmail,
    StatusPage,
}

fn default_channels() -> BTreeSet<Channel> {
    BTreeSet::from([Channel::Twitter])
}

fn default_locale() -> String {
    "en-US".into()
}

/// The unit the guardrail engine mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GenerateRequestRepr")]
pub struct GenerateRequest {
    pub incident: Incident,
    pub sliders: Sliders,
    pub strategy: Strategy,
    pub tone: Tone,
    /// Never empty.
    pub channels: BTreeSet<Channel>,
    pub brand_profile: Option<BrandProfile>,
    pub locale: String,
}

#[derive(Deserialize)]
struct GenerateRequestRepr {
    #[serde(default)]
    mode: Option<String>,
    incident: Incident,
    #[serde(default)]
    sliders: Sliders,
    #[serde(default)]
    strategy: Strategy,
    #[serde(default)]
    tone: Tone,
    #[serde(default = "default_channels")]
    channels: BTreeSet<Channel>,
    #[serde(default)]
    brand_profile: Option<BrandProfile>,
    #[serde(default = "default_locale")]
    locale: String,
}

impl TryFrom<GenerateRequestRepr> for GenerateRequest {
    type Error = ValidationError;

    fn try_from(raw: GenerateRequestRepr) -> Result<Self, Self::Error> {
        if let Some(mode) = raw.mode.as_deref()
            && mode != GENERATE_MODE
        {
            return Err(ValidationError::Malformed(format!(
                "mode must be \"{GENERATE_MODE}\" (got {mode:?})"
            )));
        }
        let request = Self {
            incident: raw.incident,
            sliders: raw.sliders,
            strategy: raw.strategy,
            tone: raw.tone,
            channels: raw.channels,
            brand_profile: raw.brand_profile,
            locale: raw.locale,
        };
        request.validate()?;
        Ok(request)
    }
}

impl GenerateRequest {
    /// A request with default sliders, strategy, tone and channels.
    pub fn new(incident: Incident) -> Self {
        Self {
            incident,
            sliders: Sliders::default(),
            strategy: Strategy::default(),
            tone: Tone::default(),
            channels: default_channels(),
            brand_profile: None,
            locale: default_locale(),
        }
    }

    /// Parse and validate a JSON payload.
    pub fn from_json(payload: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(payload).map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    /// Re-check the invariants that public fields could have broken after
    /// construction. Percent-typed fields cannot go out of range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.channels.is_empty() {
            return Err(ValidationError::NoChannels);
        }
        if self.locale.trim().is_empty() {
            return Err(ValidationError::Empty { field: "locale" });
        }
        let split = self.strategy.responsibility_split;
        ResponsibilitySplit::new(split.brand(), split.external())?;
        Ok(())
    }
}
