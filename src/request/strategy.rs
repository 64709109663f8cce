use serde::{Deserialize, Serialize};

use super::percent::Percent;
use crate::error::ValidationError;

/// Allowed tolerance on `brand + external == 1.0`.
pub const SPLIT_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScapegoatType {
    VendorOutage,
    LegacySystem,
    IndustryWide,
    UnexpectedDependency,
    Weather,
    UnknownRootCause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistractionType {
    CsrDonation,
    CarbonOffsetMention,
    ProductAnnouncementTease,
    CommunityHighlight,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScapegoatRepr")]
pub struct Scapegoat {
    #[serde(rename = "type")]
    pub kind: Option<ScapegoatType>,
    pub intensity: Percent,
}

#[derive(Deserialize)]
struct ScapegoatRepr {
    #[serde(rename = "type", default)]
    kind: Option<ScapegoatType>,
    #[serde(default)]
    intensity: i64,
}

impl TryFrom<ScapegoatRepr> for Scapegoat {
    type Error = ValidationError;

    fn try_from(raw: ScapegoatRepr) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: raw.kind,
            intensity: Percent::try_new("strategy.scapegoat.intensity", raw.intensity)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DistractionRepr")]
pub struct Distraction {
    #[serde(rename = "type")]
    pub kind: Option<DistractionType>,
    pub intensity: Percent,
}

#[derive(Deserialize)]
struct DistractionRepr {
    #[serde(rename = "type", default)]
    kind: Option<DistractionType>,
    #[serde(default)]
    intensity: i64,
}

impl TryFrom<DistractionRepr> for Distraction {
    type Error = ValidationError;

    fn try_from(raw: DistractionRepr) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: raw.kind,
            intensity: Percent::try_new("strategy.distraction.intensity", raw.intensity)?,
        })
    }
}

/// Brand vs external share of responsibility.
///
/// Both components lie in `0.0..=1.0` and sum to `1.0` within
/// [`SPLIT_TOLERANCE`]. Invalid combinations are rejected, never renormalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SplitRepr")]
pub struct ResponsibilitySplit {
    brand: f64,
    external: f64,
}

#[derive(Deserialize)]
struct SplitRepr {
    #[serde(default = "half")]
    brand: f64,
    #[serde(default = "half")]
    external: f64,
}

fn half() -> f64 {
    0.5
}

impl ResponsibilitySplit {
    pub fn new(brand: f64, external: f64) -> Result<Self, ValidationError> {
        for (field, value) in [("brand", brand), ("external", external)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::SplitComponent { field, value });
            }
        }
        if ((brand + external) - 1.0).abs() > SPLIT_TOLERANCE {
            return Err(ValidationError::SplitSum { brand, external });
        }
        Ok(Self { brand, external })
    }

    pub fn brand(&self) -> f64 {
        self.brand
    }

    pub fn external(&self) -> f64 {
        self.external
    }

    /// Raise the brand share to at least `floor`.
    ///
    /// Paired with [`Self::cap_external`] using `1.0 - floor`, the sum stays
    /// within tolerance for any valid starting split.
    pub(crate) fn raise_brand(&mut self, floor: f64) {
        self.brand = self.brand.max(floor);
    }

    pub(crate) fn cap_external(&mut self, ceiling: f64) {
        self.external = self.external.min(ceiling);
    }
}

impl Default for ResponsibilitySplit {
    fn default() -> Self {
        Self {
            brand: 0.5,
            external: 0.5,
        }
    }
}

impl TryFrom<SplitRepr> for ResponsibilitySplit {
    type Error = ValidationError;

    fn try_from(raw: SplitRepr) -> Result<Self, Self::Error> {
        Self::new(raw.brand, raw.external)
    }
}

/// Advanced apology strategies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    #[serde(default)]
    pub scapegoat: Scapegoat,
    #[serde(default)]
    pub distraction: Distraction,
    #[serde(default)]
    pub responsibility_split: ResponsibilitySplit,
    #[serde(default)]
    pub victimless_frame: bool,
    #[serde(default)]
    pub self_credentialing: Vec<String>,
}
