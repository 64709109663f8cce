use serde::{Deserialize, Serialize};

use super::percent::Percent;
use crate::error::ValidationError;

/// Tone and risk controls. Each is independent and bounded to `0..=100`;
/// cross-slider constraints are enforced by the guardrail engine, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SlidersRepr")]
pub struct Sliders {
    pub contrition: Percent,
    pub legal_hedging: Percent,
    pub memes: Percent,
    pub accountability_evasion: Percent,
    pub profit_alchemist: Percent,
    pub risk_transfer: Percent,
    pub data_fog: Percent,
    pub pseudo_transparency: Percent,
}

impl Default for Sliders {
    fn default() -> Self {
        Self {
            contrition: Percent::saturating(50),
            legal_hedging: Percent::saturating(30),
            memes: Percent::ZERO,
            accountability_evasion: Percent::ZERO,
            profit_alchemist: Percent::ZERO,
            risk_transfer: Percent::ZERO,
            data_fog: Percent::ZERO,
            pseudo_transparency: Percent::ZERO,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct SlidersRepr {
    contrition: i64,
    legal_hedging: i64,
    memes: i64,
    accountability_evasion: i64,
    profit_alchemist: i64,
    risk_transfer: i64,
    data_fog: i64,
    pseudo_transparency: i64,
}

impl Default for SlidersRepr {
    fn default() -> Self {
        let d = Sliders::default();
        Self {
            contrition: d.contrition.get().into(),
            legal_hedging: d.legal_hedging.get().into(),
            memes: d.memes.get().into(),
            accountability_evasion: d.accountability_evasion.get().into(),
            profit_alchemist: d.profit_alchemist.get().into(),
            risk_transfer: d.risk_transfer.get().into(),
            data_fog: d.data_fog.get().into(),
            pseudo_transparency: d.pseudo_transparency.get().into(),
        }
    }
}

impl TryFrom<SlidersRepr> for Sliders {
    type Error = ValidationError;

    fn try_from(raw: SlidersRepr) -> Result<Self, Self::Error> {
        Ok(Self {
            contrition: Percent::try_new("sliders.contrition", raw.contrition)?,
            legal_hedging: Percent::try_new("sliders.legal_hedging", raw.legal_hedging)?,
            memes: Percent::try_new("sliders.memes", raw.memes)?,
            accountability_evasion: Percent::try_new(
                "sliders.accountability_evasion",
                raw.accountability_evasion,
            )?,
            profit_alchemist: Percent::try_new("sliders.profit_alchemist", raw.profit_alchemist)?,
            risk_transfer: Percent::try_new("sliders.risk_transfer", raw.risk_transfer)?,
            data_fog: Percent::try_new("sliders.data_fog", raw.data_fog)?,
            pseudo_transparency: Percent::try_new(
                "sliders.pseudo_transparency",
                raw.pseudo_transparency,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_payload_keeps_defaults() {
        let sliders: Sliders =
            serde_json::from_str(r#"{"contrition":65,"legal_hedging":30,"memes":0}"#).unwrap();

        assert_eq!(sliders.contrition.get(), 65);
        assert_eq!(sliders.legal_hedging.get(), 30);
        assert_eq!(sliders.profit_alchemist, Percent::ZERO);
    }

    #[test]
    fn empty_object_is_default() {
        let sliders: Sliders = serde_json::from_str("{}").unwrap();
        assert_eq!(sliders, Sliders::default());
        assert_eq!(sliders.contrition.get(), 50);
    }

    #[test]
    fn out_of_range_slider_is_rejected_with_its_name() {
        let err = serde_json::from_str::<Sliders>(r#"{"memes":101}"#).unwrap_err();
        assert!(err.to_string().contains("sliders.memes"));

        let err = serde_json::from_str::<Sliders>(r#"{"data_fog":-5}"#).unwrap_err();
        assert!(err.to_string().contains("sliders.data_fog"));
    }
}
