use crate::request::{GenerateRequest, Percent, Severity};

/// Silent bounds a severity level imposes on a request.
///
/// Clamps are part of the policy itself, so applying them never produces an
/// adjustment note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityClamp {
    pub memes_ceiling: Option<Percent>,
    pub scapegoat_ceiling: Option<Percent>,
    pub risk_transfer_ceiling: Option<Percent>,
    pub brand_floor: Option<f64>,
    pub external_ceiling: Option<f64>,
}

impl SeverityClamp {
    const NONE: Self = Self {
        memes_ceiling: None,
        scapegoat_ceiling: None,
        risk_transfer_ceiling: None,
        brand_floor: None,
        external_ceiling: None,
    };

    const MEDIUM: Self = Self {
        memes_ceiling: Some(Percent::saturating(15)),
        brand_floor: Some(0.3),
        external_ceiling: Some(0.7),
        ..Self::NONE
    };

    const HIGH: Self = Self {
        memes_ceiling: Some(Percent::ZERO),
        scapegoat_ceiling: Some(Percent::saturating(40)),
        risk_transfer_ceiling: Some(Percent::ZERO),
        brand_floor: Some(0.5),
        external_ceiling: Some(0.5),
    };

    pub const fn for_severity(severity: Severity) -> Self {
        match severity {
            Severity::Low => Self::NONE,
            Severity::Medium => Self::MEDIUM,
            Severity::High => Self::HIGH,
        }
    }

    /// Pull every bounded field toward its bound. Monotone, so re-applying is
    /// a no-op.
    pub fn apply(&self, request: &mut GenerateRequest) {
        let sliders = &mut request.sliders;
        let strategy = &mut request.strategy;

        if let Some(ceiling) = self.memes_ceiling {
            sliders.memes = sliders.memes.min(ceiling);
        }
        if let Some(ceiling) = self.scapegoat_ceiling {
            strategy.scapegoat.intensity = strategy.scapegoat.intensity.min(ceiling);
        }
        if let Some(ceiling) = self.risk_transfer_ceiling {
            sliders.risk_transfer = sliders.risk_transfer.min(ceiling);
        }
        if let Some(floor) = self.brand_floor {
            strategy.responsibility_split.raise_brand(floor);
        }
        if let Some(ceiling) = self.external_ceiling {
            strategy.responsibility_split.cap_external(ceiling);
        }
    }
}
