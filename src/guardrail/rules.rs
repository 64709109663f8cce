use crate::request::{GenerateRequest, Percent, Severity};

/// A strategy-validation rule: when `applies` holds, `correct` mutates the
/// request and `note` is appended to the adjustment log.
#[derive(Clone, Copy)]
pub struct StrategyRule {
    pub id: &'static str,
    pub applies: fn(&GenerateRequest) -> bool,
    pub correct: fn(&mut GenerateRequest),
    pub note: &'static str,
}

impl std::fmt::Debug for StrategyRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRule")
            .field("id", &self.id)
            .field("note", &self.note)
            .finish_non_exhaustive()
    }
}

const SCAPEGOAT_EVIDENCE_THRESHOLD: Percent = Percent::saturating(70);
const SCAPEGOAT_FALLBACK: Percent = Percent::saturating(40);
const PROFIT_ALCHEMIST_THRESHOLD: Percent = Percent::saturating(50);
const PROFIT_ALCHEMIST_FALLBACK: Percent = Percent::saturating(30);
const RISK_TRANSFER_MIN_LEGAL_HEDGING: Percent = Percent::saturating(40);

/// Evaluation order is fixed and each rule sees the effects of the ones before
/// it. `high_severity_risk_transfer` cannot fire while the HIGH clamp zeroes
/// `risk_transfer` first; it stays so that reordering the steps keeps the
/// policy intact.
pub const STRATEGY_RULES: [StrategyRule; 4] = [
    StrategyRule {
        id: "scapegoat_requires_evidence",
        applies: scapegoat_without_evidence,
        correct: reduce_scapegoat,
        note: "Reduced scapegoat intensity to 40 (from >70) due to lack of evidence",
    },
    StrategyRule {
        id: "profit_alchemist_requires_evidence",
        applies: profit_alchemist_without_evidence,
        correct: reduce_profit_alchemist,
        note: "Reduced profit_alchemist to 30 (from >=50) due to lack of concrete evidence",
    },
    StrategyRule {
        id: "risk_transfer_requires_legal_hedging",
        applies: risk_transfer_without_hedging,
        correct: disable_risk_transfer,
        note: "Disabled risk_transfer due to insufficient legal_hedging (<40)",
    },
    StrategyRule {
        id: "high_severity_risk_transfer",
        applies: risk_transfer_on_high_severity,
        correct: disable_risk_transfer,
        note: "Disabled risk_transfer for HIGH severity incident",
    },
];

fn scapegoat_without_evidence(request: &GenerateRequest) -> bool {
    request.strategy.scapegoat.intensity > SCAPEGOAT_EVIDENCE_THRESHOLD
        && !request.incident.has_evidence()
}

fn reduce_scapegoat(request: &mut GenerateRequest) {
    request.strategy.scapegoat.intensity = SCAPEGOAT_FALLBACK;
}

fn profit_alchemist_without_evidence(request: &GenerateRequest) -> bool {
    request.sliders.profit_alchemist >= PROFIT_ALCHEMIST_THRESHOLD
        && !request.incident.has_evidence()
}

fn reduce_profit_alchemist(request: &mut GenerateRequest) {
    request.sliders.profit_alchemist = PROFIT_ALCHEMIST_FALLBACK;
}

fn risk_transfer_without_hedging(request: &GenerateRequest) -> bool {
    request.sliders.risk_transfer > Percent::ZERO
        && request.sliders.legal_hedging < RISK_TRANSFER_MIN_LEGAL_HEDGING
}

fn risk_transfer_on_high_severity(request: &GenerateRequest) -> bool {
    request.incident.severity == Severity::High && request.sliders.risk_transfer > Percent::ZERO
}

fn disable_risk_transfer(request: &mut GenerateRequest) {
    request.sliders.risk_transfer = Percent::ZERO;
}
