//! Deterministic guardrail policy for generation requests.
//!
//! Two steps, always in this order:
//!
//! 1. [`SeverityClamp`]: silent bounds chosen by `incident.severity`.
//! 2. [`STRATEGY_RULES`]: evidence and hedging checks; every rule that fires
//!    corrects the request and appends one note to the adjustment log.
//!
//! The engine performs no I/O and keeps no state between calls.

mod clamps;
mod rules;

pub use clamps::SeverityClamp;
pub use rules::{STRATEGY_RULES, StrategyRule};

use serde::Serialize;

use crate::request::GenerateRequest;

/// The mutated request plus the notes for every corrective rule that fired,
/// in rule order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuardrailOutcome {
    pub request: GenerateRequest,
    pub adjustments: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct GuardrailEngine {
    rules: &'static [StrategyRule],
}

impl Default for GuardrailEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GuardrailEngine {
    pub fn new() -> Self {
        Self {
            rules: &STRATEGY_RULES,
        }
    }

    pub fn rules(&self) -> &'static [StrategyRule] {
        self.rules
    }

    /// Apply clamps then strategy rules, consuming the request.
    pub fn apply(&self, mut request: GenerateRequest) -> GuardrailOutcome {
        let adjustments = self.apply_in_place(&mut request);
        GuardrailOutcome {
            request,
            adjustments,
        }
    }

    /// Same as [`Self::apply`] for callers that keep ownership of the request.
    pub fn apply_in_place(&self, request: &mut GenerateRequest) -> Vec<String> {
        let severity = request.incident.severity;
        SeverityClamp::for_severity(severity).apply(request);

        let mut adjustments = Vec::new();
        for rule in self.rules {
            if (rule.applies)(request) {
                (rule.correct)(request);
                tracing::debug!(rule = rule.id, %severity, "guardrail adjustment applied");
                adjustments.push(rule.note.to_string());
            }
        }

        if !adjustments.is_empty() {
            tracing::info!(
                %severity,
                adjustments = adjustments.len(),
                "guardrails adjusted generation request"
            );
        }
        adjustments
    }
}
