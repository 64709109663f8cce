use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumString};

use crate::error::ValidationError;

/// Incident impact classification; drives clamp strength.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[derive(Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    Informational,
    Operational,
    Regulatory,
    Reputational,
    Financial,
}

const UNKNOWN_TIME: &str = "unknown";

/// When an incident happened: an ISO-8601 instant or the `"unknown"` sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IncidentTime {
    #[default]
    Unknown,
    At(DateTime<FixedOffset>),
}

impl FromStr for IncidentTime {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNKNOWN_TIME) {
            return Ok(Self::Unknown);
        }
        parse_instant(trimmed)
            .map(Self::At)
            .ok_or_else(|| ValidationError::Timestamp(raw.to_string()))
    }
}

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M%z"];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Reads the ISO-8601 shapes backends and clients actually send. Values
/// without an offset, including bare dates, are read as UTC.
fn parse_instant(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at);
    }
    if let Some(at) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(raw, format).ok())
    {
        return Some(at);
    }

    let naive = raw.strip_suffix(['Z', 'z']).unwrap_or(raw);
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(naive, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(naive, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc().fixed_offset())
}

impl TryFrom<String> for IncidentTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IncidentTime> for String {
    fn from(value: IncidentTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for IncidentTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str(UNKNOWN_TIME),
            Self::At(at) => f.write_str(&at.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

fn default_stakeholders() -> BTreeSet<String> {
    BTreeSet::from(["customers".to_string()])
}

/// Structured incident record. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub summary: String,
    #[serde(default)]
    pub who: BTreeSet<String>,
    pub what: String,
    #[serde(default)]
    pub when: IncidentTime,
    pub harm: String,
    #[serde(default = "default_stakeholders")]
    pub stakeholders: BTreeSet<String>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub jurisdictions: Vec<String>,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    /// Remediation proofs. Empty means "no evidence".
    #[serde(default)]
    pub evidence: Vec<String>,
}

impl Incident {
    pub fn new(
        summary: impl Into<String>,
        what: impl Into<String>,
        harm: impl Into<String>,
    ) -> Self {
        Self {
            summary: summary.into(),
            who: BTreeSet::new(),
            what: what.into(),
            when: IncidentTime::Unknown,
            harm: harm.into(),
            stakeholders: default_stakeholders(),
            severity: Severity::Low,
            jurisdictions: Vec::new(),
            risk_level: None,
            evidence: Vec::new(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_evidence<I, S>(mut self, evidence: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.evidence = evidence.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_evidence(&self) -> bool {
        !self.evidence.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_incident_fills_defaults() {
        let incident: Incident = serde_json::from_str(
            r#"{"summary":"Outage","what":"Database went down","harm":"2h downtime"}"#,
        )
        .unwrap();

        assert_eq!(incident.severity, Severity::Low);
        assert_eq!(incident.when, IncidentTime::Unknown);
        assert!(incident.stakeholders.contains("customers"));
        assert!(!incident.has_evidence());
        assert!(incident.risk_level.is_none());
    }

    #[test]
    fn when_accepts_rfc3339_and_unknown() {
        let at: IncidentTime = "2024-01-15T10:00:00Z".parse().unwrap();
        assert_eq!(at.to_string(), "2024-01-15T10:00:00Z");

        let unknown: IncidentTime = "Unknown".parse().unwrap();
        assert_eq!(unknown, IncidentTime::Unknown);
    }

    #[test]
    fn when_reads_offsetless_timestamp_as_utc() {
        let at: IncidentTime = "2024-01-15T10:00:00".parse().unwrap();
        assert_eq!(at.to_string(), "2024-01-15T10:00:00Z");
    }

    #[test]
    fn when_reads_bare_date_as_utc_midnight() {
        let at: IncidentTime = "2024-01-15".parse().unwrap();
        assert_eq!(at.to_string(), "2024-01-15T00:00:00Z");
    }

    #[test]
    fn when_accepts_minute_precision() {
        let zulu: IncidentTime = "2024-01-15T10:00Z".parse().unwrap();
        assert_eq!(zulu.to_string(), "2024-01-15T10:00:00Z");

        let naive: IncidentTime = "2024-01-15T10:00".parse().unwrap();
        assert_eq!(naive, zulu);

        let offset: IncidentTime = "2024-01-15T12:00+02:00".parse().unwrap();
        assert_eq!(offset.to_string(), "2024-01-15T12:00:00+02:00");
        let IncidentTime::At(at) = offset else {
            panic!("expected an instant");
        };
        assert_eq!(at.to_utc().to_rfc3339(), "2024-01-15T10:00:00+00:00");
    }

    #[test]
    fn bare_date_deserializes_inside_incident() {
        let incident: Incident = serde_json::from_str(
            r#"{"summary":"s","what":"w","harm":"h","when":"2024-01-15"}"#,
        )
        .unwrap();
        assert_eq!(incident.when.to_string(), "2024-01-15T00:00:00Z");
    }

    #[test]
    fn when_rejects_garbage() {
        let err = "last tuesday".parse::<IncidentTime>().unwrap_err();
        assert_eq!(err, ValidationError::Timestamp("last tuesday".into()));

        let parsed = serde_json::from_str::<Incident>(
            r#"{"summary":"s","what":"w","harm":"h","when":"yesterday-ish"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn severity_round_trips_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
        assert_eq!("MEDIUM".parse::<Severity>().unwrap(), Severity::Medium);
        assert_eq!(Severity::Low.to_string(), "low");
    }

    #[test]
    fn evidence_presence_is_list_emptiness() {
        let bare = Incident::new("s", "w", "h");
        assert!(!bare.has_evidence());
        assert!(bare.with_evidence(["postmortem published"]).has_evidence());
    }
}
