use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const INTERPRET_MODE: &str = "interpret";

/// Raw, messy incident material to be turned into an [`super::Incident`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentInput {
    /// Raw description, quotes, pasted posts.
    pub text: String,
    #[serde(default)]
    pub links: Vec<String>,
    /// File metadata references.
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InterpretRequestRepr")]
pub struct InterpretRequest {
    pub incident_input: IncidentInput,
}

#[derive(Deserialize)]
struct InterpretRequestRepr {
    #[serde(default)]
    mode: Option<String>,
    incident_input: IncidentInput,
}

impl TryFrom<InterpretRequestRepr> for InterpretRequest {
    type Error = ValidationError;

    fn try_from(raw: InterpretRequestRepr) -> Result<Self, Self::Error> {
        if let Some(mode) = raw.mode.as_deref()
            && mode != INTERPRET_MODE
        {
            return Err(ValidationError::Malformed(format!(
                "mode must be \"{INTERPRET_MODE}\" (got {mode:?})"
            )));
        }
        let request = Self {
            incident_input: raw.incident_input,
        };
        request.validate()?;
        Ok(request)
    }
}

impl InterpretRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            incident_input: IncidentInput {
                text: text.into(),
                links: Vec::new(),
                files: Vec::new(),
            },
        }
    }

    pub fn from_json(payload: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(payload).map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.incident_input.text.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "incident_input.text",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_interpret_payload() {
        let request = InterpretRequest::from_json(
            r#"{"mode":"interpret","incident_input":{"text":"Our database went down for 2 hours affecting 1000 customers","links":[],"files":[]}}"#,
        )
        .unwrap();
        assert!(request.incident_input.text.starts_with("Our database"));
        assert!(request.incident_input.links.is_empty());
    }

    #[test]
    fn blank_text_is_rejected() {
        let err = InterpretRequest::from_json(r#"{"incident_input":{"text":"   "}}"#).unwrap_err();
        assert!(err.to_string().contains("incident_input.text"));
    }

    #[test]
    fn wrong_mode_is_rejected() {
        let err =
            InterpretRequest::from_json(r#"{"mode":"generate","incident_input":{"text":"t"}}"#)
                .unwrap_err();
        assert!(err.to_string().contains("mode must be \"interpret\""));

        assert!(InterpretRequest::from_json(r#"{"incident_input":{"text":"t"}}"#).is_ok());
    }
}
