//! Request pipeline tying admission, guardrails, prompts and the generation
//! backend together.

use std::fmt;
use std::sync::Arc;

use crate::admission::{AdmissionController, create_admission_controller};
use crate::config::{Config, GenerationConfig};
use crate::error::{AaasError, Result};
use crate::generation::{
    CompletionRequest, GenerateResponse, GenerationBackend, InterpretResponse, parse_output,
};
use crate::guardrail::GuardrailEngine;
use crate::moderation::{ModerationVerdict, moderate};
use crate::prompt::{PromptEngine, build_generate_prompt, build_interpret_prompt};
use crate::request::{GenerateRequest, InterpretRequest};

/// Who is calling. Authenticated callers get the higher admission limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub client_id: String,
    pub authenticated: bool,
}

impl ClientIdentity {
    pub fn anonymous(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            authenticated: false,
        }
    }

    pub fn authenticated(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            authenticated: true,
        }
    }
}

pub struct ApologyService {
    admission: AdmissionController,
    guardrails: GuardrailEngine,
    prompts: PromptEngine,
    backend: Arc<dyn GenerationBackend>,
    generation: GenerationConfig,
}

impl fmt::Debug for ApologyService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApologyService")
            .field("admission", &self.admission)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl ApologyService {
    pub fn new(
        admission: AdmissionController,
        backend: Arc<dyn GenerationBackend>,
        generation: GenerationConfig,
    ) -> Result<Self> {
        Ok(Self {
            admission,
            guardrails: GuardrailEngine::new(),
            prompts: PromptEngine::new()?,
            backend,
            generation,
        })
    }

    pub fn from_config(config: &Config, backend: Arc<dyn GenerationBackend>) -> Result<Self> {
        Self::new(
            create_admission_controller(&config.admission),
            backend,
            config.generation.clone(),
        )
    }

    async fn admit(&self, client: &ClientIdentity) -> Result<()> {
        if self
            .admission
            .admit(&client.client_id, client.authenticated)
            .await
        {
            Ok(())
        } else {
            Err(AaasError::RateLimited {
                client_id: client.client_id.clone(),
            })
        }
    }

    /// Guard `request`, hand the prompts to the backend and return its drafts
    /// with the guardrail adjustments appended after the backend's own.
    #[tracing::instrument(
        name = "generate",
        skip_all,
        fields(request_id = %uuid::Uuid::new_v4(), client_id = %client.client_id)
    )]
    pub async fn generate(
        &self,
        client: &ClientIdentity,
        request: GenerateRequest,
    ) -> Result<GenerateResponse> {
        self.admit(client).await?;
        request.validate()?;

        let outcome = self.guardrails.apply(request);
        let prompt = build_generate_prompt(&self.prompts, &outcome.request)?;
        let raw = self
            .backend
            .complete(CompletionRequest {
                model: &self.generation.model,
                temperature: self.generation.generate_temperature,
                prompt: &prompt,
            })
            .await?;

        let mut response: GenerateResponse = parse_output(&raw)?;
        response.metrics.validate()?;

        let missing: Vec<String> = outcome
            .request
            .channels
            .iter()
            .filter(|channel| !response.drafts.contains_key(*channel))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            tracing::warn!(missing = %missing.join(", "), "backend omitted requested channels");
        }

        response.adjustments.extend(outcome.adjustments);
        tracing::info!(
            drafts = response.drafts.len(),
            adjustments = response.adjustments.len(),
            "apology generated"
        );
        Ok(response)
    }

    #[tracing::instrument(
        name = "interpret",
        skip_all,
        fields(request_id = %uuid::Uuid::new_v4(), client_id = %client.client_id)
    )]
    pub async fn interpret(
        &self,
        client: &ClientIdentity,
        request: &InterpretRequest,
    ) -> Result<InterpretResponse> {
        self.admit(client).await?;
        request.validate()?;

        let prompt = build_interpret_prompt(&self.prompts, &request.incident_input)?;
        let raw = self
            .backend
            .complete(CompletionRequest {
                model: &self.generation.model,
                temperature: self.generation.interpret_temperature,
                prompt: &prompt,
            })
            .await?;

        let response: InterpretResponse = parse_output(&raw)?;
        tracing::info!(
            severity = %response.incident.severity,
            notes = response.notes.len(),
            "incident interpreted"
        );
        Ok(response)
    }

    pub async fn moderate(&self, client: &ClientIdentity, text: &str) -> Result<ModerationVerdict> {
        self.admit(client).await?;
        Ok(moderate(text))
    }
}

#[cfg(test)]
mod tests;
