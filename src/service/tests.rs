use super::*;
use crate::admission::{AdmissionLimits, CounterStore, MemoryCounterStore};
use crate::error::GenerationError;
use crate::generation::BackendFuture;
use crate::moderation::ModerationCategory;
use crate::request::{Channel, Incident, Percent, Severity};
use std::sync::{Mutex, PoisonError};

const GENERATED: &str = r#"{
    "drafts": {
        "twitter": {"useful": "We broke checkout and fixed it.", "pointless": "Mercury was in retrograde."}
    },
    "metrics": {"pr_risk": 0.3, "legal_risk": 0.2, "ethics_score": 0.8, "clarity_score": 0.9, "sincerity_score": 0.7},
    "detectors": {"non_apology": false, "scapegoat_flag": "none", "unverifiable_claims": []},
    "adjustments": ["Model trimmed the tweet to 280 characters"],
    "rationales": ["Ownership line included"]
}"#;

const INTERPRETED: &str = r#"{
    "incident": {"summary": "Checkout outage", "what": "Payments failed", "harm": "2h of failed orders", "severity": "medium"},
    "notes": ["no evidence at this time"],
    "extractions": {"durations": ["2h"]}
}"#;

#[derive(Debug, Clone, PartialEq)]
struct RecordedCall {
    model: String,
    temperature: f64,
    user: String,
}

/// Backend double that returns a canned reply and records each call.
struct StubBackend {
    reply: std::result::Result<String, GenerationError>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubBackend {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn failing(error: GenerationError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(error),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl GenerationBackend for StubBackend {
    fn complete<'a>(&'a self, request: CompletionRequest<'a>) -> BackendFuture<'a, String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                model: request.model.to_string(),
                temperature: request.temperature,
                user: request.prompt.user.clone(),
            });
        let reply = match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(GenerationError::Backend(message)) => Err(GenerationError::Backend(message.clone())),
            Err(GenerationError::EmptyResponse) => Err(GenerationError::EmptyResponse),
            Err(GenerationError::InvalidOutput(message)) => {
                Err(GenerationError::InvalidOutput(message.clone()))
            }
        };
        Box::pin(async move { reply })
    }
}

fn service_with(backend: Arc<StubBackend>, limits: AdmissionLimits) -> ApologyService {
    let store: Arc<dyn CounterStore> = Arc::new(MemoryCounterStore::new());
    ApologyService::new(
        AdmissionController::new(store, limits),
        backend,
        GenerationConfig::default(),
    )
    .unwrap()
}

fn risky_request() -> GenerateRequest {
    let mut request = GenerateRequest::new(
        Incident::new("Checkout outage", "Payments failed", "2h of failed orders")
            .with_severity(Severity::Medium),
    );
    request.sliders.memes = Percent::saturating(80);
    request.sliders.risk_transfer = Percent::saturating(30);
    request
}

#[tokio::test]
async fn generate_appends_guardrail_adjustments_after_backend_ones() {
    let backend = StubBackend::replying(GENERATED);
    let service = service_with(Arc::clone(&backend), AdmissionLimits::default());

    let response = service
        .generate(&ClientIdentity::anonymous("10.0.0.1"), risky_request())
        .await
        .unwrap();

    assert_eq!(
        response.adjustments.first().map(String::as_str),
        Some("Model trimmed the tweet to 280 characters")
    );
    assert_eq!(
        &response.adjustments[1..],
        ["Disabled risk_transfer due to insufficient legal_hedging (<40)"]
    );
    assert!(response.drafts.contains_key(&Channel::Twitter));
}

#[tokio::test]
async fn generate_sends_guarded_request_to_backend() {
    let backend = StubBackend::replying(GENERATED);
    let service = service_with(Arc::clone(&backend), AdmissionLimits::default());

    service
        .generate(&ClientIdentity::anonymous("10.0.0.1"), risky_request())
        .await
        .unwrap();

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, "gpt-4-turbo-preview");
    assert!((calls[0].temperature - 0.7).abs() < f64::EPSILON);
    assert!(calls[0].user.contains("\"memes\": 15"));
    assert!(calls[0].user.contains("\"risk_transfer\": 0"));
}

#[tokio::test]
async fn rate_limited_client_never_reaches_backend() {
    let backend = StubBackend::replying(GENERATED);
    let service = service_with(Arc::clone(&backend), AdmissionLimits::new(1, 1));
    let client = ClientIdentity::anonymous("10.0.0.2");

    service.generate(&client, risky_request()).await.unwrap();
    let err = service.generate(&client, risky_request()).await.unwrap_err();

    assert!(matches!(err, AaasError::RateLimited { ref client_id } if client_id == "10.0.0.2"));
    assert_eq!(backend.calls().len(), 1);
}

#[tokio::test]
async fn authenticated_client_uses_higher_limit() {
    let backend = StubBackend::replying(GENERATED);
    let service = service_with(backend, AdmissionLimits::new(1, 2));
    let client = ClientIdentity::authenticated("member");

    service.moderate(&client, "hello").await.unwrap();
    service.moderate(&client, "hello").await.unwrap();
    assert!(service.moderate(&client, "hello").await.is_err());
}

#[tokio::test]
async fn invalid_request_is_rejected_before_backend() {
    let backend = StubBackend::replying(GENERATED);
    let service = service_with(Arc::clone(&backend), AdmissionLimits::default());
    let mut request = risky_request();
    request.channels.clear();

    let err = service
        .generate(&ClientIdentity::anonymous("10.0.0.3"), request)
        .await
        .unwrap_err();

    assert!(matches!(err, AaasError::Validation(_)));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn out_of_range_metrics_are_rejected() {
    let backend = StubBackend::replying(&GENERATED.replace("\"pr_risk\": 0.3", "\"pr_risk\": 3.0"));
    let service = service_with(backend, AdmissionLimits::default());

    let err = service
        .generate(&ClientIdentity::anonymous("10.0.0.4"), risky_request())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AaasError::Generation(GenerationError::InvalidOutput(_))
    ));
}

#[tokio::test]
async fn backend_failure_propagates() {
    let backend = StubBackend::failing(GenerationError::Backend("upstream timeout".into()));
    let service = service_with(backend, AdmissionLimits::default());

    let err = service
        .generate(&ClientIdentity::anonymous("10.0.0.5"), risky_request())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("upstream timeout"));
}

#[tokio::test]
async fn empty_backend_output_is_reported() {
    let backend = StubBackend::replying("");
    let service = service_with(backend, AdmissionLimits::default());

    let err = service
        .generate(&ClientIdentity::anonymous("10.0.0.6"), risky_request())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AaasError::Generation(GenerationError::EmptyResponse)
    ));
}

#[tokio::test]
async fn interpret_uses_interpret_temperature() {
    let backend = StubBackend::replying(INTERPRETED);
    let service = service_with(Arc::clone(&backend), AdmissionLimits::default());

    let response = service
        .interpret(
            &ClientIdentity::anonymous("10.0.0.7"),
            &InterpretRequest::new("Checkout was down for 2h"),
        )
        .await
        .unwrap();

    assert_eq!(response.incident.severity, Severity::Medium);
    assert_eq!(response.extractions["durations"], vec!["2h"]);
    let calls = backend.calls();
    assert!((calls[0].temperature - 0.3).abs() < f64::EPSILON);
    assert!(calls[0].user.contains("Text: Checkout was down for 2h"));
}

#[tokio::test]
async fn interpret_rejects_blank_text() {
    let backend = StubBackend::replying(INTERPRETED);
    let service = service_with(Arc::clone(&backend), AdmissionLimits::default());

    let err = service
        .interpret(
            &ClientIdentity::anonymous("10.0.0.8"),
            &InterpretRequest::new("   "),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AaasError::Validation(_)));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn moderate_screens_text_after_admission() {
    let backend = StubBackend::replying(GENERATED);
    let service = service_with(backend, AdmissionLimits::default());
    let client = ClientIdentity::anonymous("10.0.0.9");

    let verdict = service
        .moderate(&client, "Offering financial advice here")
        .await
        .unwrap();
    assert!(!verdict.allowed);
    assert_eq!(verdict.category, ModerationCategory::PolicyViolation);

    let verdict = service.moderate(&client, "We are sorry").await.unwrap();
    assert!(verdict.allowed);
}

#[tokio::test]
async fn from_config_builds_memory_backed_service() {
    let mut config = Config::default();
    config.admission.anon_limit = 1;
    let backend = StubBackend::replying(GENERATED);
    let service = ApologyService::from_config(&config, backend).unwrap();
    let client = ClientIdentity::anonymous("10.0.0.10");

    assert!(service.moderate(&client, "hi").await.is_ok());
    assert!(matches!(
        service.moderate(&client, "hi").await,
        Err(AaasError::RateLimited { .. })
    ));
}
