use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use aaas::Config;
use aaas::admission::{counter_key, create_admission_controller};
use aaas::guardrail::GuardrailEngine;
use aaas::moderation::moderate;
use aaas::prompt::{PromptEngine, build_generate_prompt};
use aaas::request::GenerateRequest;

use crate::cli::commands::{Cli, Commands};

fn read_request(path: &Path) -> Result<GenerateRequest> {
    let payload = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file {}", path.display()))?;
    let request = GenerateRequest::from_json(&payload)
        .with_context(|| format!("Failed to parse request file {}", path.display()))?;
    request.validate().context("Request failed validation")?;
    Ok(request)
}

fn run_guard(path: &Path) -> Result<()> {
    let request = read_request(path)?;
    let outcome = GuardrailEngine::new().apply(request);
    println!(
        "{}",
        serde_json::to_string_pretty(&outcome).context("Failed to serialize guarded request")?
    );
    Ok(())
}

fn run_prompt(path: &Path) -> Result<()> {
    let request = read_request(path)?;
    let outcome = GuardrailEngine::new().apply(request);
    let engine = PromptEngine::new()?;
    let prompt = build_generate_prompt(&engine, &outcome.request)?;

    println!("--- system ---\n{}\n", prompt.system);
    println!("--- user ---\n{}", prompt.user);
    if !outcome.adjustments.is_empty() {
        println!("\n--- adjustments ---");
        for note in &outcome.adjustments {
            println!("- {note}");
        }
    }
    Ok(())
}

async fn run_admit(config: &Config, client: &str, authenticated: bool, times: u32) {
    let controller = create_admission_controller(&config.admission);
    let limit = controller.limits().for_client(authenticated);
    info!(key = %counter_key(client), limit, store = %config.admission.store, "running admission");

    for attempt in 1..=times {
        let decision = if controller.admit(client, authenticated).await {
            "admitted"
        } else {
            "refused"
        };
        println!("attempt {attempt}: {decision}");
    }
}

fn run_moderate(text: &str) -> Result<()> {
    let verdict = moderate(text);
    println!(
        "{}",
        serde_json::to_string_pretty(&verdict).context("Failed to serialize verdict")?
    );
    Ok(())
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Guard { request } => run_guard(&request),
        Commands::Prompt { request } => run_prompt(&request),
        Commands::Admit {
            client,
            authenticated,
            times,
        } => {
            run_admit(&config, &client, authenticated, times).await;
            Ok(())
        }
        Commands::Moderate { text } => run_moderate(&text),
    }
}
