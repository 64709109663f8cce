use serde::Serialize;
use tera::Context;

use super::engine::PromptEngine;
use crate::error::PromptError;
use crate::request::{GenerateRequest, IncidentInput};

const GENERATE_SYSTEM_PROMPT: &str = "\
You are the generation engine for Apology-as-a-Service (AaaS).

Produce two apology variants for every requested channel: a useful one and a pointless one.

GLOBAL PRINCIPLES:
- Truth and evidence first: never assert certainty the evidence does not support
- Duality: always produce both the useful and the pointless variant
- Non-apology detector: when contrition >= 60, never use \"we regret any inconvenience\" without ownership
- Scapegoating limits: never target individuals or protected classes
- Legal hedging is not lying: qualify statements without contradicting facts

DETERMINISTIC MAPPINGS:
Contrition (0-100):
  0-20: neutral, indirect
  21-59: partial ownership
  >=60: explicit \"we caused / we failed\" plus restitution

Legal hedging (0-100):
  0-20: plain language
  21-59: qualifiers (\"to our knowledge\", \"pending investigation\")
  60-100: safe-harbor / force-majeure language

Memes (0-100):
  0-10: none
  11-40: subtle idiom
  41-70: tasteful unhinged
  71-100: overt memes

CHANNEL RULES:
- twitter: <=280 chars, crisp, ownership line if contrition >= 60
- linkedin: 2-5 sentences, professional, soft call to action
- press_release: headline, lede, summary, bullets, quote, contact
- ceo_letter: 3-7 paragraphs, human, explicit responsibility if contrition >= 60
- customer_email: greeting, what happened, restitution, support, sign-off, ~120-200 words
- status_page: timeline, scope, root cause, remediation, next update

Output valid JSON exactly matching the GenerateResponse schema.
Include metrics, detectors, adjustments, and rationales.";

const INTERPRET_SYSTEM_PROMPT: &str = "\
You are the interpretation engine for Apology-as-a-Service (AaaS).

Turn messy incident input into a structured incident record.

RULES:
1. Never fabricate facts or evidence
2. When evidence is missing, say \"no evidence at this time\" or \"unknown\"
3. Put entities, times and numbers into the extractions field
4. Assess severity from harm scope and stakeholder impact
5. Identify relevant regulatory jurisdictions
6. Output valid JSON exactly matching the InterpretResponse schema

Output only JSON, no prose outside JSON.";

const GENERATE_USER_TEMPLATE: &str = "\
Generate apologies for this incident:

INCIDENT:
{{ incident }}

SLIDERS:
{{ sliders }}

STRATEGY:
{{ strategy }}

TONE: {{ tone }}
CHANNELS: {{ channels }}
LOCALE: {{ locale }}
{% if brand_profile %}
BRAND PROFILE: {{ brand_profile }}
{% endif %}
Generate drafts for ALL requested channels.
Each channel must have both useful and pointless variants.
Include metrics, detectors, adjustments, and rationales.";

const INTERPRET_USER_TEMPLATE: &str = "\
Parse this incident input into a structured record:

Text: {{ text }}
Links: {{ links }}
Files: {{ files }}

Output JSON with fields: incident, notes, extractions.";

const GENERATE_USER_NAME: &str = "generate_user";
const INTERPRET_USER_NAME: &str = "interpret_user";

/// System and user messages for one backend call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationPrompt {
    pub system: String,
    pub user: String,
}

impl PromptEngine {
    /// Engine with the apology templates registered.
    pub fn new() -> Result<Self, PromptError> {
        let mut engine = Self::empty();
        engine.add_template(GENERATE_USER_NAME, GENERATE_USER_TEMPLATE)?;
        engine.add_template(INTERPRET_USER_NAME, INTERPRET_USER_TEMPLATE)?;
        Ok(engine)
    }
}

fn pretty<T: Serialize>(section: &'static str, value: &T) -> Result<String, PromptError> {
    serde_json::to_string_pretty(value).map_err(|e| PromptError::Serialize {
        section,
        message: e.to_string(),
    })
}

fn joined_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

/// Build the generate-mode prompt for an already guarded request.
pub fn build_generate_prompt(
    engine: &PromptEngine,
    request: &GenerateRequest,
) -> Result<GenerationPrompt, PromptError> {
    let channels: Vec<String> = request.channels.iter().map(ToString::to_string).collect();
    let brand_profile = match &request.brand_profile {
        Some(profile) => pretty("brand_profile", profile)?,
        None => String::new(),
    };

    let mut ctx = Context::new();
    ctx.insert("incident", &pretty("incident", &request.incident)?);
    ctx.insert("sliders", &pretty("sliders", &request.sliders)?);
    ctx.insert("strategy", &pretty("strategy", &request.strategy)?);
    ctx.insert("tone", &request.tone.to_string());
    ctx.insert("channels", &channels.join(", "));
    ctx.insert("locale", &request.locale);
    ctx.insert("brand_profile", &brand_profile);

    Ok(GenerationPrompt {
        system: GENERATE_SYSTEM_PROMPT.to_string(),
        user: engine.render(GENERATE_USER_NAME, &ctx)?,
    })
}

/// Build the interpret-mode prompt for raw incident material.
pub fn build_interpret_prompt(
    engine: &PromptEngine,
    input: &IncidentInput,
) -> Result<GenerationPrompt, PromptError> {
    let mut ctx = Context::new();
    ctx.insert("text", &input.text);
    ctx.insert("links", &joined_or_none(&input.links));
    ctx.insert("files", &joined_or_none(&input.files));

    Ok(GenerationPrompt {
        system: INTERPRET_SYSTEM_PROMPT.to_string(),
        user: engine.render(INTERPRET_USER_NAME, &ctx)?,
    })
}
