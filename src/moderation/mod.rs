//! Keyword moderation for apology requests.
//!
//! Refuses hate/violence/illegal requests, tragedy exploitation, and requests
//! for medical or financial advice. Matching is case-insensitive and on whole
//! words only, so `exploited` or `hateful` do not trip the filter.

use serde::Serialize;
use sha2::{Digest, Sha256};

const BANNED_WORDS: &[&str] = &["hate", "violence", "illegal", "exploit"];
const ADVICE_PHRASES: &[&[&str]] = &[&["medical", "advice"], &["financial", "advice"]];
const TRAGEDY_SUBJECTS: &[&str] = &["tragedy", "disaster"];
const TRAGEDY_GAINS: &[&str] = &["exploitation", "profit"];

const ALLOWED_REASON: &str = "Content passes moderation";
const BLOCKED_REASON: &str = "Content violates moderation policy";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModerationSignals {
    pub harmful_language: bool,
    pub regulated_advice: bool,
    pub tragedy_exploitation: bool,
}

impl ModerationSignals {
    pub fn any(&self) -> bool {
        self.harmful_language || self.regulated_advice || self.tragedy_exploitation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationCategory {
    Safe,
    PolicyViolation,
}

impl ModerationCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::PolicyViolation => "policy_violation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModerationVerdict {
    pub allowed: bool,
    pub reason: String,
    pub category: ModerationCategory,
    /// SHA-256 of the screened text; the only trace of it that gets logged.
    #[serde(skip)]
    pub digest_sha256: String,
}

/// Lowercased word tokens; `_` counts as a word character.
fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn contains_sequence(words: &[String], phrase: &[&str]) -> bool {
    words
        .windows(phrase.len())
        .any(|window| window.iter().zip(phrase).all(|(w, p)| w == p))
}

pub fn detect_signals(text: &str) -> ModerationSignals {
    let words = words(text);
    let has_word = |word: &str| words.iter().any(|w| w == word);

    ModerationSignals {
        harmful_language: BANNED_WORDS.iter().any(|w| has_word(w)),
        regulated_advice: ADVICE_PHRASES
            .iter()
            .any(|phrase| contains_sequence(&words, phrase)),
        tragedy_exploitation: words.windows(2).any(|pair| {
            TRAGEDY_SUBJECTS.contains(&pair[0].as_str()) && TRAGEDY_GAINS.contains(&pair[1].as_str())
        }),
    }
}

pub fn digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn moderate(text: &str) -> ModerationVerdict {
    let signals = detect_signals(text);
    let digest_sha256 = digest(text);

    let verdict = if signals.any() {
        ModerationVerdict {
            allowed: false,
            reason: BLOCKED_REASON.to_string(),
            category: ModerationCategory::PolicyViolation,
            digest_sha256,
        }
    } else {
        ModerationVerdict {
            allowed: true,
            reason: ALLOWED_REASON.to_string(),
            category: ModerationCategory::Safe,
            digest_sha256,
        }
    };

    tracing::info!(
        allowed = verdict.allowed,
        category = verdict.category.as_str(),
        digest_sha256 = %verdict.digest_sha256,
        "moderation verdict"
    );
    verdict
}
