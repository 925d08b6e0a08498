//! Chat-completions request and response handling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prompts::{
    make_plan_prompt, make_yoga_prompt, PlanRequest, YogaRequest, SYSTEM_PROMPT, YOGA_SYSTEM_PROMPT,
};

/// Shown when the gateway answers without usable suggestions.
pub const FALLBACK_SUGGESTIONS: &str = "Unable to generate suggestions at this time.";

/// Model used when the host does not pick one.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Generation errors.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Payment required. Please add credits to your workspace.")]
    PaymentRequired,

    #[error("Gateway error {status}: {body}")]
    Gateway { status: u16, body: String },

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("Gateway returned an empty plan")]
    EmptyPlan,
}

impl GenerationError {
    /// Map a non-success gateway status to an error.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            429 => GenerationError::RateLimited,
            402 => GenerationError::PaymentRequired,
            _ => {
                tracing::warn!(status, body, "Gateway request failed");
                GenerationError::Gateway {
                    status,
                    body: body.to_string(),
                }
            }
        }
    }
}

pub type GenerationResult<T> = Result<T, GenerationError>;

/// One chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Chat-completions request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// System prompt followed by the user's plan prompt.
    pub fn for_plan(model: &str, request: &PlanRequest) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(make_plan_prompt(request)),
            ],
        }
    }

    /// System prompt followed by the user's yoga prompt.
    pub fn for_yoga(model: &str, request: &YogaRequest) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage::system(YOGA_SYSTEM_PROMPT),
                ChatMessage::user(make_yoga_prompt(request)),
            ],
        }
    }

    pub fn to_json(&self) -> GenerationResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Free-form plan text, shown verbatim and never parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPlan {
    pub plan: String,
}

/// Read the plan text out of a successful gateway reply.
pub fn parse_plan_response(json: &str) -> GenerationResult<GeneratedPlan> {
    let response: ChatResponse = serde_json::from_str(json)?;
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::InvalidFormat("Response has no choices".into()))?;

    if choice.message.content.trim().is_empty() {
        return Err(GenerationError::EmptyPlan);
    }

    Ok(GeneratedPlan {
        plan: choice.message.content,
    })
}

/// Read yoga suggestions out of a successful gateway reply.
///
/// Missing or blank content falls back to [`FALLBACK_SUGGESTIONS`]; only
/// malformed JSON is an error.
pub fn parse_suggestions_response(json: &str) -> GenerationResult<String> {
    let response: ChatResponse = serde_json::from_str(json)?;
    let content = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty());

    Ok(content.unwrap_or_else(|| {
        tracing::warn!("Suggestions response had no content");
        FALLBACK_SUGGESTIONS.to_string()
    }))
}

/// Anything that can turn a request into plan text.
pub trait PlanGenerator {
    fn generate(&self, request: &PlanRequest) -> GenerationResult<GeneratedPlan>;
}

/// Deterministic generator for testing without a gateway.
pub struct MockPlanGenerator;

impl PlanGenerator for MockPlanGenerator {
    fn generate(&self, request: &PlanRequest) -> GenerationResult<GeneratedPlan> {
        let mut plan = format!("BMI {:.1}\n", request.bmi);
        for section in ["Meal Plan", "Workout Plan"] {
            plan.push_str(&format!("\n## {}\n", section));
            for day in 1..=7 {
                plan.push_str(&format!("- Day {}\n", day));
            }
        }
        Ok(GeneratedPlan { plan })
    }
}
