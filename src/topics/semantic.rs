//! Chat-completion-backed topic classifier.
//!
//! One request per call, no internal retries: the caller decides whether
//! a failure is worth retrying or should fall through to the keyword
//! scorer.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Topic;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_API_ENDPOINT: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct SemanticConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_endpoint: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

impl ChatResponse {
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Error)]
pub enum SemanticError {
    #[error("classifier not configured: {0}")]
    NotConfigured(&'static str),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: reqwest::StatusCode, body: String },
    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("empty response")]
    EmptyChoices,
    #[error("unrecognized topic label: {0:?}")]
    UnrecognizedLabel(String),
}

#[derive(Clone)]
pub struct SemanticClassifier {
    config: SemanticConfig,
    client: reqwest::Client,
}

impl SemanticClassifier {
    pub fn from_env() -> Self {
        let api_key = env_string("TUTOR_LLM_API_KEY");
        let model = env_string("TUTOR_LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_endpoint = normalize_endpoint(
            env_string("TUTOR_LLM_API_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string()),
        );
        let timeout =
            Duration::from_millis(env_u64("TUTOR_LLM_TIMEOUT_MS").unwrap_or(DEFAULT_TIMEOUT_MS));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            config: SemanticConfig { api_key, model, api_endpoint, timeout },
            client,
        }
    }

    pub fn is_available(&self) -> bool {
        self.config.api_key.as_deref().is_some_and(|v| !v.trim().is_empty())
            && !self.config.model.trim().is_empty()
            && !self.config.api_endpoint.trim().is_empty()
    }

    /// Ask the model for exactly one topic label from the closed set.
    pub async fn classify(&self, problem_text: &str) -> Result<Topic, SemanticError> {
        let content = self.complete_with_system(&system_prompt(), problem_text).await?;
        parse_topic_label(&content)
    }

    async fn complete_with_system(
        &self,
        system: &str,
        user: &str,
    ) -> Result<String, SemanticError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or(SemanticError::NotConfigured("TUTOR_LLM_API_KEY"))?;

        let url = format!(
            "{}/chat/completions",
            self.config.api_endpoint.trim_end_matches('/')
        );
        let messages = [
            ChatMessage { role: "system".into(), content: system.into() },
            ChatMessage { role: "user".into(), content: user.into() },
        ];
        let payload = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "stream": false
        });

        let resp = self.client.post(&url).bearer_auth(api_key).json(&payload).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SemanticError::HttpStatus { status, body });
        }

        let bytes = resp.bytes().await?;
        let response: ChatResponse = serde_json::from_slice(&bytes)?;
        response
            .first_content()
            .map(|s| s.to_string())
            .ok_or(SemanticError::EmptyChoices)
    }
}

fn system_prompt() -> String {
    let labels: Vec<&str> = Topic::ALL.iter().map(|t| t.as_str()).collect();
    format!(
        "You classify math practice problems into exactly one topic. \
         Respond with only the topic label, nothing else. \
         Allowed labels: {}.",
        labels.join(", ")
    )
}

/// Map a free-form model reply onto the closed label set. Accepts a reply
/// containing exactly one known label; anything else is rejected so the
/// caller can fall back.
fn parse_topic_label(content: &str) -> Result<Topic, SemanticError> {
    let lowered = content.trim().to_lowercase();
    if let Some(topic) = Topic::parse(&lowered) {
        return Ok(topic);
    }

    let mentioned: Vec<Topic> = Topic::ALL
        .iter()
        .copied()
        .filter(|t| lowered.contains(t.as_str()))
        .collect();
    match mentioned.as_slice() {
        [single] => Ok(*single),
        _ => Err(SemanticError::UnrecognizedLabel(content.trim().to_string())),
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_u64(key: &str) -> Option<u64> {
    env_string(key)?.parse().ok()
}

fn normalize_endpoint(endpoint: String) -> String {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if trimmed.ends_with("/v1") || trimmed.contains("/v1/") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/v1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_label() {
        assert_eq!(parse_topic_label("quadratic-equations").unwrap(), Topic::QuadraticEquations);
        assert_eq!(parse_topic_label("  Geometry \n").unwrap(), Topic::Geometry);
    }

    #[test]
    fn test_parse_label_inside_sentence() {
        let topic = parse_topic_label("The topic is trigonometry.").unwrap();
        assert_eq!(topic, Topic::Trigonometry);
    }

    #[test]
    fn test_parse_rejects_ambiguous_reply() {
        let result = parse_topic_label("Either factoring or polynomials.");
        assert!(matches!(result, Err(SemanticError::UnrecognizedLabel(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_reply() {
        let result = parse_topic_label("I cannot classify this.");
        assert!(matches!(result, Err(SemanticError::UnrecognizedLabel(_))));
    }

    #[test]
    fn test_endpoint_normalization() {
        assert_eq!(normalize_endpoint("https://api.openai.com".into()), "https://api.openai.com/v1");
        assert_eq!(normalize_endpoint("https://api.openai.com/v1/".into()), "https://api.openai.com/v1");
    }

    #[test]
    fn test_system_prompt_lists_every_label() {
        let prompt = system_prompt();
        for topic in Topic::ALL {
            assert!(prompt.contains(topic.as_str()), "missing {}", topic.as_str());
        }
    }
}
