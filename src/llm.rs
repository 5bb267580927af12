use reqwest::header::AUTHORIZATION;
use serde_json::{json, Value};
use std::env;
use std::time::Duration;

use crate::config::AiConfig;

/// Chat-completions client for any OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: f64,
}

impl LlmClient {
    /// Builds a client when AI is enabled and the configured key variable is set.
    pub fn from_config(config: &AiConfig) -> Result<Option<Self>, String> {
        if !config.enabled {
            return Ok(None);
        }
        let api_key = match env::var(&config.api_key_env) {
            Ok(value) if !value.trim().is_empty() => value,
            _ => return Ok(None),
        };
        Self::new(
            api_key,
            config.api_base.clone(),
            config.model.clone(),
            config.temperature,
            Duration::from_millis(config.timeout_ms),
        )
        .map(Some)
    }

    pub fn new(
        api_key: String,
        api_base: String,
        model: String,
        temperature: f64,
        timeout: Duration,
    ) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| format!("failed to build AI client: {}", err))?;
        Ok(Self {
            client,
            api_key,
            api_base,
            model,
            temperature,
        })
    }

    /// Sends one system + user exchange and returns the JSON object found in
    /// the reply. Errors name the model and endpoint that failed.
    pub async fn complete_json(&self, system: &str, user: &str) -> Result<String, String> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let request = json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|err| self.failure(&url, format!("request failed: {}", err)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = match body.trim() {
                "" => format!("status {}", status),
                detail => format!("status {}: {}", status, truncate(detail, 200)),
            };
            return Err(self.failure(&url, reason));
        }

        let reply: Value = response
            .json()
            .await
            .map_err(|err| self.failure(&url, format!("unreadable reply: {}", err)))?;
        let content = reply
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| self.failure(&url, "reply has no message content".to_string()))?;

        extract_json(content)
            .ok_or_else(|| self.failure(&url, "reply has no JSON object".to_string()))
    }

    fn failure(&self, url: &str, reason: String) -> String {
        format!("model {} at {}: {}", self.model, url, reason)
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Finds the JSON object in a model reply, tolerating prose or code fences
/// around it. Returns `None` unless the candidate actually parses.
pub fn extract_json(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let candidate = if trimmed.starts_with('{') && trimmed.ends_with('}') {
        trimmed
    } else {
        let start = trimmed.find('{')?;
        let end = trimmed.rfind('}')?;
        if start >= end {
            return None;
        }
        &trimmed[start..=end]
    };
    serde_json::from_str::<Value>(candidate)
        .ok()
        .filter(Value::is_object)
        .map(|_| candidate.to_string())
}
