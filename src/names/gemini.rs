// OneHand Gemini Bridge
// Copyright (c) 2026 Xing_The_Creator | OneHand
//
// Asks Gemini for a structured JSON analysis of a name over the public
// `generateContent` REST endpoint.

use serde_json::json;
use tracing::{debug, info};

use super::profile::NameProfile;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-pro-latest";

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "ONEHAND_GEMINI_MODEL";

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response had no text candidates")]
    EmptyResponse,

    #[error("response was not valid profile JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self::with_base(DEFAULT_API_BASE, api_key, model)
    }

    /// Point the client at a different API root (self-hosted proxies, tests).
    pub fn with_base(api_base: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Build a client from `GEMINI_API_KEY` / `ONEHAND_GEMINI_MODEL`. `None` when no key is set.
    pub fn from_env() -> Option<Self> {
        let key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty())?;
        let model = std::env::var(MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Some(Self::new(key.trim(), &model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn analyze(&self, name: &str) -> Result<NameProfile, LlmError> {
        info!("[NAMES] Asking {} about '{}'", self.model, name);

        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": build_prompt(name) }]
            }]
        });

        let endpoint = format!("{}/models/{}:generateContent", self.api_base, self.model);
        let resp = self
            .client
            .post(&endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = resp.json().await?;
        let text = extract_text(&body).ok_or(LlmError::EmptyResponse)?;
        debug!("[NAMES] Raw LLM text: {}", text);

        parse_profile(&text)
    }
}

pub fn build_prompt(name: &str) -> String {
    format!(
        r#"Provide a detailed analysis of the name '{name}'. Your response MUST be a valid JSON object with the following structure:
{{
  "name": "{name}",
  "meaning": "...",
  "origin": "...",
  "etymology": "...",
  "gender": "...",
  "famous_bearers": ["..."],
  "variations": ["..."],
  "description": "A comprehensive summary of the name's history and significance."
}}
Ensure the JSON is well-formed."#
    )
}

/// Concatenate the text parts of the first candidate.
fn extract_text(body: &serde_json::Value) -> Option<String> {
    let parts = body["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Strip markdown code fences the model likes to wrap JSON in, then parse.
pub fn parse_profile(text: &str) -> Result<NameProfile, LlmError> {
    let cleaned = text.trim().replace("```json", "").replace("```", "");
    Ok(serde_json::from_str(cleaned.trim())?)
}
