use crate::error::{AppError, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::TextGenerator;

/// Reply used when the completion carries no content.
pub const EMPTY_ANALYSIS: &str = "Analiz tapılmadı.";

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 400;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
    stream: bool,
}

/// DeepSeek chat-completions client.
#[derive(Clone)]
pub struct DeepSeekClient {
    client: Client,
    url: String,
    api_key: Option<String>,
    model: String,
}

impl DeepSeekClient {
    pub fn new(
        url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Skalp/1.0")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            url: url.into(),
            api_key,
            model: model.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// First choice content, or the placeholder when the reply has none.
fn extract_content(response: &Value) -> String {
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(EMPTY_ANALYSIS)
        .to_string()
}

impl TextGenerator for DeepSeekClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Internal("DEEPSEEK_API_KEY is not configured".to_string()))?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            stream: false,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!("DeepSeek returned {}", status);
            return Err(AppError::upstream(
                format!("DeepSeek API error: {}", status),
                status.as_u16(),
                &text,
            ));
        }

        let body: Value = response.json().await?;
        let content = extract_content(&body);
        debug!("DeepSeek analysis: {} chars", content.chars().count());
        Ok(content)
    }
}
