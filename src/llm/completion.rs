use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::Provider;

/// One message of a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

impl Provider {
    /// Non-streaming chat completion; returns the first choice's content.
    /// A response without a first choice or without content is an error.
    pub async fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let req = ChatRequest {
            model: &self.config.chat_model,
            messages,
            temperature,
        };

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&req)
            .send()
            .await
            .context("Failed to call chat completions API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Chat completions API returned {status}: {body}");
        }

        let body: ChatResponse = resp
            .json()
            .await
            .context("Failed to parse chat completions response")?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .context("No completion returned")
    }

    /// Model ids the provider exposes. Used as a liveness probe.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/v1/models", self.config.base_url);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .context("Failed to call models API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Models API returned {status}: {body}");
        }

        let body: ModelList = resp.json().await.context("Failed to parse models response")?;
        Ok(body.data.into_iter().map(|m| m.id).collect())
    }
}
