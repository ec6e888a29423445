//! Chat-completion client for OpenAI-compatible endpoints.

use std::{future::Future, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
  pub role:    &'static str,
  pub content: String,
}

impl ChatMessage {
  pub fn system(content: impl Into<String>) -> Self {
    Self { role: "system", content: content.into() }
  }

  pub fn user(content: impl Into<String>) -> Self {
    Self { role: "user", content: content.into() }
  }
}

/// A chat model that turns a conversation into one assistant reply.
pub trait ChatModel: Send + Sync {
  fn complete<'a>(
    &'a self,
    messages: &'a [ChatMessage],
  ) -> impl Future<Output = Result<String>> + Send + 'a;
}

// ─── OpenAI ──────────────────────────────────────────────────────────────────

/// `POST {endpoint}/chat/completions` with bearer authentication.
#[derive(Clone)]
pub struct OpenAiClient {
  client:   Client,
  endpoint: String,
  api_key:  String,
  model:    String,
}

impl OpenAiClient {
  pub fn new(endpoint: &str, api_key: &str, model: &str, timeout: Duration) -> Result<Self> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self {
      client,
      endpoint: endpoint.trim_end_matches('/').to_string(),
      api_key: api_key.to_string(),
      model: model.to_string(),
    })
  }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
  model:    &'a str,
  messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
  #[serde(default)]
  choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
  message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
  content: Option<String>,
}

impl ChatModel for OpenAiClient {
  async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
    let resp = self
      .client
      .post(format!("{}/chat/completions", self.endpoint))
      .bearer_auth(&self.api_key)
      .json(&CompletionRequest { model: &self.model, messages })
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::Status { service: "chat", status: resp.status() });
    }

    let body: CompletionResponse = resp.json().await?;
    let choice = body.choices.into_iter().next().ok_or_else(|| Error::Malformed {
      service: "chat",
      reason:  "no choices in response".into(),
    })?;
    Ok(choice.message.content.unwrap_or_default())
  }
}
