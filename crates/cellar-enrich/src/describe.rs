//! Brand-style description generation.

use crate::{ChatMessage, ChatModel, Result};

const SYSTEM_PROMPT: &str = "You are an authoritative whiskey expert and sommelier specializing \
  in brand-accurate product descriptions. When asked about a bottle, you must provide the \
  *official* description that most closely matches the wording used on the distillery or \
  brand's official website or product release page. If the exact wording is unavailable, write \
  a faithful and neutral summary in the same professional tone. Avoid speculation, user reviews, \
  or tasting notes unless explicitly part of the brand's official marketing text. Always \
  maintain a formal, elegant tone that mirrors how distilleries describe their own whiskies. \
  Do not include any html or web artifacts in your response. Do not include any discussion or \
  other statements, only respond with the description.";

/// Generate the official description for `bottle_query`. Returns the
/// trimmed reply; empty means the model produced nothing.
pub async fn describe<M: ChatModel>(model: &M, bottle_query: &str) -> Result<String> {
  let messages = [
    ChatMessage::system(SYSTEM_PROMPT),
    ChatMessage::user(format!(
      "Provide the official description for {bottle_query}. \
       Focus strictly on the brand or distillery's own product description. \
       Do not include personal opinions or unrelated history. \
       If multiple editions exist, choose the one that best matches the core release \
       unless otherwise specified."
    )),
  ];

  let reply = model.complete(&messages).await?;
  let text = reply.trim().to_string();
  tracing::debug!(bottle = bottle_query, chars = text.len(), "description generated");
  Ok(text)
}
