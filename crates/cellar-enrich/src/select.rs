//! Official-source selection: ask the model which candidate is the brand's
//! own page.

use cellar_core::enrich::Selection;

use crate::{
  ChatMessage, ChatModel, Result,
  json::{f64_field, parse_object, str_field},
  search::SearchResult,
};

const SYSTEM_PROMPT: &str = "You are selecting the official product information for a bottle. \
  Choose the single most official URL from the list. \
  Prioritize official brand pages for a given bottle, then retailer product pages, then review pages. \
  Return JSON only with keys: selected_url, confidence, reason. \
  If none are official, return selected_url as null and confidence 0.";

/// Numbered candidate list shown to the model.
pub fn format_candidates(candidates: &[SearchResult]) -> String {
  candidates
    .iter()
    .enumerate()
    .map(|(i, c)| {
      format!("{}. {}\n   title: {}\n   snippet: {}", i + 1, c.url, c.title, c.snippet)
    })
    .collect::<Vec<_>>()
    .join("\n")
}

/// Decode a selection reply; missing or malformed fields take defaults.
pub fn parse_selection(content: &str) -> Selection {
  let map = parse_object(content);
  Selection {
    selected_url: str_field(&map, "selected_url"),
    confidence:   f64_field(&map, "confidence").unwrap_or(0.0),
    reason:       str_field(&map, "reason").unwrap_or_default(),
  }
}

/// The chosen URL, only if it is one of `candidates`.
pub fn valid_url<'a>(selection: &'a Selection, candidates: &[SearchResult]) -> Option<&'a str> {
  let url = selection.selected_url.as_deref()?;
  candidates.iter().any(|c| c.url == url).then_some(url)
}

/// Pick the most official candidate. No candidates means no model call.
pub async fn choose_official_url<M: ChatModel>(
  model: &M,
  bottle_query: &str,
  candidates: &[SearchResult],
) -> Result<Selection> {
  if candidates.is_empty() {
    return Ok(Selection::default());
  }

  let messages = [
    ChatMessage::system(SYSTEM_PROMPT),
    ChatMessage::user(format!(
      "Bottle: {bottle_query}\n\nCandidates:\n{}\n\nReturn JSON only.",
      format_candidates(candidates)
    )),
  ];
  let reply = model.complete(&messages).await?;
  Ok(parse_selection(&reply))
}
