//! Tasting-note classification constrained to the known vocabulary.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;

use crate::{ChatMessage, ChatModel, Result, json::parse_object};

const SYSTEM_PROMPT: &str = "You are a classifier that extracts tasting notes from official \
  product descriptions. Use only the allowed notes list. Do not guess. \
  Return JSON only with keys: notes (array of strings), evidence (object mapping note to quote).";

/// Notes found on a page, each with its supporting quote.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
  pub notes:    Vec<String>,
  pub evidence: BTreeMap<String, String>,
}

/// At most `budget` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, budget: usize) -> &str {
  match text.char_indices().nth(budget) {
    Some((idx, _)) => &text[..idx],
    None => text,
  }
}

/// Decode a classification reply, keeping only vocabulary members, without
/// duplicates and at most `max_notes` of them.
pub fn parse_classification(
  content: &str,
  vocabulary: &[String],
  max_notes: usize,
) -> Classification {
  let map = parse_object(content);
  let allowed: HashSet<&str> = vocabulary.iter().map(String::as_str).collect();

  let mut seen = HashSet::new();
  let notes: Vec<String> = map
    .get("notes")
    .and_then(Value::as_array)
    .into_iter()
    .flatten()
    .filter_map(Value::as_str)
    .filter(|n| allowed.contains(n) && seen.insert(*n))
    .take(max_notes)
    .map(str::to_owned)
    .collect();

  let quotes = map.get("evidence").and_then(Value::as_object);
  let evidence = notes
    .iter()
    .map(|note| {
      let quote = quotes
        .and_then(|q| q.get(note))
        .and_then(Value::as_str)
        .unwrap_or_default();
      (note.clone(), quote.to_string())
    })
    .collect();

  Classification { notes, evidence }
}

/// Ask the model which vocabulary notes the page text supports.
pub async fn classify_notes<M: ChatModel>(
  model: &M,
  bottle_query: &str,
  page_text: &str,
  vocabulary: &[String],
  max_notes: usize,
  char_budget: usize,
) -> Result<Classification> {
  // A Vec<String> always serialises.
  let allowed = serde_json::to_string(vocabulary).unwrap_or_else(|_| "[]".into());
  let messages = [
    ChatMessage::system(SYSTEM_PROMPT),
    ChatMessage::user(format!(
      "Bottle: {bottle_query}\n\n\
       Allowed notes: {allowed}\n\n\
       Description text: {}\n\n\
       Select up to {max_notes} notes. Return JSON only.",
      truncate_chars(page_text, char_budget)
    )),
  ];
  let reply = model.complete(&messages).await?;
  Ok(parse_classification(&reply, vocabulary, max_notes))
}
