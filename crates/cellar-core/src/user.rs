//! Users — club members who write reviews and attend events.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:         i64,
  pub name:       String,
  pub image_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
  pub name:       String,
  pub image_path: Option<String>,
}

impl NewUser {
  /// Validate and return the name in its stored form.
  pub fn normalized_name(&self) -> Result<String> {
    let name = capitalize_name(&self.name);
    if name.is_empty() {
      return Err(Error::EmptyField("name"));
    }
    Ok(name)
  }
}

/// Names are stored and looked up with the first letter upper-cased and the
/// rest lower-cased, so `"alice"`, `"ALICE"` and `"Alice"` are one user.
pub fn capitalize_name(name: &str) -> String {
  let mut chars = name.trim().chars();
  match chars.next() {
    Some(first) => first
      .to_uppercase()
      .chain(chars.flat_map(char::to_lowercase))
      .collect(),
    None => String::new(),
  }
}

/// A review as listed on a user's page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserReview {
  pub review_id:         i64,
  pub bottle_id:         i64,
  pub event_id:          Option<i64>,
  pub score:             u8,
  pub review_text:       String,
  pub review_date:       NaiveDate,
  pub bottle_name:       String,
  pub bottle_brand:      String,
  pub bottle_image_path: Option<String>,
  pub tasting_notes:     Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetail {
  #[serde(flatten)]
  pub user:    User,
  pub reviews: Vec<UserReview>,
}
