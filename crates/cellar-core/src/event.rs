//! Events — tasting nights with a guest list and a pour list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, bottle::Bottle, user::User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  pub id:          i64,
  pub name:        String,
  /// Short join code handed out to participants.
  pub code:        String,
  pub event_date:  NaiveDate,
  /// Folder holding the night's photos, if any.
  pub folder_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
  pub name:        String,
  pub code:        String,
  /// Defaults to today when `None`.
  pub event_date:  Option<NaiveDate>,
  pub folder_path: Option<String>,
}

impl NewEvent {
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::EmptyField("name"));
    }
    if self.code.trim().is_empty() {
      return Err(Error::EmptyField("code"));
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDetail {
  #[serde(flatten)]
  pub event:   Event,
  pub bottles: Vec<Bottle>,
  pub users:   Vec<User>,
}
