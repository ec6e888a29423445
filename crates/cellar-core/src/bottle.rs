//! Bottles — the inventory the whole application revolves around.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

use crate::{Error, Result};

// ─── Stored row ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bottle {
  pub id:          i64,
  pub brand:       String,
  pub name:        String,
  /// Kept as entered (`"46"`, `"46%"`, `"92 proof"`).
  pub abv:         String,
  pub spirit_type: String,
  pub subtype:     Option<String>,
  pub description: Option<String>,
  pub available:   bool,
  /// Path relative to the configured upload directory.
  pub image_path:  Option<String>,
}

impl Bottle {
  /// The free-text query used for web search and LLM prompts.
  pub fn search_query(&self) -> String {
    format!("{} {} {}", self.brand, self.name, self.spirit_type)
  }

  pub fn has_description(&self) -> bool {
    self
      .description
      .as_deref()
      .is_some_and(|d| !d.trim().is_empty())
  }
}

// ─── Writes ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct NewBottle {
  pub brand:       String,
  pub name:        String,
  pub abv:         String,
  pub spirit_type: String,
  pub subtype:     Option<String>,
  pub description: Option<String>,
  pub image_path:  Option<String>,
}

impl NewBottle {
  pub fn validate(&self) -> Result<()> {
    for (field, value) in [
      ("brand", &self.brand),
      ("name", &self.name),
      ("abv", &self.abv),
      ("spirit_type", &self.spirit_type),
    ] {
      if value.trim().is_empty() {
        return Err(Error::EmptyField(field));
      }
    }
    Ok(())
  }
}

/// A partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BottlePatch {
  pub brand:       Option<String>,
  pub name:        Option<String>,
  pub abv:         Option<String>,
  pub spirit_type: Option<String>,
  pub subtype:     Option<String>,
  pub description: Option<String>,
  pub available:   Option<bool>,
  pub image_path:  Option<String>,
}

impl BottlePatch {
  pub fn is_empty(&self) -> bool {
    self.brand.is_none()
      && self.name.is_none()
      && self.abv.is_none()
      && self.spirit_type.is_none()
      && self.subtype.is_none()
      && self.description.is_none()
      && self.available.is_none()
      && self.image_path.is_none()
  }
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Columns the inventory may be sorted by.
///
/// Parsed from caller input and mapped to a fixed column name, so no caller
/// string ever reaches SQL text.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum SortColumn {
  Id,
  #[default]
  Name,
  Brand,
  Abv,
  SpiritType,
  Subtype,
}

impl SortColumn {
  pub fn parse(s: &str) -> Result<Self> {
    s.parse()
      .map_err(|_| Error::UnknownSortColumn(s.to_owned()))
  }

  pub fn column(self) -> &'static str { self.into() }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum SortOrder {
  #[default]
  #[strum(serialize = "asc")]
  Asc,
  #[strum(serialize = "desc")]
  Desc,
}

impl SortOrder {
  pub fn parse(s: &str) -> Result<Self> {
    s.parse()
      .map_err(|_| Error::UnknownSortOrder(s.to_owned()))
  }

  pub fn keyword(self) -> &'static str {
    match self {
      SortOrder::Asc => "ASC",
      SortOrder::Desc => "DESC",
    }
  }
}

/// Parameters for [`BarStore::list_bottles`](crate::store::BarStore::list_bottles).
#[derive(Debug, Clone, Default)]
pub struct BottleQuery {
  pub brand:       Option<String>,
  pub spirit_type: Option<String>,
  pub subtype:     Option<String>,
  pub sort_by:     SortColumn,
  pub order:       SortOrder,
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// One review as shown on a bottle's card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BottleReview {
  pub review_id:     i64,
  pub reviewer_name: String,
  pub score:         u8,
  pub notes:         String,
  pub review_date:   NaiveDate,
  pub tasting_notes: Vec<String>,
}

/// How many reviews of a bottle mentioned a tasting note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteCount {
  pub name:  String,
  pub count: u32,
}

/// A bottle with everything derived from its reviews and enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BottleDetail {
  #[serde(flatten)]
  pub bottle:          Bottle,
  pub reviews:         Vec<BottleReview>,
  /// Sorted by count, most frequent first.
  pub community_notes: Vec<NoteCount>,
  pub expert_notes:    Vec<String>,
}
