//! The tasting-note taxonomy.
//!
//! Notes form a fixed three-level tree addressed by name: generic tier-3
//! roots ("Fruity"), intermediate tier-2 groups ("Berry"), and specific tier-1
//! leaves ("Raspberry"). A child names its parent; the same name may appear
//! on two tiers (e.g. "rye" the group and "rye" the leaf).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Tier ────────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub enum Tier {
  Specific     = 1,
  Intermediate = 2,
  Generic      = 3,
}

impl Tier {
  /// The tier a parent must have, or `None` for roots.
  pub fn parent_tier(self) -> Option<Tier> {
    match self {
      Tier::Specific => Some(Tier::Intermediate),
      Tier::Intermediate => Some(Tier::Generic),
      Tier::Generic => None,
    }
  }

  pub fn as_u8(self) -> u8 { self as u8 }
}

impl TryFrom<i64> for Tier {
  type Error = Error;

  fn try_from(value: i64) -> Result<Self> {
    match value {
      1 => Ok(Tier::Specific),
      2 => Ok(Tier::Intermediate),
      3 => Ok(Tier::Generic),
      other => Err(Error::InvalidTier(other)),
    }
  }
}

impl From<Tier> for i64 {
  fn from(tier: Tier) -> Self { tier as i64 }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TastingNote {
  pub id:     i64,
  pub name:   String,
  pub parent: Option<String>,
  pub tier:   Tier,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTastingNote {
  pub name:   String,
  pub parent: Option<String>,
  pub tier:   Tier,
}

impl NewTastingNote {
  /// Check the note's position in the tree against the notes already stored.
  pub fn validate(&self, existing: &[TastingNote]) -> Result<()> {
    let name = self.name.trim();
    if name.is_empty() {
      return Err(Error::EmptyField("name"));
    }
    if existing.iter().any(|n| n.tier == self.tier && n.name == name) {
      return Err(Error::DuplicateTastingNote {
        name: name.to_owned(),
        tier: self.tier.as_u8(),
      });
    }

    match (self.tier.parent_tier(), self.parent.as_deref()) {
      (None, None) => Ok(()),
      (None, Some(_)) => Err(Error::UnexpectedParent(self.name.clone())),
      (Some(_), None) => Err(Error::MissingParent {
        name: self.name.clone(),
        tier: self.tier.as_u8(),
      }),
      (Some(expected), Some(parent)) => {
        let found = existing
          .iter()
          .any(|n| n.tier == expected && n.name == parent);
        if found {
          Ok(())
        } else {
          Err(Error::InvalidParent {
            name: self.name.clone(),
            parent: parent.to_owned(),
            expected: expected.as_u8(),
          })
        }
      }
    }
  }
}

/// Flatten the taxonomy into the vocabulary the classifier may pick from.
///
/// Every tier is included; names that appear on several tiers are listed
/// once, in first-seen order.
pub fn vocabulary(notes: &[TastingNote]) -> Vec<String> {
  let mut seen = HashSet::new();
  notes
    .iter()
    .filter(|n| seen.insert(n.name.as_str()))
    .map(|n| n.name.clone())
    .collect()
}

// ─── Tree ────────────────────────────────────────────────────────────────────

/// A tier-2 group with its tier-1 leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntermediateNote {
  pub name:        String,
  pub subsubnotes: Vec<String>,
}

/// A tier-3 root with its tier-2 groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericNote {
  pub name:     String,
  pub subnotes: Vec<IntermediateNote>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteTree(pub Vec<GenericNote>);

impl NoteTree {
  /// Assemble the tree from flat rows. Input order is preserved at every
  /// level; rows whose parent does not exist on the tier above are dropped.
  pub fn build(notes: &[TastingNote]) -> Self {
    let of_tier = |tier: Tier| notes.iter().filter(move |n| n.tier == tier);

    let roots = of_tier(Tier::Generic)
      .map(|root| GenericNote {
        name:     root.name.clone(),
        subnotes: of_tier(Tier::Intermediate)
          .filter(|mid| mid.parent.as_deref() == Some(root.name.as_str()))
          .map(|mid| IntermediateNote {
            name:        mid.name.clone(),
            subsubnotes: of_tier(Tier::Specific)
              .filter(|leaf| leaf.parent.as_deref() == Some(mid.name.as_str()))
              .map(|leaf| leaf.name.clone())
              .collect(),
          })
          .collect(),
      })
      .collect();

    Self(roots)
  }

  pub fn roots(&self) -> &[GenericNote] { &self.0 }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn note(id: i64, name: &str, parent: Option<&str>, tier: Tier) -> TastingNote {
    TastingNote {
      id,
      name: name.into(),
      parent: parent.map(Into::into),
      tier,
    }
  }

  fn fixture() -> Vec<TastingNote> {
    use Tier::*;
    vec![
      note(1, "Fruity", None, Generic),
      note(2, "Berry", Some("Fruity"), Intermediate),
      note(3, "Raspberry", Some("Berry"), Specific),
      note(4, "Spice", None, Generic),
      note(5, "baking spice", Some("Spice"), Intermediate),
      note(6, "clove", Some("baking spice"), Specific),
      note(7, "Blueberry", Some("Berry"), Specific),
      note(8, "stone fruit", Some("Fruity"), Intermediate),
      note(9, "plum", Some("stone fruit"), Specific),
      note(10, "Grain", None, Generic),
      note(11, "rye", Some("Grain"), Intermediate),
      note(12, "rye", Some("rye"), Specific),
    ]
  }

  #[test]
  fn every_leaf_appears_once_under_its_parent() {
    let notes = fixture();
    let tree = NoteTree::build(&notes);

    for leaf in notes.iter().filter(|n| n.tier == Tier::Specific) {
      let parents: Vec<&IntermediateNote> = tree
        .roots()
        .iter()
        .flat_map(|r| &r.subnotes)
        .filter(|mid| mid.subsubnotes.contains(&leaf.name))
        .collect();
      assert_eq!(parents.len(), 1, "leaf {:?}", leaf.name);
      assert_eq!(Some(parents[0].name.as_str()), leaf.parent.as_deref());
      let occurrences = parents[0]
        .subsubnotes
        .iter()
        .filter(|n| **n == leaf.name)
        .count();
      assert_eq!(occurrences, 1);
    }
  }

  #[test]
  fn every_group_appears_once_under_its_root() {
    let notes = fixture();
    let tree = NoteTree::build(&notes);

    for mid in notes.iter().filter(|n| n.tier == Tier::Intermediate) {
      let roots: Vec<&GenericNote> = tree
        .roots()
        .iter()
        .filter(|r| r.subnotes.iter().any(|s| s.name == mid.name))
        .collect();
      assert_eq!(roots.len(), 1, "group {:?}", mid.name);
      assert_eq!(Some(roots[0].name.as_str()), mid.parent.as_deref());
    }
  }

  #[test]
  fn tree_preserves_input_order() {
    let tree = NoteTree::build(&fixture());
    let roots: Vec<&str> = tree.roots().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(roots, ["Fruity", "Spice", "Grain"]);
    assert_eq!(
      tree.roots()[0].subnotes[0].subsubnotes,
      ["Raspberry", "Blueberry"]
    );
  }

  #[test]
  fn vocabulary_spans_all_tiers_without_duplicates() {
    let vocab = vocabulary(&fixture());
    assert!(vocab.contains(&"Fruity".to_string()));
    assert!(vocab.contains(&"Berry".to_string()));
    assert!(vocab.contains(&"plum".to_string()));
    assert_eq!(vocab.iter().filter(|n| *n == "rye").count(), 1);
  }

  #[test]
  fn placement_rules() {
    let existing = fixture();
    let new = |name: &str, parent: Option<&str>, tier| NewTastingNote {
      name: name.into(),
      parent: parent.map(Into::into),
      tier,
    };

    assert!(new("Floral", None, Tier::Generic).validate(&existing).is_ok());
    assert!(new("citrus", Some("Fruity"), Tier::Intermediate).validate(&existing).is_ok());
    assert!(new("cherry", Some("stone fruit"), Tier::Specific).validate(&existing).is_ok());

    assert!(matches!(
      new("Floral", Some("Fruity"), Tier::Generic).validate(&existing),
      Err(Error::UnexpectedParent(_))
    ));
    assert!(matches!(
      new("citrus", None, Tier::Intermediate).validate(&existing),
      Err(Error::MissingParent { tier: 2, .. })
    ));
    // A name may repeat across tiers but not within one.
    assert!(matches!(
      new("rye", Some("stone fruit"), Tier::Specific).validate(&existing),
      Err(Error::DuplicateTastingNote { tier: 1, .. })
    ));
    assert!(new("plum", Some("Fruity"), Tier::Intermediate).validate(&existing).is_ok());
    assert!(matches!(
      new("Berry", Some("Spice"), Tier::Intermediate).validate(&existing),
      Err(Error::DuplicateTastingNote { tier: 2, .. })
    ));
    assert!(matches!(
      new(" Fruity ", None, Tier::Generic).validate(&existing),
      Err(Error::DuplicateTastingNote { tier: 3, .. })
    ));
    // A leaf hanging directly off a root skips a tier.
    assert!(matches!(
      new("cherry", Some("Fruity"), Tier::Specific).validate(&existing),
      Err(Error::InvalidParent { expected: 2, .. })
    ));
  }

  #[test]
  fn tier_from_integer() {
    assert_eq!(Tier::try_from(2).unwrap(), Tier::Intermediate);
    assert!(matches!(Tier::try_from(4), Err(Error::InvalidTier(4))));
  }
}
