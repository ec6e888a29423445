//! API credentials, read once from a JSON file at startup.

use std::path::Path;

use serde::Deserialize;

use crate::{Error, Result};

/// Keys for the chat model and the search service.
#[derive(Clone, Deserialize)]
pub struct Secrets {
  #[serde(rename = "OPENAI_KEY", default)]
  pub openai_key: String,
  #[serde(rename = "SERP_KEY", default)]
  pub serp_key:   String,
}

impl std::fmt::Debug for Secrets {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Secrets")
      .field("openai_key", &"<redacted>")
      .field("serp_key", &"<redacted>")
      .finish()
  }
}

impl Secrets {
  /// Read and validate `path`. Both keys must be present and non-empty.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| Error::SecretsRead {
      path: path.to_path_buf(),
      source,
    })?;
    let secrets: Self =
      serde_json::from_str(&text).map_err(|source| Error::SecretsParse {
        path: path.to_path_buf(),
        source,
      })?;
    secrets.validate()
  }

  fn validate(self) -> Result<Self> {
    if self.openai_key.trim().is_empty() {
      return Err(Error::MissingSecret("OPENAI_KEY"));
    }
    if self.serp_key.trim().is_empty() {
      return Err(Error::MissingSecret("SERP_KEY"));
    }
    Ok(self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn write(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir()
      .join(format!("cellar-secrets-{}-{name}.json", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
  }

  #[test]
  fn loads_both_keys() {
    let path = write("both", r#"{"OPENAI_KEY": "sk-1", "SERP_KEY": "serp-1", "OTHER": 3}"#);
    let secrets = Secrets::load(&path).unwrap();
    assert_eq!(secrets.openai_key, "sk-1");
    assert_eq!(secrets.serp_key, "serp-1");
    assert!(!format!("{secrets:?}").contains("sk-1"));
  }

  #[test]
  fn empty_key_is_rejected() {
    let path = write("empty", r#"{"OPENAI_KEY": "", "SERP_KEY": "serp-1"}"#);
    assert!(matches!(
      Secrets::load(&path),
      Err(Error::MissingSecret("OPENAI_KEY"))
    ));
  }

  #[test]
  fn missing_file_and_bad_json_fail() {
    let missing = std::env::temp_dir().join("cellar-secrets-does-not-exist.json");
    assert!(matches!(Secrets::load(&missing), Err(Error::SecretsRead { .. })));

    let path = write("malformed", "[not an object");
    assert!(matches!(Secrets::load(&path), Err(Error::SecretsParse { .. })));
  }
}
