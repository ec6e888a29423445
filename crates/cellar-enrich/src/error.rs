//! Error types for `cellar-enrich`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to read secrets file {path}: {source}")]
  SecretsRead {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("secrets file {path} is not a JSON object: {source}")]
  SecretsParse {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("secret {0:?} is missing or empty")]
  MissingSecret(&'static str),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{service} responded with {status}")]
  Status {
    service: &'static str,
    status:  reqwest::StatusCode,
  },

  #[error("malformed {service} response: {reason}")]
  Malformed {
    service: &'static str,
    reason:  String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
